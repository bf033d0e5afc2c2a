//! keyprops Core Library
//!
//! Signing configuration and build-variant resolution for the Android side of
//! Flutter projects: `key.properties` parsing, debug-keystore fallback,
//! keystore inspection and `local.properties` driven SDK/version settings.

pub mod error;
pub mod flutter;
pub mod models;
pub mod properties;
pub mod signing;
pub mod variant;

pub use error::{KeypropsError, Result};
pub use signing::resolve;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
