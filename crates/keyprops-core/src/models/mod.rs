//! Domain models for signing and build-variant resolution.

pub mod signing;
pub mod variant;

pub use signing::*;
pub use variant::*;
