//! Android signing: `key.properties` resolution and keystore utilities.
//!
//! This module provides functionality for:
//! - Resolving the release signing config with the debug keystore fallback
//! - Inspecting and verifying keystore files
//! - Generating, writing and removing `key.properties`

pub mod android;
pub mod resolver;

pub use android::*;
pub use resolver::*;
