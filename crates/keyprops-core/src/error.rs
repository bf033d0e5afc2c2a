//! Error types for the keyprops core library.

use std::path::PathBuf;

use thiserror::Error;

/// Core error type for signing and build-variant resolution.
#[derive(Error, Debug)]
pub enum KeypropsError {
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed properties in {} at line {line}: {message}", .path.display())]
    ConfigParse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("Could not determine home directory")]
    HomeDirUnavailable,

    #[error("Signing key '{0}' is not set")]
    MissingSigningKey(&'static str),

    #[error("Invalid value for {key}: '{value}' ({reason})")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    #[error("Invalid application id: {0}")]
    InvalidApplicationId(String),

    #[error("Keystore error: {0}")]
    Keystore(String),

    #[error("{} already exists", .0.display())]
    AlreadyExists(PathBuf),

    #[error("Android project not found in {}", .0.display())]
    AndroidProjectNotFound(PathBuf),
}

impl KeypropsError {
    /// Wraps an I/O error together with the path it concerns.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        KeypropsError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for keyprops operations.
pub type Result<T> = std::result::Result<T, KeypropsError>;
