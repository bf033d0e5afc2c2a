//! Android signing models.

use std::path::{Path, PathBuf};

use serde::Serialize;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{KeypropsError, Result};
use crate::properties::Properties;

/// `key.properties` key holding the key alias.
pub const KEY_ALIAS: &str = "keyAlias";
/// `key.properties` key holding the key password.
pub const KEY_PASSWORD: &str = "keyPassword";
/// `key.properties` key holding the keystore path.
pub const STORE_FILE: &str = "storeFile";
/// `key.properties` key holding the keystore password.
pub const STORE_PASSWORD: &str = "storePassword";

/// Alias of the key in the SDK-generated debug keystore.
pub const DEBUG_KEY_ALIAS: &str = "androiddebugkey";
/// Password of both the debug keystore and its key.
pub const DEBUG_PASSWORD: &str = "android";
/// Location of the debug keystore below the user's home directory.
pub const DEBUG_KEYSTORE_SUFFIX: &str = "/.android/debug.keystore";

/// Replacement shown for passwords in redacted output.
pub const MASK: &str = "********";

/// Credentials used to sign an Android package.
///
/// Built either entirely from `key.properties` or entirely from the debug
/// keystore defaults. Keys absent from an existing `key.properties` stay
/// `None`; nothing is defaulted per field.
#[derive(Clone, PartialEq, Eq, Serialize, Zeroize, ZeroizeOnDrop)]
#[serde(rename_all = "camelCase")]
pub struct SigningConfig {
    pub key_alias: Option<String>,
    pub key_password: Option<String>,
    /// Raw `storeFile` value; see [`SigningConfig::store_file_in`].
    pub store_file_path: Option<String>,
    pub store_password: Option<String>,
}

impl SigningConfig {
    /// The Android SDK debug keystore under `home`.
    pub fn debug_keystore(home: &Path) -> Self {
        Self {
            key_alias: Some(DEBUG_KEY_ALIAS.to_string()),
            key_password: Some(DEBUG_PASSWORD.to_string()),
            store_file_path: Some(format!("{}{}", home.display(), DEBUG_KEYSTORE_SUFFIX)),
            store_password: Some(DEBUG_PASSWORD.to_string()),
        }
    }

    /// Copies the four recognized keys out of `props` verbatim.
    pub fn from_properties(props: &Properties) -> Self {
        let take = |key: &str| props.get(key).map(str::to_string);
        Self {
            key_alias: take(KEY_ALIAS),
            key_password: take(KEY_PASSWORD),
            store_file_path: take(STORE_FILE),
            store_password: take(STORE_PASSWORD),
        }
    }

    /// Recognized keys that are not set, in `key.properties` spelling.
    pub fn missing_keys(&self) -> Vec<&'static str> {
        [
            (KEY_ALIAS, &self.key_alias),
            (KEY_PASSWORD, &self.key_password),
            (STORE_FILE, &self.store_file_path),
            (STORE_PASSWORD, &self.store_password),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_none())
        .map(|(key, _)| key)
        .collect()
    }

    /// Fails with the first unset key, for consumers that need every field.
    pub fn require_complete(&self) -> Result<()> {
        match self.missing_keys().first() {
            Some(&key) => Err(KeypropsError::MissingSigningKey(key)),
            None => Ok(()),
        }
    }

    /// Resolves the keystore path the way Gradle's `file(..)` does inside a
    /// module: absolute paths are kept, relative ones are joined to
    /// `module_dir`.
    pub fn store_file_in(&self, module_dir: &Path) -> Option<PathBuf> {
        self.store_file_path.as_deref().map(|raw| {
            let path = Path::new(raw);
            if path.is_absolute() {
                path.to_path_buf()
            } else {
                module_dir.join(path)
            }
        })
    }

    /// Copy with both passwords replaced by a mask, for display.
    pub fn redacted(&self) -> Self {
        let mask = |value: &Option<String>| value.as_ref().map(|_| MASK.to_string());
        Self {
            key_alias: self.key_alias.clone(),
            key_password: mask(&self.key_password),
            store_file_path: self.store_file_path.clone(),
            store_password: mask(&self.store_password),
        }
    }
}

impl std::fmt::Debug for SigningConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redacted = self.redacted();
        f.debug_struct("SigningConfig")
            .field("key_alias", &redacted.key_alias)
            .field("key_password", &redacted.key_password)
            .field("store_file_path", &redacted.store_file_path)
            .field("store_password", &redacted.store_password)
            .finish()
    }
}

/// Where a [`SigningConfig`] came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SigningSource {
    /// Read from an existing properties file.
    KeyProperties { path: PathBuf },
    /// The properties file does not exist; debug keystore defaults apply.
    DebugFallback,
}

impl SigningSource {
    pub fn is_fallback(&self) -> bool {
        matches!(self, SigningSource::DebugFallback)
    }
}

impl std::fmt::Display for SigningSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SigningSource::KeyProperties { path } => write!(f, "{}", path.display()),
            SigningSource::DebugFallback => write!(f, "debug keystore fallback"),
        }
    }
}

/// A signing config together with its origin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedSigning {
    pub config: SigningConfig,
    pub source: SigningSource,
}

/// Android keystore container format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum KeystoreType {
    Jks,
    Pkcs12,
}

impl KeystoreType {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeystoreType::Jks => "jks",
            KeystoreType::Pkcs12 => "pkcs12",
        }
    }
}

impl std::fmt::Display for KeystoreType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Information gathered about a keystore file on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeystoreInfo {
    pub path: PathBuf,
    pub size_bytes: u64,
    pub keystore_type: KeystoreType,
}
