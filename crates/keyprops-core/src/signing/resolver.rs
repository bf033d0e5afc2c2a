//! Release signing config resolution.
//!
//! `key.properties` is optional. When it exists its four signing keys are
//! used as-is; when it does not, the Android SDK debug keystore is used so
//! that release builds still produce an installable package.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{KeypropsError, Result};
use crate::models::{ResolvedSigning, SigningConfig, SigningSource};
use crate::properties::Properties;

/// File name of the signing properties inside the Android root project.
pub const KEY_PROPERTIES_FILE: &str = "key.properties";

/// Location of `key.properties` for the Android root project `android_dir`.
pub fn key_properties_path(android_dir: &Path) -> PathBuf {
    android_dir.join(KEY_PROPERTIES_FILE)
}

/// Resolves the signing config from `properties_file`.
///
/// A missing file yields the debug keystore defaults. An existing file that
/// cannot be read fails with [`KeypropsError::Io`]; one that does not parse
/// fails with [`KeypropsError::ConfigParse`].
pub fn resolve(properties_file: &Path) -> Result<SigningConfig> {
    resolve_detailed(properties_file).map(|resolved| resolved.config)
}

/// Like [`resolve`], also reporting where the config came from.
pub fn resolve_detailed(properties_file: &Path) -> Result<ResolvedSigning> {
    resolve_with(properties_file, dirs::home_dir)
}

/// Like [`resolve_detailed`] with an explicit home directory for the
/// debug keystore fallback.
pub fn resolve_with_home(properties_file: &Path, home: &Path) -> Result<ResolvedSigning> {
    resolve_with(properties_file, || Some(home.to_path_buf()))
}

fn resolve_with(
    properties_file: &Path,
    home_dir: impl FnOnce() -> Option<PathBuf>,
) -> Result<ResolvedSigning> {
    if !file_exists(properties_file)? {
        let home = home_dir().ok_or(KeypropsError::HomeDirUnavailable)?;
        tracing::debug!(
            "{} not found, falling back to the debug keystore",
            properties_file.display()
        );
        return Ok(ResolvedSigning {
            config: SigningConfig::debug_keystore(&home),
            source: SigningSource::DebugFallback,
        });
    }

    let props = Properties::load(properties_file)?;
    let config = SigningConfig::from_properties(&props);

    let missing = config.missing_keys();
    if !missing.is_empty() {
        tracing::warn!(
            "{} does not set {}",
            properties_file.display(),
            missing.join(", ")
        );
    }
    tracing::debug!("Loaded signing config from {}", properties_file.display());

    Ok(ResolvedSigning {
        config,
        source: SigningSource::KeyProperties {
            path: properties_file.to_path_buf(),
        },
    })
}

/// Existence check that only treats "not there" as absence. Other
/// metadata failures (permissions on a parent directory) are errors.
pub(crate) fn file_exists(path: &Path) -> Result<bool> {
    match std::fs::metadata(path) {
        Ok(_) => Ok(true),
        Err(e) if matches!(e.kind(), ErrorKind::NotFound | ErrorKind::NotADirectory) => Ok(false),
        Err(e) => Err(KeypropsError::io(path, e)),
    }
}
