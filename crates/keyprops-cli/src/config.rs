//! CLI configuration resolution.
//!
//! Priority order: CLI flags > environment variables > defaults derived
//! from the current directory.

use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use keyprops_core::flutter::locate_android_dir;
use keyprops_core::signing::key_properties_path;

/// Overrides the key.properties location.
pub const PROPERTIES_ENV: &str = "KEYPROPS_PROPERTIES";
/// Makes `resolve` fail when a signing key is unset.
pub const STRICT_ENV: &str = "KEYPROPS_STRICT";

/// Resolved configuration after applying priority rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    /// Android root project (the directory holding key.properties).
    pub android_dir: PathBuf,
    /// App module directory; relative `storeFile` values resolve against it.
    pub module_dir: PathBuf,
    /// Signing properties file to read.
    pub properties_file: PathBuf,
    /// Require every signing key to be set.
    pub strict: bool,
}

/// Resolve configuration by applying priority rules.
///
/// `android_dir_flag` and `module` already carry clap's flag/env handling
/// (`KEYPROPS_ANDROID_DIR`, `KEYPROPS_MODULE`). The Android directory may be
/// a Flutter project root; its `android/` child is used when present.
pub fn resolve_config(
    android_dir_flag: Option<&Path>,
    properties_flag: Option<&Path>,
    module: &str,
    strict_flag: bool,
    cwd: &Path,
) -> Result<ResolvedConfig> {
    if module.is_empty() || Path::new(module).is_absolute() {
        bail!("Module must be a directory name relative to the Android root, got '{}'", module);
    }

    let base = match android_dir_flag {
        Some(dir) if dir.is_absolute() => dir.to_path_buf(),
        Some(dir) => cwd.join(dir),
        None => cwd.to_path_buf(),
    };
    let android_dir = match locate_android_dir(&base) {
        Ok(dir) => dir,
        Err(e) => {
            tracing::debug!("{}; using {} as the Android root", e, base.display());
            base
        }
    };

    let properties_file = match properties_flag {
        Some(path) => cwd.join(path),
        None => match std::env::var_os(PROPERTIES_ENV) {
            Some(path) if !path.is_empty() => cwd.join(path),
            _ => key_properties_path(&android_dir),
        },
    };

    let strict = strict_flag || env_flag(STRICT_ENV)?;

    Ok(ResolvedConfig {
        module_dir: android_dir.join(module),
        android_dir,
        properties_file,
        strict,
    })
}

fn env_flag(name: &str) -> Result<bool> {
    let Ok(value) = std::env::var(name) else {
        return Ok(false);
    };

    match value.trim().to_lowercase().as_str() {
        "" | "0" | "false" | "no" | "off" => Ok(false),
        "1" | "true" | "yes" | "on" => Ok(true),
        other => bail!("{} must be a boolean, got '{}'", name, other),
    }
}
