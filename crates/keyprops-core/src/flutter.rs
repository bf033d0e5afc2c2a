//! Flutter project detection and `local.properties` settings.
//!
//! The Flutter tool writes the app version and SDK location into
//! `android/local.properties`; the Flutter Gradle plugin supplies SDK levels
//! when a project does not override them there.

use std::path::{Path, PathBuf};

use crate::error::{KeypropsError, Result};
use crate::properties::Properties;
use crate::signing::resolver::file_exists;

/// File name of the Flutter-managed properties inside the Android root.
pub const LOCAL_PROPERTIES_FILE: &str = "local.properties";

/// Values the Flutter Gradle plugin falls back to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlutterDefaults {
    pub compile_sdk: u32,
    pub min_sdk: u32,
    pub target_sdk: u32,
    pub ndk_version: &'static str,
    pub version_code: u32,
    pub version_name: &'static str,
}

impl Default for FlutterDefaults {
    fn default() -> Self {
        Self {
            compile_sdk: 35,
            min_sdk: 21,
            target_sdk: 35,
            ndk_version: "27.0.12077973",
            version_code: 1,
            version_name: "1.0",
        }
    }
}

/// Settings read from `local.properties`. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlutterLocalProperties {
    pub sdk_path: Option<PathBuf>,
    pub version_code: Option<u32>,
    pub version_name: Option<String>,
    pub min_sdk: Option<u32>,
    pub target_sdk: Option<u32>,
    pub compile_sdk: Option<u32>,
    pub ndk_version: Option<String>,
}

impl FlutterLocalProperties {
    /// Loads `local.properties` from the Android root `android_dir`.
    ///
    /// A missing file yields empty settings. Anything else that prevents
    /// reading it is an error.
    pub fn load(android_dir: &Path) -> Result<Self> {
        let path = android_dir.join(LOCAL_PROPERTIES_FILE);
        if !file_exists(&path)? {
            tracing::debug!("No {} found, using Flutter defaults", path.display());
            return Ok(Self::default());
        }

        let props = Properties::load(&path)?;
        Self::from_properties(&props)
    }

    pub fn from_properties(props: &Properties) -> Result<Self> {
        let text = |key: &str| props.get(key).map(|v| v.trim().to_string());

        Ok(Self {
            sdk_path: props.get("flutter.sdk").map(PathBuf::from),
            version_code: parse_number(props, "flutter.versionCode")?,
            version_name: text("flutter.versionName"),
            min_sdk: parse_number(props, "flutter.minSdkVersion")?,
            target_sdk: parse_number(props, "flutter.targetSdkVersion")?,
            compile_sdk: parse_number(props, "flutter.compileSdkVersion")?,
            ndk_version: text("flutter.ndkVersion"),
        })
    }
}

fn parse_number(props: &Properties, key: &str) -> Result<Option<u32>> {
    let Some(raw) = props.get(key) else {
        return Ok(None);
    };

    raw.trim()
        .parse::<u32>()
        .map(Some)
        .map_err(|e| KeypropsError::InvalidValue {
            key: key.to_string(),
            value: raw.to_string(),
            reason: e.to_string(),
        })
}

/// Detects if a directory contains a Flutter project.
///
/// A Flutter project is identified by the presence of `pubspec.yaml`.
pub fn detect_flutter_project(workspace: &Path) -> bool {
    workspace.join("pubspec.yaml").is_file()
}

fn is_android_root(dir: &Path) -> bool {
    dir.join("settings.gradle").is_file()
        || dir.join("settings.gradle.kts").is_file()
        || dir.join("app").is_dir()
}

/// Finds the Android root project for `dir`.
///
/// Accepts either a Flutter project root (uses its `android/` directory) or
/// the Android root itself. A directory with `pubspec.yaml` always resolves
/// to its `android/` child when that exists.
pub fn locate_android_dir(dir: &Path) -> Result<PathBuf> {
    let nested = dir.join("android");
    if is_android_root(&nested) || (detect_flutter_project(dir) && nested.is_dir()) {
        return Ok(nested);
    }
    if is_android_root(dir) {
        return Ok(dir.to_path_buf());
    }

    Err(KeypropsError::AndroidProjectNotFound(dir.to_path_buf()))
}
