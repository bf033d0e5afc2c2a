//! Android build-variant resolution.
//!
//! Assembles the app module configuration of a Flutter Android project:
//! identity, SDK levels, version, signing configs and build types.

use std::path::Path;

use crate::error::{KeypropsError, Result};
use crate::flutter::{FlutterDefaults, FlutterLocalProperties};
use crate::models::{
    AndroidBuildConfig, AppVersion, BuildType, JAVA_VERSION, SdkBounds, SigningConfig,
    SigningConfigName, SigningConfigs,
};
use crate::signing::{key_properties_path, resolve_with_home};

/// Project-specific values a build script hardcodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantSettings {
    pub application_id: String,
    /// Kotlin/Java namespace; defaults to the application id.
    pub namespace: Option<String>,
}

impl VariantSettings {
    pub fn new(application_id: impl Into<String>) -> Self {
        Self {
            application_id: application_id.into(),
            namespace: None,
        }
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }
}

/// Checks Android's application id rules: two or more `.`-separated
/// segments, each starting with a letter and made of `[A-Za-z0-9_]`.
pub fn validate_application_id(id: &str) -> Result<()> {
    let segments: Vec<&str> = id.split('.').collect();
    if segments.len() < 2 {
        return Err(KeypropsError::InvalidApplicationId(format!(
            "'{}' needs at least two segments",
            id
        )));
    }

    for segment in segments {
        let mut chars = segment.chars();
        let starts_with_letter = chars.next().is_some_and(|c| c.is_ascii_alphabetic());
        if !starts_with_letter || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(KeypropsError::InvalidApplicationId(format!(
                "'{}' has invalid segment '{}'",
                id, segment
            )));
        }
    }

    Ok(())
}

/// Resolves the app module configuration for the Android root `android_dir`.
pub fn resolve_build_config(
    android_dir: &Path,
    settings: &VariantSettings,
) -> Result<AndroidBuildConfig> {
    let home = dirs::home_dir().ok_or(KeypropsError::HomeDirUnavailable)?;
    resolve_build_config_with_home(android_dir, settings, &home)
}

/// Like [`resolve_build_config`] with an explicit home directory for the
/// debug keystore.
pub fn resolve_build_config_with_home(
    android_dir: &Path,
    settings: &VariantSettings,
    home: &Path,
) -> Result<AndroidBuildConfig> {
    validate_application_id(&settings.application_id)?;
    let namespace = settings
        .namespace
        .clone()
        .unwrap_or_else(|| settings.application_id.clone());
    validate_application_id(&namespace)?;

    let local = FlutterLocalProperties::load(android_dir)?;
    let defaults = FlutterDefaults::default();

    let sdk = SdkBounds {
        min_sdk: local.min_sdk.unwrap_or(defaults.min_sdk),
        target_sdk: local.target_sdk.unwrap_or(defaults.target_sdk),
        compile_sdk: local.compile_sdk.unwrap_or(defaults.compile_sdk),
    };
    for warning in sdk.warnings() {
        tracing::warn!("{}", warning);
    }

    let version = AppVersion {
        version_code: local.version_code.unwrap_or(defaults.version_code),
        version_name: local
            .version_name
            .unwrap_or_else(|| defaults.version_name.to_string()),
    };

    let release = resolve_with_home(&key_properties_path(android_dir), home)?;
    if release.source.is_fallback() {
        tracing::info!("Release builds will be signed with the debug keystore");
    }

    Ok(AndroidBuildConfig {
        namespace,
        application_id: settings.application_id.clone(),
        sdk,
        ndk_version: local
            .ndk_version
            .unwrap_or_else(|| defaults.ndk_version.to_string()),
        flutter_sdk: local.sdk_path,
        version,
        java_version: JAVA_VERSION,
        signing_configs: SigningConfigs {
            debug: SigningConfig::debug_keystore(home),
            release,
        },
        build_types: vec![
            BuildType {
                name: "debug".to_string(),
                signing_config: SigningConfigName::Debug,
            },
            BuildType {
                name: "release".to_string(),
                signing_config: SigningConfigName::Release,
            },
        ],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_application_id() {
        assert!(validate_application_id("com.github.qiqd.holo").is_ok());
        assert!(validate_application_id("a.b_2").is_ok());

        assert!(validate_application_id("holo").is_err());
        assert!(validate_application_id("com..holo").is_err());
        assert!(validate_application_id("com.1holo").is_err());
        assert!(validate_application_id("com.ho-lo").is_err());
        assert!(validate_application_id("com.holo.").is_err());
    }

    #[test]
    fn test_defaults_without_local_properties() {
        let dir = tempfile::tempdir().unwrap();
        let settings = VariantSettings::new("com.example.app");

        let config =
            resolve_build_config_with_home(dir.path(), &settings, Path::new("/home/dev")).unwrap();
        let defaults = FlutterDefaults::default();

        assert_eq!(config.namespace, "com.example.app");
        assert_eq!(config.sdk.min_sdk, defaults.min_sdk);
        assert_eq!(config.sdk.target_sdk, defaults.target_sdk);
        assert_eq!(config.sdk.compile_sdk, defaults.compile_sdk);
        assert_eq!(config.ndk_version, defaults.ndk_version);
        assert_eq!(config.version.version_code, 1);
        assert_eq!(config.version.version_name, "1.0");
        assert_eq!(config.java_version, 17);
    }

    #[test]
    fn test_namespace_override() {
        let dir = tempfile::tempdir().unwrap();
        let settings = VariantSettings::new("com.example.app").with_namespace("com.example.core");

        let config =
            resolve_build_config_with_home(dir.path(), &settings, Path::new("/home/dev")).unwrap();
        assert_eq!(config.namespace, "com.example.core");
        assert_eq!(config.application_id, "com.example.app");
    }

    #[test]
    fn test_invalid_application_id_fails_before_reading_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("local.properties"), "flutter.versionCode=x\n").unwrap();

        let err = resolve_build_config_with_home(
            dir.path(),
            &VariantSettings::new("app"),
            Path::new("/home/dev"),
        )
        .unwrap_err();
        assert!(matches!(err, KeypropsError::InvalidApplicationId(_)));
    }

    #[test]
    fn test_build_types_use_matching_signing_configs() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("key.properties"),
            "keyAlias=upload\nkeyPassword=kp\nstoreFile=upload.jks\nstorePassword=sp\n",
        )
        .unwrap();

        let config = resolve_build_config_with_home(
            dir.path(),
            &VariantSettings::new("com.example.app"),
            Path::new("/home/dev"),
        )
        .unwrap();

        let debug = config.signing_for("debug").unwrap();
        assert_eq!(debug.key_alias.as_deref(), Some("androiddebugkey"));

        let release = config.signing_for("release").unwrap();
        assert_eq!(release.key_alias.as_deref(), Some("upload"));
        assert!(config.signing_for("profile").is_none());
    }
}
