//! Integration tests for signing config resolution.
//!
//! These tests exercise `resolve` against real files in temporary
//! directories, covering both the key.properties and debug fallback paths.

use std::path::{Path, PathBuf};

use keyprops_core::models::{SigningConfig, SigningSource};
use keyprops_core::signing::{key_properties_path, resolve_with_home, write_key_properties};
use keyprops_core::variant::{VariantSettings, resolve_build_config_with_home};
use keyprops_core::{KeypropsError, resolve};
use tempfile::TempDir;

/// Helper to create an Android root with an optional key.properties.
fn android_project(key_properties: Option<&str>) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("app")).unwrap();
    if let Some(content) = key_properties {
        std::fs::write(key_properties_path(dir.path()), content).unwrap();
    }
    let path = key_properties_path(dir.path());
    (dir, path)
}

// =============================================================================
// Debug Fallback Tests
// =============================================================================

mod fallback {
    use super::*;

    #[cfg(unix)]
    #[test]
    fn missing_file_uses_debug_keystore_under_home() {
        let (_dir, path) = android_project(None);
        let home = tempfile::tempdir().unwrap();

        let config = temp_env::with_var("HOME", Some(home.path()), || resolve(&path).unwrap());

        assert_eq!(config.key_alias.as_deref(), Some("androiddebugkey"));
        assert_eq!(config.key_password.as_deref(), Some("android"));
        assert_eq!(config.store_password.as_deref(), Some("android"));
        let store = config.store_file_path.as_deref().unwrap();
        assert!(store.ends_with("/.android/debug.keystore"));
        assert!(store.starts_with(&home.path().display().to_string()));
    }

    #[test]
    fn missing_file_reports_fallback_source() {
        let (_dir, path) = android_project(None);

        let resolved = resolve_with_home(&path, Path::new("/home/dev")).unwrap();

        assert_eq!(resolved.source, SigningSource::DebugFallback);
        assert_eq!(
            resolved.config.store_file_path.as_deref(),
            Some("/home/dev/.android/debug.keystore")
        );
    }

    #[test]
    fn empty_file_does_not_fall_back() {
        let (_dir, path) = android_project(Some(""));

        let resolved = resolve_with_home(&path, Path::new("/home/dev")).unwrap();

        assert!(!resolved.source.is_fallback());
        assert_eq!(resolved.config.key_alias, None);
        assert_eq!(resolved.config.key_password, None);
        assert_eq!(resolved.config.store_file_path, None);
        assert_eq!(resolved.config.store_password, None);
    }

    #[test]
    fn comment_only_file_does_not_fall_back() {
        let (_dir, path) = android_project(Some("# release keys live in CI\n"));

        let resolved = resolve_with_home(&path, Path::new("/home/dev")).unwrap();

        assert!(!resolved.source.is_fallback());
        assert_eq!(resolved.config.missing_keys().len(), 4);
    }
}

// =============================================================================
// key.properties Tests
// =============================================================================

mod key_properties {
    use super::*;

    #[test]
    fn release_scenario_is_taken_verbatim() {
        let (_dir, path) = android_project(Some(
            "keyAlias=rel\nkeyPassword=secret\nstoreFile=/keys/release.jks\nstorePassword=secret2",
        ));

        let config = resolve_with_home(&path, Path::new("/home/dev"))
            .unwrap()
            .config;

        let expected = SigningConfig {
            key_alias: Some("rel".to_string()),
            key_password: Some("secret".to_string()),
            store_file_path: Some("/keys/release.jks".to_string()),
            store_password: Some("secret2".to_string()),
        };
        assert_eq!(config, expected);
    }

    #[test]
    fn partial_file_leaves_missing_keys_unset() {
        let (_dir, path) = android_project(Some("keyAlias=rel\nstorePassword=secret2\n"));

        let config = resolve_with_home(&path, Path::new("/home/dev"))
            .unwrap()
            .config;

        assert_eq!(config.key_alias.as_deref(), Some("rel"));
        assert_eq!(config.key_password, None);
        assert_eq!(config.store_file_path, None);
        assert!(matches!(
            config.require_complete(),
            Err(KeypropsError::MissingSigningKey("keyPassword"))
        ));
    }

    #[test]
    fn resolving_twice_gives_identical_results() {
        let (_dir, path) = android_project(Some(
            "keyAlias=rel\nkeyPassword=secret\nstoreFile=release.jks\nstorePassword=secret2\n",
        ));

        let first = resolve_with_home(&path, Path::new("/home/dev")).unwrap();
        let second = resolve_with_home(&path, Path::new("/home/dev")).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn relative_store_file_resolves_against_app_module() {
        let (dir, path) = android_project(Some("storeFile=../keys/upload.jks\n"));

        let config = resolve_with_home(&path, Path::new("/home/dev"))
            .unwrap()
            .config;

        assert_eq!(
            config.store_file_in(&dir.path().join("app")),
            Some(dir.path().join("app/../keys/upload.jks"))
        );
    }

    #[test]
    fn generated_file_resolves_back() {
        let (dir, _) = android_project(None);
        let keystore = Path::new("/keys/my upload=key.jks");

        let path =
            write_key_properties(dir.path(), keystore, "s:p", "upload", "k#p", false).unwrap();
        let config = resolve_with_home(&path, Path::new("/home/dev"))
            .unwrap()
            .config;

        assert_eq!(config.key_alias.as_deref(), Some("upload"));
        assert_eq!(config.key_password.as_deref(), Some("k#p"));
        assert_eq!(config.store_password.as_deref(), Some("s:p"));
        assert_eq!(
            config.store_file_path.as_deref(),
            Some("/keys/my upload=key.jks")
        );
    }
}

// =============================================================================
// Failure Tests
// =============================================================================

mod failures {
    use super::*;

    #[test]
    fn malformed_escape_is_config_parse_error() {
        let (_dir, path) = android_project(Some("keyAlias=rel\nstorePassword=\\u00\n"));

        let err = resolve_with_home(&path, Path::new("/home/dev")).unwrap_err();

        assert!(matches!(err, KeypropsError::ConfigParse { line: 2, .. }));
        assert!(err.to_string().contains("key.properties"));
    }

    #[test]
    fn directory_in_place_of_file_is_io_error() {
        let (_dir, path) = android_project(None);
        std::fs::create_dir(&path).unwrap();

        let err = resolve_with_home(&path, Path::new("/home/dev")).unwrap_err();

        assert!(matches!(err, KeypropsError::Io { .. }));
    }
}

// =============================================================================
// Build Variant Tests
// =============================================================================

mod variant {
    use super::*;

    #[test]
    fn release_falls_back_to_debug_keystore_without_key_properties() {
        let (dir, _) = android_project(None);
        std::fs::write(
            dir.path().join("local.properties"),
            "flutter.sdk=/opt/flutter\nflutter.versionName=1.2.3\nflutter.versionCode=7\n",
        )
        .unwrap();

        let config = resolve_build_config_with_home(
            dir.path(),
            &VariantSettings::new("com.github.qiqd.holo"),
            Path::new("/home/dev"),
        )
        .unwrap();

        assert_eq!(config.version.version_name, "1.2.3");
        assert_eq!(config.version.version_code, 7);
        assert_eq!(config.flutter_sdk, Some(PathBuf::from("/opt/flutter")));
        assert!(config.signing_configs.release.source.is_fallback());
        assert_eq!(
            config.signing_for("release"),
            config.signing_for("debug")
        );
    }

    #[test]
    fn sdk_overrides_come_from_local_properties() {
        let (dir, _) = android_project(None);
        std::fs::write(
            dir.path().join("local.properties"),
            "flutter.minSdkVersion=23\n\
             flutter.targetSdkVersion=34\n\
             flutter.compileSdkVersion=34\n\
             flutter.ndkVersion=26.1.10909125\n",
        )
        .unwrap();

        let config = resolve_build_config_with_home(
            dir.path(),
            &VariantSettings::new("com.github.qiqd.holo"),
            Path::new("/home/dev"),
        )
        .unwrap();

        assert_eq!(config.sdk.min_sdk, 23);
        assert_eq!(config.sdk.target_sdk, 34);
        assert_eq!(config.sdk.compile_sdk, 34);
        assert_eq!(config.ndk_version, "26.1.10909125");
    }

    #[test]
    fn serializes_for_json_output() {
        let (dir, _) = android_project(None);

        let config = resolve_build_config_with_home(
            dir.path(),
            &VariantSettings::new("com.github.qiqd.holo"),
            Path::new("/home/dev"),
        )
        .unwrap();
        let json = serde_json::to_value(&config).unwrap();

        assert_eq!(json["applicationId"], "com.github.qiqd.holo");
        assert_eq!(json["sdk"]["minSdk"], 21);
        assert!(json["flutterSdk"].is_null());
        assert_eq!(json["buildTypes"][1]["signingConfig"], "release");
        assert_eq!(
            json["signingConfigs"]["release"]["source"]["kind"],
            "debug_fallback"
        );
    }
}
