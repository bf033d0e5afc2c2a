//! Android build-variant models.

use std::path::PathBuf;

use serde::Serialize;

use super::signing::{ResolvedSigning, SigningConfig};

/// Java language level used for source, target and the Kotlin JVM target.
pub const JAVA_VERSION: u32 = 17;

/// SDK levels handed to the Android build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SdkBounds {
    pub min_sdk: u32,
    pub target_sdk: u32,
    pub compile_sdk: u32,
}

impl SdkBounds {
    /// Orderings Gradle tolerates but that usually indicate a mistake.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.min_sdk > self.target_sdk {
            warnings.push(format!(
                "minSdk {} is higher than targetSdk {}",
                self.min_sdk, self.target_sdk
            ));
        }
        if self.target_sdk > self.compile_sdk {
            warnings.push(format!(
                "targetSdk {} is higher than compileSdk {}",
                self.target_sdk, self.compile_sdk
            ));
        }
        warnings
    }
}

/// Version code and name of the application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppVersion {
    pub version_code: u32,
    pub version_name: String,
}

/// Named signing configs of an Android module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SigningConfigName {
    Debug,
    Release,
}

impl SigningConfigName {
    pub fn as_str(&self) -> &'static str {
        match self {
            SigningConfigName::Debug => "debug",
            SigningConfigName::Release => "release",
        }
    }
}

impl std::fmt::Display for SigningConfigName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A build type and the signing config it uses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildType {
    pub name: String,
    pub signing_config: SigningConfigName,
}

/// The signing configs declared by the app module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SigningConfigs {
    pub debug: SigningConfig,
    pub release: ResolvedSigning,
}

impl SigningConfigs {
    pub fn get(&self, name: SigningConfigName) -> &SigningConfig {
        match name {
            SigningConfigName::Debug => &self.debug,
            SigningConfigName::Release => &self.release.config,
        }
    }
}

/// Everything the app module's `android { .. }` block declares.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AndroidBuildConfig {
    pub namespace: String,
    pub application_id: String,
    pub sdk: SdkBounds,
    pub ndk_version: String,
    /// Flutter SDK recorded in `local.properties`, if any.
    pub flutter_sdk: Option<PathBuf>,
    pub version: AppVersion,
    pub java_version: u32,
    pub signing_configs: SigningConfigs,
    pub build_types: Vec<BuildType>,
}

impl AndroidBuildConfig {
    pub fn build_type(&self, name: &str) -> Option<&BuildType> {
        self.build_types.iter().find(|bt| bt.name == name)
    }

    /// Signing config used by the named build type.
    pub fn signing_for(&self, build_type: &str) -> Option<&SigningConfig> {
        self.build_type(build_type)
            .map(|bt| self.signing_configs.get(bt.signing_config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sdk_bounds_in_order() {
        let sdk = SdkBounds {
            min_sdk: 21,
            target_sdk: 35,
            compile_sdk: 35,
        };
        assert!(sdk.warnings().is_empty());
    }

    #[test]
    fn test_sdk_bounds_out_of_order() {
        let sdk = SdkBounds {
            min_sdk: 36,
            target_sdk: 35,
            compile_sdk: 34,
        };
        let warnings = sdk.warnings();
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].contains("minSdk 36"));
        assert!(warnings[1].contains("compileSdk 34"));
    }
}
