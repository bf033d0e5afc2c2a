//! Signing config commands: `resolve`, `init` and `clean`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use keyprops_core::models::{ResolvedSigning, SigningConfig, SigningSource};
use keyprops_core::signing::{remove_key_properties, resolve_detailed, write_key_properties};
use serde::Serialize;

use super::{or_unset, print_json};
use crate::config::ResolvedConfig;

#[derive(Args)]
pub struct ResolveArgs {
    /// Fail if any signing key is unset
    #[arg(long)]
    pub strict: bool,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,

    /// Show passwords (by default they are masked)
    #[arg(long)]
    pub show_secrets: bool,
}

#[derive(Args)]
pub struct InitArgs {
    /// Keystore path, absolute or relative to the app module
    #[arg(long)]
    pub store_file: PathBuf,

    /// Key alias inside the keystore
    #[arg(long)]
    pub alias: String,

    /// Keystore password
    #[arg(long, env = "KEYPROPS_STORE_PASSWORD", hide_env_values = true)]
    pub store_password: String,

    /// Key password (defaults to the keystore password)
    #[arg(long, env = "KEYPROPS_KEY_PASSWORD", hide_env_values = true)]
    pub key_password: Option<String>,

    /// Overwrite an existing key.properties
    #[arg(long)]
    pub force: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ResolveOutput<'a> {
    source: &'a SigningSource,
    config: SigningConfig,
    store_file: Option<PathBuf>,
    missing_keys: Vec<&'static str>,
}

/// Resolves the signing config, applying `--strict` if requested.
pub fn load_signing(config: &ResolvedConfig, strict: bool) -> Result<ResolvedSigning> {
    let resolved = resolve_detailed(&config.properties_file).with_context(|| {
        format!(
            "Failed to resolve signing config from {}",
            config.properties_file.display()
        )
    })?;

    if strict || config.strict {
        resolved
            .config
            .require_complete()
            .with_context(|| format!("Incomplete signing config in {}", resolved.source))?;
    }

    Ok(resolved)
}

pub fn handle_resolve(config: &ResolvedConfig, args: ResolveArgs) -> Result<()> {
    let resolved = load_signing(config, args.strict)?;
    let shown = displayed(&resolved.config, args.show_secrets);

    if args.json {
        return print_json(&ResolveOutput {
            source: &resolved.source,
            store_file: resolved.config.store_file_in(&config.module_dir),
            missing_keys: resolved.config.missing_keys(),
            config: shown,
        });
    }

    println!("Signing Configuration");
    println!("=====================");
    println!("  Source:         {}", resolved.source);
    println!("  Key alias:      {}", or_unset(shown.key_alias.as_deref()));
    println!("  Key password:   {}", or_unset(shown.key_password.as_deref()));
    println!("  Store file:     {}", or_unset(shown.store_file_path.as_deref()));
    if let Some(path) = resolved.config.store_file_in(&config.module_dir) {
        println!("  Resolved path:  {}", path.display());
    }
    println!("  Store password: {}", or_unset(shown.store_password.as_deref()));

    let missing = resolved.config.missing_keys();
    if !missing.is_empty() {
        println!();
        println!("Missing keys: {}", missing.join(", "));
    }

    Ok(())
}

/// The config as printed: passwords masked unless `show_secrets` is set.
fn displayed(config: &SigningConfig, show_secrets: bool) -> SigningConfig {
    if show_secrets {
        config.clone()
    } else {
        config.redacted()
    }
}

pub fn handle_init(config: &ResolvedConfig, args: InitArgs) -> Result<()> {
    let keystore = resolve_keystore_path(&config.module_dir, &args.store_file);
    if !keystore.is_file() {
        tracing::warn!("Keystore {} does not exist yet", keystore.display());
    }

    let key_password = args.key_password.as_deref().unwrap_or(&args.store_password);
    let path = write_key_properties(
        &config.android_dir,
        &args.store_file,
        &args.store_password,
        &args.alias,
        key_password,
        args.force,
    )
    .context("Failed to write key.properties")?;

    if path != config.properties_file {
        tracing::warn!(
            "Wrote {} but signing is read from {}",
            path.display(),
            config.properties_file.display()
        );
    }

    println!("Wrote {}", path.display());
    Ok(())
}

pub fn handle_clean(config: &ResolvedConfig) -> Result<()> {
    if remove_key_properties(&config.android_dir).context("Failed to remove key.properties")? {
        println!("Removed key.properties from {}", config.android_dir.display());
    } else {
        println!("No key.properties in {}", config.android_dir.display());
    }
    Ok(())
}

fn resolve_keystore_path(module_dir: &Path, store_file: &Path) -> PathBuf {
    if store_file.is_absolute() {
        store_file.to_path_buf()
    } else {
        module_dir.join(store_file)
    }
}

#[cfg(test)]
mod tests {
    use keyprops_core::models::MASK;

    use super::*;

    fn config_for(dir: &Path) -> ResolvedConfig {
        ResolvedConfig {
            android_dir: dir.to_path_buf(),
            module_dir: dir.join("app"),
            properties_file: dir.join("key.properties"),
            strict: false,
        }
    }

    #[test]
    fn test_load_signing_strict_rejects_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("key.properties"), "keyAlias=upload\n").unwrap();
        let config = config_for(dir.path());

        assert!(load_signing(&config, false).is_ok());

        let err = load_signing(&config, true).unwrap_err();
        assert!(format!("{:#}", err).contains("keyPassword"));
    }

    #[test]
    fn test_load_signing_strict_from_config() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("key.properties"), "").unwrap();
        let mut config = config_for(dir.path());
        config.strict = true;

        assert!(load_signing(&config, false).is_err());
    }

    #[test]
    fn test_displayed_masks_passwords_by_default() {
        let debug = SigningConfig::debug_keystore(Path::new("/home/dev"));

        let masked = displayed(&debug, false);
        assert_eq!(masked.key_password.as_deref(), Some(MASK));
        assert_eq!(masked.store_password.as_deref(), Some(MASK));
        assert_eq!(masked.key_alias, debug.key_alias);
        assert_eq!(masked.store_file_path, debug.store_file_path);
        let json = serde_json::to_string(&masked).unwrap();
        assert!(!json.contains("\"android\""));

        assert_eq!(displayed(&debug, true), debug);
    }

    #[test]
    fn test_init_then_clean() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_for(dir.path());

        handle_init(
            &config,
            InitArgs {
                store_file: PathBuf::from("upload.jks"),
                alias: "upload".to_string(),
                store_password: "sp".to_string(),
                key_password: None,
                force: false,
            },
        )
        .unwrap();

        let resolved = load_signing(&config, true).unwrap();
        assert_eq!(resolved.config.key_password.as_deref(), Some("sp"));
        assert_eq!(
            resolved.config.store_file_in(&config.module_dir),
            Some(dir.path().join("app/upload.jks"))
        );

        handle_clean(&config).unwrap();
        assert!(!config.properties_file.exists());
    }

    #[test]
    fn test_resolve_keystore_path() {
        let module = Path::new("/work/android/app");
        assert_eq!(
            resolve_keystore_path(module, Path::new("upload.jks")),
            PathBuf::from("/work/android/app/upload.jks")
        );
        assert_eq!(
            resolve_keystore_path(module, Path::new("/keys/upload.jks")),
            PathBuf::from("/keys/upload.jks")
        );
    }
}
