//! `keyprops keystore` commands for checking the resolved keystore.

use anyhow::{Context, Result, bail};
use clap::Subcommand;
use keyprops_core::signing::{inspect_keystore, verify_keystore};

use super::print_json;
use super::signing::load_signing;
use crate::config::ResolvedConfig;

#[derive(Subcommand)]
pub enum KeystoreCommands {
    /// Show type and size of the resolved keystore
    Inspect {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Check the keystore password and alias with keytool
    Verify,
}

pub fn handle_keystore_command(config: &ResolvedConfig, cmd: KeystoreCommands) -> Result<()> {
    match cmd {
        KeystoreCommands::Inspect { json } => inspect(config, json),
        KeystoreCommands::Verify => verify(config),
    }
}

fn inspect(config: &ResolvedConfig, json: bool) -> Result<()> {
    let resolved = load_signing(config, false)?;
    let Some(path) = resolved.config.store_file_in(&config.module_dir) else {
        bail!("storeFile is not set in {}", resolved.source);
    };

    let info = inspect_keystore(&path)
        .with_context(|| format!("Failed to inspect keystore {}", path.display()))?;

    if json {
        return print_json(&info);
    }

    println!("Keystore");
    println!("========");
    println!("  Path:   {}", info.path.display());
    println!("  Type:   {}", info.keystore_type);
    println!("  Size:   {} bytes", info.size_bytes);
    println!("  Source: {}", resolved.source);
    Ok(())
}

fn verify(config: &ResolvedConfig) -> Result<()> {
    let resolved = load_signing(config, true)?;
    let signing = &resolved.config;

    let (Some(path), Some(store_password), Some(alias)) = (
        signing.store_file_in(&config.module_dir),
        signing.store_password.as_deref(),
        signing.key_alias.as_deref(),
    ) else {
        bail!("Signing config from {} is incomplete", resolved.source);
    };

    verify_keystore(&path, store_password, alias)
        .with_context(|| format!("Keystore {} failed verification", path.display()))?;

    println!("Keystore {} opens and contains alias '{}'", path.display(), alias);
    Ok(())
}
