//! Android keystore inspection and key.properties generation.
//!
//! This module handles checking keystores referenced by a signing config
//! and writing the key.properties file that the Gradle build reads.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::error::{KeypropsError, Result};
use crate::models::{
    KEY_ALIAS, KEY_PASSWORD, KeystoreInfo, KeystoreType, STORE_FILE, STORE_PASSWORD,
};
use crate::properties::write_entry;

use super::resolver::key_properties_path;

const STOREPASS_ENV: &str = "KEYPROPS_KEYTOOL_STOREPASS";

/// Detects the keystore type from its magic bytes.
pub fn detect_keystore_type(data: &[u8]) -> KeystoreType {
    // JKS files start with 0xFEEDFEED; PKCS12 is an ASN.1 SEQUENCE (0x30)
    if data.starts_with(&[0xFE, 0xED, 0xFE, 0xED]) {
        return KeystoreType::Jks;
    }

    KeystoreType::Pkcs12
}

/// Reads the header of the keystore at `path` and reports what it is.
pub fn inspect_keystore(path: &Path) -> Result<KeystoreInfo> {
    let mut file = std::fs::File::open(path).map_err(|e| KeypropsError::io(path, e))?;
    let size_bytes = file
        .metadata()
        .map_err(|e| KeypropsError::io(path, e))?
        .len();

    if size_bytes == 0 {
        return Err(KeypropsError::Keystore(format!(
            "Keystore file is empty: {}",
            path.display()
        )));
    }

    let mut header = Vec::with_capacity(4);
    file.by_ref()
        .take(4)
        .read_to_end(&mut header)
        .map_err(|e| KeypropsError::io(path, e))?;

    Ok(KeystoreInfo {
        path: path.to_path_buf(),
        size_bytes,
        keystore_type: detect_keystore_type(&header),
    })
}

/// Verifies that `alias` exists in the keystore and `store_password` opens it.
///
/// Uses the `keytool` CLI from the JDK. The password is passed through the
/// environment rather than the command line.
pub fn verify_keystore(path: &Path, store_password: &str, alias: &str) -> Result<()> {
    if !path.is_file() {
        return Err(KeypropsError::Keystore(format!(
            "Keystore file not found: {}",
            path.display()
        )));
    }

    let output = Command::new("keytool")
        .arg("-list")
        .arg("-keystore")
        .arg(path)
        .arg("-storepass:env")
        .arg(STOREPASS_ENV)
        .arg("-alias")
        .arg(alias)
        .env(STOREPASS_ENV, store_password)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .map_err(|e| KeypropsError::Keystore(format!("Failed to run keytool: {}", e)))?;

    if output.status.success() {
        tracing::debug!("Verified alias '{}' in {}", alias, path.display());
        return Ok(());
    }

    // keytool prints its errors on stdout or stderr depending on the JDK
    let mut message = String::from_utf8_lossy(&output.stderr).into_owned();
    message.push_str(&String::from_utf8_lossy(&output.stdout));
    Err(keytool_error(message.trim(), alias))
}

fn keytool_error(message: &str, alias: &str) -> KeypropsError {
    if message.contains("password was incorrect") {
        return KeypropsError::Keystore("Invalid keystore password".to_string());
    }
    if message.contains("Keystore file does not exist") {
        return KeypropsError::Keystore(format!("Keystore file not found: {}", message));
    }
    if message.contains("does not exist") {
        return KeypropsError::Keystore(format!("Alias '{}' not found in keystore", alias));
    }
    if message.contains("Invalid keystore format")
        || message.contains("Unrecognized keystore format")
    {
        return KeypropsError::Keystore("Invalid keystore format".to_string());
    }

    KeypropsError::Keystore(format!("Failed to verify keystore: {}", message))
}

/// Generates key.properties content for Flutter/Gradle.
pub fn generate_key_properties(
    keystore_path: &Path,
    keystore_password: &str,
    key_alias: &str,
    key_password: &str,
) -> String {
    let mut content = String::new();
    write_entry(&mut content, STORE_PASSWORD, keystore_password);
    write_entry(&mut content, KEY_PASSWORD, key_password);
    write_entry(&mut content, KEY_ALIAS, key_alias);
    write_entry(&mut content, STORE_FILE, &keystore_path.to_string_lossy());
    content
}

/// Writes key.properties into the Android root project `android_dir`.
///
/// Refuses to replace an existing file unless `overwrite` is set. On Unix
/// the file is created with mode 0600.
pub fn write_key_properties(
    android_dir: &Path,
    keystore_path: &Path,
    keystore_password: &str,
    key_alias: &str,
    key_password: &str,
    overwrite: bool,
) -> Result<PathBuf> {
    if !android_dir.is_dir() {
        return Err(KeypropsError::AndroidProjectNotFound(android_dir.to_path_buf()));
    }

    let path = key_properties_path(android_dir);
    if path.exists() && !overwrite {
        return Err(KeypropsError::AlreadyExists(path));
    }

    let content =
        generate_key_properties(keystore_path, keystore_password, key_alias, key_password);
    std::fs::write(&path, content).map_err(|e| KeypropsError::io(&path, e))?;
    restrict_permissions(&path)?;

    tracing::debug!("Wrote key.properties to {}", path.display());

    Ok(path)
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
        .map_err(|e| KeypropsError::io(path, e))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<()> {
    Ok(())
}

/// Removes key.properties from `android_dir`. Returns whether a file was
/// removed.
pub fn remove_key_properties(android_dir: &Path) -> Result<bool> {
    let path = key_properties_path(android_dir);

    if !path.exists() {
        return Ok(false);
    }

    std::fs::remove_file(&path).map_err(|e| KeypropsError::io(&path, e))?;
    tracing::debug!("Removed key.properties from {}", path.display());

    Ok(true)
}
