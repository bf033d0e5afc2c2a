pub mod keystore;
pub mod signing;
pub mod variant;

use anyhow::{Context, Result};
use serde::Serialize;

/// Prints `value` as pretty JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}

/// Formats an optional field for human output.
pub fn or_unset(value: Option<&str>) -> &str {
    value.unwrap_or("(unset)")
}
