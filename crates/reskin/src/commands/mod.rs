//! CLI subcommands.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use reskin_manifest::Manifest;

pub mod apply;
pub mod check;
pub mod init;

/// Parse a `KEY=VALUE` manifest variable override.
pub fn parse_var(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid KEY=VALUE: no '=' found in '{}'", s))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("invalid KEY=VALUE: empty key in '{}'", s));
    }
    Ok((key.to_string(), value.to_string()))
}

/// Load the manifest at `config`, or the built-in one if the file does not exist.
/// Returns an error if the file exists but is malformed.
pub fn load_manifest(config: &Path, vars: &BTreeMap<String, String>) -> Result<Manifest> {
    if config.exists() {
        let manifest = Manifest::from_file(config, vars)
            .with_context(|| format!("Failed to load {}", config.display()))?;
        tracing::info!("Loaded manifest from {}", config.display());
        return Ok(manifest);
    }

    tracing::info!(
        "{} not found, using the built-in manifest",
        config.display()
    );
    Manifest::builtin(PathBuf::from("."), vars).context("Built-in manifest is invalid")
}
