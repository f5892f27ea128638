//! Write a starter manifest and override directory.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use reskin_manifest::{DEFAULT_MANIFEST, DEFAULT_OVERRIDES_CSS};

/// Run the init command.
pub fn run(config: &Path, yes: bool) -> Result<()> {
    tracing::info!("Initializing reskin...");

    if config.exists() && !yes {
        tracing::warn!(
            "{} already exists. Use --yes to overwrite.",
            config.display()
        );
        return Ok(());
    }

    let base = config
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    fs::write(config, DEFAULT_MANIFEST)
        .with_context(|| format!("Failed to write {}", config.display()))?;
    tracing::info!("Created {}", config.display());

    let custom_dir = base.join("custom");
    if !custom_dir.exists() {
        fs::create_dir_all(&custom_dir).context("Failed to create custom directory")?;
    }

    let css_path = custom_dir.join("overrides.css");
    if !css_path.exists() || yes {
        fs::write(&css_path, DEFAULT_OVERRIDES_CSS).context("Failed to write overrides.css")?;
        tracing::info!("Created {}", css_path.display());
    }

    tracing::info!("Initialization complete!");
    tracing::info!("Add custom/site_icon.png and custom/default-project.sb3, then run 'reskin apply'.");

    Ok(())
}
