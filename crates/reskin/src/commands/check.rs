//! Validate a manifest against the file system.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::Result;
use reskin_apply::{inline_styles, select_files, validate_css};
use reskin_manifest::{AssetSource, Edit, Manifest, Phase, RuleAction};

use super::load_manifest;

/// Run the check command.
pub fn run(config: &Path, vars: &BTreeMap<String, String>) -> Result<()> {
    let manifest = load_manifest(config, vars)?;
    let problems = find_problems(&manifest);

    for problem in &problems {
        tracing::warn!("{}", problem);
    }

    if !problems.is_empty() {
        anyhow::bail!("{} problem(s) found", problems.len());
    }

    tracing::info!(
        "Manifest OK: {} assets, {} rules",
        manifest.assets.len(),
        manifest.rules.len()
    );
    Ok(())
}

/// Collect every problem instead of stopping at the first.
fn find_problems(manifest: &Manifest) -> Vec<String> {
    let mut problems = Vec::new();

    for asset in &manifest.assets {
        match &asset.source {
            AssetSource::File(path) => {
                let source = manifest.source_path(path);
                if !source.is_file() {
                    problems.push(format!("Asset source not found: {}", source.display()));
                    continue;
                }
                if source.extension().and_then(|e| e.to_str()) == Some("css") {
                    match fs::read_to_string(&source) {
                        Ok(css) => {
                            if let Err(e) = validate_css(&css) {
                                problems.push(format!("{}: {}", source.display(), e));
                            }
                        }
                        Err(e) => problems.push(format!("{}: {}", source.display(), e)),
                    }
                }
            }
            AssetSource::Url(url) => {
                if !url.starts_with("http://") && !url.starts_with("https://") {
                    problems.push(format!("Asset URL is not http(s): {}", url));
                }
            }
        }
    }

    let root = manifest.project_root();
    let built = manifest.build_dir().is_dir();

    for rule in &manifest.rules {
        if let RuleAction::Patch(patch) = &rule.action {
            let text = match &patch.edit {
                Edit::Replace(t) | Edit::InsertBefore(t) | Edit::InsertAfter(t) => t,
            };
            for css in inline_styles(text) {
                if let Err(e) = validate_css(css) {
                    problems.push(format!("Rule '{}': inline <style>: {}", rule.name, e));
                }
            }
        }

        // Build output globs only resolve once the project has been built.
        if !root.is_dir() || (rule.phase == Phase::Inject && !built) {
            continue;
        }
        for glob in &rule.files {
            match select_files(&root, glob) {
                Ok(files) if files.is_empty() => {
                    problems.push(format!("Rule '{}': {} matches no files", rule.name, glob));
                }
                Ok(_) => {}
                Err(e) => problems.push(format!("Rule '{}': {}", rule.name, e)),
            }
        }
    }

    if !root.is_dir() {
        tracing::warn!(
            "Project directory {} not found; skipped file checks",
            root.display()
        );
    }

    problems
}
