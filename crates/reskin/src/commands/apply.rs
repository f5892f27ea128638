//! Apply overrides to the project checkout.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use reskin_apply::{ApplyReport, OverrideApplier};
use reskin_manifest::Phase;

use super::load_manifest;

/// Options for the apply command.
#[derive(Debug, Default)]
pub struct ApplyOptions {
    /// Only run the post-build injection
    pub inject_only: bool,

    /// Project checkout overriding the manifest's root
    pub root: Option<PathBuf>,

    pub dry_run: bool,

    /// Print reports as JSON on stdout
    pub json: bool,
}

/// Run the apply command.
pub fn run(config: &Path, vars: &BTreeMap<String, String>, options: ApplyOptions) -> Result<()> {
    let reports = apply(config, vars, &options)?;

    if options.json {
        println!("{}", render_json(&reports)?);
    }

    Ok(())
}

/// Run the requested phases and return one report per phase that ran.
fn apply(
    config: &Path,
    vars: &BTreeMap<String, String>,
    options: &ApplyOptions,
) -> Result<Vec<ApplyReport>> {
    let mut manifest = load_manifest(config, vars)?;

    if let Some(root) = &options.root {
        let cwd = std::env::current_dir().context("Failed to read working directory")?;
        manifest.project.root = cwd.join(root);
    }

    if let Ok(cwd) = std::env::current_dir() {
        tracing::info!("Working directory: {}", cwd.display());
    }

    let build_dir = manifest.build_dir();
    let applier = OverrideApplier::new(manifest).dry_run(options.dry_run);
    let mut reports = Vec::new();

    if !options.inject_only {
        let report = applier.run(Phase::Prebuild)?;
        summarize(&report);
        reports.push(report);
    }

    // A combined run before the project's first build has nothing to inject into.
    if options.inject_only || build_dir.is_dir() {
        let report = applier.run(Phase::Inject)?;
        summarize(&report);
        reports.push(report);
    } else {
        tracing::info!(
            "Prebuild complete. Build the project, then run 'reskin apply --inject'."
        );
    }

    Ok(reports)
}

fn render_json(reports: &[ApplyReport]) -> Result<String> {
    serde_json::to_string_pretty(reports).context("Failed to encode report")
}

fn summarize(report: &ApplyReport) {
    for failure in report.failures() {
        tracing::warn!("{} -> {}: {:?}", failure.step, failure.target, failure.outcome);
    }

    tracing::info!(
        "{} phase: {} changed, {} skipped, {} failed in {}ms{}",
        report.phase,
        report.changed(),
        report.skipped(),
        report.failures().count(),
        report.duration_ms,
        if report.dry_run { " (dry run)" } else { "" }
    );
}
