//! Override applier.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use reskin_manifest::{AssetSource, AssetSpec, Manifest, Phase, RuleAction, TextRule};

use crate::assets::{copy_asset, download_asset, write_if_different};
use crate::edit::{apply_palette, apply_patch, EditOutcome};
use crate::fetch::{Fetcher, HttpFetcher};
use crate::layout::describe_tree;
use crate::report::{ApplyReport, Outcome};
use crate::select::select_files;

/// Errors that abort a phase before any step runs.
#[derive(Debug, thiserror::Error)]
pub enum ApplyError {
    #[error("Project directory not found: {0}")]
    MissingProject(String),

    #[error("Build directory not found: {0}. Run the project's build first.")]
    MissingBuild(String),
}

/// Applies a manifest's assets and rules to the project checkout.
pub struct OverrideApplier {
    manifest: Manifest,
    fetcher: Box<dyn Fetcher>,
    dry_run: bool,
}

impl OverrideApplier {
    /// Create an applier that downloads over HTTP.
    pub fn new(manifest: Manifest) -> Self {
        Self::with_fetcher(manifest, Box::new(HttpFetcher::new()))
    }

    /// Create an applier with a custom fetcher.
    pub fn with_fetcher(manifest: Manifest, fetcher: Box<dyn Fetcher>) -> Self {
        Self {
            manifest,
            fetcher,
            dry_run: false,
        }
    }

    /// Compute outcomes without writing anything.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// Run every step of `phase`.
    ///
    /// Only the missing-checkout precondition is an error; per-step failures are
    /// logged and recorded in the report.
    pub fn run(&self, phase: Phase) -> Result<ApplyReport, ApplyError> {
        let start = Instant::now();
        let root = self.manifest.project_root();

        if !root.is_dir() {
            return Err(ApplyError::MissingProject(root.display().to_string()));
        }
        if phase == Phase::Inject {
            let build = self.manifest.build_dir();
            if !build.is_dir() {
                return Err(ApplyError::MissingBuild(build.display().to_string()));
            }
        }

        tracing::info!(
            "Running {} phase against {}{}",
            phase,
            root.display(),
            if self.dry_run { " (dry run)" } else { "" }
        );

        if phase == Phase::Prebuild && self.manifest.project.tree_depth > 0 {
            tracing::info!(
                "Directory tree for {} (depth={}):",
                root.display(),
                self.manifest.project.tree_depth
            );
            for line in describe_tree(&root, self.manifest.project.tree_depth) {
                tracing::info!("{}", line);
            }
        }

        let mut report = ApplyReport::new(phase, self.dry_run);

        for asset in self.manifest.assets_for(phase) {
            let outcome = self.apply_asset(asset, &root);
            report.record(asset.source.to_string(), display_path(&asset.to), outcome);
        }

        for rule in self.manifest.rules_for(phase) {
            self.apply_rule(rule, &root, &mut report);
        }

        report.duration_ms = start.elapsed().as_millis() as u64;
        Ok(report)
    }

    fn apply_asset(&self, asset: &AssetSpec, root: &Path) -> Outcome {
        let dest = root.join(&asset.to);

        let result = match &asset.source {
            AssetSource::File(path) => {
                let source = self.manifest.source_path(path);
                copy_asset(&source, &dest, self.dry_run).map_err(|e| e.to_string())
            }
            AssetSource::Url(url) => {
                download_asset(self.fetcher.as_ref(), url, &dest, self.dry_run)
                    .map_err(|e| e.to_string())
            }
        };

        result.unwrap_or_else(|error| {
            tracing::warn!("Failed to place {}: {}", dest.display(), error);
            Outcome::Failed { error }
        })
    }

    fn apply_rule(&self, rule: &TextRule, root: &Path, report: &mut ApplyReport) {
        let mut files: Vec<PathBuf> = Vec::new();
        for glob in &rule.files {
            match select_files(root, glob) {
                Ok(selected) if selected.is_empty() => {
                    tracing::info!("[!] {} matched no files, skipping '{}'", glob, rule.name);
                    report.record(&rule.name, glob.clone(), Outcome::NoMatches);
                }
                Ok(selected) => files.extend(selected),
                Err(e) => {
                    tracing::warn!("Rule '{}': {}", rule.name, e);
                    report.record(
                        &rule.name,
                        glob.clone(),
                        Outcome::Failed {
                            error: e.to_string(),
                        },
                    );
                }
            }
        }

        files.sort();
        files.dedup();

        for file in files {
            let target = file
                .strip_prefix(root)
                .map(display_path)
                .unwrap_or_else(|_| display_path(&file));
            let outcome = self
                .patch_file(rule, &file, &target)
                .unwrap_or_else(|error| {
                    tracing::warn!("Failed to patch {}: {}", target, error);
                    Outcome::Failed { error }
                });
            report.record(&rule.name, target, outcome);
        }
    }

    fn patch_file(&self, rule: &TextRule, file: &Path, target: &str) -> Result<Outcome, String> {
        let content = fs::read_to_string(file).map_err(|e| e.to_string())?;

        let (text, replacements) = match &rule.action {
            RuleAction::Patch(patch) => match apply_patch(&content, patch) {
                EditOutcome::Changed { text, replacements } => (text, replacements),
                EditOutcome::Unchanged { .. } => {
                    tracing::info!("{}: '{}' already in place", target, rule.name);
                    return Ok(Outcome::Unchanged);
                }
                EditOutcome::AlreadyApplied => {
                    tracing::info!("{}: '{}' already applied", target, rule.name);
                    return Ok(Outcome::AlreadyApplied);
                }
                EditOutcome::AnchorMissing => {
                    tracing::info!(
                        "{}: anchor {} not found, skipping '{}'",
                        target,
                        patch.anchor,
                        rule.name
                    );
                    return Ok(Outcome::AnchorMissing);
                }
                EditOutcome::Reapplies => {
                    tracing::warn!(
                        "{}: '{}' would apply again on every run; set 'unless_contains'",
                        target,
                        rule.name
                    );
                    return Err(
                        "edit recreates its anchor; set 'unless_contains' to guard it".to_string(),
                    );
                }
            },
            RuleAction::Palette(palette) => {
                let outcome = apply_palette(&content, palette);
                let counts = outcome
                    .counts
                    .iter()
                    .map(|(key, n)| format!("{}={}", key, n))
                    .collect::<Vec<_>>()
                    .join(", ");
                tracing::info!("{}: '{}' replacements: {}", target, rule.name, counts);

                if outcome.total() == 0 {
                    return Ok(Outcome::AnchorMissing);
                }
                if outcome.text == content {
                    return Ok(Outcome::Unchanged);
                }
                let total = outcome.total();
                (outcome.text, total)
            }
        };

        write_if_different(file, text.as_bytes(), self.dry_run).map_err(|e| e.to_string())?;
        tracing::info!("Patched {} ('{}', {} replacements)", target, rule.name, replacements);

        Ok(Outcome::Patched { replacements })
    }
}

fn display_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
