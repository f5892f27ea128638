//! Per-run report of every step's outcome.

use reskin_manifest::Phase;
use serde::Serialize;

/// What happened to one asset or one rule/file pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum Outcome {
    /// Local source copied into place
    Copied { bytes: u64 },

    /// Remote source downloaded into place
    Downloaded { bytes: u64 },

    /// Destination already held the same bytes, or the edit was a no-op
    Unchanged,

    /// Local source absent; destination left untouched
    SourceMissing,

    /// File rewritten
    Patched { replacements: usize },

    /// Guard text already present
    AlreadyApplied,

    /// Anchor not found in the file
    AnchorMissing,

    /// Glob selected no files
    NoMatches,

    /// Step failed; the batch continued
    Failed { error: String },
}

impl Outcome {
    /// Whether the step wrote (or in a dry run, would write) to the target tree.
    pub fn is_change(&self) -> bool {
        matches!(
            self,
            Outcome::Copied { .. } | Outcome::Downloaded { .. } | Outcome::Patched { .. }
        )
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failed { .. } | Outcome::SourceMissing)
    }
}

/// One reported step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepRecord {
    /// Asset source or rule name
    pub step: String,

    /// Target path, relative to the project root where possible
    pub target: String,

    #[serde(flatten)]
    pub outcome: Outcome,
}

/// Report of a single phase run.
#[derive(Debug, Clone, Serialize)]
pub struct ApplyReport {
    pub phase: Phase,
    pub dry_run: bool,
    pub steps: Vec<StepRecord>,
    pub duration_ms: u64,
}

impl ApplyReport {
    pub fn new(phase: Phase, dry_run: bool) -> Self {
        Self {
            phase,
            dry_run,
            steps: Vec::new(),
            duration_ms: 0,
        }
    }

    pub fn record(&mut self, step: impl Into<String>, target: impl Into<String>, outcome: Outcome) {
        self.steps.push(StepRecord {
            step: step.into(),
            target: target.into(),
            outcome,
        });
    }

    /// Number of steps that changed the target tree.
    pub fn changed(&self) -> usize {
        self.steps.iter().filter(|s| s.outcome.is_change()).count()
    }

    /// Steps that failed or were skipped for a missing source.
    pub fn failures(&self) -> impl Iterator<Item = &StepRecord> {
        self.steps.iter().filter(|s| s.outcome.is_failure())
    }

    /// Steps that neither changed anything nor failed.
    pub fn skipped(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| !s.outcome.is_change() && !s.outcome.is_failure())
            .count()
    }
}
