//! Override applier for reskin.
//!
//! Copies and downloads override assets into an external project checkout and
//! applies anchored text patches to its source and build output. Every step is
//! best-effort: failures are logged and recorded in the [`ApplyReport`] while the
//! rest of the manifest keeps running.

pub mod applier;
pub mod assets;
pub mod edit;
pub mod fetch;
pub mod layout;
pub mod report;
pub mod select;
pub mod stylesheet;

pub use applier::{ApplyError, OverrideApplier};
pub use edit::{apply_palette, apply_patch, EditOutcome, PaletteOutcome};
pub use fetch::{FetchError, Fetcher, HttpFetcher};
pub use layout::describe_tree;
pub use report::{ApplyReport, Outcome, StepRecord};
pub use select::{select_files, SelectError};
pub use stylesheet::{inline_styles, validate_css};
