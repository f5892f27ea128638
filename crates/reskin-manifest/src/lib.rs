//! Manifest format for reskin.
//!
//! A manifest lists the asset copies, downloads and text patches that rebrand an
//! external project checkout. This crate parses the TOML/YAML file format,
//! renders `{{ var }}` placeholders and validates everything into the resolved
//! types consumed by `reskin-apply`.

pub mod defaults;
pub mod format;
pub mod loader;
pub mod model;
pub mod template;

pub use defaults::{DEFAULT_MANIFEST, DEFAULT_OVERRIDES_CSS};
pub use loader::{ManifestError, ManifestFormat};
pub use model::{
    Anchor, AssetSource, AssetSpec, Edit, Manifest, Occurrences, Palette, PaletteEntry, Patch,
    Phase, ProjectConfig, RuleAction, TextRule,
};
