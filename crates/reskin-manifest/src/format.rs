//! On-disk manifest format (reskin.toml / reskin.yaml).

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::model::{Occurrences, Phase};

/// Top-level manifest file structure.
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ManifestFile {
    #[serde(default)]
    pub project: ProjectSection,

    /// Template variables available as `{{ name }}`
    #[serde(default)]
    pub vars: BTreeMap<String, String>,

    #[serde(default)]
    pub assets: Vec<RawAsset>,

    #[serde(default)]
    pub rules: Vec<RawRule>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectSection {
    #[serde(default = "default_root")]
    pub root: String,
    #[serde(default = "default_build_dir")]
    pub build_dir: String,
    #[serde(default)]
    pub tree_depth: usize,
}

impl Default for ProjectSection {
    fn default() -> Self {
        Self {
            root: default_root(),
            build_dir: default_build_dir(),
            tree_depth: 0,
        }
    }
}

fn default_root() -> String {
    ".".to_string()
}
fn default_build_dir() -> String {
    "build".to_string()
}
fn default_quote() -> char {
    '\''
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawAsset {
    /// Local source path
    pub from: Option<String>,

    /// Remote source URL
    pub url: Option<String>,

    /// Destination relative to the project root
    pub to: String,

    #[serde(default)]
    pub phase: Phase,
}

/// One glob or a list of globs.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum FileGlobs {
    One(String),
    Many(Vec<String>),
}

impl FileGlobs {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            FileGlobs::One(glob) => vec![glob],
            FileGlobs::Many(globs) => globs,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawAnchor {
    pub literal: Option<String>,
    pub regex: Option<String>,
    #[serde(default)]
    pub ignore_case: bool,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawRule {
    pub name: Option<String>,

    #[serde(default)]
    pub phase: Phase,

    pub files: FileGlobs,

    pub anchor: Option<RawAnchor>,

    pub replace: Option<String>,
    pub insert_before: Option<String>,
    pub insert_after: Option<String>,

    /// Defaults to `first` for inserts and `all` for replacements
    pub occurrences: Option<Occurrences>,

    /// Skip files that already contain this text
    pub unless_contains: Option<String>,

    /// Theme key to colour value
    pub palette: Option<BTreeMap<String, String>>,

    /// Quote character written around palette keys and values
    #[serde(default = "default_quote")]
    pub quote: char,
}
