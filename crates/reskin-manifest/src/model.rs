//! Resolved manifest types.

use std::fmt;
use std::path::{Path, PathBuf};

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Build pipeline phase a step belongs to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    /// Before the external project's own build step
    #[default]
    Prebuild,

    /// After the build, against the generated output
    Inject,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Prebuild => f.write_str("prebuild"),
            Phase::Inject => f.write_str("inject"),
        }
    }
}

/// How many anchor matches a patch applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Occurrences {
    First,
    All,
}

impl Occurrences {
    /// Limit in the form `Regex::replacen` expects (0 means unlimited).
    pub fn limit(self) -> usize {
        match self {
            Occurrences::First => 1,
            Occurrences::All => 0,
        }
    }
}

/// A fully loaded and validated manifest.
#[derive(Debug, Clone)]
pub struct Manifest {
    /// Directory that relative `from` paths and the project root resolve against
    pub base_dir: PathBuf,

    /// External project layout
    pub project: ProjectConfig,

    /// Asset copies and downloads, in manifest order
    pub assets: Vec<AssetSpec>,

    /// Text rules, in manifest order
    pub rules: Vec<TextRule>,
}

impl Manifest {
    /// Absolute (or cwd-relative) path of the project checkout.
    pub fn project_root(&self) -> PathBuf {
        self.base_dir.join(&self.project.root)
    }

    /// Path of the generated build output.
    pub fn build_dir(&self) -> PathBuf {
        self.project_root().join(&self.project.build_dir)
    }

    /// Resolve an asset source path against the manifest directory.
    pub fn source_path(&self, path: &Path) -> PathBuf {
        self.base_dir.join(path)
    }

    /// Assets belonging to `phase`.
    pub fn assets_for(&self, phase: Phase) -> impl Iterator<Item = &AssetSpec> {
        self.assets.iter().filter(move |a| a.phase == phase)
    }

    /// Rules belonging to `phase`.
    pub fn rules_for(&self, phase: Phase) -> impl Iterator<Item = &TextRule> {
        self.rules.iter().filter(move |r| r.phase == phase)
    }
}

/// Layout of the external project.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectConfig {
    /// Checkout directory, relative to the manifest directory
    pub root: PathBuf,

    /// Generated output directory, relative to the root
    pub build_dir: PathBuf,

    /// Depth of the directory listing logged before prebuild (0 disables it)
    pub tree_depth: usize,
}

/// Where an asset comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum AssetSource {
    /// Local file, relative to the manifest directory
    File(PathBuf),

    /// Remote resource fetched at run time
    Url(String),
}

impl fmt::Display for AssetSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetSource::File(path) => write!(f, "{}", path.display()),
            AssetSource::Url(url) => f.write_str(url),
        }
    }
}

/// A single asset override.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetSpec {
    pub phase: Phase,
    pub source: AssetSource,

    /// Destination, relative to the project root
    pub to: PathBuf,
}

/// A text rule applied to every file its globs select.
#[derive(Debug, Clone)]
pub struct TextRule {
    /// Name used in logs and reports
    pub name: String,

    pub phase: Phase,

    /// Globs relative to the project root
    pub files: Vec<String>,

    pub action: RuleAction,
}

/// What a rule does to each selected file.
#[derive(Debug, Clone)]
pub enum RuleAction {
    Patch(Patch),
    Palette(Palette),
}

/// Location in a text file where an edit applies.
#[derive(Debug, Clone)]
pub struct Anchor {
    pattern: Regex,
    source: String,
    literal: bool,
}

impl Anchor {
    /// Anchor on an exact string.
    pub fn literal(text: &str, ignore_case: bool) -> Result<Self, regex::Error> {
        let pattern = regex::RegexBuilder::new(&regex::escape(text))
            .case_insensitive(ignore_case)
            .build()?;
        Ok(Self {
            pattern,
            source: text.to_string(),
            literal: true,
        })
    }

    /// Anchor on a regular expression.
    pub fn regex(pattern: &str, ignore_case: bool) -> Result<Self, regex::Error> {
        let compiled = regex::RegexBuilder::new(pattern)
            .case_insensitive(ignore_case)
            .build()?;
        Ok(Self {
            pattern: compiled,
            source: pattern.to_string(),
            literal: false,
        })
    }

    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }

    /// Literal anchors never expand `$name` groups in replacements.
    pub fn is_literal(&self) -> bool {
        self.literal
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.literal {
            write!(f, "{:?}", self.source)
        } else {
            write!(f, "/{}/", self.source)
        }
    }
}

/// Edit performed at each anchor match.
#[derive(Debug, Clone, PartialEq)]
pub enum Edit {
    /// Replace the match; regex anchors expand `$1`/`${name}`
    Replace(String),

    /// Insert text immediately before the match
    InsertBefore(String),

    /// Insert text immediately after the match
    InsertAfter(String),
}

/// An anchored edit with its idempotence guard.
#[derive(Debug, Clone)]
pub struct Patch {
    pub anchor: Anchor,
    pub edit: Edit,
    pub occurrences: Occurrences,

    /// Skip the file when it already contains this text
    pub guard: Option<String>,
}

/// Colour overrides for a quoted `'key': 'value'` theme module.
#[derive(Debug, Clone)]
pub struct Palette {
    pub entries: Vec<PaletteEntry>,
}

#[derive(Debug, Clone)]
pub struct PaletteEntry {
    pub key: String,
    pub value: String,
    pub patch: Patch,
}

impl Palette {
    /// Build a palette whose keys and values are written with `quote`.
    pub fn new(
        colors: impl IntoIterator<Item = (String, String)>,
        quote: char,
    ) -> Result<Self, regex::Error> {
        let mut entries = Vec::new();
        for (key, value) in colors {
            let pattern = format!(
                r#"['"]{}['"]\s*:\s*['"][^'"\n]*['"]"#,
                regex::escape(&key)
            );
            let patch = Patch {
                anchor: Anchor::regex(&pattern, false)?,
                // Values are literal; `$` must not reach capture-group expansion.
                edit: Edit::Replace(
                    format!("{quote}{key}{quote}: {quote}{value}{quote}").replace('$', "$$"),
                ),
                occurrences: Occurrences::All,
                guard: None,
            };
            entries.push(PaletteEntry { key, value, patch });
        }
        Ok(Self { entries })
    }
}
