//! Manifest loading and validation.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::defaults::DEFAULT_MANIFEST;
use crate::format::{ManifestFile, RawAsset, RawRule};
use crate::model::{
    Anchor, AssetSource, AssetSpec, Edit, Manifest, Occurrences, Palette, Patch, ProjectConfig,
    RuleAction, TextRule,
};
use crate::template::VarRenderer;

/// Serialization format of a manifest file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestFormat {
    Toml,
    Yaml,
}

impl ManifestFormat {
    /// Pick the format from a file extension; anything but yaml/yml is TOML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => ManifestFormat::Yaml,
            _ => ManifestFormat::Toml,
        }
    }
}

/// Errors that can occur when loading a manifest.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("Failed to read manifest {path}: {message}")]
    Read { path: String, message: String },

    #[error("Failed to parse manifest: {0}")]
    Parse(String),

    #[error("Invalid asset #{index}: {message}")]
    InvalidAsset { index: usize, message: String },

    #[error("Invalid rule '{rule}': {message}")]
    InvalidRule { rule: String, message: String },

    #[error("Template error in {field}: {message}")]
    Template { field: String, message: String },
}

impl Manifest {
    /// Load a manifest from disk. Relative paths resolve against its directory.
    pub fn from_file(
        path: &Path,
        overrides: &BTreeMap<String, String>,
    ) -> Result<Self, ManifestError> {
        let source = fs::read_to_string(path).map_err(|e| ManifestError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let base_dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        Self::from_str(&source, ManifestFormat::from_path(path), base_dir, overrides)
    }

    /// Parse the built-in default manifest.
    pub fn builtin(
        base_dir: PathBuf,
        overrides: &BTreeMap<String, String>,
    ) -> Result<Self, ManifestError> {
        Self::from_str(DEFAULT_MANIFEST, ManifestFormat::Toml, base_dir, overrides)
    }

    /// Parse and validate manifest source text.
    pub fn from_str(
        source: &str,
        format: ManifestFormat,
        base_dir: PathBuf,
        overrides: &BTreeMap<String, String>,
    ) -> Result<Self, ManifestError> {
        let mut file: ManifestFile = match format {
            ManifestFormat::Toml => {
                toml::from_str(source).map_err(|e| ManifestError::Parse(e.to_string()))?
            }
            ManifestFormat::Yaml => {
                serde_yaml::from_str(source).map_err(|e| ManifestError::Parse(e.to_string()))?
            }
        };

        file.vars
            .extend(overrides.iter().map(|(k, v)| (k.clone(), v.clone())));
        let renderer = VarRenderer::new(file.vars);

        let assets = file
            .assets
            .into_iter()
            .enumerate()
            .map(|(i, raw)| resolve_asset(i + 1, raw, &renderer))
            .collect::<Result<Vec<_>, _>>()?;

        let rules = file
            .rules
            .into_iter()
            .enumerate()
            .map(|(i, raw)| resolve_rule(i + 1, raw, &renderer))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Manifest {
            base_dir,
            project: ProjectConfig {
                root: PathBuf::from(file.project.root),
                build_dir: PathBuf::from(file.project.build_dir),
                tree_depth: file.project.tree_depth,
            },
            assets,
            rules,
        })
    }
}

fn render(renderer: &VarRenderer, field: &str, text: &str) -> Result<String, ManifestError> {
    renderer.render(text).map_err(|e| ManifestError::Template {
        field: field.to_string(),
        message: e.to_string(),
    })
}

fn resolve_asset(
    index: usize,
    raw: RawAsset,
    renderer: &VarRenderer,
) -> Result<AssetSpec, ManifestError> {
    let invalid = |message: &str| ManifestError::InvalidAsset {
        index,
        message: message.to_string(),
    };

    let source = match (raw.from, raw.url) {
        (Some(from), None) => AssetSource::File(PathBuf::from(render(renderer, "from", &from)?)),
        (None, Some(url)) => AssetSource::Url(render(renderer, "url", &url)?),
        (Some(_), Some(_)) => return Err(invalid("set either 'from' or 'url', not both")),
        (None, None) => return Err(invalid("missing 'from' or 'url'")),
    };

    let to = render(renderer, "to", &raw.to)?;
    if to.trim().is_empty() {
        return Err(invalid("'to' must not be empty"));
    }
    let escapes_root = Path::new(&to).components().any(|c| {
        matches!(
            c,
            Component::RootDir | Component::Prefix(_) | Component::ParentDir
        )
    });
    if escapes_root {
        return Err(invalid("'to' must be a path inside the project root"));
    }

    Ok(AssetSpec {
        phase: raw.phase,
        source,
        to: PathBuf::from(to),
    })
}

fn resolve_rule(
    index: usize,
    raw: RawRule,
    renderer: &VarRenderer,
) -> Result<TextRule, ManifestError> {
    let name = raw.name.clone().unwrap_or_else(|| format!("rule #{}", index));
    let invalid = |message: String| ManifestError::InvalidRule {
        rule: name.clone(),
        message,
    };

    let files = raw.files.into_vec();
    if files.is_empty() || files.iter().any(|f| f.trim().is_empty()) {
        return Err(invalid("'files' must list at least one non-empty glob".into()));
    }

    let action = if let Some(colors) = raw.palette {
        if raw.anchor.is_some()
            || raw.replace.is_some()
            || raw.insert_before.is_some()
            || raw.insert_after.is_some()
        {
            return Err(invalid(
                "'palette' cannot be combined with 'anchor' or an edit".into(),
            ));
        }
        if colors.is_empty() {
            return Err(invalid("'palette' is empty".into()));
        }

        let mut rendered = Vec::with_capacity(colors.len());
        for (key, value) in colors {
            let value = render(renderer, &format!("palette.{}", key), &value)?;
            rendered.push((key, value));
        }
        let palette = Palette::new(rendered, raw.quote).map_err(|e| invalid(e.to_string()))?;
        RuleAction::Palette(palette)
    } else {
        let raw_anchor = raw
            .anchor
            .ok_or_else(|| invalid("missing 'anchor'".into()))?;
        let anchor = match (raw_anchor.literal, raw_anchor.regex) {
            (Some(text), None) => Anchor::literal(&text, raw_anchor.ignore_case),
            (None, Some(pattern)) => Anchor::regex(&pattern, raw_anchor.ignore_case),
            _ => {
                return Err(invalid(
                    "anchor needs exactly one of 'literal' or 'regex'".into(),
                ))
            }
        }
        .map_err(|e| invalid(format!("invalid anchor pattern: {}", e)))?;

        let edit = match (raw.replace, raw.insert_before, raw.insert_after) {
            (Some(text), None, None) => Edit::Replace(render(renderer, "replace", &text)?),
            (None, Some(text), None) => {
                Edit::InsertBefore(render(renderer, "insert_before", &text)?)
            }
            (None, None, Some(text)) => Edit::InsertAfter(render(renderer, "insert_after", &text)?),
            _ => {
                return Err(invalid(
                    "set exactly one of 'replace', 'insert_before' or 'insert_after'".into(),
                ))
            }
        };

        let occurrences = raw.occurrences.unwrap_or(match edit {
            Edit::Replace(_) => Occurrences::All,
            Edit::InsertBefore(_) | Edit::InsertAfter(_) => Occurrences::First,
        });

        let guard = match raw.unless_contains {
            Some(text) => Some(render(renderer, "unless_contains", &text)?),
            None => default_guard(&edit),
        };

        RuleAction::Patch(Patch {
            anchor,
            edit,
            occurrences,
            guard,
        })
    };

    Ok(TextRule {
        name,
        phase: raw.phase,
        files,
        action,
    })
}

/// Inserts guard on their own (trimmed) text so re-runs do not stack copies.
fn default_guard(edit: &Edit) -> Option<String> {
    match edit {
        Edit::InsertBefore(text) | Edit::InsertAfter(text) => {
            let trimmed = text.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Edit::Replace(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Phase;
    use pretty_assertions::assert_eq;

    fn load(source: &str) -> Result<Manifest, ManifestError> {
        Manifest::from_str(
            source,
            ManifestFormat::Toml,
            PathBuf::from("."),
            &BTreeMap::new(),
        )
    }

    #[test]
    fn builtin_manifest_is_valid() {
        let manifest = Manifest::builtin(PathBuf::from("."), &BTreeMap::new()).unwrap();

        assert_eq!(manifest.project.root, PathBuf::from("scratch-gui"));
        assert!(manifest.assets_for(Phase::Prebuild).count() > 0);
        assert!(manifest.rules_for(Phase::Inject).count() > 0);
    }

    #[test]
    fn resolves_assets() {
        let manifest = load(
            r#"
[vars]
host = "https://example.com/res"

[[assets]]
from = "custom/icon.png"
to = "static/icon.png"

[[assets]]
url = "{{ host }}/cursor.png"
to = "static/cursor.png"
phase = "inject"
"#,
        )
        .unwrap();

        assert_eq!(
            manifest.assets[0].source,
            AssetSource::File(PathBuf::from("custom/icon.png"))
        );
        assert_eq!(
            manifest.assets[1].source,
            AssetSource::Url("https://example.com/res/cursor.png".to_string())
        );
        assert_eq!(manifest.assets[1].phase, Phase::Inject);
    }

    #[test]
    fn rejects_asset_with_both_sources() {
        let err = load(
            r#"
[[assets]]
from = "a"
url = "https://example.com/a"
to = "b"
"#,
        )
        .unwrap_err();

        assert!(matches!(err, ManifestError::InvalidAsset { index: 1, .. }));
    }

    #[test]
    fn rejects_destination_outside_project() {
        for to in ["/etc/x", "../../x", "static/../../x"] {
            let err = load(&format!(
                "[[assets]]\nfrom = \"custom/icon.png\"\nto = \"{}\"\n",
                to
            ))
            .unwrap_err();

            assert!(
                matches!(err, ManifestError::InvalidAsset { index: 1, .. }),
                "{} was accepted",
                to
            );
        }
    }

    #[test]
    fn insert_rules_default_to_first_match_and_self_guard() {
        let manifest = load(
            r#"
[[rules]]
name = "link"
files = "build/*.html"
anchor = { literal = "</head>" }
insert_before = "  <link rel=\"stylesheet\" href=\"static/overrides.css\">\n"
"#,
        )
        .unwrap();

        let RuleAction::Patch(patch) = &manifest.rules[0].action else {
            panic!("expected patch");
        };
        assert_eq!(patch.occurrences, Occurrences::First);
        assert_eq!(
            patch.guard.as_deref(),
            Some("<link rel=\"stylesheet\" href=\"static/overrides.css\">")
        );
    }

    #[test]
    fn explicit_guard_wins() {
        let manifest = load(
            r#"
[[rules]]
files = "index.html"
anchor = { regex = "<head>", ignore_case = true }
insert_after = "<style></style>"
unless_contains = "static/overrides.css"
"#,
        )
        .unwrap();

        let RuleAction::Patch(patch) = &manifest.rules[0].action else {
            panic!("expected patch");
        };
        assert_eq!(patch.guard.as_deref(), Some("static/overrides.css"));
        assert!(patch.anchor.pattern().is_match("<HEAD>"));
        assert_eq!(manifest.rules[0].name, "rule #1");
    }

    #[test]
    fn replace_rules_default_to_all_matches() {
        let manifest = load(
            r#"
[[rules]]
files = "a.js"
anchor = { regex = "red" }
replace = "green"
"#,
        )
        .unwrap();

        let RuleAction::Patch(patch) = &manifest.rules[0].action else {
            panic!("expected patch");
        };
        assert_eq!(patch.occurrences, Occurrences::All);
        assert!(patch.guard.is_none());
    }

    #[test]
    fn rejects_invalid_regex() {
        let err = load(
            r#"
[[rules]]
name = "broken"
files = "a.js"
anchor = { regex = "(unclosed" }
replace = "x"
"#,
        )
        .unwrap_err();

        assert!(matches!(err, ManifestError::InvalidRule { ref rule, .. } if rule == "broken"));
    }

    #[test]
    fn rejects_multiple_edits() {
        let err = load(
            r#"
[[rules]]
files = "a.html"
anchor = { literal = "<head>" }
insert_before = "x"
insert_after = "y"
"#,
        )
        .unwrap_err();

        assert!(matches!(err, ManifestError::InvalidRule { .. }));
    }

    #[test]
    fn rejects_unknown_variable() {
        let err = load(
            r#"
[[rules]]
files = "a.html"
anchor = { literal = "<head>" }
insert_after = "{{ missing }}"
"#,
        )
        .unwrap_err();

        assert!(matches!(err, ManifestError::Template { .. }));
    }

    #[test]
    fn overrides_replace_manifest_vars() {
        let mut overrides = BTreeMap::new();
        overrides.insert("accent".to_string(), "#123456".to_string());

        let manifest = Manifest::from_str(
            r##"
[vars]
accent = "#00aa00"

[[rules]]
files = "red.js"
[rules.palette]
looks-secondary = "{{ accent }}"
"##,
            ManifestFormat::Toml,
            PathBuf::from("."),
            &overrides,
        )
        .unwrap();

        let RuleAction::Palette(palette) = &manifest.rules[0].action else {
            panic!("expected palette");
        };
        assert_eq!(palette.entries[0].value, "#123456");
    }

    #[test]
    fn parses_yaml_manifest() {
        let manifest = Manifest::from_str(
            r#"
project:
  root: app
assets:
  - from: custom/site_icon.png
    to: build/favicon.ico
    phase: inject
"#,
            ManifestFormat::Yaml,
            PathBuf::from("."),
            &BTreeMap::new(),
        )
        .unwrap();

        assert_eq!(manifest.project.root, PathBuf::from("app"));
        assert_eq!(manifest.assets[0].phase, Phase::Inject);
    }

    #[test]
    fn loads_from_file_relative_to_its_directory() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("reskin.toml");
        fs::write(&path, "[project]\nroot = \"app\"\n").unwrap();

        let manifest = Manifest::from_file(&path, &BTreeMap::new()).unwrap();

        assert_eq!(manifest.base_dir, temp.path());
        assert_eq!(manifest.project_root(), temp.path().join("app"));
    }

    #[test]
    fn detects_format_from_extension() {
        assert_eq!(
            ManifestFormat::from_path(Path::new("reskin.yml")),
            ManifestFormat::Yaml
        );
        assert_eq!(
            ManifestFormat::from_path(Path::new("reskin.toml")),
            ManifestFormat::Toml
        );
    }
}
