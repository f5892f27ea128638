//! File selection for text rules.
//!
//! Globs are relative to the project root. `*` and `?` stay within one path
//! component; `**` crosses directories. The walk starts at the longest literal
//! prefix of the glob so large trees (node_modules) are not scanned needlessly.

use std::path::{Component, Path, PathBuf};

use globset::GlobBuilder;
use walkdir::WalkDir;

/// Errors that can occur when expanding a glob.
#[derive(Debug, thiserror::Error)]
pub enum SelectError {
    #[error("Invalid glob '{glob}': {message}")]
    InvalidGlob { glob: String, message: String },

    #[error("Glob '{0}' must be relative to the project root")]
    NotRelative(String),
}

/// Expand `glob` under `root`, returning matching files in sorted order.
pub fn select_files(root: &Path, glob: &str) -> Result<Vec<PathBuf>, SelectError> {
    let glob = glob.trim_start_matches("./");
    let pattern = Path::new(glob);
    if pattern
        .components()
        .any(|c| matches!(c, Component::RootDir | Component::Prefix(_) | Component::ParentDir))
    {
        return Err(SelectError::NotRelative(glob.to_string()));
    }

    let matcher = GlobBuilder::new(glob)
        .literal_separator(true)
        .build()
        .map_err(|e| SelectError::InvalidGlob {
            glob: glob.to_string(),
            message: e.to_string(),
        })?
        .compile_matcher();

    let (base, depth) = walk_plan(glob);
    let start = root.join(&base);
    if !start.exists() {
        return Ok(Vec::new());
    }

    let mut walker = WalkDir::new(&start).follow_links(true).sort_by_file_name();
    if let Some(depth) = depth {
        walker = walker.max_depth(depth);
    }

    let mut files = Vec::new();
    for entry in walker.into_iter().filter_map(|e| e.ok()) {
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(relative) = entry.path().strip_prefix(root) else {
            continue;
        };
        if matcher.is_match(to_slash(relative)) {
            files.push(entry.path().to_path_buf());
        }
    }

    Ok(files)
}

/// Literal directory prefix of a glob and, without `**`, how deep to walk below it.
fn walk_plan(glob: &str) -> (PathBuf, Option<usize>) {
    let parts: Vec<&str> = glob.split('/').filter(|p| !p.is_empty()).collect();
    let literal = parts
        .iter()
        .take_while(|p| !p.contains(['*', '?', '[', '{']))
        .count();

    // A fully literal glob walks its parent so the file itself is an entry.
    let base_len = literal.min(parts.len().saturating_sub(1));
    let base: PathBuf = parts[..base_len].iter().collect();

    let depth = if parts.iter().any(|p| p.contains("**")) {
        None
    } else {
        Some(parts.len() - base_len)
    };

    (base, depth)
}

fn to_slash(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "x").unwrap();
    }

    fn names(root: &Path, files: Vec<PathBuf>) -> Vec<String> {
        files
            .iter()
            .map(|f| to_slash(f.strip_prefix(root).unwrap()))
            .collect()
    }

    #[test]
    fn star_stays_in_one_directory() {
        let temp = tempdir().unwrap();
        touch(temp.path(), "build/index.html");
        touch(temp.path(), "build/player.html");
        touch(temp.path(), "build/static/nested.html");
        touch(temp.path(), "build/main.js");

        let files = select_files(temp.path(), "build/*.html").unwrap();

        assert_eq!(
            names(temp.path(), files),
            vec!["build/index.html", "build/player.html"]
        );
    }

    #[test]
    fn double_star_recurses() {
        let temp = tempdir().unwrap();
        touch(temp.path(), "build/index.html");
        touch(temp.path(), "build/static/nested.html");

        let files = select_files(temp.path(), "build/**/*.html").unwrap();

        assert_eq!(
            names(temp.path(), files),
            vec!["build/index.html", "build/static/nested.html"]
        );
    }

    #[test]
    fn literal_path_selects_single_file() {
        let temp = tempdir().unwrap();
        touch(temp.path(), "src/lib/themes/accent/red.js");
        touch(temp.path(), "src/lib/themes/accent/blue.js");

        let files = select_files(temp.path(), "src/lib/themes/accent/red.js").unwrap();

        assert_eq!(names(temp.path(), files), vec!["src/lib/themes/accent/red.js"]);
    }

    #[test]
    fn missing_base_selects_nothing() {
        let temp = tempdir().unwrap();

        let files = select_files(temp.path(), "build/*.html").unwrap();

        assert!(files.is_empty());
    }

    #[test]
    fn rejects_escaping_globs() {
        let temp = tempdir().unwrap();

        assert!(matches!(
            select_files(temp.path(), "../secrets/*.txt"),
            Err(SelectError::NotRelative(_))
        ));
    }

    #[test]
    fn plans_walk_from_literal_prefix() {
        assert_eq!(walk_plan("build/*.html"), (PathBuf::from("build"), Some(1)));
        assert_eq!(walk_plan("src/a/b.js"), (PathBuf::from("src/a"), Some(1)));
        assert_eq!(walk_plan("build/**/*.html"), (PathBuf::from("build"), None));
        assert_eq!(walk_plan("*.html"), (PathBuf::new(), Some(1)));
    }
}
