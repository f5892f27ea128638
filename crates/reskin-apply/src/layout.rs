//! Directory listing of the project checkout, logged before prebuild.

use std::path::Path;

use walkdir::WalkDir;

/// List `dir` down to `depth` levels, directories suffixed with `/`.
pub fn describe_tree(dir: &Path, depth: usize) -> Vec<String> {
    if !dir.is_dir() {
        return vec![format!("[!] {} not found", dir.display())];
    }

    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(depth)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|entry| {
            let indent = "  ".repeat(entry.depth());
            let name = entry.file_name().to_string_lossy();
            if entry.file_type().is_dir() {
                format!("{}{}/", indent, name)
            } else {
                format!("{}{}", indent, name)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn lists_to_requested_depth() {
        let temp = tempdir().unwrap();
        fs::create_dir_all(temp.path().join("src/lib")).unwrap();
        fs::create_dir_all(temp.path().join("static")).unwrap();
        fs::write(temp.path().join("package.json"), "{}").unwrap();
        fs::write(temp.path().join("src/index.js"), "").unwrap();

        assert_eq!(
            describe_tree(temp.path(), 1),
            vec!["  package.json", "  src/", "  static/"]
        );
        assert_eq!(
            describe_tree(temp.path(), 2),
            vec![
                "  package.json",
                "  src/",
                "    index.js",
                "    lib/",
                "  static/"
            ]
        );
    }

    #[test]
    fn reports_missing_directory() {
        let temp = tempdir().unwrap();
        let lines = describe_tree(&temp.path().join("scratch-gui"), 1);

        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("[!]"));
    }
}
