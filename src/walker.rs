use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use glob::{MatchOptions, Pattern};
use log::debug;

use crate::config::ImportGraphConfig;

/// Source file extensions the import analysis understands.
const SOURCE_EXTENSIONS: &[&str] = &["ts", "tsx", "js", "jsx"];

/// Walk the project root and collect the source files to analyze.
///
/// Respects `.gitignore` rules, always excludes `node_modules`, applies any
/// additional exclusions from `config.exclude`, and keeps only files whose
/// root-relative path matches the selection `pattern` and whose extension is
/// a supported source extension.
///
/// The result is sorted by path: the analyzed file set must not depend on
/// directory iteration order, or reruns over an unchanged tree would shuffle
/// the output.
///
/// When `verbose` is true, each selected file path is printed to stderr.
pub fn walk_project(
    root: &Path,
    pattern: &str,
    config: &ImportGraphConfig,
    verbose: bool,
) -> Result<Vec<PathBuf>> {
    let pattern = Pattern::new(pattern)
        .with_context(|| format!("invalid file-selection pattern {:?}", pattern))?;

    // Keep `*` from crossing directory separators; only `**` spans
    // directories. Matches how JS glob tooling treats these patterns.
    let mut options = MatchOptions::new();
    options.require_literal_separator = true;

    let mut files = Vec::new();

    let walker = ignore::WalkBuilder::new(root)
        .standard_filters(true)
        // Read .gitignore files even when the directory is not inside a git
        // repository, so exclusions work for standalone trees.
        .require_git(false)
        .build();

    for result in walker {
        let entry = match result {
            Ok(e) => e,
            Err(err) => {
                eprintln!("warning: {err}");
                continue;
            }
        };

        let path = entry.path();

        if entry.file_type().map(|ft| ft.is_dir()).unwrap_or(false) {
            continue;
        }

        // No component of the path may be `node_modules` — hard exclusion.
        if path_contains_node_modules(path) {
            continue;
        }

        let rel = path.strip_prefix(root).unwrap_or(path);

        if is_excluded_by_config(rel, config) {
            continue;
        }

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        if !SOURCE_EXTENSIONS.contains(&ext) {
            continue;
        }

        if !pattern.matches_path_with(rel, options) {
            continue;
        }

        if verbose {
            eprintln!("{}", path.display());
        }

        files.push(path.to_path_buf());
    }

    files.sort();
    debug!("walked {} source files under {}", files.len(), root.display());

    Ok(files)
}

/// Returns true if any component of `path` is named `node_modules`.
fn path_contains_node_modules(path: &Path) -> bool {
    path.components().any(|c| {
        c.as_os_str()
            .to_str()
            .map(|s| s == "node_modules")
            .unwrap_or(false)
    })
}

/// Returns true if the root-relative path matches any exclusion pattern from
/// config. A pattern matches either the whole relative path or any single
/// component, so a bare directory name like `"legacy"` excludes the subtree.
fn is_excluded_by_config(rel: &Path, config: &ImportGraphConfig) -> bool {
    let patterns = match &config.exclude {
        Some(p) => p,
        None => return false,
    };

    let rel_str = rel.to_string_lossy();

    for pattern in patterns {
        if let Ok(matched) = Pattern::new(pattern)
            && matched.matches(&rel_str)
        {
            return true;
        }
        for component in rel.components() {
            if let Some(s) = component.as_os_str().to_str()
                && let Ok(matched) = Pattern::new(pattern)
                && matched.matches(s)
            {
                return true;
            }
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("tempdir")
    }

    fn names(files: &[PathBuf], root: &Path) -> Vec<String> {
        files
            .iter()
            .map(|f| {
                f.strip_prefix(root)
                    .unwrap()
                    .to_string_lossy()
                    .into_owned()
            })
            .collect()
    }

    #[test]
    fn test_default_pattern_matches_nested_source_files() {
        let dir = tmp();
        fs::create_dir_all(dir.path().join("src/sub")).unwrap();
        fs::write(dir.path().join("src/a.ts"), "").unwrap();
        fs::write(dir.path().join("src/sub/b.ts"), "").unwrap();
        fs::write(dir.path().join("src/readme.md"), "").unwrap();

        let config = ImportGraphConfig::default();
        let files = walk_project(dir.path(), "src/**/*.ts", &config, false).unwrap();

        assert_eq!(names(&files, dir.path()), vec!["src/a.ts", "src/sub/b.ts"]);
    }

    #[test]
    fn test_files_outside_pattern_are_ignored() {
        let dir = tmp();
        fs::create_dir_all(dir.path().join("src")).unwrap();
        fs::create_dir_all(dir.path().join("lib")).unwrap();
        fs::write(dir.path().join("src/a.ts"), "").unwrap();
        fs::write(dir.path().join("lib/b.ts"), "").unwrap();

        let config = ImportGraphConfig::default();
        let files = walk_project(dir.path(), "src/**/*.ts", &config, false).unwrap();

        assert_eq!(names(&files, dir.path()), vec!["src/a.ts"]);
    }

    #[test]
    fn test_single_star_does_not_cross_directories() {
        let dir = tmp();
        fs::create_dir_all(dir.path().join("src/sub")).unwrap();
        fs::write(dir.path().join("src/a.ts"), "").unwrap();
        fs::write(dir.path().join("src/sub/b.ts"), "").unwrap();

        let config = ImportGraphConfig::default();
        let files = walk_project(dir.path(), "src/*.ts", &config, false).unwrap();

        assert_eq!(names(&files, dir.path()), vec!["src/a.ts"]);
    }

    #[test]
    fn test_node_modules_is_always_excluded() {
        let dir = tmp();
        fs::create_dir_all(dir.path().join("src/node_modules/pkg")).unwrap();
        fs::write(dir.path().join("src/a.ts"), "").unwrap();
        fs::write(dir.path().join("src/node_modules/pkg/index.ts"), "").unwrap();

        let config = ImportGraphConfig::default();
        let files = walk_project(dir.path(), "src/**/*.ts", &config, false).unwrap();

        assert_eq!(names(&files, dir.path()), vec!["src/a.ts"]);
    }

    #[test]
    fn test_gitignore_is_respected_without_git_repo() {
        let dir = tmp();
        fs::create_dir_all(dir.path().join("src")).unwrap();
        fs::write(dir.path().join(".gitignore"), "src/generated.ts\n").unwrap();
        fs::write(dir.path().join("src/a.ts"), "").unwrap();
        fs::write(dir.path().join("src/generated.ts"), "").unwrap();

        let config = ImportGraphConfig::default();
        let files = walk_project(dir.path(), "src/**/*.ts", &config, false).unwrap();

        assert_eq!(names(&files, dir.path()), vec!["src/a.ts"]);
    }

    #[test]
    fn test_config_exclude_by_component_name() {
        let dir = tmp();
        fs::create_dir_all(dir.path().join("src/legacy")).unwrap();
        fs::write(dir.path().join("src/a.ts"), "").unwrap();
        fs::write(dir.path().join("src/legacy/old.ts"), "").unwrap();

        let config = ImportGraphConfig {
            exclude: Some(vec!["legacy".to_string()]),
            ..Default::default()
        };
        let files = walk_project(dir.path(), "src/**/*.ts", &config, false).unwrap();

        assert_eq!(names(&files, dir.path()), vec!["src/a.ts"]);
    }

    #[test]
    fn test_config_exclude_by_relative_glob() {
        let dir = tmp();
        fs::create_dir_all(dir.path().join("src")).unwrap();
        fs::write(dir.path().join("src/a.ts"), "").unwrap();
        fs::write(dir.path().join("src/a.test.ts"), "").unwrap();

        let config = ImportGraphConfig {
            exclude: Some(vec!["*.test.ts".to_string()]),
            ..Default::default()
        };
        let files = walk_project(dir.path(), "src/**/*.ts", &config, false).unwrap();

        assert_eq!(names(&files, dir.path()), vec!["src/a.ts"]);
    }

    #[test]
    fn test_result_is_sorted() {
        let dir = tmp();
        fs::create_dir_all(dir.path().join("src")).unwrap();
        for name in ["c.ts", "a.ts", "b.ts"] {
            fs::write(dir.path().join("src").join(name), "").unwrap();
        }

        let config = ImportGraphConfig::default();
        let files = walk_project(dir.path(), "src/**/*.ts", &config, false).unwrap();

        assert_eq!(
            names(&files, dir.path()),
            vec!["src/a.ts", "src/b.ts", "src/c.ts"]
        );
    }

    #[test]
    fn test_invalid_pattern_is_an_error() {
        let dir = tmp();
        let config = ImportGraphConfig::default();
        let result = walk_project(dir.path(), "src/[**", &config, false);
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_project_yields_empty_set() {
        let dir = tmp();
        let config = ImportGraphConfig::default();
        let files = walk_project(dir.path(), "src/**/*.ts", &config, false).unwrap();
        assert!(files.is_empty());
    }
}
