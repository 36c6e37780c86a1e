use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::parser::ImportInfo;
use crate::resolver::{ResolutionOutcome, ResolveTarget};

// ---------------------------------------------------------------------------
// Data model
// ---------------------------------------------------------------------------

/// A directed import edge between two analyzed files.
///
/// Both endpoints are rendered relative to the analysis base directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Edge {
    /// The importing file.
    pub from: String,
    /// The file the import resolves to.
    pub to: String,
}

/// The import graph artifact: a flat edge list under a single `edges` key.
///
/// Edges appear in discovery order (file-set order, then declaration order
/// within a file) and are not deduplicated unless [`ImportGraph::dedupe`] is
/// called, so repeated imports of the same target are preserved.
#[derive(Debug, Default, Serialize)]
pub struct ImportGraph {
    pub edges: Vec<Edge>,
}

impl ImportGraph {
    /// Collapse repeated `(from, to)` pairs, keeping the first occurrence.
    pub fn dedupe(&mut self) {
        let mut seen = HashSet::new();
        self.edges
            .retain(|e| seen.insert((e.from.clone(), e.to.clone())));
    }
}

/// Tallies of per-import resolution outcomes, reported in the run summary.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct BuildStats {
    /// Imports the resolver mapped to a concrete file (whether or not that
    /// file is part of the analyzed set).
    pub resolved: usize,
    /// Imports naming an external package.
    pub external: usize,
    /// Imports naming Node.js built-in modules.
    pub builtin: usize,
    /// Imports that could not be resolved.
    pub unresolved: usize,
}

// ---------------------------------------------------------------------------
// Graph construction
// ---------------------------------------------------------------------------

/// Build the import graph from the ordered file set.
///
/// For every import declaration, in file-set order and then declaration order,
/// the specifier is resolved through `resolver` and classified:
///
/// - Resolved to a file **in the analyzed set**: an edge is appended, both
///   endpoints relative to `base`.
/// - Resolved to a file outside the set (node_modules, a `.json` file, a file
///   the selection pattern excluded): no edge. The resolver did succeed, so it
///   still counts as resolved in the stats.
/// - Builtin / external / unresolved: no edge, tallied per category.
///
/// The output is fully determined by the input order: no sorting, no
/// deduplication, no filesystem access beyond what `resolver` performs.
pub fn build_graph<R: ResolveTarget>(
    files: &[(PathBuf, Vec<ImportInfo>)],
    resolver: &R,
    base: &Path,
    verbose: bool,
) -> (ImportGraph, BuildStats) {
    let mut graph = ImportGraph::default();
    let mut stats = BuildStats::default();

    let file_set: HashSet<&Path> = files.iter().map(|(path, _)| path.as_path()).collect();

    for (from_file, imports) in files {
        let from_rel = relative_display(from_file, base);

        for import in imports {
            match resolver.resolve_target(from_file, &import.specifier) {
                ResolutionOutcome::Resolved(target) => {
                    stats.resolved += 1;
                    if file_set.contains(target.as_path()) {
                        let to_rel = relative_display(&target, base);
                        if verbose {
                            eprintln!(
                                "  resolve: {}:{} imports '{}' -> {}",
                                from_rel, import.line, import.specifier, to_rel
                            );
                        }
                        graph.edges.push(Edge {
                            from: from_rel.clone(),
                            to: to_rel,
                        });
                    } else if verbose {
                        eprintln!(
                            "  resolve: {}:{} imports '{}' -> {} (outside the analyzed set, no edge)",
                            from_rel,
                            import.line,
                            import.specifier,
                            target.display()
                        );
                    }
                }
                ResolutionOutcome::BuiltinModule(name) => {
                    stats.builtin += 1;
                    if verbose {
                        eprintln!(
                            "  resolve: {}:{} imports '{}' -> builtin:{}",
                            from_rel, import.line, import.specifier, name
                        );
                    }
                }
                ResolutionOutcome::Unresolved(reason) => {
                    if is_external_package(&import.specifier) {
                        stats.external += 1;
                        if verbose {
                            eprintln!(
                                "  resolve: {}:{} imports '{}' -> external:{}",
                                from_rel,
                                import.line,
                                import.specifier,
                                extract_package_name(&import.specifier)
                            );
                        }
                    } else {
                        stats.unresolved += 1;
                        if verbose {
                            eprintln!(
                                "  resolve: {}:{} imports '{}' -> unresolved: {}",
                                from_rel, import.line, import.specifier, reason
                            );
                        }
                    }
                }
            }
        }
    }

    (graph, stats)
}

/// Render `path` relative to `base`, falling back to the path as-is when it
/// does not live under `base`.
fn relative_display(path: &Path, base: &Path) -> String {
    path.strip_prefix(base)
        .unwrap_or(path)
        .display()
        .to_string()
}

// ---------------------------------------------------------------------------
// Specifier classification
// ---------------------------------------------------------------------------

/// Returns `true` if the specifier looks like an external package reference:
/// not relative (`.`), not absolute (`/`). Matches npm package patterns such
/// as `react`, `@scope/pkg`, `lodash/merge`.
fn is_external_package(specifier: &str) -> bool {
    !specifier.starts_with('.') && !specifier.starts_with('/')
}

/// Extract the canonical package name from a module specifier.
///
/// - `react` → `react`
/// - `@org/utils` → `@org/utils`  (scoped package keeps both parts)
/// - `lodash/merge` → `lodash`    (subpath import)
/// - `@org/utils/helpers` → `@org/utils`
fn extract_package_name(specifier: &str) -> &str {
    if specifier.starts_with('@') {
        let parts: Vec<&str> = specifier.splitn(3, '/').collect();
        if parts.len() >= 2 {
            let scope_end = parts[0].len() + 1 + parts[1].len();
            &specifier[..scope_end]
        } else {
            specifier
        }
    } else {
        match specifier.find('/') {
            Some(idx) => &specifier[..idx],
            None => specifier,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
