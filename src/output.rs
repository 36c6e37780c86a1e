use std::path::Path;

/// Aggregate statistics produced by an analysis run.
#[derive(Debug, Default)]
pub struct RunStats {
    /// Source files that were parsed.
    pub file_count: usize,
    /// Import declarations found across all files.
    pub import_count: usize,
    /// Edges written to the artifact.
    pub edge_count: usize,
    /// Imports resolved to a concrete file.
    pub resolved: usize,
    /// Imports naming an external package.
    pub external: usize,
    /// Imports naming Node.js built-in modules.
    pub builtin: usize,
    /// Imports that could not be resolved.
    pub unresolved: usize,
    /// Files skipped due to read or parse errors.
    pub skipped: usize,
    /// Wall-clock time for the run in seconds.
    pub elapsed_secs: f64,
}

/// Print a human-readable summary of the run to stdout.
///
/// The default is a single confirmation line naming the artifact and the
/// edge count; `verbose` prepends a breakdown of what was analyzed and how
/// each import resolved. If any files were skipped, a warning goes to
/// **stderr** so stdout stays a clean record of what was produced.
pub fn print_summary(stats: &RunStats, out_path: &Path, verbose: bool) {
    if verbose {
        println!(
            "Analyzed {} files ({} imports) in {:.2}s",
            stats.file_count, stats.import_count, stats.elapsed_secs
        );
        println!(
            "  Resolved {} imports ({} external, {} unresolved, {} builtins)",
            stats.resolved, stats.external, stats.unresolved, stats.builtin,
        );
    }
    println!("Wrote {} edges to {}", stats.edge_count, out_path.display());

    if stats.skipped > 0 {
        eprintln!("  {} files skipped (read or parse errors)", stats.skipped);
    }
}
