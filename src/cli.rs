use std::path::PathBuf;

use clap::Parser;

/// Default file-selection pattern when neither the CLI nor the config file
/// sets one.
pub const DEFAULT_PATTERN: &str = "src/**/*.ts";

/// Default output location when neither the CLI nor the config file sets one.
pub const DEFAULT_OUT: &str = "generated/import-graph.json";

/// Extract a module-level import graph from a TypeScript/JavaScript project.
///
/// import-graph walks the project tree, resolves every static import to the
/// concrete file it references, and writes the result as a JSON edge list
/// for downstream architecture visualization.
#[derive(Parser, Debug)]
#[command(name = "import-graph", version, about, long_about = None)]
pub struct Cli {
    /// Path to the project root to analyze.
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// File-selection glob, relative to the project root (default: src/**/*.ts).
    ///
    /// Overrides the `pattern` key in import-graph.toml.
    #[arg(long)]
    pub pattern: Option<String>,

    /// tsconfig used for import resolution (paths aliases, baseUrl).
    ///
    /// Defaults to `<root>/tsconfig.json` when one exists.
    #[arg(long)]
    pub tsconfig: Option<PathBuf>,

    /// Where to write the artifact, relative to the project root unless
    /// absolute (default: generated/import-graph.json).
    ///
    /// Overrides the `out` key in import-graph.toml.
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Collapse repeated (from, to) pairs instead of keeping one edge per
    /// import declaration.
    #[arg(long)]
    pub dedupe: bool,

    /// Print each discovered file and resolution outcome during analysis,
    /// and expand the run summary with the resolution breakdown.
    #[arg(short, long)]
    pub verbose: bool,
}
