mod cli;
mod config;
mod graph;
mod output;
mod parser;
mod resolver;
mod walker;
mod writer;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use log::debug;

use cli::{Cli, DEFAULT_OUT, DEFAULT_PATTERN};
use config::{ImportGraphConfig, locate_tsconfig};
use graph::build_graph;
use output::{RunStats, print_summary};
use parser::{ImportInfo, parse_file};
use resolver::ProjectResolver;
use walker::walk_project;
use writer::write_graph;

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    debug!("parsed CLI arguments: {:?}", cli);

    let started = Instant::now();

    // Fatal configuration errors all surface here, before any file is parsed.
    let root = cli
        .path
        .canonicalize()
        .with_context(|| format!("project root not found: {}", cli.path.display()))?;

    let config = ImportGraphConfig::load(&root);

    let pattern = cli
        .pattern
        .or_else(|| config.pattern.clone())
        .unwrap_or_else(|| DEFAULT_PATTERN.to_owned());

    let out_path = cli
        .out
        .or_else(|| config.out.as_ref().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUT));
    let out_path = if out_path.is_absolute() {
        out_path
    } else {
        root.join(out_path)
    };

    let dedupe = cli.dedupe || config.dedupe.unwrap_or(false);

    let tsconfig = locate_tsconfig(&root, cli.tsconfig.as_deref())?;

    // Stage 1: enumerate the file set and parse import declarations.
    let files = walk_project(&root, &pattern, &config, cli.verbose)?;

    let mut skipped = 0usize;
    let mut parsed: Vec<(PathBuf, Vec<ImportInfo>)> = Vec::with_capacity(files.len());
    for file in files {
        let source = match std::fs::read(&file) {
            Ok(bytes) => bytes,
            Err(err) => {
                eprintln!("warning: failed to read {}: {err}", file.display());
                skipped += 1;
                continue;
            }
        };
        match parse_file(&file, &source) {
            Ok(imports) => parsed.push((file, imports)),
            Err(err) => {
                eprintln!("warning: failed to parse {}: {err}", file.display());
                skipped += 1;
            }
        }
    }

    // Stage 2: resolve imports and accumulate edges.
    let resolver = ProjectResolver::new(tsconfig);
    let (mut graph, build_stats) = build_graph(&parsed, &resolver, &root, cli.verbose);
    if dedupe {
        graph.dedupe();
    }

    // Stage 3: write the artifact.
    write_graph(&graph, &out_path)?;

    let stats = RunStats {
        file_count: parsed.len(),
        import_count: parsed.iter().map(|(_, imports)| imports.len()).sum(),
        edge_count: graph.edges.len(),
        resolved: build_stats.resolved,
        external: build_stats.external,
        builtin: build_stats.builtin,
        unresolved: build_stats.unresolved,
        skipped,
        elapsed_secs: started.elapsed().as_secs_f64(),
    };
    print_summary(&stats, &out_path, cli.verbose);

    Ok(())
}
