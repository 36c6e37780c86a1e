use std::path::Path;

use anyhow::{Context, Result};

use crate::graph::ImportGraph;

/// Serialize the graph to `out_path` as indented JSON.
///
/// Intermediate directories are created as needed; an existing artifact is
/// overwritten unconditionally. The document ends with a newline so the
/// artifact diffs cleanly line by line.
pub fn write_graph(graph: &ImportGraph, out_path: &Path) -> Result<()> {
    if let Some(parent) = out_path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory {}", parent.display()))?;
    }

    let mut json = serde_json::to_string_pretty(graph)?;
    json.push('\n');

    std::fs::write(out_path, json)
        .with_context(|| format!("failed to write {}", out_path.display()))?;

    Ok(())
}
