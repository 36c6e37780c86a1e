use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use log::debug;
use serde::Deserialize;

/// Tool configuration loaded from `import-graph.toml` at the project root.
///
/// The file is advisory: a missing file silently yields defaults, an
/// unparseable one warns on stderr and yields defaults. CLI flags override
/// anything set here.
#[derive(Debug, Deserialize, Default)]
pub struct ImportGraphConfig {
    /// File-selection glob, relative to the project root.
    pub pattern: Option<String>,
    /// Output artifact path.
    pub out: Option<String>,
    /// Additional path patterns to exclude from the walk (beyond .gitignore
    /// and node_modules).
    pub exclude: Option<Vec<String>>,
    /// Collapse repeated `(from, to)` pairs in the output.
    pub dedupe: Option<bool>,
}

impl ImportGraphConfig {
    /// Load configuration from `import-graph.toml` in the given root directory.
    ///
    /// Returns a default (empty) configuration if the file does not exist or
    /// cannot be parsed.
    pub fn load(root: &Path) -> Self {
        let config_path = root.join("import-graph.toml");

        if !config_path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(&config_path) {
            Ok(contents) => match toml::from_str::<Self>(&contents) {
                Ok(config) => {
                    debug!("loaded tool config from {}", config_path.display());
                    config
                }
                Err(err) => {
                    eprintln!(
                        "warning: failed to parse import-graph.toml: {err}. Using defaults."
                    );
                    Self::default()
                }
            },
            Err(err) => {
                eprintln!("warning: failed to read import-graph.toml: {err}. Using defaults.");
                Self::default()
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Project-resolution configuration (tsconfig)
// ---------------------------------------------------------------------------

/// Locate and validate the project-resolution configuration file.
///
/// Unlike the tool config above, this one is load-bearing: a broken tsconfig
/// silently changes which imports resolve, so problems abort the run before
/// any file is analyzed.
///
/// - `explicit` set: the file must exist, relative paths are taken from
///   `root`.
/// - `explicit` unset: `<root>/tsconfig.json` is used when present; a project
///   without one resolves without tsconfig handling (`Ok(None)`).
///
/// The located file must parse as JSON once comments and trailing commas
/// are stripped (the JSONC dialect tsc accepts). Anything else is a
/// configuration error.
pub fn locate_tsconfig(root: &Path, explicit: Option<&Path>) -> Result<Option<PathBuf>> {
    let path = match explicit {
        Some(p) => {
            let p = if p.is_absolute() {
                p.to_path_buf()
            } else {
                root.join(p)
            };
            if !p.exists() {
                bail!("tsconfig not found: {}", p.display());
            }
            p
        }
        None => {
            let default = root.join("tsconfig.json");
            if !default.exists() {
                debug!("no tsconfig.json at project root; resolving without one");
                return Ok(None);
            }
            default
        }
    };

    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read tsconfig: {}", path.display()))?;

    let normalized = jsonc_to_json(&contents);
    serde_json::from_str::<serde_json::Value>(&normalized)
        .with_context(|| format!("failed to parse tsconfig: {}", path.display()))?;

    debug!("using tsconfig {}", path.display());
    Ok(Some(path))
}

/// Reduce JSON-with-comments (the dialect tsc reads) to strict JSON.
///
/// Strips `//` line comments, `/* */` block comments, and trailing commas.
/// Comment handling is string-aware so comment openers inside values
/// (`"$schema": "https://..."`, include globs like `"src/**/*"`) survive.
fn jsonc_to_json(input: &str) -> String {
    strip_trailing_commas(&strip_comments(input))
}

fn strip_comments(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut in_string = false;
    let mut escaped = false;
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            '/' if chars.peek() == Some(&'/') => {
                for c in chars.by_ref() {
                    if c == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                // Newlines inside the comment are kept so parse errors after
                // stripping still point at the right line.
                let mut prev = '\0';
                for c in chars.by_ref() {
                    if prev == '*' && c == '/' {
                        break;
                    }
                    if c == '\n' {
                        out.push('\n');
                    }
                    prev = c;
                }
            }
            _ => out.push(c),
        }
    }

    out
}

/// Drop commas whose next non-whitespace character closes an object or an
/// array. Runs after comment stripping, so only whitespace can sit between a
/// trailing comma and its closer.
fn strip_trailing_commas(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut in_string = false;
    let mut escaped = false;
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            ',' => {
                let mut pending = String::new();
                while let Some(&w) = chars.peek()
                    && w.is_whitespace()
                {
                    pending.push(w);
                    chars.next();
                }
                if !matches!(chars.peek(), Some(&'}') | Some(&']')) {
                    out.push(',');
                }
                out.push_str(&pending);
            }
            _ => out.push(c),
        }
    }

    out
}
