use std::path::{Path, PathBuf};

use log::trace;
use oxc_resolver::{ResolveOptions, Resolver, TsconfigOptions, TsconfigReferences};

/// The outcome of resolving a single import specifier.
#[derive(Debug)]
pub enum ResolutionOutcome {
    /// Successfully resolved to an absolute file path.
    Resolved(PathBuf),
    /// The specifier is a Node.js built-in module (e.g. `"fs"`, `"node:crypto"`).
    BuiltinModule(String),
    /// The specifier could not be resolved. `String` contains a human-readable reason.
    Unresolved(String),
}

/// The resolution capability the graph builder depends on.
///
/// The builder asks exactly one question: given the importing file and the
/// specifier as written, which concrete target does it name? Production runs
/// answer with [`ProjectResolver`]; unit tests substitute a table-driven fake.
pub trait ResolveTarget {
    /// Resolve `specifier` from the perspective of `from_file`.
    fn resolve_target(&self, from_file: &Path, specifier: &str) -> ResolutionOutcome;
}

/// [`ResolveTarget`] implementation backed by `oxc_resolver`, configured for
/// TypeScript projects.
///
/// - TypeScript extensions are probed first (`.ts`, `.tsx`, `.mts`).
/// - `.js` extension aliases map to `.ts`/`.tsx`/`.js` so projects that write
///   `import './foo.js'` in TypeScript source resolve correctly.
/// - `tsconfig`, when present, supplies `baseUrl` and `paths` aliases; project
///   references are followed via `TsconfigReferences::Auto`.
pub struct ProjectResolver {
    inner: Resolver,
}

impl ProjectResolver {
    pub fn new(tsconfig: Option<PathBuf>) -> Self {
        let tsconfig = tsconfig.map(|config_file| TsconfigOptions {
            config_file,
            references: TsconfigReferences::Auto,
        });

        let inner = Resolver::new(ResolveOptions {
            extensions: vec![
                ".ts".into(),
                ".tsx".into(),
                ".mts".into(),
                ".js".into(),
                ".jsx".into(),
                ".mjs".into(),
                ".json".into(),
                ".node".into(),
            ],
            extension_alias: vec![(
                ".js".into(),
                vec![".ts".into(), ".tsx".into(), ".js".into()],
            )],
            tsconfig,
            condition_names: vec!["node".into(), "import".into()],
            builtin_modules: true,
            ..ResolveOptions::default()
        });

        Self { inner }
    }
}

impl ResolveTarget for ProjectResolver {
    /// Resolution starts from `from_file`'s parent directory, which matches how
    /// Node.js and TypeScript resolve relative imports.
    fn resolve_target(&self, from_file: &Path, specifier: &str) -> ResolutionOutcome {
        let dir = match from_file.parent() {
            Some(d) => d,
            None => {
                return ResolutionOutcome::Unresolved(
                    "importing file has no parent directory".to_owned(),
                );
            }
        };

        let outcome = match self.inner.resolve(dir, specifier) {
            Ok(resolution) => ResolutionOutcome::Resolved(resolution.into_path_buf()),
            Err(oxc_resolver::ResolveError::Builtin { resolved, .. }) => {
                ResolutionOutcome::BuiltinModule(resolved)
            }
            Err(e) => ResolutionOutcome::Unresolved(e.to_string()),
        };

        trace!(
            "resolve {:?} from {}: {:?}",
            specifier,
            from_file.display(),
            outcome
        );
        outcome
    }
}
