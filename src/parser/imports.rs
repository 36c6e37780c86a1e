use std::sync::OnceLock;

use tree_sitter::{Node, Query, QueryCursor, StreamingIterator, Tree};

use super::SourceLanguage;

// ---------------------------------------------------------------------------
// Data structures
// ---------------------------------------------------------------------------

/// A static import declaration extracted from a source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportInfo {
    /// The raw module specifier string, e.g. `"./utils"` or `"react"`.
    pub specifier: String,
    /// 1-based line of the declaration. Diagnostics only, never serialized.
    pub line: usize,
}

// ---------------------------------------------------------------------------
// Query
// ---------------------------------------------------------------------------

/// Tree-sitter query for static ESM imports.
///
/// `import_statement` covers every static form: named, default, namespace,
/// side-effect (`import './polyfill'`) and TS type-only imports. Dynamic
/// `import()` expressions and CJS `require()` calls are call expressions,
/// not import statements, so they never match.
const IMPORT_QUERY: &str = r#"
    (import_statement
      source: (string (string_fragment) @specifier)) @import
"#;

// One compiled query per grammar. Query node-type IDs are grammar-specific,
// so a query compiled for TypeScript cannot be reused against a TSX tree.
static TS_IMPORT_QUERY: OnceLock<Query> = OnceLock::new();
static TSX_IMPORT_QUERY: OnceLock<Query> = OnceLock::new();
static JS_IMPORT_QUERY: OnceLock<Query> = OnceLock::new();

fn import_query(lang: SourceLanguage) -> &'static Query {
    let cache = match lang {
        SourceLanguage::TypeScript => &TS_IMPORT_QUERY,
        SourceLanguage::Tsx => &TSX_IMPORT_QUERY,
        SourceLanguage::JavaScript => &JS_IMPORT_QUERY,
    };
    cache.get_or_init(|| Query::new(&lang.grammar(), IMPORT_QUERY).expect("invalid import query"))
}

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

fn node_text<'a>(node: Node<'a>, source: &'a [u8]) -> &'a str {
    node.utf8_text(source).unwrap_or("")
}

/// Extract all static import declarations from a parsed syntax tree, in
/// declaration order.
pub fn extract_imports(tree: &Tree, source: &[u8], lang: SourceLanguage) -> Vec<ImportInfo> {
    let query = import_query(lang);
    let specifier_idx = query
        .capture_index_for_name("specifier")
        .expect("import query must have @specifier");
    let import_idx = query
        .capture_index_for_name("import")
        .expect("import query must have @import");

    let mut imports = Vec::new();
    let mut cursor = QueryCursor::new();
    let mut matches = cursor.matches(query, tree.root_node(), source);

    while let Some(m) = matches.next() {
        let mut specifier: Option<String> = None;
        let mut line = 0;

        for capture in m.captures {
            if capture.index == specifier_idx {
                specifier = Some(node_text(capture.node, source).to_owned());
            } else if capture.index == import_idx {
                line = capture.node.start_position().row + 1;
            }
        }

        if let Some(specifier) = specifier {
            imports.push(ImportInfo { specifier, line });
        }
    }

    imports
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(lang: SourceLanguage, source: &str) -> Tree {
        let mut parser = tree_sitter::Parser::new();
        parser.set_language(&lang.grammar()).unwrap();
        parser.parse(source.as_bytes(), None).unwrap()
    }

    fn specifiers(lang: SourceLanguage, source: &str) -> Vec<String> {
        let tree = parse(lang, source);
        extract_imports(&tree, source.as_bytes(), lang)
            .into_iter()
            .map(|i| i.specifier)
            .collect()
    }

    #[test]
    fn test_named_import() {
        let src = "import { useState, useEffect } from 'react';";
        assert_eq!(specifiers(SourceLanguage::TypeScript, src), vec!["react"]);
    }

    #[test]
    fn test_default_import() {
        let src = "import React from 'react';";
        assert_eq!(specifiers(SourceLanguage::TypeScript, src), vec!["react"]);
    }

    #[test]
    fn test_namespace_import() {
        let src = "import * as path from './path-utils';";
        assert_eq!(
            specifiers(SourceLanguage::TypeScript, src),
            vec!["./path-utils"]
        );
    }

    #[test]
    fn test_side_effect_import() {
        let src = "import './polyfill';";
        assert_eq!(
            specifiers(SourceLanguage::TypeScript, src),
            vec!["./polyfill"]
        );
    }

    #[test]
    fn test_type_only_import() {
        let src = "import type { Options } from './types';";
        assert_eq!(specifiers(SourceLanguage::TypeScript, src), vec!["./types"]);
    }

    #[test]
    fn test_dynamic_import_is_not_extracted() {
        let src = "const mod = await import('./lazy');";
        assert!(specifiers(SourceLanguage::TypeScript, src).is_empty());
    }

    #[test]
    fn test_require_is_not_extracted() {
        let src = "const fs = require('fs');";
        assert!(specifiers(SourceLanguage::JavaScript, src).is_empty());
    }

    #[test]
    fn test_reexport_is_not_extracted() {
        let src = "export { helper } from './utils';";
        assert!(specifiers(SourceLanguage::TypeScript, src).is_empty());
    }

    #[test]
    fn test_declaration_order_and_lines() {
        let src = "import a from './a';\nconst x = 1;\nimport b from './b';\n";
        let tree = parse(SourceLanguage::TypeScript, src);
        let imports = extract_imports(&tree, src.as_bytes(), SourceLanguage::TypeScript);
        assert_eq!(imports.len(), 2, "should find 2 imports");
        assert_eq!(imports[0].specifier, "./a");
        assert_eq!(imports[0].line, 1);
        assert_eq!(imports[1].specifier, "./b");
        assert_eq!(imports[1].line, 3);
    }

    #[test]
    fn test_duplicate_specifiers_are_kept() {
        let src = "import { a } from './m';\nimport { b } from './m';\n";
        assert_eq!(
            specifiers(SourceLanguage::TypeScript, src),
            vec!["./m", "./m"]
        );
    }

    #[test]
    fn test_tsx_with_jsx_body() {
        let src =
            "import Button from './button';\nexport const App = () => <Button label=\"ok\" />;\n";
        assert_eq!(specifiers(SourceLanguage::Tsx, src), vec!["./button"]);
    }

    #[test]
    fn test_multiline_import_reports_statement_line() {
        let src = "const pad = 0;\nimport {\n  first,\n  second,\n} from './wide';\n";
        let tree = parse(SourceLanguage::TypeScript, src);
        let imports = extract_imports(&tree, src.as_bytes(), SourceLanguage::TypeScript);
        assert_eq!(imports.len(), 1);
        assert_eq!(imports[0].specifier, "./wide");
        assert_eq!(imports[0].line, 2, "line should point at the import keyword");
    }
}
