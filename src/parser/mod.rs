mod typescript;

use crate::model::{ParsedFile, ParsedSource};

/// Extensions the parser recognizes; everything else is excluded from the
/// graph entirely.
pub const SOURCE_EXTENSIONS: [&str; 6] = [".js", ".jsx", ".ts", ".tsx", ".mjs", ".cjs"];

/// Grammar dialect chosen from the file extension. `.ts`/`.tsx` enable type
/// annotations, `.tsx`/`.jsx` enable embedded markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    TypeScript,
    Tsx,
}

impl Dialect {
    fn from_path(path: &str) -> Self {
        if path.ends_with(".tsx") || path.ends_with(".jsx") {
            Dialect::Tsx
        } else {
            Dialect::TypeScript
        }
    }
}

pub fn can_parse(path: &str) -> bool {
    SOURCE_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}

/// Parse one file into its import/export/function/class inventory.
///
/// Never panics and never returns an error to the caller: syntax errors
/// become a failed [`ParsedFile`] carrying the parser's message. Pure —
/// identical input always yields an identical result.
pub fn parse(content: &str, path: &str) -> ParsedFile {
    match typescript::parse_source(content, Dialect::from_path(path)) {
        Ok(source) => ParsedFile::parsed(path, source),
        Err(error) => ParsedFile::failed(path, error),
    }
}

/// Parse and return just the inventory; used by tests that do not care
/// about the path wrapper.
#[cfg(test)]
pub(crate) fn parse_ok(content: &str, path: &str) -> ParsedSource {
    match parse(content, path).outcome {
        crate::model::ParseOutcome::Parsed(source) => source,
        crate::model::ParseOutcome::Failed { error } => {
            panic!("expected successful parse of {path}: {error}")
        }
    }
}

/// Macro to define a thread-local tree-sitter parser for a grammar.
/// Usage: `define_parser!(PARSER_NAME, language_fn)`
#[macro_export]
macro_rules! define_parser {
    ($name:ident, $language:expr) => {
        thread_local! {
            static $name: std::cell::RefCell<tree_sitter::Parser> = std::cell::RefCell::new({
                let mut parser = tree_sitter::Parser::new();
                parser.set_language(&$language.into()).expect(concat!("Failed to set ", stringify!($name), " language"));
                parser
            });
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ExportKind, ImportKind, ParseOutcome, Specifier};

    #[test]
    fn eligibility_filter_matches_source_extensions() {
        assert!(can_parse("src/index.ts"));
        assert!(can_parse("src/App.tsx"));
        assert!(can_parse("lib/util.mjs"));
        assert!(!can_parse("README.md"));
        assert!(!can_parse("assets/logo.svg"));
        assert!(!can_parse("tsconfig.json"));
    }

    #[test]
    fn default_import_yields_default_specifier() {
        let source = parse_ok(r#"import Foo from "./foo";"#, "src/a.ts");

        assert_eq!(source.imports.len(), 1);
        let import = &source.imports[0];
        assert_eq!(import.source, "./foo");
        assert_eq!(import.kind, ImportKind::Import);
        assert_eq!(import.specifiers, vec![Specifier::Default("Foo".into())]);
        assert!(import.has_default_import());
    }

    #[test]
    fn namespace_import_displays_star_as() {
        let source = parse_ok(r#"import * as path from "path";"#, "src/a.ts");

        let import = &source.imports[0];
        assert_eq!(import.specifiers, vec![Specifier::Namespace("path".into())]);
        assert_eq!(import.specifiers[0].to_string(), "* as path");
        assert!(!import.has_default_import());
    }

    #[test]
    fn named_imports_keep_imported_not_local_name() {
        let source = parse_ok(r#"import { bar as localBar, baz } from "./lib";"#, "src/a.ts");

        let import = &source.imports[0];
        assert_eq!(
            import.specifiers,
            vec![Specifier::Named("bar".into()), Specifier::Named("baz".into())]
        );
    }

    #[test]
    fn mixed_default_and_named_import() {
        let source = parse_ok(r#"import React, { useState } from "react";"#, "src/App.jsx");

        let import = &source.imports[0];
        assert_eq!(
            import.specifiers,
            vec![
                Specifier::Default("React".into()),
                Specifier::Named("useState".into()),
            ]
        );
        assert!(import.has_default_import());
    }

    #[test]
    fn require_assignment_yields_require_kind() {
        let source = parse_ok(r#"const express = require("express");"#, "server.cjs");

        let import = &source.imports[0];
        assert_eq!(import.source, "express");
        assert_eq!(import.kind, ImportKind::Require);
        assert_eq!(import.specifiers, vec![Specifier::Named("express".into())]);
        assert!(!import.has_default_import());
    }

    #[test]
    fn side_effect_import_has_no_specifiers() {
        let source = parse_ok(r#"import "./styles.css";"#, "src/a.ts");

        assert_eq!(source.imports.len(), 1);
        assert!(source.imports[0].specifiers.is_empty());
    }

    #[test]
    fn default_export_records_default_name() {
        let source = parse_ok("const foo = 1;\nexport default foo;\n", "src/a.ts");

        assert_eq!(source.exports.len(), 1);
        assert_eq!(source.exports[0].name, "default");
        assert_eq!(source.exports[0].kind, ExportKind::Default);
    }

    #[test]
    fn named_export_specifiers_use_public_name() {
        let source = parse_ok(
            "const a = 1;\nconst b = 2;\nexport { a, b as publicB };\n",
            "src/a.ts",
        );

        let names: Vec<&str> = source.exports.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["a", "publicB"]);
        assert!(source.exports.iter().all(|e| e.kind == ExportKind::Named));
    }

    #[test]
    fn exported_function_appears_in_exports_and_inventory() {
        let source = parse_ok(
            "export function build() {}\nexport class Widget {}\n",
            "src/a.ts",
        );

        let export_names: Vec<&str> = source.exports.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(export_names, vec!["build", "Widget"]);
        assert_eq!(source.functions, vec!["build"]);
        assert_eq!(source.classes, vec!["Widget"]);
    }

    #[test]
    fn top_level_declarations_are_inventoried() {
        let source = parse_ok(
            "function helper() {}\nclass Store {}\nconst arrow = () => {};\n",
            "src/a.ts",
        );

        assert_eq!(source.functions, vec!["helper"]);
        assert_eq!(source.classes, vec!["Store"]);
    }

    #[test]
    fn syntax_error_becomes_failure_result() {
        let result = parse("function foo( {", "src/broken.ts");

        match result.outcome {
            ParseOutcome::Failed { error } => {
                assert!(error.contains("Syntax error"), "unexpected message: {error}");
            }
            ParseOutcome::Parsed(_) => panic!("expected a parse failure"),
        }
    }

    #[test]
    fn parse_is_idempotent() {
        let content = r#"
import Foo from "./foo";
import { bar } from "@/lib/bar";

export function run() {}
"#;
        let first = parse(content, "src/a.tsx");
        let second = parse(content, "src/a.tsx");
        assert_eq!(first, second);
    }

    #[test]
    fn tsx_markup_parses() {
        let source = parse_ok(
            "import Logo from \"./logo\";\nexport function Header() { return <div><Logo /></div>; }\n",
            "src/Header.tsx",
        );

        assert_eq!(source.imports[0].source, "./logo");
        assert_eq!(source.functions, vec!["Header"]);
    }
}
