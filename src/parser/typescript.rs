use super::Dialect;
use crate::define_parser;
use crate::model::{ExportKind, ExportStatement, ImportKind, ImportStatement, ParsedSource, Specifier};
use tree_sitter::Node;

define_parser!(TS_PARSER, tree_sitter_typescript::LANGUAGE_TYPESCRIPT);
define_parser!(TSX_PARSER, tree_sitter_typescript::LANGUAGE_TSX);

/// Parse source text with the dialect's grammar and walk the top level of
/// the tree. Returns the error message on a syntax error.
pub fn parse_source(content: &str, dialect: Dialect) -> Result<ParsedSource, String> {
    let tree = match dialect {
        Dialect::Tsx => TSX_PARSER.with(|parser| parser.borrow_mut().parse(content, None)),
        Dialect::TypeScript => TS_PARSER.with(|parser| parser.borrow_mut().parse(content, None)),
    }
    .ok_or_else(|| "Failed to parse file".to_string())?;

    let root = tree.root_node();
    if root.has_error() {
        return Err(syntax_error_message(root));
    }

    let source_bytes = content.as_bytes();
    let mut parsed = ParsedSource::default();

    let mut cursor = root.walk();
    for node in root.children(&mut cursor) {
        match node.kind() {
            "import_statement" => {
                if let Some(import) = extract_import(node, source_bytes) {
                    parsed.imports.push(import);
                }
            }
            "export_statement" => extract_export(node, source_bytes, &mut parsed),
            "function_declaration" => {
                if let Some(name) = field_text(node, "name", source_bytes) {
                    parsed.functions.push(name);
                }
            }
            "class_declaration" => {
                if let Some(name) = field_text(node, "name", source_bytes) {
                    parsed.classes.push(name);
                }
            }
            "lexical_declaration" | "variable_declaration" => {
                extract_requires(node, source_bytes, &mut parsed.imports);
            }
            _ => {}
        }
    }

    Ok(parsed)
}

/// Locate the first error in the tree and describe its position.
fn syntax_error_message(root: Node) -> String {
    fn first_error<'a>(node: Node<'a>) -> Option<Node<'a>> {
        if node.is_error() || node.is_missing() {
            return Some(node);
        }
        if !node.has_error() {
            return None;
        }
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if let Some(found) = first_error(child) {
                return Some(found);
            }
        }
        Some(node)
    }

    match first_error(root) {
        Some(err) => {
            let pos = err.start_position();
            format!("Syntax error at line {}, column {}", pos.row + 1, pos.column + 1)
        }
        None => "Syntax error".to_string(),
    }
}

fn extract_import(node: Node, source: &[u8]) -> Option<ImportStatement> {
    let module = string_literal(node.child_by_field_name("source")?, source);

    let mut specifiers = Vec::new();
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() != "import_clause" {
            continue;
        }
        let mut clause_cursor = child.walk();
        for clause_child in child.children(&mut clause_cursor) {
            match clause_child.kind() {
                // `import Foo from ...` — the bound local name.
                "identifier" => {
                    if let Some(name) = node_text(clause_child, source) {
                        specifiers.push(Specifier::Default(name));
                    }
                }
                // `import * as ns from ...`
                "namespace_import" => {
                    let mut ns_cursor = clause_child.walk();
                    for ns_child in clause_child.children(&mut ns_cursor) {
                        if ns_child.kind() == "identifier" {
                            if let Some(name) = node_text(ns_child, source) {
                                specifiers.push(Specifier::Namespace(name));
                            }
                        }
                    }
                }
                // `import { a, b as c } from ...` — the imported name, not
                // the local alias.
                "named_imports" => {
                    let mut named_cursor = clause_child.walk();
                    for spec in clause_child.children(&mut named_cursor) {
                        if spec.kind() == "import_specifier" {
                            if let Some(name) = field_text(spec, "name", source) {
                                specifiers.push(Specifier::Named(name));
                            }
                        }
                    }
                }
                _ => {}
            }
        }
    }

    Some(ImportStatement {
        source: module,
        specifiers,
        kind: ImportKind::Import,
    })
}

fn extract_export(node: Node, source: &[u8], parsed: &mut ParsedSource) {
    let mut cursor = node.walk();
    let is_default = node.children(&mut cursor).any(|c| c.kind() == "default");

    if is_default {
        parsed.exports.push(ExportStatement {
            name: "default".to_string(),
            kind: ExportKind::Default,
        });
        return;
    }

    // Directly exported declarations are both an export and part of the
    // function/class inventory.
    if let Some(declaration) = node.child_by_field_name("declaration") {
        match declaration.kind() {
            "function_declaration" => {
                if let Some(name) = field_text(declaration, "name", source) {
                    parsed.exports.push(ExportStatement {
                        name: name.clone(),
                        kind: ExportKind::Named,
                    });
                    parsed.functions.push(name);
                }
            }
            "class_declaration" => {
                if let Some(name) = field_text(declaration, "name", source) {
                    parsed.exports.push(ExportStatement {
                        name: name.clone(),
                        kind: ExportKind::Named,
                    });
                    parsed.classes.push(name);
                }
            }
            _ => {}
        }
    }

    // `export { a, b as c }` — the exported (public) name wins.
    let mut clause_cursor = node.walk();
    for child in node.children(&mut clause_cursor) {
        if child.kind() != "export_clause" {
            continue;
        }
        let mut spec_cursor = child.walk();
        for spec in child.children(&mut spec_cursor) {
            if spec.kind() != "export_specifier" {
                continue;
            }
            let name = field_text(spec, "alias", source).or_else(|| field_text(spec, "name", source));
            if let Some(name) = name {
                parsed.exports.push(ExportStatement {
                    name,
                    kind: ExportKind::Named,
                });
            }
        }
    }
}

/// `const x = require("mod")` — the variable name becomes the sole
/// specifier, with kind `require`.
fn extract_requires(node: Node, source: &[u8], imports: &mut Vec<ImportStatement>) {
    let mut cursor = node.walk();
    for declarator in node.children(&mut cursor) {
        if declarator.kind() != "variable_declarator" {
            continue;
        }
        let Some(value) = declarator.child_by_field_name("value") else {
            continue;
        };
        if value.kind() != "call_expression" {
            continue;
        }
        let callee = value
            .child_by_field_name("function")
            .filter(|f| f.kind() == "identifier")
            .and_then(|f| node_text(f, source));
        if callee.as_deref() != Some("require") {
            continue;
        }
        let Some(arguments) = value.child_by_field_name("arguments") else {
            continue;
        };
        let mut arg_cursor = arguments.walk();
        let Some(first_string) = arguments
            .children(&mut arg_cursor)
            .find(|a| a.kind() == "string")
        else {
            continue;
        };

        let name = declarator
            .child_by_field_name("name")
            .filter(|n| n.kind() == "identifier")
            .and_then(|n| node_text(n, source))
            .unwrap_or_else(|| "unknown".to_string());

        imports.push(ImportStatement {
            source: string_literal(first_string, source),
            specifiers: vec![Specifier::Named(name)],
            kind: ImportKind::Require,
        });
    }
}

fn node_text(node: Node, source: &[u8]) -> Option<String> {
    node.utf8_text(source).ok().map(str::to_string)
}

fn field_text(node: Node, field: &str, source: &[u8]) -> Option<String> {
    node.child_by_field_name(field)
        .and_then(|child| node_text(child, source))
}

fn string_literal(node: Node, source: &[u8]) -> String {
    node.utf8_text(source)
        .unwrap_or("")
        .trim_matches(|c| c == '"' || c == '\'' || c == '`')
        .to_string()
}
