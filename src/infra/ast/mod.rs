//! AST parsing infrastructure for lscode
//!
//! Tree-sitter based parsing of TypeScript and JavaScript sources, plus the
//! small set of tree navigation helpers the binder and locator share.

pub mod node_types;

use std::path::Path;

use tree_sitter::{Language, Node, Parser, Tree};

use crate::error::AnalysisError;

pub use node_types::{NodeType, is_declaration_construct, is_identifier, opens_scope};

/// Grammar flavour used for a source file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    TypeScript,
    /// TSX grammar (a superset that also accepts JSX), used for .tsx and JavaScript
    Tsx,
}

impl Dialect {
    pub fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("ts" | "mts" | "cts") => Self::TypeScript,
            _ => Self::Tsx,
        }
    }

    pub fn language(self) -> Language {
        match self {
            Self::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Self::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
        }
    }
}

pub fn create_parser(dialect: Dialect) -> Result<Parser, AnalysisError> {
    let mut parser = Parser::new();
    parser
        .set_language(&dialect.language())
        .map_err(|e| AnalysisError::Language(e.to_string()))?;
    Ok(parser)
}

pub fn parse(parser: &mut Parser, path: &Path, text: &str) -> Result<Tree, AnalysisError> {
    parser.parse(text, None).ok_or_else(|| AnalysisError::Parse {
        file: path.to_path_buf(),
        message: "parser returned no tree".to_string(),
    })
}

/// Deepest node whose span contains `offset` (start inclusive, end exclusive)
pub fn node_at_offset(root: Node<'_>, offset: usize) -> Option<Node<'_>> {
    if offset < root.start_byte() || offset >= root.end_byte() {
        return None;
    }

    let mut current = root;
    loop {
        let next = {
            let mut cursor = current.walk();
            current
                .children(&mut cursor)
                .find(|child| child.start_byte() <= offset && offset < child.end_byte())
        };
        match next {
            Some(child) => current = child,
            None => return Some(current),
        }
    }
}

/// Source text covered by `node`
pub fn node_text<'a>(node: Node<'_>, text: &'a str) -> &'a str {
    text.get(node.start_byte()..node.end_byte()).unwrap_or("")
}

/// Name of the field under which `node` hangs off its parent
pub fn field_name_of(node: Node<'_>) -> Option<&'static str> {
    let parent = node.parent()?;
    let mut cursor = parent.walk();
    if !cursor.goto_first_child() {
        return None;
    }
    loop {
        if cursor.node().id() == node.id() {
            return cursor.field_name();
        }
        if !cursor.goto_next_sibling() {
            return None;
        }
    }
}

/// Contents of a string literal node without its quotes
pub fn string_value<'a>(node: Node<'_>, text: &'a str) -> &'a str {
    node_text(node, text).trim_matches(|c| c == '"' || c == '\'' || c == '`')
}

/// Whether `node` carries an anonymous child token with the given text (e.g. `default`)
pub fn has_token(node: Node<'_>, token: &str) -> bool {
    let mut cursor = node.walk();
    node.children(&mut cursor)
        .any(|child| !child.is_named() && child.kind() == token)
}
