//! Tree-sitter Node Type Tables
//!
//! Verified node kinds from `tree-sitter-typescript/typescript/src/node-types.json`
//! (the TSX grammar shares them), grouped by the role they play in binding.

/// Node type mapping entry
#[derive(Debug, Clone, Copy)]
pub struct NodeType {
    /// User-friendly category name
    pub category: &'static str,
    /// Actual tree-sitter node type
    pub node_type: &'static str,
    /// Example syntax
    pub example: &'static str,
}

impl NodeType {
    const fn new(category: &'static str, node_type: &'static str, example: &'static str) -> Self {
        Self {
            category,
            node_type,
            example,
        }
    }
}

// =============================================================================
// Declaration constructs reported as definition code
// =============================================================================
pub const DECLARATION_CONSTRUCTS: &[NodeType] = &[
    NodeType::new("variable", "lexical_declaration", "const/let x = ..."),
    NodeType::new("variable", "variable_declaration", "var x = ..."),
    NodeType::new("function", "function_declaration", "function f() {}"),
    NodeType::new("function", "generator_function_declaration", "function* g() {}"),
    NodeType::new("function", "function_signature", "function f(): void;"),
    NodeType::new("class", "class_declaration", "class C {}"),
    NodeType::new("class", "abstract_class_declaration", "abstract class C {}"),
    NodeType::new("interface", "interface_declaration", "interface I {}"),
    NodeType::new("type", "type_alias_declaration", "type T = ..."),
    NodeType::new("enum", "enum_declaration", "enum E {}"),
    NodeType::new("method", "method_definition", "m() {}"),
    NodeType::new("method", "method_signature", "m(): void;"),
    NodeType::new("method", "abstract_method_signature", "abstract m(): void;"),
    NodeType::new("property", "public_field_definition", "x = 1;"),
    NodeType::new("property", "property_signature", "x: number;"),
];

/// Wrappers a declaration construct is widened to when it is their direct child
pub const DECLARATION_WRAPPERS: &[&str] = &["export_statement", "ambient_declaration"];

/// Nodes that own a parameter list and open a function scope
pub const FUNCTION_LIKE: &[&str] = &[
    "function_declaration",
    "generator_function_declaration",
    "function_signature",
    "function_expression",
    "generator_function",
    "arrow_function",
    "method_definition",
    "method_signature",
    "abstract_method_signature",
    "call_signature",
    "construct_signature",
    "function_type",
    "constructor_type",
];

/// Nodes that open a plain lexical scope
pub const BLOCK_SCOPES: &[&str] = &[
    "program",
    "statement_block",
    "switch_body",
    "for_statement",
    "for_in_statement",
    "catch_clause",
    "index_signature",
];

/// Declarations that own type parameters and open a scope for them
pub const TYPE_PARAMETER_OWNERS: &[&str] = &[
    "class_declaration",
    "abstract_class_declaration",
    "class",
    "interface_declaration",
    "type_alias_declaration",
];

/// Leaf kinds that name a binding or refer to one
pub const IDENTIFIER_KINDS: &[&str] = &[
    "identifier",
    "type_identifier",
    "shorthand_property_identifier",
    "shorthand_property_identifier_pattern",
];

pub fn is_declaration_construct(kind: &str) -> bool {
    DECLARATION_CONSTRUCTS.iter().any(|n| n.node_type == kind)
}

pub fn is_function_like(kind: &str) -> bool {
    FUNCTION_LIKE.contains(&kind)
}

pub fn is_block_scope(kind: &str) -> bool {
    BLOCK_SCOPES.contains(&kind)
}

pub fn is_type_parameter_owner(kind: &str) -> bool {
    TYPE_PARAMETER_OWNERS.contains(&kind)
}

pub fn is_identifier(kind: &str) -> bool {
    IDENTIFIER_KINDS.contains(&kind)
}

/// Whether a node of this kind gets its own scope
pub fn opens_scope(kind: &str) -> bool {
    is_block_scope(kind) || is_function_like(kind) || is_type_parameter_owner(kind)
}

/// Category label for a declaration construct, used in log output
pub fn category_of(kind: &str) -> Option<&'static str> {
    DECLARATION_CONSTRUCTS
        .iter()
        .find(|n| n.node_type == kind)
        .map(|n| n.category)
}
