//! Scope binding
//!
//! Walks each syntax tree once, creating lexical scopes and declaring every
//! binding name in the scope it belongs to. Import bindings are recorded as
//! aliases of another module's export; export tables are collected per file.

use std::collections::HashMap;
use std::path::PathBuf;

use tree_sitter::Node;

use crate::infra::ast::{self, node_types};
use crate::models::symbol::{SymbolId, SymbolKind, TextSpan};

use super::program::SourceFile;

/// What an import binding stands for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AliasTarget {
    /// A named export (`default` for default imports) of a module
    Export {
        module: Option<PathBuf>,
        name: String,
    },
    /// The whole module (`import * as ns`, `export * as ns`, `import x = require()`)
    Namespace { module: Option<PathBuf> },
}

#[derive(Debug, Clone)]
pub struct SymbolData {
    pub name: String,
    pub kind: SymbolKind,
    /// Declared names, in binding order
    pub declarations: Vec<TextSpan>,
    pub alias: Option<AliasTarget>,
}

#[derive(Debug, Default)]
pub struct SymbolTable {
    symbols: Vec<SymbolData>,
}

impl SymbolTable {
    pub fn get(&self, id: SymbolId) -> &SymbolData {
        &self.symbols[id.index()]
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = SymbolId> {
        (0..self.symbols.len() as u32).map(SymbolId)
    }

    fn push(&mut self, data: SymbolData) -> SymbolId {
        let id = SymbolId(self.symbols.len() as u32);
        self.symbols.push(data);
        id
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportEntry {
    /// Exported under a name bound in the module scope
    Local(String),
    /// Exported symbol with no module-scope binding (`export * as ns from`)
    Symbol(SymbolId),
    ReExport {
        module: Option<PathBuf>,
        name: String,
    },
}

#[derive(Debug, Default)]
pub struct Scope {
    pub parent: Option<usize>,
    pub names: HashMap<String, SymbolId>,
    /// `var` declarations land in the nearest scope with this flag
    hoist_target: bool,
}

#[derive(Debug, Default)]
pub struct FileBinding {
    pub scopes: Vec<Scope>,
    /// Scope opened by a node, keyed by node id
    pub scope_by_node: HashMap<usize, usize>,
    /// Declared name start offset -> symbol
    pub declarations: HashMap<usize, SymbolId>,
    pub exports: HashMap<String, ExportEntry>,
    pub star_exports: Vec<Option<PathBuf>>,
}

impl FileBinding {
    pub const MODULE_SCOPE: usize = 0;

    /// Resolve `name` starting at `scope` and walking outwards
    pub fn lookup(&self, mut scope: usize, name: &str) -> Option<SymbolId> {
        loop {
            let current = self.scopes.get(scope)?;
            if let Some(id) = current.names.get(name) {
                return Some(*id);
            }
            scope = current.parent?;
        }
    }
}

pub fn bind_file(file: &SourceFile, table: &mut SymbolTable) -> FileBinding {
    let mut binder = Binder {
        file,
        table,
        binding: FileBinding::default(),
    };
    binder.run();
    binder.binding
}

struct Binder<'a> {
    file: &'a SourceFile,
    table: &'a mut SymbolTable,
    binding: FileBinding,
}

impl<'a> Binder<'a> {
    fn run(&mut self) {
        let file = self.file;
        let root = file.tree.root_node();
        let module_scope = self.new_scope(root, None, true);

        let mut stack: Vec<(Node<'a>, usize)> = vec![(root, module_scope)];
        while let Some((node, scope)) = stack.pop() {
            let inner = if node.id() == root.id() {
                module_scope
            } else if node_types::opens_scope(node.kind()) {
                self.new_scope(node, Some(scope), self.is_hoist_target(node))
            } else {
                scope
            };

            self.bind_node(node, scope, inner);

            let mut cursor = node.walk();
            let children: Vec<Node<'a>> = node.named_children(&mut cursor).collect();
            for child in children.into_iter().rev() {
                stack.push((child, inner));
            }
        }
    }

    fn new_scope(&mut self, node: Node<'_>, parent: Option<usize>, hoist_target: bool) -> usize {
        let index = self.binding.scopes.len();
        self.binding.scopes.push(Scope {
            parent,
            names: HashMap::new(),
            hoist_target,
        });
        self.binding.scope_by_node.insert(node.id(), index);
        index
    }

    fn is_hoist_target(&self, node: Node<'_>) -> bool {
        if node_types::is_function_like(node.kind()) {
            return true;
        }
        node.kind() == "statement_block"
            && node
                .parent()
                .is_some_and(|p| matches!(p.kind(), "internal_module" | "module"))
    }

    fn hoisted(&self, mut scope: usize) -> usize {
        loop {
            let current = &self.binding.scopes[scope];
            match current.parent {
                Some(parent) if !current.hoist_target => scope = parent,
                _ => return scope,
            }
        }
    }

    fn text(&self, node: Node<'_>) -> &'a str {
        ast::node_text(node, &self.file.text)
    }

    /// `outer` is the scope the node appears in, `inner` the scope it opens (or `outer`)
    fn bind_node(&mut self, node: Node<'a>, outer: usize, inner: usize) {
        let name = node.child_by_field_name("name");
        match node.kind() {
            "function_declaration" | "generator_function_declaration" | "function_signature" => {
                if let Some(name) = name {
                    self.declare(outer, name, SymbolKind::Function);
                }
            }
            "function_expression" | "generator_function" => {
                if let Some(name) = name {
                    self.declare(inner, name, SymbolKind::Function);
                }
            }
            "arrow_function" => {
                if let Some(param) = node.child_by_field_name("parameter") {
                    self.declare(inner, param, SymbolKind::Parameter);
                }
            }
            "class_declaration" | "abstract_class_declaration" => {
                if let Some(name) = name {
                    self.declare(outer, name, SymbolKind::Class);
                }
            }
            "class" => {
                if let Some(name) = name {
                    self.declare(inner, name, SymbolKind::Class);
                }
            }
            "interface_declaration" => {
                if let Some(name) = name {
                    self.declare(outer, name, SymbolKind::Interface);
                }
            }
            "type_alias_declaration" => {
                if let Some(name) = name {
                    self.declare(outer, name, SymbolKind::TypeAlias);
                }
            }
            "enum_declaration" => {
                if let Some(name) = name {
                    self.declare(outer, name, SymbolKind::Enum);
                }
            }
            "internal_module" | "module" => {
                if let Some(name) = name.and_then(namespace_head) {
                    self.declare(outer, name, SymbolKind::Namespace);
                }
            }
            "variable_declarator" => {
                let target = match node.parent().map(|p| p.kind()) {
                    Some("variable_declaration") => self.hoisted(outer),
                    _ => outer,
                };
                if let Some(name) = name {
                    self.bind_pattern(name, target, SymbolKind::Variable);
                }
            }
            "required_parameter" | "optional_parameter" => {
                if let Some(pattern) = node.child_by_field_name("pattern") {
                    self.bind_pattern(pattern, outer, SymbolKind::Parameter);
                }
            }
            "type_parameter" | "mapped_type_clause" => {
                if let Some(name) = name {
                    self.declare(outer, name, SymbolKind::TypeParameter);
                }
            }
            "index_signature" => {
                let mut cursor = node.walk();
                let key = node
                    .named_children(&mut cursor)
                    .find(|c| c.kind() == "identifier");
                if let Some(key) = key {
                    self.declare(inner, key, SymbolKind::Parameter);
                }
            }
            "catch_clause" => {
                if let Some(param) = node.child_by_field_name("parameter") {
                    self.bind_pattern(param, inner, SymbolKind::Variable);
                }
            }
            "for_in_statement" => {
                if let Some(kind) = node.child_by_field_name("kind")
                    && let Some(left) = node.child_by_field_name("left")
                {
                    let target = if self.text(kind) == "var" {
                        self.hoisted(outer)
                    } else {
                        inner
                    };
                    self.bind_pattern(left, target, SymbolKind::Variable);
                }
            }
            "import_statement" => self.bind_import(node, outer),
            "export_statement" => self.bind_export(node),
            _ => {}
        }
    }

    fn bind_pattern(&mut self, node: Node<'a>, scope: usize, kind: SymbolKind) {
        match node.kind() {
            "identifier" | "shorthand_property_identifier_pattern" => {
                self.declare(scope, node, kind);
            }
            "object_pattern" | "array_pattern" => {
                let mut cursor = node.walk();
                let children: Vec<Node<'a>> = node.named_children(&mut cursor).collect();
                for child in children {
                    self.bind_pattern(child, scope, kind);
                }
            }
            "pair_pattern" => {
                if let Some(value) = node.child_by_field_name("value") {
                    self.bind_pattern(value, scope, kind);
                }
            }
            "assignment_pattern" | "object_assignment_pattern" => {
                if let Some(left) = node.child_by_field_name("left") {
                    self.bind_pattern(left, scope, kind);
                }
            }
            "rest_pattern" => {
                if let Some(inner) = node.named_child(0) {
                    self.bind_pattern(inner, scope, kind);
                }
            }
            _ => {}
        }
    }

    fn declare(&mut self, scope: usize, name: Node<'a>, kind: SymbolKind) -> SymbolId {
        self.declare_with(scope, name, kind, None)
    }

    fn declare_with(
        &mut self,
        scope: usize,
        name: Node<'a>,
        kind: SymbolKind,
        alias: Option<AliasTarget>,
    ) -> SymbolId {
        if let Some(id) = self.binding.declarations.get(&name.start_byte()) {
            return *id;
        }

        let text = self.text(name);
        let span = TextSpan::new(&self.file.path, name.start_byte(), name.end_byte());
        let id = match self.binding.scopes[scope].names.get(text) {
            Some(id) => {
                let id = *id;
                self.table.symbols[id.index()].declarations.push(span);
                id
            }
            None => {
                let id = self.table.push(SymbolData {
                    name: text.to_string(),
                    kind,
                    declarations: vec![span],
                    alias,
                });
                self.binding.scopes[scope].names.insert(text.to_string(), id);
                id
            }
        };
        self.binding.declarations.insert(name.start_byte(), id);
        id
    }

    /// A symbol that has a declaration but no scope entry
    fn declare_detached(&mut self, name: Node<'a>, kind: SymbolKind, alias: AliasTarget) -> SymbolId {
        let id = self.table.push(SymbolData {
            name: self.text(name).to_string(),
            kind,
            declarations: vec![TextSpan::new(&self.file.path, name.start_byte(), name.end_byte())],
            alias: Some(alias),
        });
        self.binding.declarations.insert(name.start_byte(), id);
        id
    }

    fn module_of(&self, statement: Node<'_>) -> Option<PathBuf> {
        let source = statement.child_by_field_name("source")?;
        self.file.module_path(ast::string_value(source, &self.file.text))
    }

    fn bind_import(&mut self, node: Node<'a>, scope: usize) {
        let module = self.module_of(node);
        let mut cursor = node.walk();
        let children: Vec<Node<'a>> = node.named_children(&mut cursor).collect();

        for child in children {
            match child.kind() {
                "import_clause" => self.bind_import_clause(child, scope, &module),
                "import_require_clause" => {
                    let required = child
                        .child_by_field_name("source")
                        .or_else(|| find_named(child, "string"))
                        .and_then(|s| self.file.module_path(ast::string_value(s, &self.file.text)));
                    if let Some(name) = find_named(child, "identifier") {
                        let target = AliasTarget::Namespace { module: required };
                        self.declare_with(scope, name, SymbolKind::Namespace, Some(target));
                    }
                }
                _ => {}
            }
        }
    }

    fn bind_import_clause(&mut self, clause: Node<'a>, scope: usize, module: &Option<PathBuf>) {
        let mut cursor = clause.walk();
        let parts: Vec<Node<'a>> = clause.named_children(&mut cursor).collect();

        for part in parts {
            match part.kind() {
                "identifier" => {
                    let target = AliasTarget::Export {
                        module: module.clone(),
                        name: "default".to_string(),
                    };
                    self.declare_with(scope, part, SymbolKind::Import, Some(target));
                }
                "namespace_import" => {
                    if let Some(name) = find_named(part, "identifier") {
                        let target = AliasTarget::Namespace {
                            module: module.clone(),
                        };
                        self.declare_with(scope, name, SymbolKind::Namespace, Some(target));
                    }
                }
                "named_imports" => {
                    let mut cursor = part.walk();
                    let specifiers: Vec<Node<'a>> = part
                        .named_children(&mut cursor)
                        .filter(|s| s.kind() == "import_specifier")
                        .collect();
                    for specifier in specifiers {
                        let Some(imported) = specifier.child_by_field_name("name") else {
                            continue;
                        };
                        let local = specifier.child_by_field_name("alias").unwrap_or(imported);
                        let target = AliasTarget::Export {
                            module: module.clone(),
                            name: self.export_name(imported).to_string(),
                        };
                        self.declare_with(scope, local, SymbolKind::Import, Some(target));
                    }
                }
                _ => {}
            }
        }
    }

    fn export_name(&self, node: Node<'_>) -> &'a str {
        if node.kind() == "string" {
            ast::string_value(node, &self.file.text)
        } else {
            self.text(node)
        }
    }

    fn bind_export(&mut self, node: Node<'a>) {
        let source = node.child_by_field_name("source");
        let module = self.module_of(node);
        let is_default = ast::has_token(node, "default");

        if let Some(declaration) = node.child_by_field_name("declaration") {
            for name in declared_names(unwrap_ambient(declaration)) {
                let local = self.text(name).to_string();
                let exported = if is_default { "default".to_string() } else { local.clone() };
                self.binding.exports.insert(exported, ExportEntry::Local(local));
            }
            return;
        }

        if let Some(value) = node.child_by_field_name("value") {
            if is_default && value.kind() == "identifier" {
                let local = self.text(value).to_string();
                self.binding
                    .exports
                    .insert("default".to_string(), ExportEntry::Local(local));
            }
            return;
        }

        let mut cursor = node.walk();
        let children: Vec<Node<'a>> = node.named_children(&mut cursor).collect();
        let mut has_clause = false;

        for child in children {
            match child.kind() {
                "export_clause" => {
                    has_clause = true;
                    let mut cursor = child.walk();
                    let specifiers: Vec<Node<'a>> = child
                        .named_children(&mut cursor)
                        .filter(|s| s.kind() == "export_specifier")
                        .collect();
                    for specifier in specifiers {
                        let Some(name) = specifier.child_by_field_name("name") else {
                            continue;
                        };
                        let local = self.export_name(name).to_string();
                        let exported = specifier
                            .child_by_field_name("alias")
                            .map(|a| self.export_name(a).to_string())
                            .unwrap_or_else(|| local.clone());
                        let entry = match source {
                            Some(_) => ExportEntry::ReExport {
                                module: module.clone(),
                                name: local,
                            },
                            None => ExportEntry::Local(local),
                        };
                        self.binding.exports.insert(exported, entry);
                    }
                }
                "namespace_export" => {
                    has_clause = true;
                    let name =
                        find_named(child, "identifier").or_else(|| find_named(child, "string"));
                    if let Some(name) = name {
                        let target = AliasTarget::Namespace {
                            module: module.clone(),
                        };
                        let id = self.declare_detached(name, SymbolKind::Namespace, target);
                        let exported = self.export_name(name).to_string();
                        self.binding.exports.insert(exported, ExportEntry::Symbol(id));
                    }
                }
                _ => {}
            }
        }

        if source.is_some() && !has_clause {
            self.binding.star_exports.push(module);
        }
    }
}

/// First identifier of a possibly dotted namespace name (`A.B.C` declares `A`)
fn namespace_head(name: Node<'_>) -> Option<Node<'_>> {
    match name.kind() {
        "identifier" => Some(name),
        "nested_identifier" => {
            let mut current = name;
            while current.kind() == "nested_identifier" {
                current = current.named_child(0)?;
            }
            (current.kind() == "identifier").then_some(current)
        }
        _ => None,
    }
}

fn find_named<'t>(node: Node<'t>, kind: &str) -> Option<Node<'t>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor).find(|c| c.kind() == kind)
}

fn unwrap_ambient(node: Node<'_>) -> Node<'_> {
    if node.kind() == "ambient_declaration" {
        node.named_child(0).unwrap_or(node)
    } else {
        node
    }
}

/// Names a declaration introduces into its enclosing scope
fn declared_names(declaration: Node<'_>) -> Vec<Node<'_>> {
    match declaration.kind() {
        "lexical_declaration" | "variable_declaration" => {
            let mut names = Vec::new();
            let mut cursor = declaration.walk();
            for declarator in declaration.named_children(&mut cursor) {
                if declarator.kind() == "variable_declarator"
                    && let Some(pattern) = declarator.child_by_field_name("name")
                {
                    collect_pattern_names(pattern, &mut names);
                }
            }
            names
        }
        "internal_module" | "module" => declaration
            .child_by_field_name("name")
            .and_then(namespace_head)
            .into_iter()
            .collect(),
        _ => declaration.child_by_field_name("name").into_iter().collect(),
    }
}

fn collect_pattern_names<'t>(node: Node<'t>, out: &mut Vec<Node<'t>>) {
    match node.kind() {
        "identifier" | "shorthand_property_identifier_pattern" => out.push(node),
        "pair_pattern" => {
            if let Some(value) = node.child_by_field_name("value") {
                collect_pattern_names(value, out);
            }
        }
        "assignment_pattern" | "object_assignment_pattern" => {
            if let Some(left) = node.child_by_field_name("left") {
                collect_pattern_names(left, out);
            }
        }
        "object_pattern" | "array_pattern" | "rest_pattern" => {
            let mut cursor = node.walk();
            let children: Vec<Node<'t>> = node.named_children(&mut cursor).collect();
            for child in children {
                collect_pattern_names(child, out);
            }
        }
        _ => {}
    }
}
