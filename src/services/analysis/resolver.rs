//! Reference resolution
//!
//! Maps every identifier occurrence in the program to the symbol it denotes.
//! Import aliases are followed through export tables to the declaration they
//! stand for, so all occurrences of one logical symbol share a canonical id.

use std::collections::HashSet;
use std::path::Path;

use tree_sitter::Node;

use crate::infra::ast::{self, node_types};
use crate::models::symbol::SymbolId;

use super::binder::{AliasTarget, ExportEntry, FileBinding, SymbolTable};
use super::program::{Program, SourceFile};

/// One resolved identifier occurrence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occurrence {
    pub start: usize,
    pub end: usize,
    /// Canonical symbol (aliases followed)
    pub symbol: SymbolId,
    /// Symbol bound at this position before alias resolution
    pub local: SymbolId,
    pub is_declaration: bool,
}

pub struct Resolver<'p> {
    program: &'p Program,
    table: &'p SymbolTable,
    bindings: &'p [FileBinding],
}

impl<'p> Resolver<'p> {
    pub fn new(program: &'p Program, table: &'p SymbolTable, bindings: &'p [FileBinding]) -> Self {
        Self {
            program,
            table,
            bindings,
        }
    }

    /// Canonical id for every symbol in the table
    pub fn canonical_ids(&self) -> Vec<SymbolId> {
        self.table
            .ids()
            .map(|id| self.follow(id, &mut HashSet::new()))
            .collect()
    }

    fn follow(&self, id: SymbolId, visited: &mut HashSet<(usize, String)>) -> SymbolId {
        match &self.table.get(id).alias {
            Some(AliasTarget::Export {
                module: Some(module),
                name,
            }) => self.resolve_export(module, name, visited).unwrap_or(id),
            _ => id,
        }
    }

    /// Canonical symbol exported as `name` from `module`
    pub fn resolve_export(
        &self,
        module: &Path,
        name: &str,
        visited: &mut HashSet<(usize, String)>,
    ) -> Option<SymbolId> {
        let file = self.program.index_of(module)?;
        if !visited.insert((file, name.to_string())) {
            return None;
        }
        let binding = &self.bindings[file];

        match binding.exports.get(name) {
            Some(ExportEntry::Local(local)) => {
                let id = binding.lookup(FileBinding::MODULE_SCOPE, local)?;
                Some(self.follow(id, visited))
            }
            Some(ExportEntry::Symbol(id)) => Some(self.follow(*id, visited)),
            Some(ExportEntry::ReExport {
                module: Some(target),
                name: target_name,
            }) => self.resolve_export(target, target_name, visited),
            Some(ExportEntry::ReExport { module: None, .. }) => None,
            None if name == "default" => None,
            None => binding
                .star_exports
                .iter()
                .flatten()
                .find_map(|star| self.resolve_export(star, name, visited)),
        }
    }

    /// All occurrences in file `index`, in ascending offset order
    pub fn resolve_file(&self, index: usize, canonical: &[SymbolId]) -> Vec<Occurrence> {
        let file = &self.program.files()[index];
        let binding = &self.bindings[index];
        let root = file.tree.root_node();

        let mut occurrences = Vec::new();
        let mut stack: Vec<(Node<'_>, usize)> = vec![(root, FileBinding::MODULE_SCOPE)];

        while let Some((node, scope)) = stack.pop() {
            let scope = binding.scope_by_node.get(&node.id()).copied().unwrap_or(scope);

            if let Some(occurrence) = self.resolve_node(node, scope, file, binding, canonical) {
                occurrences.push(occurrence);
            }

            let mut cursor = node.walk();
            let children: Vec<Node<'_>> = node.named_children(&mut cursor).collect();
            for child in children.into_iter().rev() {
                stack.push((child, scope));
            }
        }

        occurrences.sort_by_key(|o| o.start);
        occurrences
    }

    fn resolve_node(
        &self,
        node: Node<'_>,
        scope: usize,
        file: &SourceFile,
        binding: &FileBinding,
        canonical: &[SymbolId],
    ) -> Option<Occurrence> {
        let text: &str = &file.text;
        let kind = node.kind();
        let is_property = kind == "property_identifier";
        if !node_types::is_identifier(kind) && !is_property {
            return None;
        }

        let occurrence = |local: SymbolId, symbol: SymbolId, is_declaration: bool| Occurrence {
            start: node.start_byte(),
            end: node.end_byte(),
            symbol,
            local,
            is_declaration,
        };

        if !is_property && let Some(id) = binding.declarations.get(&node.start_byte()) {
            return Some(occurrence(*id, canonical[id.index()], true));
        }

        let parent = node.parent()?;
        let field = ast::field_name_of(node);
        let name = ast::node_text(node, text);

        match (parent.kind(), field) {
            // `ns.member` where `ns` is a namespace import
            ("member_expression", Some("property")) | ("nested_type_identifier", Some("name")) => {
                let head_field = if parent.kind() == "member_expression" {
                    "object"
                } else {
                    "module"
                };
                let head = parent.child_by_field_name(head_field)?;
                if head.kind() != "identifier" {
                    return None;
                }
                let ns = binding.lookup(scope, ast::node_text(head, text))?;
                let Some(AliasTarget::Namespace {
                    module: Some(module),
                }) = &self.table.get(ns).alias
                else {
                    return None;
                };
                let id = self.resolve_export(module, name, &mut HashSet::new())?;
                Some(occurrence(id, id, false))
            }
            _ if is_property => None,
            // `{ add as plus }`: the imported name refers to the exported symbol
            ("import_specifier", Some("name")) => {
                let alias = parent.child_by_field_name("alias")?;
                let local = *binding.declarations.get(&alias.start_byte())?;
                Some(occurrence(local, canonical[local.index()], false))
            }
            ("export_specifier", _) => {
                let exported = parent.child_by_field_name("name")?;
                let exported_name = ast::node_text(exported, text);
                let statement = parent.parent().and_then(|clause| clause.parent())?;
                let id = match statement.child_by_field_name("source") {
                    Some(source) => {
                        let module = file.module_path(ast::string_value(source, text))?;
                        self.resolve_export(&module, exported_name, &mut HashSet::new())?
                    }
                    None => {
                        let local = binding.lookup(scope, exported_name)?;
                        canonical[local.index()]
                    }
                };
                Some(occurrence(id, id, false))
            }
            _ => {
                let local = binding.lookup(scope, name)?;
                Some(occurrence(local, canonical[local.index()], false))
            }
        }
    }
}
