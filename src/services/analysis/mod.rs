//! Source analysis engine
//!
//! The capability the locator and navigation queries are written against:
//! parse files, resolve an identifier to the symbol it denotes, and answer
//! reference/definition queries for a resolved symbol. `SyntaxEngine` is the
//! tree-sitter implementation that ships with lscode.

pub mod binder;
pub mod program;
pub mod resolver;

use std::path::Path;

use crate::error::{AnalysisError, LscodeResult};
use crate::infra::ast::{self, node_types};
use crate::infra::source_cache::SourceCache;
use crate::infra::text::LineIndex;
use crate::models::project::ProjectSettings;
use crate::models::symbol::{SymbolId, SymbolKind, TextSpan};

use binder::{FileBinding, SymbolTable};
use program::{LoadOptions, Program};
use resolver::{Occurrence, Resolver};

/// Smallest syntax node at an offset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: &'static str,
    pub is_identifier: bool,
    pub start: usize,
    pub end: usize,
}

/// Symbol an identifier occurrence resolves to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSymbol {
    /// Canonical identity, equal for every occurrence of one logical symbol
    pub id: SymbolId,
    /// Name bound at the occurrence (an import alias keeps its local name)
    pub name: String,
    pub kind: SymbolKind,
    /// First declaration of the locally bound symbol
    pub declaration: TextSpan,
    /// Whether the occurrence is itself a declared name
    pub is_declaration: bool,
}

pub trait AnalysisEngine {
    fn source_text(&self, file: &Path) -> Option<&str>;

    fn line_index(&self, file: &Path) -> Option<&LineIndex>;

    fn token_at(&self, file: &Path, offset: usize) -> Option<Token>;

    fn symbol_at(&self, file: &Path, offset: usize) -> Option<ResolvedSymbol>;

    /// Every occurrence of `symbol`, declarations included
    fn find_references(&self, symbol: SymbolId) -> Vec<TextSpan>;

    fn find_definitions(&self, symbol: SymbolId) -> Vec<TextSpan>;

    /// Source of the smallest declaration construct enclosing `span`
    fn definition_code(&self, span: &TextSpan) -> Option<String>;
}

pub struct SyntaxEngine {
    program: Program,
    table: SymbolTable,
    canonical: Vec<SymbolId>,
    /// Per file, sorted by start offset
    occurrences: Vec<Vec<Occurrence>>,
}

impl SyntaxEngine {
    pub fn load(
        settings: &ProjectSettings,
        cache: &mut SourceCache,
        options: LoadOptions,
    ) -> LscodeResult<Self> {
        let program = Program::load(settings, cache, options)?;

        let mut table = SymbolTable::default();
        let bindings: Vec<FileBinding> = program
            .files()
            .iter()
            .map(|file| binder::bind_file(file, &mut table))
            .collect();

        let resolver = Resolver::new(&program, &table, &bindings);
        let canonical = resolver.canonical_ids();
        let occurrences: Vec<Vec<Occurrence>> = (0..program.files().len())
            .map(|index| resolver.resolve_file(index, &canonical))
            .collect();

        tracing::debug!(
            "Bound {} symbols, {} occurrences",
            table.len(),
            occurrences.iter().map(Vec::len).sum::<usize>()
        );

        Ok(Self {
            program,
            table,
            canonical,
            occurrences,
        })
    }

    /// Fails when `file` did not make it into the program
    pub fn require_file(&self, file: &Path) -> Result<(), AnalysisError> {
        match self.program.index_of(file) {
            Some(_) => Ok(()),
            None => Err(AnalysisError::FileNotLoaded(file.to_path_buf())),
        }
    }

    fn occurrence_at(&self, file: &Path, offset: usize) -> Option<&Occurrence> {
        let occurrences = &self.occurrences[self.program.index_of(file)?];
        let next = occurrences.partition_point(|o| o.start <= offset);
        let candidate = occurrences.get(next.checked_sub(1)?)?;
        (offset < candidate.end).then_some(candidate)
    }

    fn declaring_file(&self, symbol: SymbolId) -> Option<usize> {
        let first = self.table.get(symbol).declarations.first()?;
        self.program.index_of(&first.file)
    }
}

impl AnalysisEngine for SyntaxEngine {
    fn source_text(&self, file: &Path) -> Option<&str> {
        self.program.file(file).map(|f| &*f.text)
    }

    fn line_index(&self, file: &Path) -> Option<&LineIndex> {
        self.program.file(file).map(|f| &f.line_index)
    }

    fn token_at(&self, file: &Path, offset: usize) -> Option<Token> {
        let source = self.program.file(file)?;
        let node = ast::node_at_offset(source.tree.root_node(), offset)?;
        Some(Token {
            kind: node.kind(),
            is_identifier: node_types::is_identifier(node.kind()),
            start: node.start_byte(),
            end: node.end_byte(),
        })
    }

    fn symbol_at(&self, file: &Path, offset: usize) -> Option<ResolvedSymbol> {
        let occurrence = self.occurrence_at(file, offset)?;
        let local = self.table.get(occurrence.local);
        Some(ResolvedSymbol {
            id: occurrence.symbol,
            name: local.name.clone(),
            kind: self.table.get(occurrence.symbol).kind,
            declaration: local.declarations.first()?.clone(),
            is_declaration: occurrence.is_declaration,
        })
    }

    fn find_references(&self, symbol: SymbolId) -> Vec<TextSpan> {
        let symbol = self.canonical.get(symbol.index()).copied().unwrap_or(symbol);
        let count = self.program.files().len();

        let first = self.declaring_file(symbol);
        let order = first
            .into_iter()
            .chain((0..count).filter(|i| Some(*i) != first));

        let mut spans = Vec::new();
        for index in order {
            let path = &self.program.files()[index].path;
            spans.extend(
                self.occurrences[index]
                    .iter()
                    .filter(|o| o.symbol == symbol)
                    .map(|o| TextSpan::new(path, o.start, o.end)),
            );
        }
        spans
    }

    fn find_definitions(&self, symbol: SymbolId) -> Vec<TextSpan> {
        let symbol = self.canonical.get(symbol.index()).copied().unwrap_or(symbol);
        self.table.get(symbol).declarations.clone()
    }

    fn definition_code(&self, span: &TextSpan) -> Option<String> {
        let source = self.program.file(&span.file)?;
        let text: &str = &source.text;
        let fallback = || text.get(span.start..span.end).map(str::to_string);

        let Some(mut node) = ast::node_at_offset(source.tree.root_node(), span.start) else {
            return fallback();
        };
        while !node_types::is_declaration_construct(node.kind()) {
            match node.parent() {
                Some(parent) => node = parent,
                None => return fallback(),
            }
        }
        while let Some(parent) = node.parent()
            && node_types::DECLARATION_WRAPPERS.contains(&parent.kind())
        {
            node = parent;
        }
        tracing::trace!(
            "Definition construct: {} ({})",
            node.kind(),
            node_types::category_of(node.kind()).unwrap_or("wrapper")
        );

        Some(ast::node_text(node, text).to_string())
    }
}
