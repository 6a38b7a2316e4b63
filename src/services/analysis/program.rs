//! Program construction
//!
//! Loads the root files, follows their imports, and keeps every parsed
//! file together with its line table and resolved import specifiers.

use std::collections::{HashMap, HashSet, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use streaming_iterator::StreamingIterator;
use tree_sitter::{Parser, Query, QueryCursor, Tree};

use crate::error::{AnalysisError, LscodeResult};
use crate::infra::ast::{self, Dialect};
use crate::infra::module_resolution::ModuleResolver;
use crate::infra::normalize_path;
use crate::infra::source_cache::SourceCache;
use crate::infra::text::LineIndex;
use crate::models::project::ProjectSettings;

/// Static import and re-export sources
const IMPORT_QUERY: &str = r#"
(import_statement source: (string) @source)
(import_require_clause (string) @source)
(export_statement source: (string) @source)
"#;

pub struct SourceFile {
    pub path: PathBuf,
    pub text: Arc<str>,
    pub tree: Tree,
    pub line_index: LineIndex,
    /// Import specifier -> resolved file, for specifiers that resolved
    pub imports: HashMap<String, PathBuf>,
}

impl SourceFile {
    pub fn module_path(&self, specifier: &str) -> Option<PathBuf> {
        self.imports.get(specifier).cloned()
    }
}

/// Options that control how far loading reaches
#[derive(Debug, Clone, Copy)]
pub struct LoadOptions {
    pub max_file_size_bytes: u64,
    pub follow_imports: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            max_file_size_bytes: crate::config::max_file_size_bytes(),
            follow_imports: crate::config::follow_imports(),
        }
    }
}

pub struct Program {
    files: Vec<SourceFile>,
    by_path: HashMap<PathBuf, usize>,
}

struct Parsers {
    parsers: HashMap<Dialect, Parser>,
    queries: HashMap<Dialect, Query>,
}

impl Parsers {
    fn new() -> Self {
        Self {
            parsers: HashMap::new(),
            queries: HashMap::new(),
        }
    }

    fn parser(&mut self, dialect: Dialect) -> Result<&mut Parser, AnalysisError> {
        if !self.parsers.contains_key(&dialect) {
            self.parsers.insert(dialect, ast::create_parser(dialect)?);
        }
        self.parsers
            .get_mut(&dialect)
            .ok_or_else(|| AnalysisError::Language(format!("{:?}", dialect)))
    }

    fn import_query(&mut self, dialect: Dialect) -> Result<&Query, AnalysisError> {
        if !self.queries.contains_key(&dialect) {
            let query = Query::new(&dialect.language(), IMPORT_QUERY)
                .map_err(|e| AnalysisError::Language(e.to_string()))?;
            self.queries.insert(dialect, query);
        }
        self.queries
            .get(&dialect)
            .ok_or_else(|| AnalysisError::Language(format!("{:?}", dialect)))
    }
}

impl Program {
    pub fn load(
        settings: &ProjectSettings,
        cache: &mut SourceCache,
        options: LoadOptions,
    ) -> LscodeResult<Self> {
        let resolver = ModuleResolver::new(&settings.options);
        let mut parsers = Parsers::new();
        let mut files = Vec::new();
        let mut by_path = HashMap::new();
        let mut queued: HashSet<PathBuf> = HashSet::new();
        let mut queue: VecDeque<PathBuf> = VecDeque::new();

        for root in &settings.root_files {
            let root = normalize_path(root);
            if queued.insert(root.clone()) {
                queue.push_back(root);
            }
        }

        while let Some(path) = queue.pop_front() {
            let Some(text) = cache.read_within(&path, options.max_file_size_bytes)? else {
                continue;
            };

            let dialect = Dialect::for_path(&path);
            let tree = ast::parse(parsers.parser(dialect)?, &path, &text)?;
            let specifiers = import_specifiers(parsers.import_query(dialect)?, &tree, &text);

            let mut imports = HashMap::new();
            for specifier in specifiers {
                let Some(target) = resolver.resolve(&specifier, &path) else {
                    tracing::trace!("Unresolved import '{}' in {}", specifier, path.display());
                    continue;
                };
                if options.follow_imports && queued.insert(target.clone()) {
                    queue.push_back(target.clone());
                }
                imports.insert(specifier, target);
            }

            by_path.insert(path.clone(), files.len());
            files.push(SourceFile {
                line_index: LineIndex::new(&text),
                path,
                text,
                tree,
                imports,
            });
        }

        tracing::debug!(
            "Loaded program: {} files ({} roots)",
            files.len(),
            settings.root_files.len()
        );

        Ok(Self { files, by_path })
    }

    pub fn files(&self) -> &[SourceFile] {
        &self.files
    }

    pub fn index_of(&self, path: &Path) -> Option<usize> {
        self.by_path.get(path).copied()
    }

    pub fn file(&self, path: &Path) -> Option<&SourceFile> {
        self.index_of(path).map(|i| &self.files[i])
    }
}

fn import_specifiers(query: &Query, tree: &Tree, text: &str) -> Vec<String> {
    let mut cursor = QueryCursor::new();
    let mut matches = cursor.matches(query, tree.root_node(), text.as_bytes());
    let mut specifiers = Vec::new();

    while let Some(query_match) = matches.next() {
        for capture in query_match.captures {
            let value = ast::string_value(capture.node, text);
            if !value.is_empty() && !specifiers.iter().any(|s| s == value) {
                specifiers.push(value.to_string());
            }
        }
    }
    specifiers
}
