//! Selection and location queries
//!
//! Picks one candidate by index and maps the engine's reference and
//! definition spans back to line/character locations.

use std::path::Path;

use crate::error::SymbolError;
use crate::models::symbol::{CandidateSymbol, DefinitionLocation, Location, TextSpan};

use super::analysis::AnalysisEngine;

/// Candidate at 0-based index `n`.
///
/// An empty list is reported as a missing symbol before the index is looked at.
pub fn select<'c>(
    candidates: &'c [CandidateSymbol],
    n: i64,
    name: &str,
    file: &Path,
) -> Result<&'c CandidateSymbol, SymbolError> {
    if candidates.is_empty() {
        return Err(SymbolError::NotFound {
            name: name.to_string(),
            file: file.to_path_buf(),
        });
    }

    usize::try_from(n)
        .ok()
        .and_then(|index| candidates.get(index))
        .ok_or_else(|| SymbolError::IndexOutOfRange {
            index: n,
            count: candidates.len(),
            name: name.to_string(),
        })
}

pub struct Navigator<'e, E: AnalysisEngine + ?Sized> {
    engine: &'e E,
}

impl<'e, E: AnalysisEngine + ?Sized> Navigator<'e, E> {
    pub fn new(engine: &'e E) -> Self {
        Self { engine }
    }

    /// All references to the candidate, its own declaration included
    pub fn references(&self, candidate: &CandidateSymbol) -> Vec<Location> {
        let spans = self.engine.find_references(candidate.id);
        tracing::debug!("{} reference(s) to '{}'", spans.len(), candidate.name);
        spans.iter().filter_map(|span| self.location(span)).collect()
    }

    pub fn definitions(&self, candidate: &CandidateSymbol) -> Vec<DefinitionLocation> {
        self.engine
            .find_definitions(candidate.id)
            .iter()
            .filter_map(|span| {
                let location = self.location(span)?;
                let code = self
                    .engine
                    .definition_code(span)
                    .or_else(|| self.span_text(span))
                    .unwrap_or_default();
                Some(DefinitionLocation { location, code })
            })
            .collect()
    }

    /// Maps through the line table of the span's own file
    fn location(&self, span: &TextSpan) -> Option<Location> {
        let text = self.engine.source_text(&span.file)?;
        let lines = self.engine.line_index(&span.file)?;
        let (line, character) = lines.position(text, span.start);
        Some(Location::new(&span.file, line, character))
    }

    fn span_text(&self, span: &TextSpan) -> Option<String> {
        let text = self.engine.source_text(&span.file)?;
        text.get(span.start..span.end).map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::text::LineIndex;
    use crate::models::symbol::{SymbolId, SymbolKind};
    use crate::services::analysis::{ResolvedSymbol, Token};
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn candidate(id: u32, file: &str, start: usize) -> CandidateSymbol {
        CandidateSymbol {
            id: SymbolId(id),
            name: "add".to_string(),
            kind: SymbolKind::Variable,
            declaration: TextSpan::new(file, start, start + 3),
            location: Location::new(file, 0, start as u32),
            source_line: String::new(),
        }
    }

    #[test]
    fn test_select_in_range() {
        let candidates = vec![candidate(0, "a.ts", 0), candidate(1, "a.ts", 10)];
        let picked = select(&candidates, 1, "add", Path::new("a.ts")).unwrap();
        assert_eq!(picked.id, SymbolId(1));
    }

    #[test]
    fn test_select_out_of_range() {
        let candidates = vec![candidate(0, "a.ts", 0), candidate(1, "a.ts", 10)];
        for n in [2, 10, -1] {
            let err = select(&candidates, n, "add", Path::new("a.ts")).unwrap_err();
            assert_eq!(err.code(), "SYMBOL_INDEX_OUT_OF_RANGE");
            assert!(err.to_string().contains(&n.to_string()));
            assert!(err.to_string().contains("Found 2"));
        }
    }

    #[test]
    fn test_select_empty_is_not_found() {
        let err = select(&[], 5, "missing", Path::new("a.ts")).unwrap_err();
        assert_eq!(err.code(), "SYMBOL_NOT_FOUND");
    }

    /// Two files with fixed spans, enough to check location mapping
    struct FakeEngine {
        texts: HashMap<PathBuf, (String, LineIndex)>,
        references: Vec<TextSpan>,
    }

    impl FakeEngine {
        fn new(files: &[(&str, &str)], references: Vec<TextSpan>) -> Self {
            let texts = files
                .iter()
                .map(|(path, text)| {
                    (PathBuf::from(path), (text.to_string(), LineIndex::new(text)))
                })
                .collect();
            Self { texts, references }
        }
    }

    impl AnalysisEngine for FakeEngine {
        fn source_text(&self, file: &Path) -> Option<&str> {
            self.texts.get(file).map(|(text, _)| text.as_str())
        }

        fn line_index(&self, file: &Path) -> Option<&LineIndex> {
            self.texts.get(file).map(|(_, lines)| lines)
        }

        fn token_at(&self, _file: &Path, _offset: usize) -> Option<Token> {
            None
        }

        fn symbol_at(&self, _file: &Path, _offset: usize) -> Option<ResolvedSymbol> {
            None
        }

        fn find_references(&self, _symbol: SymbolId) -> Vec<TextSpan> {
            self.references.clone()
        }

        fn find_definitions(&self, _symbol: SymbolId) -> Vec<TextSpan> {
            self.references[..1].to_vec()
        }

        fn definition_code(&self, _span: &TextSpan) -> Option<String> {
            None
        }
    }

    #[test]
    fn test_locations_use_each_files_line_table() {
        let engine = FakeEngine::new(
            &[("a.ts", "const add = 1;\n"), ("b.ts", "\n\n  add;\n")],
            vec![TextSpan::new("a.ts", 6, 9), TextSpan::new("b.ts", 4, 7)],
        );
        let refs = Navigator::new(&engine).references(&candidate(0, "a.ts", 6));
        assert_eq!(
            refs,
            vec![Location::new("a.ts", 0, 6), Location::new("b.ts", 2, 2)]
        );
    }

    #[test]
    fn test_definition_code_falls_back_to_span() {
        let engine = FakeEngine::new(
            &[("a.ts", "const add = 1;\n")],
            vec![TextSpan::new("a.ts", 6, 9)],
        );
        let defs = Navigator::new(&engine).definitions(&candidate(0, "a.ts", 6));
        assert_eq!(defs.len(), 1);
        assert_eq!(defs[0].code, "add");
    }
}
