//! Symbol candidate discovery
//!
//! Turns a bare name into the ordered list of distinct declarations it names
//! inside one file.

use std::collections::HashSet;
use std::path::Path;

use crate::error::{AnalysisError, LscodeResult};
use crate::infra::text::forward_match;
use crate::models::symbol::{CandidateSymbol, Location};

use super::analysis::AnalysisEngine;

pub struct SymbolLocator<'e, E: AnalysisEngine + ?Sized> {
    engine: &'e E,
}

impl<'e, E: AnalysisEngine + ?Sized> SymbolLocator<'e, E> {
    pub fn new(engine: &'e E) -> Self {
        Self { engine }
    }

    /// Declarations of `name` in `file`, in order of first appearance.
    ///
    /// Every textual occurrence is tried, overlaps included; only identifiers
    /// that declare a symbol named exactly `name` survive, and a symbol reached
    /// through several declarations is reported once.
    pub fn locate(&self, file: &Path, name: &str) -> LscodeResult<Vec<CandidateSymbol>> {
        let text = self
            .engine
            .source_text(file)
            .ok_or_else(|| AnalysisError::FileNotLoaded(file.to_path_buf()))?;
        let lines = self
            .engine
            .line_index(file)
            .ok_or_else(|| AnalysisError::FileNotLoaded(file.to_path_buf()))?;

        let offsets = forward_match(text, name);
        tracing::trace!("{} textual matches of '{}' in {}", offsets.len(), name, file.display());

        let mut seen = HashSet::new();
        let mut candidates = Vec::new();

        for offset in offsets {
            let Some(token) = self.engine.token_at(file, offset) else {
                continue;
            };
            if !token.is_identifier {
                continue;
            }
            let Some(symbol) = self.engine.symbol_at(file, token.start) else {
                continue;
            };
            if symbol.name != name || !symbol.is_declaration {
                continue;
            }
            if !seen.insert(symbol.id) {
                continue;
            }

            let (line, character) = lines.position(text, symbol.declaration.start);
            let location = Location::new(&symbol.declaration.file, line, character);
            candidates.push(CandidateSymbol {
                id: symbol.id,
                name: symbol.name,
                kind: symbol.kind,
                source_line: lines.line_text(text, line).to_string(),
                declaration: symbol.declaration,
                location,
            });
        }

        tracing::debug!("Found {} candidate(s) for '{}'", candidates.len(), name);
        Ok(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::source_cache::SourceCache;
    use crate::models::project::{CompilerOptions, ProjectSettings};
    use crate::services::analysis::SyntaxEngine;
    use crate::services::analysis::program::LoadOptions;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) -> PathBuf {
        let path = root.join(rel);
        std::fs::write(&path, content).unwrap();
        path
    }

    fn engine(root: &Path, file: &Path) -> SyntaxEngine {
        let settings = ProjectSettings {
            root_files: vec![file.to_path_buf()],
            options: CompilerOptions::new(),
            cwd: root.to_path_buf(),
            config_path: None,
        };
        let options = LoadOptions {
            max_file_size_bytes: u64::MAX,
            follow_imports: true,
        };
        SyntaxEngine::load(&settings, &mut SourceCache::new(), options).unwrap()
    }

    fn locate(text: &str, name: &str) -> Vec<CandidateSymbol> {
        let dir = TempDir::new().unwrap();
        let file = write(dir.path(), "a.ts", text);
        let engine = engine(dir.path(), &file);
        SymbolLocator::new(&engine).locate(&file, name).unwrap()
    }

    #[test]
    fn test_exact_name_only() {
        let candidates = locate("const testVar = 1;\nfunction test() {}\nconst mytest = 2;\n", "test");
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].location.line, 1);
        assert_eq!(candidates[0].location.character, 9);
        assert_eq!(candidates[0].source_line, "function test() {}");
    }

    #[test]
    fn test_comments_strings_and_usages_ignored() {
        let text = "// add is great\nconst s = 'add';\nadd(1);\n";
        assert!(locate(text, "add").is_empty());
    }

    #[test]
    fn test_sibling_and_nested_declarations_in_order() {
        let text = "function a() { const test = 1; return test; }\n\
                    function b() { const test = 2; { const test = 3; } }\n";
        let candidates = locate(text, "test");
        assert_eq!(candidates.len(), 3);
        assert!(candidates.windows(2).all(|w| w[0].declaration.start < w[1].declaration.start));
        let ids: HashSet<_> = candidates.iter().map(|c| c.id).collect();
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn test_merged_declarations_dedup() {
        let text = "function over(a: string): void;\nfunction over(a: any) {}\n";
        let candidates = locate(text, "over");
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].location.line, 0);
    }

    #[test]
    fn test_destructuring_and_parameters() {
        let text = "const { left, right: other } = pair;\nfunction f(left: number) {}\n";
        assert_eq!(locate(text, "left").len(), 2);
        assert_eq!(locate(text, "other").len(), 1);
        assert!(locate(text, "right").is_empty());
    }

    #[test]
    fn test_empty_inputs() {
        assert!(locate("", "add").is_empty());
        assert!(locate("const add = 1;", "").is_empty());
    }

    #[test]
    fn test_utf16_columns() {
        let candidates = locate("const s = '😀'; const add = 1;\n", "add");
        assert_eq!(candidates.len(), 1);
        // the emoji is two UTF-16 code units but four bytes
        assert_eq!(candidates[0].location.character, 22);
    }

    #[test]
    fn test_file_not_loaded() {
        let dir = TempDir::new().unwrap();
        let file = write(dir.path(), "a.ts", "const a = 1;");
        let engine = engine(dir.path(), &file);
        let err = SymbolLocator::new(&engine)
            .locate(&dir.path().join("b.ts"), "a")
            .unwrap_err();
        assert!(err.to_string().contains("b.ts"));
    }
}
