//! Symbol model definitions
//!
//! Core types for declaration candidates and the locations reported for them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Opaque identity of a resolved symbol.
///
/// Two occurrences of the same logical symbol (a declaration, its usages,
/// an import binding that aliases it) compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SymbolId(pub u32);

impl SymbolId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What kind of construct introduced a binding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolKind {
    Variable,
    Function,
    Class,
    Interface,
    TypeAlias,
    Enum,
    Namespace,
    Parameter,
    TypeParameter,
    Import,
}

impl SymbolKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Variable => "variable",
            Self::Function => "function",
            Self::Class => "class",
            Self::Interface => "interface",
            Self::TypeAlias => "type_alias",
            Self::Enum => "enum",
            Self::Namespace => "namespace",
            Self::Parameter => "parameter",
            Self::TypeParameter => "type_parameter",
            Self::Import => "import",
        }
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Byte span inside a file of the loaded program
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TextSpan {
    pub file: PathBuf,
    pub start: usize,
    pub end: usize,
}

impl TextSpan {
    pub fn new(file: impl Into<PathBuf>, start: usize, end: usize) -> Self {
        Self {
            file: file.into(),
            start,
            end,
        }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Source code location (0-based line and character)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub file: PathBuf,
    pub line: u32,
    pub character: u32,
}

impl Location {
    pub fn new(file: impl Into<PathBuf>, line: u32, character: u32) -> Self {
        Self {
            file: file.into(),
            line,
            character,
        }
    }
}

impl fmt::Display for Location {
    /// Renders 1-based coordinates, the way editors and terminals expect them
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.file.display(),
            self.line + 1,
            self.character + 1
        )
    }
}

/// A distinct declaration site matching a queried name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateSymbol {
    pub id: SymbolId,
    pub name: String,
    pub kind: SymbolKind,
    /// Primary declaration (the declared name) of the resolved symbol
    pub declaration: TextSpan,
    pub location: Location,
    /// Full text of the line containing the declaration
    pub source_line: String,
}

/// A definition site together with the declaration construct that contains it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DefinitionLocation {
    pub location: Location,
    pub code: String,
}
