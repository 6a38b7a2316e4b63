//! Error types for lscode

use std::path::PathBuf;

use thiserror::Error;

pub type LscodeResult<T> = std::result::Result<T, LscodeError>;

#[derive(Debug, Error)]
pub enum LscodeError {
    #[error("{0}")]
    Tsconfig(#[from] TsconfigError),

    #[error("{0}")]
    Symbol(#[from] SymbolError),

    #[error("{0}")]
    Analysis(#[from] AnalysisError),

    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("Failed to read file: {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl LscodeError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Stable machine-readable code for typed failures
    pub fn code(&self) -> Option<&'static str> {
        match self {
            Self::Tsconfig(e) => e.code(),
            Self::Symbol(e) => Some(e.code()),
            _ => None,
        }
    }

    /// Whether this is one of the typed lookup failures rather than I/O or parse trouble
    pub fn is_typed(&self) -> bool {
        self.code().is_some()
    }
}

#[derive(Debug, Error)]
pub enum TsconfigError {
    #[error("TypeScript config file not found: {0}")]
    NotFound(String),

    #[error(
        "{} is not part of the TypeScript project {}. Hint: use --tsconfig to specify the correct tsconfig file.",
        .file.display(),
        .config.display()
    )]
    FileNotInProject { file: PathBuf, config: PathBuf },

    #[error("Invalid TypeScript config {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },
}

impl TsconfigError {
    pub fn code(&self) -> Option<&'static str> {
        match self {
            Self::NotFound(_) => Some("TSCONFIG_NOT_FOUND"),
            Self::FileNotInProject { .. } => Some("FILE_NOT_IN_PROJECT"),
            Self::Parse { .. } => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum SymbolError {
    #[error("Symbol '{name}' not found in {}", .file.display())]
    NotFound { name: String, file: PathBuf },

    #[error("Symbol index {index} out of range. Found {count} symbol(s) with name '{name}'")]
    IndexOutOfRange {
        index: i64,
        count: usize,
        name: String,
    },
}

impl SymbolError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "SYMBOL_NOT_FOUND",
            Self::IndexOutOfRange { .. } => "SYMBOL_INDEX_OUT_OF_RANGE",
        }
    }
}

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Failed to load TypeScript grammar: {0}")]
    Language(String),

    #[error("Parse error in {}: {message}", .file.display())]
    Parse { file: PathBuf, message: String },

    #[error("File is not part of the loaded program: {}", .0.display())]
    FileNotLoaded(PathBuf),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config parse error: {0}")]
    Parse(String),

    #[error("Invalid value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
