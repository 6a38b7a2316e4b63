//! Data models for lscode
//!
//! Contains core type definitions used throughout the application.

pub mod config;
pub mod project;
pub mod symbol;

// Re-export commonly used types
pub use config::LscodeConfig;
pub use project::{CompilerOptions, ProjectConfig, ProjectSettings};
pub use symbol::{CandidateSymbol, DefinitionLocation, Location, SymbolId, SymbolKind, TextSpan};
