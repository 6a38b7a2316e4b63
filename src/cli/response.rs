//! Response types for CLI output
//!
//! Every response serializes to the JSON shape agents consume and renders to
//! the plain text layout humans read. Coordinates are 1-based in both.

use std::fmt::Write as _;

use serde::Serialize;

use crate::cli::OutputContext;
use crate::models::symbol::{CandidateSymbol, DefinitionLocation, Location};

/// Location in a file (relative path when inside the working directory)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocationOutput {
    pub file: String,
    pub line: u32,
    pub character: u32,
}

impl LocationOutput {
    pub fn from_location(location: &Location, ctx: &OutputContext) -> Self {
        Self {
            file: ctx.relative_path(&location.file),
            line: location.line + 1,
            character: location.character + 1,
        }
    }
}

impl std::fmt::Display for LocationOutput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.character)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SymbolOutput {
    pub index: usize,
    pub name: String,
    pub kind: String,
    pub location: LocationOutput,
    pub source_line: String,
}

impl SymbolOutput {
    pub fn list(candidates: &[CandidateSymbol], ctx: &OutputContext) -> Vec<Self> {
        candidates
            .iter()
            .enumerate()
            .map(|(index, c)| Self {
                index,
                name: c.name.clone(),
                kind: c.kind.to_string(),
                location: LocationOutput::from_location(&c.location, ctx),
                source_line: c.source_line.clone(),
            })
            .collect()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DefinitionOutput {
    pub location: LocationOutput,
    pub code: String,
}

impl DefinitionOutput {
    pub fn from_definition(definition: &DefinitionLocation, ctx: &OutputContext) -> Self {
        Self {
            location: LocationOutput::from_location(&definition.location, ctx),
            code: definition.code.clone(),
        }
    }
}

/// Response for the find-references command
#[derive(Debug, Serialize)]
pub struct ReferencesResponse {
    pub symbols: Vec<SymbolOutput>,
    pub selected: usize,
    /// Total before any limit was applied
    pub count: usize,
    pub references: Vec<LocationOutput>,
    pub resolved_config: Option<String>,
}

impl ReferencesResponse {
    pub fn to_text(&self) -> String {
        let mut out = render_symbols(&self.symbols);
        let name = selected_name(&self.symbols, self.selected);
        let _ = writeln!(
            out,
            "\nReferences to '{}' [{}] ({}):",
            name, self.selected, self.count
        );
        for reference in &self.references {
            let _ = writeln!(out, "  {}", reference);
        }
        if self.references.len() < self.count {
            let _ = writeln!(out, "  ... {} more", self.count - self.references.len());
        }
        out
    }
}

/// Response for the get-definition command
#[derive(Debug, Serialize)]
pub struct DefinitionResponse {
    pub symbols: Vec<SymbolOutput>,
    pub selected: usize,
    pub definitions: Vec<DefinitionOutput>,
    pub resolved_config: Option<String>,
}

impl DefinitionResponse {
    pub fn to_text(&self) -> String {
        let mut out = render_symbols(&self.symbols);
        let name = selected_name(&self.symbols, self.selected);
        let _ = writeln!(out, "\nDefinition of '{}' [{}]:", name, self.selected);
        for definition in &self.definitions {
            let _ = writeln!(out, "  {}", definition.location);
            for line in definition.code.lines() {
                let _ = writeln!(out, "    {}", line);
            }
        }
        out
    }
}

fn selected_name(symbols: &[SymbolOutput], selected: usize) -> &str {
    symbols
        .get(selected)
        .map(|s| s.name.as_str())
        .unwrap_or("")
}

fn render_symbols(symbols: &[SymbolOutput]) -> String {
    let mut out = String::from("Found symbols:\n");
    for symbol in symbols {
        let _ = writeln!(out, "  [{}] {}", symbol.index, symbol.location);
        let _ = writeln!(out, "      {}", symbol.source_line.trim());
    }
    out
}
