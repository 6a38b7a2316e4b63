//! Project configuration model
//!
//! A parsed `tsconfig.json` and the settings used to build a program from it.

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::{Map, Value};

/// Compiler and resolution options, kept as an opaque bag.
///
/// Only a handful of keys influence analysis (`allowJs`, `baseUrl`, `paths`,
/// `outDir`, `declarationDir`); everything else is carried through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CompilerOptions(pub Map<String, Value>);

impl CompilerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn bool(&self, key: &str) -> bool {
        self.0.get(key).and_then(Value::as_bool).unwrap_or(false)
    }

    pub fn path(&self, key: &str) -> Option<PathBuf> {
        self.0.get(key).and_then(Value::as_str).map(PathBuf::from)
    }

    pub fn allow_js(&self) -> bool {
        self.bool("allowJs")
    }

    pub fn base_url(&self) -> Option<PathBuf> {
        self.path("baseUrl")
    }

    /// `paths` mapping as (pattern, absolute targets) pairs
    pub fn path_mappings(&self) -> Vec<(String, Vec<String>)> {
        let Some(Value::Object(paths)) = self.0.get("paths") else {
            return Vec::new();
        };

        paths
            .iter()
            .map(|(pattern, targets)| {
                let targets = targets
                    .as_array()
                    .map(|items| {
                        items
                            .iter()
                            .filter_map(Value::as_str)
                            .map(str::to_string)
                            .collect()
                    })
                    .unwrap_or_default();
                (pattern.clone(), targets)
            })
            .collect()
    }

    /// Overlay `other` on top of `self`, key by key
    pub fn merge(&mut self, other: CompilerOptions) {
        for (key, value) in other.0 {
            self.0.insert(key, value);
        }
    }
}

/// A parsed project configuration file
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectConfig {
    /// Files matched by this configuration's own files/include/exclude rules
    pub root_files: Vec<PathBuf>,
    pub options: CompilerOptions,
    /// Absolute path of the configuration file
    pub source_path: PathBuf,
    /// Resolved paths of referenced configurations, in declared order
    pub references: Vec<PathBuf>,
}

impl ProjectConfig {
    pub fn includes(&self, file: &Path) -> bool {
        self.root_files.iter().any(|f| f == file)
    }
}

/// Inputs for constructing an analysis program
#[derive(Debug, Clone)]
pub struct ProjectSettings {
    pub root_files: Vec<PathBuf>,
    pub options: CompilerOptions,
    pub cwd: PathBuf,
    /// Configuration the settings came from, `None` when defaults apply
    pub config_path: Option<PathBuf>,
}
