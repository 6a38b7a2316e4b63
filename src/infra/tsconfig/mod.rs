//! tsconfig.json loading
//!
//! Reads one configuration file (following `extends`), normalizes its
//! path-valued options and expands its file set.

pub mod jsonc;
pub mod matcher;

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::error::{LscodeError, LscodeResult, TsconfigError};
use crate::infra::normalize_path;
use crate::models::project::{CompilerOptions, ProjectConfig};

pub use matcher::{FileMatcher, FileSetSpec};

/// Conventional configuration file name
pub const DEFAULT_CONFIG_NAME: &str = "tsconfig.json";

/// Options holding a single path, resolved against the declaring file
const PATH_OPTIONS: &[&str] = &["baseUrl", "outDir", "declarationDir", "rootDir"];

/// A configuration file with `extends` applied but files not yet expanded
#[derive(Debug, Default)]
struct RawConfig {
    options: CompilerOptions,
    files: Option<Vec<String>>,
    include: Option<Vec<String>>,
    exclude: Option<Vec<String>>,
}

impl RawConfig {
    fn overlay(&mut self, other: RawConfig) {
        self.options.merge(other.options);
        if other.files.is_some() {
            self.files = other.files;
        }
        if other.include.is_some() {
            self.include = other.include;
        }
        if other.exclude.is_some() {
            self.exclude = other.exclude;
        }
    }
}

/// Parse the configuration at `path` (absolute) into a [`ProjectConfig`]
pub fn load(path: &Path) -> LscodeResult<ProjectConfig> {
    let path = normalize_path(path);
    let dir = path.parent().unwrap_or(Path::new("/")).to_path_buf();
    let json = read_json(&path)?;

    let mut chain = HashSet::new();
    chain.insert(path.clone());
    let raw = resolve_raw(&path, &json, &mut chain)?;

    let spec = FileSetSpec {
        output_dirs: ["outDir", "declarationDir"]
            .iter()
            .filter_map(|key| raw.options.path(key))
            .collect(),
        allow_js: raw.options.allow_js(),
        files: raw.files,
        include: raw.include,
        exclude: raw.exclude,
    };
    let root_files = FileMatcher::new(&dir, &spec).expand();
    let references = parse_references(&dir, &json);

    tracing::debug!(
        "Loaded {} ({} root files, {} references)",
        path.display(),
        root_files.len(),
        references.len()
    );

    Ok(ProjectConfig {
        root_files,
        options: raw.options,
        source_path: path,
        references,
    })
}

fn read_json(path: &Path) -> LscodeResult<Value> {
    let content = std::fs::read_to_string(path).map_err(|e| LscodeError::io(path, e))?;
    let value: Value = serde_json::from_str(&jsonc::strip(&content)).map_err(|e| {
        TsconfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        }
    })?;

    if !value.is_object() {
        return Err(TsconfigError::Parse {
            path: path.to_path_buf(),
            message: "top-level value must be an object".to_string(),
        }
        .into());
    }
    Ok(value)
}

/// Apply the `extends` chain of `json` (declared at `path`), then its own settings.
///
/// `chain` holds the files currently being resolved; a base shared by two
/// sibling `extends` entries is applied once per entry.
fn resolve_raw(path: &Path, json: &Value, chain: &mut HashSet<PathBuf>) -> LscodeResult<RawConfig> {
    let dir = path.parent().unwrap_or(Path::new("/"));
    let mut raw = RawConfig::default();

    for base in extends_entries(json) {
        let Some(base_path) = resolve_extends(dir, base) else {
            tracing::warn!("Cannot resolve extends '{}' in {}", base, path.display());
            continue;
        };
        if !chain.insert(base_path.clone()) {
            tracing::debug!("Skipping circular extends: {}", base_path.display());
            continue;
        }
        let base_json = read_json(&base_path)?;
        let base_raw = resolve_raw(&base_path, &base_json, chain);
        chain.remove(&base_path);
        raw.overlay(base_raw?);
    }

    raw.overlay(own_settings(dir, json));
    Ok(raw)
}

fn extends_entries(json: &Value) -> Vec<&str> {
    match json.get("extends") {
        Some(Value::String(s)) => vec![s.as_str()],
        Some(Value::Array(items)) => items.iter().filter_map(Value::as_str).collect(),
        _ => Vec::new(),
    }
}

fn resolve_extends(dir: &Path, spec: &str) -> Option<PathBuf> {
    let with_json = |p: PathBuf| -> Option<PathBuf> {
        if p.is_file() {
            return Some(p);
        }
        if !spec.ends_with(".json") {
            let mut name = p.into_os_string();
            name.push(".json");
            let p = PathBuf::from(name);
            if p.is_file() {
                return Some(p);
            }
        }
        None
    };

    if spec.starts_with('.') || Path::new(spec).is_absolute() {
        return with_json(normalize_path(&dir.join(spec)));
    }

    // bare package name: look in node_modules, walking upward
    dir.ancestors().find_map(|ancestor| {
        let candidate = ancestor.join("node_modules").join(spec);
        if candidate.is_dir() {
            let inner = candidate.join(DEFAULT_CONFIG_NAME);
            return inner.is_file().then_some(inner);
        }
        with_json(candidate)
    })
}

/// Settings declared directly in one file, with paths made absolute against `dir`
fn own_settings(dir: &Path, json: &Value) -> RawConfig {
    let mut options = match json.get("compilerOptions") {
        Some(Value::Object(map)) => map.clone(),
        _ => Map::new(),
    };

    for key in PATH_OPTIONS {
        let absolute = match options.get(*key) {
            Some(Value::String(value)) => normalize_path(&dir.join(value)),
            _ => continue,
        };
        options.insert(
            key.to_string(),
            Value::String(absolute.to_string_lossy().into_owned()),
        );
    }

    let paths_base = match options.get("baseUrl") {
        Some(Value::String(base)) => PathBuf::from(base),
        _ => dir.to_path_buf(),
    };
    if let Some(Value::Object(paths)) = options.get_mut("paths") {
        for targets in paths.values_mut() {
            if let Value::Array(items) = targets {
                for item in items.iter_mut() {
                    if let Value::String(target) = item {
                        let absolute = normalize_path(&paths_base.join(target.as_str()));
                        *target = absolute.to_string_lossy().into_owned();
                    }
                }
            }
        }
    }

    let absolute_specs = |key: &str| -> Option<Vec<String>> {
        json.get(key).and_then(Value::as_array).map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(|s| {
                    // anchor to the declaring file so the specs survive inheritance
                    if Path::new(s).is_absolute() {
                        s.to_string()
                    } else {
                        format!("{}/{}", dir.to_string_lossy().trim_end_matches('/'), s)
                    }
                })
                .collect()
        })
    };

    RawConfig {
        options: CompilerOptions(options),
        files: absolute_specs("files"),
        include: absolute_specs("include"),
        exclude: absolute_specs("exclude"),
    }
}

/// Resolved `references` of one file; entries without a string `path`
/// and targets that do not exist are dropped
fn parse_references(dir: &Path, json: &Value) -> Vec<PathBuf> {
    let Some(Value::Array(entries)) = json.get("references") else {
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(|entry| entry.get("path").and_then(Value::as_str))
        .filter_map(|reference| {
            let target = normalize_path(&dir.join(reference));
            if target.is_file() {
                return Some(target);
            }
            let nested = target.join(DEFAULT_CONFIG_NAME);
            if nested.is_file() {
                return Some(nested);
            }
            tracing::debug!("Skipping missing reference: {}", target.display());
            None
        })
        .collect()
}
