//! tsconfig file-set expansion
//!
//! Turns `files` / `include` / `exclude` into the sorted list of root files,
//! following the TypeScript matching rules.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern};
use walkdir::WalkDir;

use crate::infra::normalize_path;

const TS_EXTENSIONS: &[&str] = &[".ts", ".tsx", ".mts", ".cts"];
const JS_EXTENSIONS: &[&str] = &[".js", ".jsx", ".mjs", ".cjs"];

/// Folders wildcards never descend into
const PACKAGE_DIRS: &[&str] = &["node_modules", "bower_components", "jspm_packages"];

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: true,
};

/// Raw file-set fields of one tsconfig, after `extends` is applied
#[derive(Debug, Clone, Default)]
pub struct FileSetSpec {
    pub files: Option<Vec<String>>,
    pub include: Option<Vec<String>>,
    pub exclude: Option<Vec<String>>,
    /// `outDir` and `declarationDir`, already absolute
    pub output_dirs: Vec<PathBuf>,
    pub allow_js: bool,
}

struct IncludeSpec {
    base: PathBuf,
    pattern: Pattern,
}

pub struct FileMatcher {
    literal_files: Vec<PathBuf>,
    includes: Vec<IncludeSpec>,
    excludes: Vec<Pattern>,
    allow_js: bool,
}

impl FileMatcher {
    pub fn new(config_dir: &Path, spec: &FileSetSpec) -> Self {
        let literal_files = spec
            .files
            .iter()
            .flatten()
            .map(|f| normalize_path(&config_dir.join(f)))
            .collect();

        let include_specs: Vec<String> = match (&spec.files, &spec.include) {
            (_, Some(include)) => include.clone(),
            (Some(_), None) => Vec::new(),
            (None, None) => vec!["**/*".to_string()],
        };
        let includes = include_specs
            .iter()
            .filter_map(|s| include_spec(config_dir, s))
            .collect();

        let excludes = match &spec.exclude {
            Some(exclude) => exclude
                .iter()
                .filter_map(|s| exclude_pattern(config_dir, s))
                .collect(),
            None => PACKAGE_DIRS
                .iter()
                .map(|d| config_dir.join(d))
                .chain(spec.output_dirs.iter().cloned())
                .filter_map(|p| literal_pattern(&p))
                .collect(),
        };

        Self {
            literal_files,
            includes,
            excludes,
            allow_js: spec.allow_js,
        }
    }

    fn has_supported_extension(&self, path: &Path) -> bool {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };
        TS_EXTENSIONS.iter().any(|ext| name.ends_with(ext))
            || (self.allow_js && JS_EXTENSIONS.iter().any(|ext| name.ends_with(ext)))
    }

    /// Whether `path` or one of its ancestors is excluded
    pub fn is_excluded(&self, path: &Path) -> bool {
        path.ancestors()
            .any(|a| self.excludes.iter().any(|p| p.matches_path_with(a, MATCH_OPTIONS)))
    }

    /// Expand to absolute root files: `files` entries first, then include matches
    pub fn expand(&self) -> Vec<PathBuf> {
        let mut seen = HashSet::new();
        let mut result = Vec::new();

        for file in &self.literal_files {
            if !file.is_file() {
                tracing::warn!("File listed in tsconfig does not exist: {}", file.display());
                continue;
            }
            if seen.insert(file.clone()) {
                result.push(file.clone());
            }
        }

        for include in &self.includes {
            if include.base.is_file() {
                if include.pattern.matches_path_with(&include.base, MATCH_OPTIONS)
                    && self.has_supported_extension(&include.base)
                    && !self.is_excluded(&include.base)
                    && seen.insert(include.base.clone())
                {
                    result.push(include.base.clone());
                }
                continue;
            }
            if !include.base.is_dir() {
                continue;
            }

            let walker = WalkDir::new(&include.base)
                .follow_links(false)
                .sort_by(|a, b| {
                    (a.file_type().is_dir(), a.file_name())
                        .cmp(&(b.file_type().is_dir(), b.file_name()))
                })
                .into_iter()
                .filter_entry(|e| {
                    if e.depth() == 0 || !e.file_type().is_dir() {
                        return true;
                    }
                    let name = e.file_name().to_string_lossy();
                    !name.starts_with('.')
                        && !PACKAGE_DIRS.contains(&name.as_ref())
                        && !self.is_excluded(e.path())
                });

            for entry in walker.filter_map(|e| e.ok()) {
                if !entry.file_type().is_file() {
                    continue;
                }
                let path = entry.path();
                if !self.has_supported_extension(path)
                    || !include.pattern.matches_path_with(path, MATCH_OPTIONS)
                    || self.is_excluded(path)
                {
                    continue;
                }
                if seen.insert(path.to_path_buf()) {
                    result.push(path.to_path_buf());
                }
            }
        }

        result
    }
}

fn has_wildcard(segment: &str) -> bool {
    segment.contains(['*', '?', '['])
}

/// Split a spec into its literal directory prefix (resolved and normalized)
/// and the wildcard remainder, if any
fn split_spec(config_dir: &Path, spec: &str) -> (PathBuf, Option<String>) {
    let segments: Vec<&str> = spec.split(['/', '\\']).collect();
    let first_wild = segments.iter().position(|s| has_wildcard(s));

    match first_wild {
        Some(idx) => {
            let literal = segments[..idx].join("/");
            let rest = segments[idx..].join("/");
            (normalize_path(&config_dir.join(literal)), Some(rest))
        }
        None => (normalize_path(&config_dir.join(spec)), None),
    }
}

fn build_pattern(base: &Path, rest: Option<&str>) -> Option<Pattern> {
    let escaped = Pattern::escape(&base.to_string_lossy());
    let source = match rest {
        Some(rest) => format!("{}/{}", escaped.trim_end_matches('/'), rest),
        None => escaped,
    };
    match Pattern::new(&source) {
        Ok(pattern) => Some(pattern),
        Err(e) => {
            tracing::warn!("Invalid tsconfig pattern '{}': {}", source, e);
            None
        }
    }
}

fn literal_pattern(path: &Path) -> Option<Pattern> {
    build_pattern(path, None)
}

fn include_spec(config_dir: &Path, spec: &str) -> Option<IncludeSpec> {
    let (base, rest) = split_spec(config_dir, spec);
    let rest = match rest {
        Some(rest) => Some(rest),
        None => {
            let last = base.file_name().and_then(|n| n.to_str()).unwrap_or("");
            // a literal path whose last segment has no extension names a directory
            (!last.contains('.')).then(|| "**/*".to_string())
        }
    };
    let pattern = build_pattern(&base, rest.as_deref())?;
    Some(IncludeSpec { base, pattern })
}

fn exclude_pattern(config_dir: &Path, spec: &str) -> Option<Pattern> {
    let (base, rest) = split_spec(config_dir, spec);
    build_pattern(&base, rest.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, "export {};\n").unwrap();
    }

    fn relative(root: &Path, files: Vec<PathBuf>) -> Vec<String> {
        files
            .into_iter()
            .map(|f| f.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"))
            .collect()
    }

    fn expand(root: &Path, spec: FileSetSpec) -> Vec<String> {
        relative(root, FileMatcher::new(root, &spec).expand())
    }

    #[test]
    fn test_default_include_everything() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        touch(root, "b.ts");
        touch(root, "a.ts");
        touch(root, "src/c.tsx");
        touch(root, "src/d.d.ts");
        touch(root, "src/e.js");
        touch(root, "node_modules/pkg/index.ts");
        touch(root, ".hidden/x.ts");

        let files = expand(root, FileSetSpec::default());
        assert_eq!(files, vec!["a.ts", "b.ts", "src/c.tsx", "src/d.d.ts"]);
    }

    #[test]
    fn test_allow_js() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        touch(root, "a.js");
        touch(root, "b.mjs");
        touch(root, "c.ts");

        let spec = FileSetSpec {
            allow_js: true,
            ..Default::default()
        };
        assert_eq!(expand(root, spec), vec!["a.js", "b.mjs", "c.ts"]);
    }

    #[test]
    fn test_include_directory_and_exclude() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        touch(root, "src/main.ts");
        touch(root, "src/main.test.ts");
        touch(root, "src/gen/out.ts");
        touch(root, "other/x.ts");

        let spec = FileSetSpec {
            include: Some(vec!["src".to_string()]),
            exclude: Some(vec!["**/*.test.ts".to_string(), "src/gen".to_string()]),
            ..Default::default()
        };
        assert_eq!(expand(root, spec), vec!["src/main.ts"]);
    }

    #[test]
    fn test_files_without_include() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        touch(root, "a.ts");
        touch(root, "b.ts");
        touch(root, "excluded/c.ts");

        let spec = FileSetSpec {
            files: Some(vec!["excluded/c.ts".to_string(), "missing.ts".to_string()]),
            exclude: Some(vec!["excluded".to_string()]),
            ..Default::default()
        };
        // files entries are members even when excluded
        assert_eq!(expand(root, spec), vec!["excluded/c.ts"]);
    }

    #[test]
    fn test_empty_include() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "a.ts");
        let spec = FileSetSpec {
            include: Some(Vec::new()),
            ..Default::default()
        };
        assert!(expand(dir.path(), spec).is_empty());
    }

    #[test]
    fn test_out_dir_excluded_by_default() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        touch(root, "src/a.ts");
        touch(root, "dist/a.d.ts");

        let spec = FileSetSpec {
            output_dirs: vec![root.join("dist")],
            ..Default::default()
        };
        assert_eq!(expand(root, spec), vec!["src/a.ts"]);
    }

    #[test]
    fn test_parent_relative_include() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        touch(root, "shared/util.ts");
        touch(root, "app/main.ts");

        let app = root.join("app");
        let spec = FileSetSpec {
            include: Some(vec!["./*.ts".to_string(), "../shared/**/*".to_string()]),
            ..Default::default()
        };
        let files = FileMatcher::new(&app, &spec).expand();
        assert_eq!(files, vec![app.join("main.ts"), root.join("shared/util.ts")]);
    }

    #[test]
    fn test_split_spec() {
        let (base, rest) = split_spec(Path::new("/p"), "src/**/*.ts");
        assert_eq!(base, PathBuf::from("/p/src"));
        assert_eq!(rest.as_deref(), Some("**/*.ts"));

        let (base, rest) = split_spec(Path::new("/p/app"), "../lib");
        assert_eq!(base, PathBuf::from("/p/lib"));
        assert!(rest.is_none());

        let (base, rest) = split_spec(Path::new("/p/app"), "/shared/*.ts");
        assert_eq!(base, PathBuf::from("/shared"));
        assert_eq!(rest.as_deref(), Some("*.ts"));
    }
}
