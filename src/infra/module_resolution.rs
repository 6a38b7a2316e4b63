//! Module specifier resolution
//!
//! Maps an import specifier to a source file on disk: relative and absolute
//! paths, `baseUrl` lookups and `paths` mappings. Packages under
//! `node_modules` are never loaded.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::infra::normalize_path;
use crate::models::project::CompilerOptions;

const TS_APPEND: &[&str] = &[".ts", ".tsx", ".d.ts"];
const JS_APPEND: &[&str] = &[".js", ".jsx"];

#[derive(Debug, Clone, Default)]
pub struct ModuleResolver {
    base_url: Option<PathBuf>,
    paths: Vec<(String, Vec<String>)>,
    allow_js: bool,
}

impl ModuleResolver {
    pub fn new(options: &CompilerOptions) -> Self {
        Self {
            base_url: options.base_url(),
            paths: options.path_mappings(),
            allow_js: options.allow_js(),
        }
    }

    /// Source file `specifier` refers to when imported from `containing_file`
    pub fn resolve(&self, specifier: &str, containing_file: &Path) -> Option<PathBuf> {
        if is_relative(specifier) || Path::new(specifier).is_absolute() {
            let dir = containing_file.parent().unwrap_or(Path::new("/"));
            return self.resolve_path(&normalize_path(&dir.join(specifier)));
        }

        if let Some(resolved) = self.resolve_mapped(specifier) {
            return Some(resolved);
        }

        let base = self.base_url.as_ref()?;
        self.resolve_path(&normalize_path(&base.join(specifier)))
    }

    fn resolve_mapped(&self, specifier: &str) -> Option<PathBuf> {
        let (pattern, targets) = self
            .paths
            .iter()
            .filter(|(pattern, _)| match_wildcard(pattern, specifier).is_some())
            .max_by_key(|(pattern, _)| pattern.find('*').unwrap_or(pattern.len()))?;

        let captured = match_wildcard(pattern, specifier)?;
        targets.iter().find_map(|target| {
            let substituted = target.replacen('*', captured, 1);
            self.resolve_path(&normalize_path(Path::new(&substituted)))
        })
    }

    fn resolve_path(&self, candidate: &Path) -> Option<PathBuf> {
        let name = candidate.file_name()?.to_string_lossy().into_owned();

        // `./x.js` written for emitted output refers to `x.ts`
        for (js, replacements) in [
            (".js", &[".ts", ".tsx", ".d.ts"][..]),
            (".jsx", &[".tsx", ".d.ts"][..]),
            (".mjs", &[".mts", ".d.mts"][..]),
            (".cjs", &[".cts", ".d.cts"][..]),
        ] {
            if let Some(stem) = name.strip_suffix(js) {
                let found = replacements
                    .iter()
                    .map(|ext| candidate.with_file_name(format!("{stem}{ext}")))
                    .find(|p| p.is_file());
                if found.is_some() {
                    return found;
                }
                if self.allow_js && candidate.is_file() {
                    return Some(candidate.to_path_buf());
                }
                return None;
            }
        }

        if candidate.is_file() && is_source_name(&name) {
            return Some(candidate.to_path_buf());
        }

        if let Some(found) = self.extensions().find_map(|ext| {
            let path = append_extension(candidate, ext);
            path.is_file().then_some(path)
        }) {
            return Some(found);
        }

        if candidate.is_dir() {
            return self.extensions().find_map(|ext| {
                let path = candidate.join(format!("index{ext}"));
                path.is_file().then_some(path)
            });
        }

        None
    }

    fn extensions(&self) -> impl Iterator<Item = &'static str> + '_ {
        TS_APPEND
            .iter()
            .chain(JS_APPEND.iter().filter(|_| self.allow_js))
            .copied()
    }
}

fn is_relative(specifier: &str) -> bool {
    specifier == "."
        || specifier == ".."
        || specifier.starts_with("./")
        || specifier.starts_with("../")
}

fn is_source_name(name: &str) -> bool {
    [".ts", ".tsx", ".mts", ".cts"]
        .iter()
        .any(|ext| name.ends_with(ext))
}

fn append_extension(path: &Path, ext: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(ext);
    PathBuf::from(name)
}

/// Text captured by the `*` of `pattern`, or the empty string for an exact match
fn match_wildcard<'a>(pattern: &str, specifier: &'a str) -> Option<&'a str> {
    match pattern.split_once('*') {
        Some((prefix, suffix)) => {
            if specifier.len() >= prefix.len() + suffix.len()
                && specifier.starts_with(prefix)
                && specifier.ends_with(suffix)
            {
                Some(&specifier[prefix.len()..specifier.len() - suffix.len()])
            } else {
                None
            }
        }
        None => (pattern == specifier).then_some(""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) -> PathBuf {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "").unwrap();
        path
    }

    fn options(value: serde_json::Value) -> CompilerOptions {
        match value {
            serde_json::Value::Object(map) => CompilerOptions(map),
            _ => CompilerOptions::new(),
        }
    }

    #[test]
    fn test_relative_with_js_extension() {
        let dir = TempDir::new().unwrap();
        let math = touch(dir.path(), "math.ts");
        let main = touch(dir.path(), "main.ts");

        let resolver = ModuleResolver::default();
        assert_eq!(resolver.resolve("./math.js", &main), Some(math.clone()));
        assert_eq!(resolver.resolve("./math", &main), Some(math));
        assert_eq!(resolver.resolve("./missing", &main), None);
    }

    #[test]
    fn test_directory_index_and_declarations() {
        let dir = TempDir::new().unwrap();
        let index = touch(dir.path(), "lib/index.ts");
        let types = touch(dir.path(), "types.d.ts");
        let main = touch(dir.path(), "src/main.ts");

        let resolver = ModuleResolver::default();
        assert_eq!(resolver.resolve("../lib", &main), Some(index));
        assert_eq!(resolver.resolve("../types", &main), Some(types));
    }

    #[test]
    fn test_js_requires_allow_js() {
        let dir = TempDir::new().unwrap();
        let util = touch(dir.path(), "util.js");
        let main = touch(dir.path(), "main.ts");

        assert_eq!(ModuleResolver::default().resolve("./util", &main), None);
        let resolver = ModuleResolver::new(&options(json!({ "allowJs": true })));
        assert_eq!(resolver.resolve("./util", &main), Some(util.clone()));
        assert_eq!(resolver.resolve("./util.js", &main), Some(util));
    }

    #[test]
    fn test_paths_and_base_url() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        let helper = touch(root, "src/lib/helper.ts");
        let config = touch(root, "src/config.ts");
        let main = touch(root, "src/app/main.ts");

        let resolver = ModuleResolver::new(&options(json!({
            "baseUrl": root.join("src").to_string_lossy(),
            "paths": { "@lib/*": [root.join("src/lib/*").to_string_lossy()] }
        })));
        assert_eq!(resolver.resolve("@lib/helper", &main), Some(helper));
        assert_eq!(resolver.resolve("config", &main), Some(config));
        assert_eq!(resolver.resolve("react", &main), None);
    }

    #[test]
    fn test_match_wildcard() {
        assert_eq!(match_wildcard("@lib/*", "@lib/a/b"), Some("a/b"));
        assert_eq!(match_wildcard("*.css", "x.ts"), None);
        assert_eq!(match_wildcard("exact", "exact"), Some(""));
        assert_eq!(match_wildcard("exact", "other"), None);
    }
}
