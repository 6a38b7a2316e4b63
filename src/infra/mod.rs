//! Infrastructure layer for lscode
//!
//! Contains low-level implementations: text handling, file caching,
//! tree-sitter parsing, tsconfig loading and module resolution.

pub mod ast;
pub mod module_resolution;
pub mod source_cache;
pub mod text;
pub mod tsconfig;

use std::path::{Component, Path, PathBuf};

/// Lexically normalize a path, folding `.` and `..` without touching the filesystem
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Resolve `path` against `base` (unless already absolute) and normalize it
pub fn absolutize(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        normalize_path(path)
    } else {
        normalize_path(&base.join(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path() {
        assert_eq!(
            normalize_path(Path::new("/p/src/./a/../b.ts")),
            PathBuf::from("/p/src/b.ts")
        );
        assert_eq!(normalize_path(Path::new("/../x")), PathBuf::from("/x"));
        assert_eq!(normalize_path(Path::new("a/../../b")), PathBuf::from("../b"));
    }

    #[test]
    fn test_absolutize() {
        let base = Path::new("/work/project");
        assert_eq!(
            absolutize(base, Path::new("../other/tsconfig.json")),
            PathBuf::from("/work/other/tsconfig.json")
        );
        assert_eq!(absolutize(base, Path::new("/abs/x.ts")), PathBuf::from("/abs/x.ts"));
    }
}
