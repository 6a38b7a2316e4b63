//! Symbol query parsing for CLI commands

use std::path::{Path, PathBuf};

use anyhow::{Result, bail};

use crate::infra::absolutize;

/// `path/to/file#name`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolQuery {
    pub file: PathBuf,
    pub name: String,
}

impl SymbolQuery {
    /// Split on the last `#`; file names may contain `#`, identifiers cannot
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        let Some((file, name)) = input.rsplit_once('#') else {
            bail!("Invalid symbol query '{}'. Expected: file#symbol\nExample: src/math.ts#add", input)
        };

        let file = file.trim();
        let name = name.trim();
        if file.is_empty() {
            bail!("Symbol query '{}' has no file path. Expected: file#symbol", input);
        }
        if name.is_empty() {
            bail!("Symbol query '{}' has no symbol name. Expected: file#symbol", input);
        }

        Ok(Self {
            file: PathBuf::from(file),
            name: name.to_string(),
        })
    }

    pub fn to_absolute(&self, cwd: &Path) -> Self {
        Self {
            file: absolutize(cwd, &self.file),
            name: self.name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        let query = SymbolQuery::parse("src/math.ts#add").unwrap();
        assert_eq!(query.file, PathBuf::from("src/math.ts"));
        assert_eq!(query.name, "add");
    }

    #[test]
    fn test_parse_splits_on_last_hash() {
        let query = SymbolQuery::parse("dir#1/file.ts#PI").unwrap();
        assert_eq!(query.file, PathBuf::from("dir#1/file.ts"));
        assert_eq!(query.name, "PI");
    }

    #[test]
    fn test_parse_invalid() {
        assert!(SymbolQuery::parse("src/math.ts").is_err());
        assert!(SymbolQuery::parse("#add").is_err());
        assert!(SymbolQuery::parse("src/math.ts#").is_err());
        assert!(SymbolQuery::parse("").is_err());
    }

    #[test]
    fn test_to_absolute() {
        let query = SymbolQuery::parse("./src/../math.ts#add").unwrap();
        let abs = query.to_absolute(Path::new("/project"));
        assert_eq!(abs.file, PathBuf::from("/project/math.ts"));
        assert_eq!(abs.name, "add");
    }
}
