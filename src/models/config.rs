//! Configuration model for lscode
//!
//! Tool settings only; TypeScript project configuration lives in `models::project`.

use serde::{Deserialize, Serialize};

/// lscode configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LscodeConfig {
    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub analysis: AnalysisConfig,

    #[serde(default)]
    pub references: ReferencesConfig,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "defaults::format")]
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: defaults::format(),
        }
    }
}

/// Program loading configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default = "defaults::max_file_size_mb")]
    pub max_file_size_mb: u32,

    /// Load files reached through imports in addition to the root files
    #[serde(default = "defaults::follow_imports")]
    pub follow_imports: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_file_size_mb: defaults::max_file_size_mb(),
            follow_imports: defaults::follow_imports(),
        }
    }
}

impl AnalysisConfig {
    pub fn max_file_size_bytes(&self) -> u64 {
        if self.max_file_size_mb == 0 {
            u64::MAX
        } else {
            self.max_file_size_mb as u64 * 1024 * 1024
        }
    }
}

/// Reference output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferencesConfig {
    /// Maximum references printed (0 = unlimited)
    #[serde(default = "defaults::refs_limit")]
    pub limit: usize,
}

impl Default for ReferencesConfig {
    fn default() -> Self {
        Self {
            limit: defaults::refs_limit(),
        }
    }
}

mod defaults {
    pub fn format() -> String {
        "text".to_string()
    }
    pub fn max_file_size_mb() -> u32 {
        5
    }
    pub fn follow_imports() -> bool {
        true
    }
    pub fn refs_limit() -> usize {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LscodeConfig::default();
        assert_eq!(config.output.format, "text");
        assert_eq!(config.analysis.max_file_size_mb, 5);
        assert!(config.analysis.follow_imports);
        assert_eq!(config.references.limit, 0);
    }

    #[test]
    fn test_partial_toml() {
        let config: LscodeConfig = toml::from_str("[output]\nformat = \"json\"\n").unwrap();
        assert_eq!(config.output.format, "json");
        assert_eq!(config.analysis.max_file_size_mb, 5);
    }

    #[test]
    fn test_unlimited_file_size() {
        let analysis = AnalysisConfig {
            max_file_size_mb: 0,
            follow_imports: true,
        };
        assert_eq!(analysis.max_file_size_bytes(), u64::MAX);
    }
}
