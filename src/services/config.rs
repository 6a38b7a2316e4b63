//! Configuration service for lscode

use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::models::config::LscodeConfig;

pub trait ConfigService {
    fn load(&self) -> Result<LscodeConfig, ConfigError>;
}

pub struct DefaultConfigService {
    root: PathBuf,
}

impl DefaultConfigService {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }

    fn global_config_path() -> PathBuf {
        // XDG standard: ~/.config/lscode/config.toml
        std::env::var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .ok()
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
            .unwrap_or_else(|| PathBuf::from("."))
            .join("lscode")
            .join("config.toml")
    }

    fn project_config_path(&self) -> PathBuf {
        self.root.join(".lscode").join("config.toml")
    }

    fn load_from_path(path: &Path) -> Result<Option<toml::Table>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(path)?;
        let table = content
            .parse::<toml::Table>()
            .map_err(|e| ConfigError::Parse(format!("{}: {}", path.display(), e)))?;
        tracing::debug!("Loaded settings from {}", path.display());
        Ok(Some(table))
    }
}

impl ConfigService for DefaultConfigService {
    fn load(&self) -> Result<LscodeConfig, ConfigError> {
        let mut merged = toml::Table::new();
        for path in [Self::global_config_path(), self.project_config_path()] {
            if let Some(layer) = Self::load_from_path(&path)? {
                merge_tables(&mut merged, layer);
            }
        }

        let config: LscodeConfig = toml::Value::Table(merged)
            .try_into()
            .map_err(|e: toml::de::Error| ConfigError::Parse(e.to_string()))?;
        apply_env_overrides(config)
    }
}

/// Overlay `overlay` onto `base`; nested tables merge key by key
fn merge_tables(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(toml::Value::Table(existing)), toml::Value::Table(incoming)) => {
                merge_tables(existing, incoming);
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}

fn apply_env_overrides(config: LscodeConfig) -> Result<LscodeConfig, ConfigError> {
    apply_overrides(config, |key| std::env::var(key).ok())
}

/// Overlay `LSCODE_*` values; a value that does not parse is an error
fn apply_overrides(
    mut config: LscodeConfig,
    var: impl Fn(&str) -> Option<String>,
) -> Result<LscodeConfig, ConfigError> {
    if let Some(val) = var("LSCODE_OUTPUT_FORMAT") {
        config.output.format = val;
    }
    if let Some(val) = var("LSCODE_MAX_FILE_SIZE_MB") {
        config.analysis.max_file_size_mb = val.parse().map_err(|_| ConfigError::InvalidValue {
            key: "LSCODE_MAX_FILE_SIZE_MB".to_string(),
            message: format!("expected a number of megabytes, got '{}'", val),
        })?;
    }
    if let Some(val) = var("LSCODE_REFS_LIMIT") {
        config.references.limit = val.parse().map_err(|_| ConfigError::InvalidValue {
            key: "LSCODE_REFS_LIMIT".to_string(),
            message: format!("expected a non-negative count, got '{}'", val),
        })?;
    }
    Ok(config)
}
