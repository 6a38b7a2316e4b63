//! Global Configuration Singleton

use std::sync::OnceLock;

use crate::models::config::LscodeConfig;

static CONFIG: OnceLock<RuntimeConfig> = OnceLock::new();

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub max_file_size_bytes: u64,
    pub follow_imports: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            max_file_size_bytes: 5 * 1024 * 1024,
            follow_imports: true,
        }
    }
}

impl From<&LscodeConfig> for RuntimeConfig {
    fn from(config: &LscodeConfig) -> Self {
        Self {
            max_file_size_bytes: config.analysis.max_file_size_bytes(),
            follow_imports: config.analysis.follow_imports,
        }
    }
}

pub fn init(config: &LscodeConfig) {
    let _ = CONFIG.set(RuntimeConfig::from(config));
}

pub fn max_file_size_bytes() -> u64 {
    config().max_file_size_bytes
}

pub fn follow_imports() -> bool {
    config().follow_imports
}

fn config() -> RuntimeConfig {
    CONFIG.get().cloned().unwrap_or_default()
}
