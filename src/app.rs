//! Application container for lscode

use std::path::{Path, PathBuf};

use crate::cli::{OutputContext, OutputFormat, SymbolQuery};
use crate::config;
use crate::error::LscodeResult;
use crate::infra::source_cache::SourceCache;
use crate::models::config::LscodeConfig;
use crate::models::project::ProjectSettings;
use crate::models::symbol::CandidateSymbol;
use crate::services::analysis::SyntaxEngine;
use crate::services::analysis::program::LoadOptions;
use crate::services::config::{ConfigService, DefaultConfigService};
use crate::services::locator::SymbolLocator;
use crate::services::tsconfig::ConfigResolver;

pub struct App {
    root: PathBuf,
    pub(crate) output: OutputContext,
    pub(crate) config: LscodeConfig,
}

/// Everything one symbol query produced before selection
pub struct Analysis {
    pub settings: ProjectSettings,
    pub engine: SyntaxEngine,
    pub file: PathBuf,
    pub name: String,
    pub candidates: Vec<CandidateSymbol>,
}

impl App {
    /// `format` overrides the configured output format
    pub fn new(format: Option<&str>) -> anyhow::Result<Self> {
        let root = std::env::current_dir()?;
        Self::with_root(root, format)
    }

    pub fn with_root(root: PathBuf, format: Option<&str>) -> anyhow::Result<Self> {
        tracing::debug!("Initializing lscode at {:?}", root);

        let config_service = DefaultConfigService::new(&root);
        let config = config_service.load()?;
        config::init(&config);

        let format: OutputFormat = format
            .unwrap_or(&config.output.format)
            .parse()
            .map_err(|e: String| anyhow::anyhow!(e))?;
        let output = OutputContext::new(root.clone(), format);

        Ok(Self {
            root,
            output,
            config,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &LscodeConfig {
        &self.config
    }

    pub fn output(&self) -> &OutputContext {
        &self.output
    }

    /// Resolve the governing config, load the program and locate candidates
    pub fn analyze(&self, query: &SymbolQuery, tsconfig: Option<&Path>) -> LscodeResult<Analysis> {
        let query = query.to_absolute(&self.root);

        let settings = ConfigResolver::new(&self.root).settings(&query.file, tsconfig)?;
        tracing::debug!(
            "Program roots: {} (config: {:?})",
            settings.root_files.len(),
            settings.config_path
        );

        let mut cache = SourceCache::new();
        let engine = SyntaxEngine::load(&settings, &mut cache, LoadOptions::default())?;
        tracing::debug!("Read {} files from disk", cache.disk_reads());
        engine.require_file(&query.file)?;

        let candidates = SymbolLocator::new(&engine).locate(&query.file, &query.name)?;

        Ok(Analysis {
            settings,
            engine,
            file: query.file,
            name: query.name,
            candidates,
        })
    }
}
