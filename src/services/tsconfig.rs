//! Project configuration resolution
//!
//! Decides which tsconfig governs a file. Without an explicit path the
//! default config in the working directory is the root of a reference graph
//! that is searched breadth-first for the shallowest config whose own file
//! set contains the target.

use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};

use crate::error::{LscodeResult, TsconfigError};
use crate::infra::tsconfig::{self, DEFAULT_CONFIG_NAME};
use crate::infra::{absolutize, normalize_path};
use crate::models::project::{CompilerOptions, ProjectConfig, ProjectSettings};

pub struct ConfigResolver {
    cwd: PathBuf,
}

impl ConfigResolver {
    pub fn new(cwd: &Path) -> Self {
        Self {
            cwd: normalize_path(cwd),
        }
    }

    /// The governing configuration for `file`, or `None` when no explicit
    /// path is given and the working directory has no default config
    pub fn resolve(&self, file: &Path, explicit: Option<&Path>) -> LscodeResult<Option<ProjectConfig>> {
        let file = absolutize(&self.cwd, file);

        if let Some(explicit) = explicit {
            let path = absolutize(&self.cwd, explicit);
            if !path.is_file() {
                return Err(TsconfigError::NotFound(explicit.display().to_string()).into());
            }
            tracing::debug!("Using explicit config {}", path.display());
            return tsconfig::load(&path).map(Some);
        }

        let root = self.cwd.join(DEFAULT_CONFIG_NAME);
        if !root.is_file() {
            tracing::debug!("No {} in {}", DEFAULT_CONFIG_NAME, self.cwd.display());
            return Ok(None);
        }

        self.search(&root, &file).map(Some)
    }

    /// Breadth-first walk over `references` starting at `root`
    fn search(&self, root: &Path, file: &Path) -> LscodeResult<ProjectConfig> {
        let mut visited: HashSet<PathBuf> = HashSet::new();
        let mut queue: VecDeque<PathBuf> = VecDeque::from([root.to_path_buf()]);
        let mut root_config: Option<ProjectConfig> = None;

        while let Some(current) = queue.pop_front() {
            if !visited.insert(current.clone()) {
                continue;
            }
            if !current.is_file() {
                tracing::debug!("Skipping missing config {}", current.display());
                continue;
            }

            let config = tsconfig::load(&current)?;
            tracing::trace!("Visited {} ({} files)", current.display(), config.root_files.len());

            if config.includes(file) {
                tracing::debug!("{} governs {}", current.display(), file.display());
                return Ok(config);
            }

            for reference in &config.references {
                if !visited.contains(reference) {
                    queue.push_back(reference.clone());
                }
            }

            if root_config.is_none() {
                root_config = Some(config);
            }
        }

        tracing::debug!(
            "No config includes {}, falling back to {}",
            file.display(),
            root.display()
        );
        match root_config {
            Some(config) => Ok(config),
            None => tsconfig::load(root),
        }
    }

    /// Program inputs for `file`; membership is required whenever a config was resolved
    pub fn settings(&self, file: &Path, explicit: Option<&Path>) -> LscodeResult<ProjectSettings> {
        let file = absolutize(&self.cwd, file);

        match self.resolve(&file, explicit)? {
            Some(config) => {
                if !config.includes(&file) {
                    return Err(TsconfigError::FileNotInProject {
                        file,
                        config: config.source_path,
                    }
                    .into());
                }
                Ok(ProjectSettings {
                    root_files: config.root_files,
                    options: config.options,
                    cwd: self.cwd.clone(),
                    config_path: Some(config.source_path),
                })
            }
            None => Ok(ProjectSettings {
                root_files: vec![file],
                options: CompilerOptions::new(),
                cwd: self.cwd.clone(),
                config_path: None,
            }),
        }
    }
}
