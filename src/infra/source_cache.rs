//! Per-invocation source cache
//!
//! Each file is read from disk at most once; later requests share the
//! same buffer. Keys are absolute, normalized paths.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::{LscodeError, LscodeResult};

#[derive(Debug, Default)]
pub struct SourceCache {
    entries: HashMap<PathBuf, Arc<str>>,
    reads: usize,
}

impl SourceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Contents of `path`, reading it on first request
    pub fn read(&mut self, path: &Path) -> LscodeResult<Arc<str>> {
        if let Some(text) = self.entries.get(path) {
            return Ok(Arc::clone(text));
        }

        let bytes = std::fs::read(path).map_err(|e| LscodeError::io(path, e))?;
        let text: Arc<str> = match String::from_utf8(bytes) {
            Ok(text) => text.into(),
            Err(e) => String::from_utf8_lossy(e.as_bytes()).into(),
        };
        self.reads += 1;
        tracing::trace!("Read {} ({} bytes)", path.display(), text.len());

        self.entries.insert(path.to_path_buf(), Arc::clone(&text));
        Ok(text)
    }

    /// Like [`read`](Self::read), but returns `None` for files above `max_bytes`
    pub fn read_within(&mut self, path: &Path, max_bytes: u64) -> LscodeResult<Option<Arc<str>>> {
        if !self.entries.contains_key(path) && max_bytes != u64::MAX {
            let meta = std::fs::metadata(path).map_err(|e| LscodeError::io(path, e))?;
            if meta.len() > max_bytes {
                tracing::warn!(
                    "Skipping large file ({}MB): {}",
                    meta.len() / 1024 / 1024,
                    path.display()
                );
                return Ok(None);
            }
        }
        self.read(path).map(Some)
    }

    /// Number of distinct files read from disk
    pub fn disk_reads(&self) -> usize {
        self.reads
    }
}
