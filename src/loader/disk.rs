//! Filesystem-backed template store.

use std::fs;
use std::path::{Path, PathBuf};

use super::SourceLoader;
use crate::config::Config;
use crate::error::{RenderError, RenderResult};

/// Loads template sources from a directory tree under `config.root`.
///
/// An optional base directory anchors the configured root; without one,
/// `config.root` is resolved relative to the working directory.
#[derive(Debug, Clone, Default)]
pub struct DiskLoader {
    base: Option<PathBuf>,
}

impl DiskLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loader resolving `config.root` under `base`.
    pub fn with_base(base: impl Into<PathBuf>) -> Self {
        Self {
            base: Some(base.into()),
        }
    }

    fn path_for(&self, config: &Config, name: &str) -> PathBuf {
        let relative = Path::new(&config.root).join(config.filename(name));
        match &self.base {
            Some(base) => base.join(relative),
            None => relative,
        }
    }
}

impl SourceLoader for DiskLoader {
    fn load(&self, config: &Config, name: &str) -> RenderResult<String> {
        let path = self.path_for(config, name);
        // The handle is open only for the duration of the read.
        fs::read_to_string(&path).map_err(|e| RenderError::NotFound {
            name: name.to_string(),
            source: Some(e),
        })
    }
}
