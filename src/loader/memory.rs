//! In-memory template store.

use std::collections::HashMap;

use super::SourceLoader;
use crate::config::Config;
use crate::error::{RenderError, RenderResult};

/// Owned map of logical filenames to template sources.
///
/// Keys carry the extension (`"home.html"`, not `"home"`); `config.root`
/// does not apply, matching embedded-asset stores where paths are baked in
/// at build time. Backs `include_str!` bundles and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryLoader {
    templates: HashMap<String, String>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a template source under its logical filename.
    pub fn add(&mut self, filename: impl Into<String>, source: impl Into<String>) {
        self.templates.insert(filename.into(), source.into());
    }
}

impl<K, V> FromIterator<(K, V)> for MemoryLoader
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            templates: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl SourceLoader for MemoryLoader {
    fn load(&self, config: &Config, name: &str) -> RenderResult<String> {
        self.templates
            .get(&config.filename(name))
            .cloned()
            .ok_or_else(|| RenderError::not_found(name))
    }
}
