//! View engine orchestration.
//!
//! The engine owns the configuration, the installed [`SourceLoader`], and
//! the compiled-view cache, and coordinates resolve, compose, cache, and
//! execute for every render.

use std::fmt;
use std::io::Write;
use std::sync::Arc;

use tracing::debug;

use crate::cache::ViewCache;
use crate::compose::CompiledView;
use crate::config::Config;
use crate::error::{RenderError, RenderResult};
use crate::loader::SourceLoader;
use crate::ViewData;

/// The view engine.
///
/// Constructed once and shared across request tasks as `Arc<ViewEngine>`;
/// configuration is fixed at construction and the cache is the only
/// internal mutable state.
pub struct ViewEngine {
    config: Config,
    loader: Option<Arc<dyn SourceLoader>>,
    cache: ViewCache,
}

impl fmt::Debug for ViewEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewEngine")
            .field("config", &self.config)
            .field("loader_installed", &self.loader.is_some())
            .finish_non_exhaustive()
    }
}

impl ViewEngine {
    /// Build an engine from a validated configuration. No I/O happens
    /// here; the first render does the loading.
    pub fn new(config: Config) -> RenderResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            loader: None,
            cache: ViewCache::new(),
        })
    }

    /// Build an engine and install its backing store in one step.
    pub fn with_loader(
        config: Config,
        loader: impl SourceLoader + 'static,
    ) -> RenderResult<Self> {
        let mut engine = Self::new(config)?;
        engine.set_loader(loader);
        Ok(engine)
    }

    /// Install the backing store. Must happen before the first render;
    /// rendering without one fails fast with [`RenderError::Config`].
    pub fn set_loader(&mut self, loader: impl SourceLoader + 'static) {
        self.loader = Some(Arc::new(loader));
    }

    /// Engine configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Render `name` against `data`, producing the complete body.
    ///
    /// The composed unit is cached under the raw name unless
    /// `disable_cache` is set; concurrent first renders of one name share
    /// a single compile.
    pub fn render(&self, name: &str, data: &ViewData) -> RenderResult<String> {
        let view = self.compiled(name)?;
        view.execute(data)
    }

    /// Render `name` against `data` into `writer`.
    ///
    /// The body is produced in full before anything is written, so a
    /// failed render leaves `writer` untouched.
    pub fn render_to<W: Write>(
        &self,
        writer: &mut W,
        name: &str,
        data: &ViewData,
    ) -> RenderResult<()> {
        let body = self.render(name, data)?;
        writer.write_all(body.as_bytes())?;
        Ok(())
    }

    /// Evict every cached view; the next render of each name recompiles.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    fn compiled(&self, name: &str) -> RenderResult<Arc<CompiledView>> {
        if self.config.disable_cache {
            debug!(template = %name, "cache disabled, compiling");
            return self.compile(name).map(Arc::new);
        }
        self.cache.get_or_compile(name, || {
            debug!(template = %name, "cache miss, compiling");
            self.compile(name).map(Arc::new)
        })
    }

    fn compile(&self, name: &str) -> RenderResult<CompiledView> {
        let loader = self
            .loader
            .as_ref()
            .ok_or_else(|| RenderError::Config("no source loader installed".to_string()))?;

        let content = loader.load(&self.config, name)?;
        let master = if self.config.has_master() {
            Some(loader.load(&self.config, &self.config.master)?)
        } else {
            None
        };
        CompiledView::compose(&self.config, name, &content, master.as_deref())
    }
}
