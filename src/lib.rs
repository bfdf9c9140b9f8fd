//! # teraview
//!
//! Server-side view rendering for web services: pluggable template stores,
//! master/content layout composition, a concurrency-safe compiled-view
//! cache, and render-failure-to-HTTP-status mapping.
//!
//! A template is addressed by logical name. The engine resolves the name
//! through the installed [`SourceLoader`], wraps it in the configured
//! master layout, compiles the pair once, and serves every later render
//! from the cache.
//!
//! ```
//! use teraview::{Config, MemoryLoader, ViewData, ViewEngine};
//!
//! let mut templates = MemoryLoader::new();
//! templates.add("index.html", "<h1>{{ title }}</h1>");
//!
//! let config = Config { master: String::new(), ..Config::default() };
//! let engine = ViewEngine::with_loader(config, templates)?;
//!
//! let mut data = ViewData::new();
//! data.insert("title".to_string(), "hello".into());
//! assert_eq!(engine.render("index", &data)?, "<h1>hello</h1>");
//! # Ok::<(), teraview::RenderError>(())
//! ```
//!
//! # Modules
//!
//! - [`engine`] — the view engine: resolve, compose, cache, execute
//! - [`config`] — engine configuration and delimiter overrides
//! - [`loader`] — the [`SourceLoader`] contract and the shipped stores
//! - [`compose`] — master/content composition into one executable unit
//! - [`cache`] — compiled-view cache with single-flight compilation
//! - [`error`] — the render failure taxonomy
//! - [`view`] — per-request views and HTTP error mapping (`web-api`)
//! - [`respond`] — content-negotiation helpers (`web-api`)

pub mod cache;
pub mod compose;
pub mod config;
pub mod engine;
pub mod error;
pub mod loader;
#[cfg(feature = "web-api")]
pub mod respond;
#[cfg(feature = "web-api")]
pub mod view;

pub use cache::ViewCache;
pub use compose::{CompiledView, CONTENT_TEMPLATE, MASTER_TEMPLATE};
pub use config::{Config, Delims};
pub use engine::ViewEngine;
pub use error::{RenderError, RenderResult};
#[cfg(feature = "archive")]
pub use loader::ZipLoader;
pub use loader::{DiskLoader, MemoryLoader, SourceLoader};
#[cfg(feature = "web-api")]
pub use respond::{RespondError, Responder};
#[cfg(feature = "web-api")]
pub use view::{error_response, View, HTML_CONTENT_TYPE};

/// Variable mapping handed to a render: the names a template sees, bound
/// to JSON values. Required on every render call, possibly empty.
pub type ViewData = std::collections::HashMap<String, serde_json::Value>;
