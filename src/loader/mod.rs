//! Template backing stores.
//!
//! A [`SourceLoader`] turns a logical template name into raw source text.
//! The engine is agnostic of the medium: the same engine logic runs
//! unmodified against the filesystem, an in-memory map, or a zip bundle,
//! differing only in which loader is installed.
//!
//! # Modules
//!
//! - [`disk`] — filesystem store resolving under `config.root`
//! - [`memory`] — owned in-memory map, for embedded assets and tests
//! - [`archive`] — zip bundle store (feature `archive`)

#[cfg(feature = "archive")]
mod archive;
mod disk;
mod memory;

#[cfg(feature = "archive")]
pub use archive::ZipLoader;
pub use disk::DiskLoader;
pub use memory::MemoryLoader;

use crate::config::Config;
use crate::error::RenderResult;

/// A backing store of template sources.
///
/// Implementations resolve the logical name plus `config.extension`
/// against their medium and return the raw template text. A missing
/// template is `RenderError::NotFound`; a loader may also return
/// `RenderError::Status` to signal an intentional, user-facing failure,
/// which the engine passes through unmodified.
pub trait SourceLoader: Send + Sync {
    fn load(&self, config: &Config, name: &str) -> RenderResult<String>;
}
