//! Zip-archive template store.

use std::io::{self, Cursor, Read};
use std::sync::{Mutex, PoisonError};

use zip::ZipArchive;

use super::SourceLoader;
use crate::config::Config;
use crate::error::{RenderError, RenderResult};

/// Loads template sources from an in-memory zip bundle.
///
/// Entry paths are `config.root` joined to the logical filename with `/`,
/// the archive path separator, so a bundle mirrors the on-disk views tree.
/// The central directory is parsed once at construction; entry handles are
/// scoped to each load.
#[derive(Debug)]
pub struct ZipLoader {
    archive: Mutex<ZipArchive<Cursor<Vec<u8>>>>,
}

impl ZipLoader {
    /// Build a loader over raw archive bytes (for example from
    /// `include_bytes!` or a bundle read at startup).
    pub fn new(bytes: Vec<u8>) -> io::Result<Self> {
        let archive = ZipArchive::new(Cursor::new(bytes))
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        Ok(Self {
            archive: Mutex::new(archive),
        })
    }

    fn entry_path(config: &Config, name: &str) -> String {
        let filename = config.filename(name);
        let root = config.root.trim_matches('/');
        if root.is_empty() {
            filename
        } else {
            format!("{root}/{filename}")
        }
    }
}

impl SourceLoader for ZipLoader {
    fn load(&self, config: &Config, name: &str) -> RenderResult<String> {
        let path = Self::entry_path(config, name);
        let mut archive = self
            .archive
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let mut entry = match archive.by_name(&path) {
            Ok(entry) => entry,
            Err(zip::result::ZipError::FileNotFound) => {
                return Err(RenderError::not_found(name));
            }
            Err(e) => {
                return Err(RenderError::NotFound {
                    name: name.to_string(),
                    source: Some(io::Error::new(io::ErrorKind::InvalidData, e)),
                });
            }
        };

        let mut source = String::new();
        entry
            .read_to_string(&mut source)
            .map_err(|e| RenderError::NotFound {
                name: name.to_string(),
                source: Some(e),
            })?;
        Ok(source)
    }
}
