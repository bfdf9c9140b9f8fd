//! Engine configuration.
//!
//! A [`Config`] is built in code, handed to the engine at construction, and
//! read-only from then on.

use crate::error::{RenderError, RenderResult};

/// Expression delimiter override for template sources.
///
/// Template sources written with custom markers are rewritten to the
/// evaluator's `{{`/`}}` before compilation, so `Delims { left: "[[",
/// right: "]]" }` lets templates interpolate with `[[ title ]]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delims {
    pub left: String,
    pub right: String,
}

impl Delims {
    pub fn new(left: impl Into<String>, right: impl Into<String>) -> Self {
        Self {
            left: left.into(),
            right: right.into(),
        }
    }
}

/// View engine configuration, fixed for the engine's lifetime.
#[derive(Debug, Clone)]
pub struct Config {
    /// Namespace the backing store resolves template names under.
    pub root: String,
    /// Logical name of the layout template. Empty means no layout.
    pub master: String,
    /// Suffix appended to logical names before loading, e.g. `".html"`.
    pub extension: String,
    /// Reload and recompile on every render. Development mode: template
    /// edits show up without restarting, at full compile cost per request.
    pub disable_cache: bool,
    /// Optional expression delimiter override.
    pub delims: Option<Delims>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root: "views".to_string(),
            master: "layouts/master".to_string(),
            extension: ".html".to_string(),
            disable_cache: false,
            delims: None,
        }
    }
}

impl Config {
    /// Logical filename for a template name: the name plus the extension.
    pub fn filename(&self, name: &str) -> String {
        format!("{}{}", name, self.extension)
    }

    /// Whether a master layout is configured.
    pub fn has_master(&self) -> bool {
        !self.master.is_empty()
    }

    pub(crate) fn validate(&self) -> RenderResult<()> {
        if !self.extension.is_empty() && !self.extension.starts_with('.') {
            return Err(RenderError::Config(format!(
                "extension must start with '.', got {:?}",
                self.extension
            )));
        }
        if let Some(delims) = &self.delims {
            if delims.left.is_empty() || delims.right.is_empty() {
                return Err(RenderError::Config(
                    "delimiters must be non-empty".to_string(),
                ));
            }
            if delims.left == delims.right {
                return Err(RenderError::Config(
                    "left and right delimiters must differ".to_string(),
                ));
            }
        }
        Ok(())
    }
}
