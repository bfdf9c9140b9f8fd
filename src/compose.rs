//! Layout composition.
//!
//! Merges a content template with an optional master layout into one
//! executable unit. The content source is registered under the reserved
//! name [`CONTENT_TEMPLATE`]; a master embeds it where it chooses with
//! `{% include "content" %}` and becomes the unit's entry point.

use tera::{Context, Tera};

use crate::config::{Config, Delims};
use crate::error::{RenderError, RenderResult};
use crate::ViewData;

/// Reserved internal name under which the page body is registered. A
/// master layout references it: `{% include "content" %}`.
pub const CONTENT_TEMPLATE: &str = "content";

/// Reserved internal name under which the master layout is registered.
pub const MASTER_TEMPLATE: &str = "master";

/// Extensions whose rendered output is HTML-escaped by the evaluator.
const ESCAPED_EXTENSIONS: [&str; 3] = [".html", ".htm", ".xml"];

/// A compiled, executable view: the content template and its layout,
/// parsed together into one evaluator instance.
///
/// Immutable once built and shared across renders behind an `Arc`; the
/// logical names are kept for error attribution.
#[derive(Debug)]
pub struct CompiledView {
    tera: Tera,
    entry: &'static str,
    name: String,
    master: Option<String>,
}

impl CompiledView {
    /// Compose a content source with an optional master layout source.
    ///
    /// `name` is the content's logical name; the master's logical name is
    /// taken from `config.master`. Parse failures surface as
    /// [`RenderError::Invalid`] naming whichever source failed. Composing
    /// the same sources twice yields units that produce byte-identical
    /// output for identical variables.
    pub fn compose(
        config: &Config,
        name: &str,
        content_source: &str,
        master_source: Option<&str>,
    ) -> RenderResult<Self> {
        let mut tera = Tera::default();
        // The evaluator escapes by template-name suffix; the fixed internal
        // names never match its defaults, so opt them in when the
        // configured extension is an escaped format.
        if ESCAPED_EXTENSIONS.contains(&config.extension.as_str()) {
            tera.autoescape_on(vec![CONTENT_TEMPLATE, MASTER_TEMPLATE]);
        }

        let content_source = apply_delims(content_source, config.delims.as_ref());
        tera.add_raw_template(CONTENT_TEMPLATE, &content_source)
            .map_err(|e| RenderError::Invalid {
                name: name.to_string(),
                source: e,
            })?;

        let entry = match master_source {
            Some(master) => {
                let master = apply_delims(master, config.delims.as_ref());
                tera.add_raw_template(MASTER_TEMPLATE, &master).map_err(|e| {
                    RenderError::Invalid {
                        name: config.master.clone(),
                        source: e,
                    }
                })?;
                MASTER_TEMPLATE
            }
            None => CONTENT_TEMPLATE,
        };

        Ok(Self {
            tera,
            entry,
            name: name.to_string(),
            master: master_source.map(|_| config.master.clone()),
        })
    }

    /// Execute the unit against a variable mapping, producing the full body.
    pub fn execute(&self, data: &ViewData) -> RenderResult<String> {
        let mut context = Context::new();
        for (key, value) in data {
            context.insert(key, value);
        }
        self.tera
            .render(self.entry, &context)
            .map_err(|e| self.classify(e))
    }

    /// Includes resolve lazily, so a layout referencing a template that was
    /// never registered only fails here at execution. That is a defect of
    /// the composed unit, not of the variables: report it as `Invalid`
    /// against the layout. Everything else is an execution failure.
    fn classify(&self, err: tera::Error) -> RenderError {
        match &err.kind {
            tera::ErrorKind::TemplateNotFound(_) => RenderError::Invalid {
                name: self.master.clone().unwrap_or_else(|| self.name.clone()),
                source: err,
            },
            _ => RenderError::Exec {
                name: self.name.clone(),
                source: err,
            },
        }
    }
}

/// Rewrite custom expression delimiters to the evaluator's `{{`/`}}`.
/// Purely textual, applied before registration so the cached unit already
/// speaks the evaluator's syntax.
fn apply_delims(source: &str, delims: Option<&Delims>) -> String {
    match delims {
        Some(d) => source.replace(&d.left, "{{ ").replace(&d.right, " }}"),
        None => source.to_string(),
    }
}
