//! # Render Error Types
//!
//! The failure taxonomy for the view pipeline: everything that can go wrong
//! between a logical name arriving and a body leaving, plus the explicit
//! status-carrying failure a handler raises on purpose.

use std::io;

use thiserror::Error;

/// Render operation result type
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors produced while resolving, composing, or executing views.
///
/// Failures bubble unmodified to the top-level render call; nothing is
/// retried. Only [`RenderError::Status`] is user-facing; every other
/// variant maps to a generic 500 so internal detail never reaches clients.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("template not found: {name}")]
    NotFound {
        name: String,
        #[source]
        source: Option<io::Error>,
    },

    #[error("invalid template '{name}': {source}")]
    Invalid {
        name: String,
        #[source]
        source: tera::Error,
    },

    #[error("execution failed for '{name}': {source}")]
    Exec {
        name: String,
        #[source]
        source: tera::Error,
    },

    #[error("status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("engine configuration error: {0}")]
    Config(String),

    #[error("write failed: {0}")]
    Write(#[from] io::Error),
}

impl RenderError {
    /// Create a not-found error for a logical template name.
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound {
            name: name.into(),
            source: None,
        }
    }

    /// Create an intentional, user-facing failure carrying its own HTTP
    /// status code and message.
    pub fn with_status(status: u16, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
        }
    }

    /// HTTP status this error maps to.
    ///
    /// `Status` carries its own code; everything else is an internal
    /// failure and reports 500.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            RenderError::Status { status, .. } => *status,
            _ => 500,
        }
    }

    /// Whether the error message is safe to send to the client.
    ///
    /// Only `Status` messages are chosen by the caller; the rest carry
    /// template paths and evaluator detail that stay server-side.
    #[must_use]
    pub fn is_user_facing(&self) -> bool {
        matches!(self, RenderError::Status { .. })
    }
}
