//! Per-request view values and HTTP error mapping.
//!
//! A [`View`] binds an engine handle, a template name, a success status,
//! and the variables for one request; converting it into a response runs
//! the render. Failures go through [`error_response`], which is the one
//! place render errors become client-visible.

use std::sync::Arc;

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use tracing::{debug, error};

use crate::engine::ViewEngine;
use crate::error::RenderError;
use crate::ViewData;

/// Content type of rendered view bodies.
pub const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

const TEXT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";
const GENERIC_ERROR_BODY: &str = "Internal Server Error";

/// A view bound to one request.
///
/// Created per request and discarded after conversion; never cached or
/// shared. The variable mapping is required, possibly empty.
#[derive(Debug)]
pub struct View {
    engine: Arc<ViewEngine>,
    name: String,
    status: u16,
    data: ViewData,
}

impl View {
    pub fn new(engine: Arc<ViewEngine>, name: impl Into<String>, data: ViewData) -> Self {
        Self {
            engine,
            name: name.into(),
            status: 200,
            data,
        }
    }

    /// Override the success status code (the default is 200).
    #[must_use]
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }
}

impl IntoResponse for View {
    fn into_response(self) -> Response {
        match self.engine.render(&self.name, &self.data) {
            Ok(body) => (
                status_or_500(self.status),
                [(header::CONTENT_TYPE, HTML_CONTENT_TYPE)],
                body,
            )
                .into_response(),
            Err(err) => error_response(&err),
        }
    }
}

impl IntoResponse for RenderError {
    fn into_response(self) -> Response {
        error_response(&self)
    }
}

/// Map a render failure to its HTTP response.
///
/// [`RenderError::Status`] is intentional and user-facing: the response
/// carries exactly its code and message. Every other failure is logged
/// server-side and reported as a plain 500, never the raw error text.
/// Callers apply this exactly once, where the failure leaves the render
/// pipeline.
pub fn error_response(err: &RenderError) -> Response {
    if let RenderError::Status { status, message } = err {
        debug!(status = %status, message = %message, "serving status error");
        return (
            status_or_500(*status),
            [(header::CONTENT_TYPE, TEXT_CONTENT_TYPE)],
            message.clone(),
        )
            .into_response();
    }

    error!(error = %err, "view render failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        [(header::CONTENT_TYPE, TEXT_CONTENT_TYPE)],
        GENERIC_ERROR_BODY,
    )
        .into_response()
}

fn status_or_500(status: u16) -> StatusCode {
    StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}
