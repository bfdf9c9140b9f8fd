//! Content-negotiation helpers.
//!
//! Straight-line encode-and-write responses: each helper sets the content
//! type for one format, serializes the value, and builds the response.
//! Formatting toggles live on the [`Responder`] value the application
//! constructs once, not in process-wide globals.

use std::fs;
use std::io::Read;
use std::path::Path;

use axum::body::Body;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

/// Content type constants served by the helpers.
pub const CONTENT_TEXT: &str = "text/plain";
pub const CONTENT_HTML: &str = "text/html";
pub const CONTENT_JSON: &str = "application/json";
pub const CONTENT_JSONP: &str = "application/javascript";
pub const CONTENT_XML: &str = "text/xml";
pub const CONTENT_YAML: &str = "application/x-yaml";
pub const CONTENT_BINARY: &str = "application/octet-stream";

/// Failures from the negotiation helpers.
#[derive(Debug, Error)]
pub enum RespondError {
    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML encoding failed: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("XML encoding failed: {0}")]
    Xml(#[from] quick_xml::SeError),

    #[error("JSONP callback can not be empty")]
    EmptyCallback,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("response build failed: {0}")]
    Http(#[from] axum::http::Error),
}

impl IntoResponse for RespondError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "respond helper failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            "Internal Server Error",
        )
            .into_response()
    }
}

/// Encoding options for the negotiation helpers.
///
/// Construct one per application (the defaults turn everything off) and
/// share it; every method is `&self`.
#[derive(Debug, Clone, Default)]
pub struct Responder {
    /// Prepended to JSON bodies, for anti-hijacking prefixes like `")]}',"`.
    pub json_prefix: String,
    /// Pretty-print JSON bodies.
    pub json_indent: bool,
    /// Prepended to XML bodies, typically an XML declaration.
    pub xml_prefix: String,
    /// Pretty-print XML bodies.
    pub xml_indent: bool,
    /// Emit `<`, `>`, `&` in JSON output as `\u003c`-style escapes
    /// so bodies can be embedded in HTML contexts.
    pub escape_html: bool,
}

impl Responder {
    pub fn new() -> Self {
        Self::default()
    }

    /// 204 with an empty body.
    pub fn no_content(&self) -> Result<Response, RespondError> {
        Ok(StatusCode::NO_CONTENT.into_response())
    }

    /// Raw bytes. No content type is set; headers are the caller's
    /// business.
    pub fn raw(
        &self,
        status: StatusCode,
        body: impl Into<Vec<u8>>,
    ) -> Result<Response, RespondError> {
        Response::builder()
            .status(status)
            .body(Body::from(body.into()))
            .map_err(RespondError::from)
    }

    /// Plain text.
    pub fn text(
        &self,
        status: StatusCode,
        body: impl Into<String>,
    ) -> Result<Response, RespondError> {
        self.build(status, CONTENT_TEXT, Body::from(body.into()))
    }

    /// HTML markup, written verbatim. The caller vouches for the content.
    pub fn html(
        &self,
        status: StatusCode,
        body: impl Into<String>,
    ) -> Result<Response, RespondError> {
        self.build(status, CONTENT_HTML, Body::from(body.into()))
    }

    /// JSON-encoded body, honoring `json_prefix`, `json_indent`, and
    /// `escape_html`.
    pub fn json<T: Serialize>(
        &self,
        status: StatusCode,
        value: &T,
    ) -> Result<Response, RespondError> {
        let json = self.encode_json(value)?;
        let mut body = Vec::with_capacity(self.json_prefix.len() + json.len());
        body.extend_from_slice(self.json_prefix.as_bytes());
        body.extend_from_slice(&json);
        self.build(status, CONTENT_JSON, Body::from(body))
    }

    /// JSONP: the JSON body wrapped as `callback(...);`. The prefix toggle
    /// does not apply; indent and escape do.
    pub fn jsonp<T: Serialize>(
        &self,
        status: StatusCode,
        callback: &str,
        value: &T,
    ) -> Result<Response, RespondError> {
        if callback.is_empty() {
            return Err(RespondError::EmptyCallback);
        }
        let json = self.encode_json(value)?;
        let mut body = Vec::with_capacity(callback.len() + json.len() + 3);
        body.extend_from_slice(callback.as_bytes());
        body.push(b'(');
        body.extend_from_slice(&json);
        body.extend_from_slice(b");");
        self.build(status, CONTENT_JSONP, Body::from(body))
    }

    /// XML-encoded body, honoring `xml_prefix` and `xml_indent`.
    ///
    /// The value must serialize to a single named root element: structs
    /// and newtypes work, bare maps and sequences do not.
    pub fn xml<T: Serialize>(
        &self,
        status: StatusCode,
        value: &T,
    ) -> Result<Response, RespondError> {
        let mut body = self.xml_prefix.clone();
        if self.xml_indent {
            let mut ser = quick_xml::se::Serializer::new(&mut body);
            ser.indent(' ', 1);
            value.serialize(ser)?;
        } else {
            body.push_str(&quick_xml::se::to_string(value)?);
        }
        self.build(status, CONTENT_XML, Body::from(body))
    }

    /// YAML-encoded body.
    pub fn yaml<T: Serialize>(
        &self,
        status: StatusCode,
        value: &T,
    ) -> Result<Response, RespondError> {
        let body = serde_yaml::to_string(value)?;
        self.build(status, CONTENT_YAML, Body::from(body))
    }

    /// Octet-stream from a reader, with a Content-Disposition filename.
    pub fn binary(
        &self,
        status: StatusCode,
        mut reader: impl Read,
        filename: &str,
        inline: bool,
    ) -> Result<Response, RespondError> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Response::builder()
            .status(status)
            .header(header::CONTENT_DISPOSITION, disposition(inline, filename))
            .header(header::CONTENT_TYPE, CONTENT_BINARY)
            .body(Body::from(bytes))
            .map_err(RespondError::from)
    }

    /// Serve reader-backed content with the type sniffed from its bytes,
    /// falling back to `filename`'s extension. The disposition carries
    /// `filename` verbatim; there is no source path to complete it from.
    pub fn file_reader(
        &self,
        status: StatusCode,
        mut reader: impl Read,
        filename: &str,
        inline: bool,
    ) -> Result<Response, RespondError> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        let mime = detect_content_type(&bytes, Path::new(filename));
        Response::builder()
            .status(status)
            .header(header::CONTENT_DISPOSITION, disposition(inline, filename))
            .header(header::CONTENT_TYPE, mime)
            .body(Body::from(bytes))
            .map_err(RespondError::from)
    }

    /// Serve a file inline, content type sniffed from its bytes.
    pub fn file_view(
        &self,
        status: StatusCode,
        path: impl AsRef<Path>,
        name: &str,
    ) -> Result<Response, RespondError> {
        self.file(status, path.as_ref(), name, true)
    }

    /// Serve a file as an attachment (download).
    pub fn file_download(
        &self,
        status: StatusCode,
        path: impl AsRef<Path>,
        name: &str,
    ) -> Result<Response, RespondError> {
        self.file(status, path.as_ref(), name, false)
    }

    fn file(
        &self,
        status: StatusCode,
        path: &Path,
        name: &str,
        inline: bool,
    ) -> Result<Response, RespondError> {
        let bytes = fs::read(path)?;
        let mime = detect_content_type(&bytes, path);
        let filename = download_name(path, name);
        Response::builder()
            .status(status)
            .header(header::CONTENT_TYPE, mime)
            .header(header::CONTENT_DISPOSITION, disposition(inline, &filename))
            .body(Body::from(bytes))
            .map_err(RespondError::from)
    }

    fn encode_json<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, RespondError> {
        let bytes = if self.json_indent {
            serde_json::to_vec_pretty(value)?
        } else {
            serde_json::to_vec(value)?
        };
        if self.escape_html {
            Ok(escape_html_bytes(&bytes))
        } else {
            Ok(bytes)
        }
    }

    fn build(
        &self,
        status: StatusCode,
        content_type: &'static str,
        body: Body,
    ) -> Result<Response, RespondError> {
        Response::builder()
            .status(status)
            .header(header::CONTENT_TYPE, content_type)
            .body(body)
            .map_err(RespondError::from)
    }
}

fn disposition(inline: bool, filename: &str) -> String {
    let kind = if inline { "inline" } else { "attachment" };
    format!("{kind}; filename={filename}")
}

/// Client-facing filename: the supplied name, completed with the source
/// file's extension when it lacks one; the file's own name when empty.
fn download_name(path: &Path, name: &str) -> String {
    if name.is_empty() {
        return path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
    }
    let ext = path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    if !ext.is_empty() && !name.ends_with(&ext) {
        return format!("{name}{ext}");
    }
    name.to_string()
}

/// Escape `<`, `>`, `&` as `\uXXXX` sequences. Safe to apply to whole JSON
/// output: those bytes only occur as string content, where the escape is
/// valid JSON.
fn escape_html_bytes(bytes: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(bytes.len());
    for &b in bytes {
        match b {
            b'<' => out.extend_from_slice(b"\\u003c"),
            b'>' => out.extend_from_slice(b"\\u003e"),
            b'&' => out.extend_from_slice(b"\\u0026"),
            _ => out.push(b),
        }
    }
    out
}

/// Sniff a content type from leading bytes, falling back to the file
/// extension for types without a useful signature.
fn detect_content_type(bytes: &[u8], path: &Path) -> &'static str {
    if bytes.starts_with(b"%PDF-") {
        return "application/pdf";
    }
    if bytes.starts_with(b"\x89PNG\r\n\x1a\n") {
        return "image/png";
    }
    if bytes.starts_with(&[0xff, 0xd8, 0xff]) {
        return "image/jpeg";
    }
    if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        return "image/gif";
    }
    if bytes.starts_with(b"PK\x03\x04") {
        return "application/zip";
    }
    if bytes.starts_with(&[0x1f, 0x8b]) {
        return "application/gzip";
    }

    match path.extension().and_then(|e| e.to_str()) {
        Some("html") | Some("htm") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("js") => "application/javascript; charset=utf-8",
        Some("json") => "application/json; charset=utf-8",
        Some("svg") => "image/svg+xml",
        Some("xml") => "application/xml",
        Some("txt") | Some("md") => "text/plain; charset=utf-8",
        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",
        Some("ico") => "image/x-icon",
        Some("webp") => "image/webp",
        Some("wasm") => "application/wasm",
        _ if std::str::from_utf8(bytes).is_ok() => "text/plain; charset=utf-8",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ---- download_name ----

    #[test]
    fn test_download_name_appends_missing_extension() {
        assert_eq!(
            download_name(Path::new("/tmp/report.pdf"), "summary"),
            "summary.pdf"
        );
    }

    #[test]
    fn test_download_name_keeps_matching_extension() {
        assert_eq!(
            download_name(Path::new("/tmp/report.pdf"), "summary.pdf"),
            "summary.pdf"
        );
    }

    #[test]
    fn test_download_name_empty_falls_back_to_file_name() {
        assert_eq!(download_name(Path::new("/tmp/report.pdf"), ""), "report.pdf");
    }

    #[test]
    fn test_download_name_extensionless_source() {
        assert_eq!(download_name(Path::new("/tmp/LICENSE"), "license"), "license");
    }

    // ---- escape_html_bytes ----

    #[test]
    fn test_escape_html_bytes() {
        assert_eq!(
            escape_html_bytes(br#"{"a":"<b>&"}"#),
            br#"{"a":"\u003cb\u003e\u0026"}"#
        );
    }

    // ---- detect_content_type ----

    #[test]
    fn test_detect_png_signature() {
        let bytes = b"\x89PNG\r\n\x1a\nrest";
        assert_eq!(detect_content_type(bytes, Path::new("x.bin")), "image/png");
    }

    #[test]
    fn test_detect_pdf_signature() {
        assert_eq!(
            detect_content_type(b"%PDF-1.7 ...", Path::new("report")),
            "application/pdf"
        );
    }

    #[test]
    fn test_detect_by_extension_when_no_signature() {
        assert_eq!(
            detect_content_type(b"body { color: red }", Path::new("site.css")),
            "text/css; charset=utf-8"
        );
    }

    #[test]
    fn test_detect_utf8_text_fallback() {
        assert_eq!(
            detect_content_type(b"plain words", Path::new("notes")),
            "text/plain; charset=utf-8"
        );
    }

    #[test]
    fn test_detect_binary_fallback() {
        assert_eq!(
            detect_content_type(&[0x00, 0xff, 0xfe, 0x00], Path::new("blob")),
            "application/octet-stream"
        );
    }

    // ---- disposition ----

    #[test]
    fn test_disposition_inline_and_attachment() {
        assert_eq!(disposition(true, "a.txt"), "inline; filename=a.txt");
        assert_eq!(disposition(false, "a.txt"), "attachment; filename=a.txt");
    }
}
