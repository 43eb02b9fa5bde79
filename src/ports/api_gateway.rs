//! API gateway port - the single choke point for backend calls.
//!
//! # Contract
//!
//! - At most one attempt per call; nothing is retried.
//! - A `204 No Content` (or an empty success body) resolves to `None`.
//! - A non-success status is an [`ApiError`]; a transport failure is a
//!   [`ConnectionError`]. Callers can always tell "rejected" from "unreachable".
//! - Implementations log every failure exactly once before returning it.

use async_trait::async_trait;
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// HTTP methods the storefront uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// File part of a multipart upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    pub field: String,
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Transport-neutral multipart body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultipartForm {
    pub fields: Vec<(String, String)>,
    pub file: Option<FilePart>,
}

impl MultipartForm {
    pub fn new(fields: Vec<(String, String)>) -> Self {
        Self { fields, file: None }
    }

    pub fn with_file(mut self, file: FilePart) -> Self {
        self.file = Some(file);
        self
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// The backend could not be reached at all.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Connection Error: Could not reach the server ({method} {path}): {message}")]
pub struct ConnectionError {
    pub method: HttpMethod,
    pub path: String,
    pub message: String,
}

/// The backend answered with a non-success status.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("API request failed ({status}): {summary}")]
pub struct ApiError {
    pub status: u16,
    /// Parsed error body, or an empty object when the body was not JSON.
    pub detail: Value,
    pub summary: String,
}

impl ApiError {
    /// Builds the error and derives a readable summary from `detail`.
    pub fn new(status: u16, detail: Value) -> Self {
        let summary = summarize(status, &detail);
        Self {
            status,
            detail,
            summary,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status == 401 || self.status == 403
    }

    pub fn is_not_found(&self) -> bool {
        self.status == 404
    }
}

/// Flattens the usual DRF error shapes into one line.
///
/// `{"detail": "..."}` yields the detail. Field errors yield
/// `field: message; other: message`, nested field errors are labelled with
/// their dotted path (`items.quantity: ...`), and bare strings or lists are
/// used as they are. Anything else falls back to the status.
fn summarize(status: u16, detail: &Value) -> String {
    if let Some(text) = detail.get("detail").and_then(Value::as_str) {
        return text.to_string();
    }
    let mut parts = Vec::new();
    collect_messages(detail, None, &mut parts);
    if parts.is_empty() {
        format!("request failed with status {}", status)
    } else {
        parts.join("; ")
    }
}

fn push_message(out: &mut Vec<String>, field: Option<&str>, msg: &str) {
    let msg = msg.trim();
    if msg.is_empty() {
        return;
    }
    match field {
        Some(field) => out.push(format!("{}: {}", field, msg)),
        None => out.push(msg.to_string()),
    }
}

fn collect_messages(value: &Value, field: Option<&str>, out: &mut Vec<String>) {
    match value {
        Value::String(s) => push_message(out, field, s),
        Value::Array(items) => {
            // Sibling strings are one message split into sentences.
            let text = items
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join(" ");
            push_message(out, field, &text);
            for item in items.iter().filter(|v| !v.is_string()) {
                collect_messages(item, field, out);
            }
        }
        Value::Object(map) => {
            for (key, nested) in map {
                let label = match (field, key.as_str()) {
                    (parent, "non_field_errors" | "detail") => parent.map(str::to_string),
                    (Some(parent), key) => Some(format!("{}.{}", parent, key)),
                    (None, key) => Some(key.to_string()),
                };
                collect_messages(nested, label.as_deref(), out);
            }
        }
        _ => {}
    }
}

/// Failure of a single gateway call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GatewayError {
    #[error(transparent)]
    Connection(#[from] ConnectionError),

    #[error(transparent)]
    Api(#[from] ApiError),
}

impl GatewayError {
    pub fn is_connection(&self) -> bool {
        matches!(self, GatewayError::Connection(_))
    }

    /// Text suitable for showing to the user.
    pub fn user_message(&self) -> String {
        match self {
            GatewayError::Connection(_) => "Could not reach the server.".to_string(),
            GatewayError::Api(api) => api.summary.clone(),
        }
    }
}

/// Port for the backend REST API.
#[async_trait]
pub trait ApiGateway: Send + Sync {
    /// Sends a JSON request. `token`, when given, is attached as a bearer credential.
    async fn request(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> Result<Option<Value>, GatewayError>;

    /// Sends a multipart request (listing create/update with an image).
    async fn request_with_file(
        &self,
        method: HttpMethod,
        path: &str,
        form: MultipartForm,
        token: Option<&str>,
    ) -> Result<Value, GatewayError>;
}
