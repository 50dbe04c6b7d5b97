//! Request descriptors and the response envelope
//!
//! The dispatcher never fails a call with `Err`: every outcome is a
//! [`ResponseEnvelope`]. Remote payloads are carried untouched in
//! [`ResponseEnvelope::Remote`]; failures detected locally are tagged with a
//! [`LocalFailure`] and only rendered into the service's
//! `{"errors": [{"title", "detail"}]}` shape at the edge.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::constants::{TITLE_MAX_DEPTH, TITLE_REQUEST_FAILED, TITLE_TIMEOUT, TITLE_TOKEN_MISSING};

/// HTTP verbs used by the v4 API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One logical call, including its retries.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    /// Path below `/v4/{firm_id}`, query string included.
    pub path: String,
    pub method: HttpMethod,
    pub body: Option<Value>,
    /// Unauthorized retries already spent.
    pub retry_count: u32,
}

impl RequestDescriptor {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self { path: path.into(), method, body: None, retry_count: 0 }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self::new(HttpMethod::Post, path).with_body(body)
    }

    pub fn put(path: impl Into<String>, body: Value) -> Self {
        Self::new(HttpMethod::Put, path).with_body(body)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Patch, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, path)
    }

    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    #[must_use]
    pub fn with_retry_count(mut self, retry_count: u32) -> Self {
        self.retry_count = retry_count;
        self
    }
}

/// Failures detected on this side of the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocalFailure {
    /// The token manager could not produce an access token.
    TokenMissing,
    /// An attempt exceeded its deadline.
    Timeout,
    /// Connection failure or an unreadable response body.
    TransportError,
    /// The service kept answering 401 past the retry bound.
    MaxDepth,
}

impl LocalFailure {
    /// Title used in the rendered envelope; the detail carries the same text.
    pub const fn title(self) -> &'static str {
        match self {
            Self::TokenMissing => TITLE_TOKEN_MISSING,
            Self::Timeout => TITLE_TIMEOUT,
            Self::TransportError => TITLE_REQUEST_FAILED,
            Self::MaxDepth => TITLE_MAX_DEPTH,
        }
    }

    pub fn error_detail(self) -> ErrorDetail {
        ErrorDetail { title: self.title().to_string(), detail: self.title().to_string() }
    }
}

impl fmt::Display for LocalFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// One entry of an `errors` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub title: String,
    pub detail: String,
}

/// Outcome of a dispatched request.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseEnvelope {
    /// Parsed body returned by the service, unmodified.
    Remote(Value),
    /// Failure synthesized locally.
    Local(LocalFailure),
}

impl ResponseEnvelope {
    /// Envelope for a `DELETE` answered with `204 No Content`.
    pub fn empty() -> Self {
        Self::Remote(Value::Object(serde_json::Map::new()))
    }

    pub const fn local_failure(&self) -> Option<LocalFailure> {
        match self {
            Self::Local(kind) => Some(*kind),
            Self::Remote(_) => None,
        }
    }

    pub const fn is_local_failure(&self) -> bool {
        matches!(self, Self::Local(_))
    }

    /// Errors carried by the envelope, whether synthesized or remote.
    ///
    /// Remote entries that do not have string `title`/`detail` fields are
    /// skipped.
    pub fn errors(&self) -> Vec<ErrorDetail> {
        match self {
            Self::Local(kind) => vec![kind.error_detail()],
            Self::Remote(body) => body
                .get("errors")
                .and_then(Value::as_array)
                .map(|entries| {
                    entries
                        .iter()
                        .filter_map(|entry| serde_json::from_value(entry.clone()).ok())
                        .collect()
                })
                .unwrap_or_default(),
        }
    }

    pub fn has_errors(&self) -> bool {
        match self {
            Self::Local(_) => true,
            Self::Remote(body) => body.get("errors").is_some(),
        }
    }

    /// Render into the service's JSON shape.
    pub fn into_value(self) -> Value {
        match self {
            Self::Remote(body) => body,
            Self::Local(kind) => json!({
                "errors": [{ "title": kind.title(), "detail": kind.title() }]
            }),
        }
    }
}

impl From<ResponseEnvelope> for Value {
    fn from(envelope: ResponseEnvelope) -> Self {
        envelope.into_value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_failures_render_title_and_detail() {
        let rendered = ResponseEnvelope::Local(LocalFailure::MaxDepth).into_value();
        assert_eq!(
            rendered,
            json!({"errors": [{"title": "Max depth reached", "detail": "Max depth reached"}]})
        );

        assert_eq!(LocalFailure::TokenMissing.title(), "Access token not found");
        assert_eq!(LocalFailure::Timeout.title(), "Request timed out");
        assert_eq!(LocalFailure::TransportError.title(), "Request failed");
    }

    #[test]
    fn remote_payload_passes_through() {
        let body = json!({"data": [{"id": "1", "type": "contacts"}], "meta": {"total_count": 1}});
        let envelope = ResponseEnvelope::Remote(body.clone());

        assert!(!envelope.is_local_failure());
        assert!(!envelope.has_errors());
        assert_eq!(envelope.into_value(), body);
    }

    #[test]
    fn remote_errors_are_exposed() {
        let envelope = ResponseEnvelope::Remote(json!({
            "errors": [
                {"title": "Validation", "detail": "name can't be blank"},
                {"code": 12}
            ]
        }));

        assert!(envelope.has_errors());
        assert_eq!(
            envelope.errors(),
            vec![ErrorDetail { title: "Validation".into(), detail: "name can't be blank".into() }]
        );
    }

    #[test]
    fn empty_envelope_is_an_empty_object() {
        assert_eq!(ResponseEnvelope::empty().into_value(), json!({}));
    }

    #[test]
    fn descriptor_builders() {
        let descriptor = RequestDescriptor::put("/contacts/1", json!({"data": {}}));
        assert_eq!(descriptor.method, HttpMethod::Put);
        assert_eq!(descriptor.retry_count, 0);
        assert!(descriptor.body.is_some());

        let descriptor = RequestDescriptor::delete("/contacts/1").with_retry_count(2);
        assert_eq!(descriptor.method.as_str(), "DELETE");
        assert_eq!(descriptor.retry_count, 2);
        assert!(descriptor.body.is_none());
    }
}
