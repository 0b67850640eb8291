//! Request and response values exchanged with a [`Transport`](super::Transport)

use crate::error::{Error, Result};
use crate::types::{JsonValue, Method};
use serde::de::DeserializeOwned;
use tracing::error;
use url::Url;

/// A fully assembled request
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: Url,
    /// Request headers, in addition to the transport's defaults
    pub headers: Vec<(String, String)>,
    /// Query parameters; keys may repeat
    pub query: Vec<(String, String)>,
    /// JSON body
    pub body: Option<JsonValue>,
}

impl HttpRequest {
    /// Create a request with no headers, query or body
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: Vec::new(),
            query: Vec::new(),
            body: None,
        }
    }

    /// Add a header
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    /// Add several headers
    #[must_use]
    pub fn headers<I>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        self.headers.extend(headers);
        self
    }

    /// Add a query parameter
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Set JSON body
    #[must_use]
    pub fn json(mut self, body: JsonValue) -> Self {
        self.body = Some(body);
        self
    }
}

/// Status and body of a completed request
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    /// Parsed body; `Null` when empty, a JSON string when not valid JSON
    pub body: JsonValue,
    /// Raw body text
    pub text: String,
}

impl HttpResponse {
    /// Build a response from raw body text
    pub fn from_text(status: u16, text: String) -> Self {
        let body = if text.trim().is_empty() {
            JsonValue::Null
        } else {
            serde_json::from_str(&text).unwrap_or_else(|_| JsonValue::String(text.clone()))
        };
        Self { status, body, text }
    }

    /// Build a response from a JSON body
    pub fn from_json(status: u16, body: JsonValue) -> Self {
        let text = body.to_string();
        Self { status, body, text }
    }

    /// Check for a 2xx status
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Deserialize the body
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(self.body.clone())
            .map_err(|e| Error::decode(format!("unexpected response body: {e}")))
    }

    /// Fail on any non-2xx status
    ///
    /// The service's error payload is logged before the error is returned.
    /// Nothing is retried.
    pub fn error_for_status(self) -> Result<Self> {
        if self.is_success() {
            return Ok(self);
        }
        log_service_error(self.status, &self.body);
        Err(Error::http_status(self.status, self.text))
    }
}

/// Log the error Airtable reported, as precisely as its shape allows
///
/// Structured errors look like `{"error": {"type": …, "message": …}}`; some
/// endpoints send `{"error": "NOT_FOUND"}` instead.
fn log_service_error(status: u16, body: &JsonValue) {
    let Some(payload) = body.get("error") else {
        error!("Request failed with status {}: {}", status, body);
        return;
    };

    let kind = payload.get("type").and_then(JsonValue::as_str);
    let message = payload.get("message").and_then(JsonValue::as_str);
    match (kind, message) {
        (Some(kind), Some(message)) => {
            error!("Airtable {} error ({}): \"{}\"", kind, status, message);
        }
        _ => error!("Airtable error ({}): {}", status, payload),
    }
}
