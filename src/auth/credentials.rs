//! Credential set and header assembly

use crate::error::{Error, Result};
use crate::http::HttpRequest;
use crate::types::Route;

/// Header carrying the caching middleware's token
pub const CACHE_AUTH_HEADER: &str = "X-Mw-Bearer";

/// Tokens the client authenticates with
#[derive(Clone)]
pub struct Credentials {
    api_key: String,
    personal_token: Option<String>,
    cache_token: Option<String>,
}

impl Credentials {
    /// Create credentials from the primary API key or token
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            personal_token: None,
            cache_token: None,
        }
    }

    /// Set the personal access token used for webhooks
    #[must_use]
    pub fn with_personal_token(mut self, token: impl Into<String>) -> Self {
        self.personal_token = Some(token.into());
        self
    }

    /// Set the caching middleware token
    #[must_use]
    pub fn with_cache_token(mut self, token: impl Into<String>) -> Self {
        self.cache_token = Some(token.into());
        self
    }

    pub fn has_cache_token(&self) -> bool {
        self.cache_token.is_some()
    }

    pub fn has_personal_token(&self) -> bool {
        self.personal_token.is_some()
    }

    /// Apply record-endpoint authentication for the given route
    ///
    /// Cache routing falls back to direct headers when no cache token is set.
    pub fn apply(&self, route: Route, request: HttpRequest) -> HttpRequest {
        let request = request
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json");
        match (route, &self.cache_token) {
            (Route::Cache, Some(token)) => request.header(CACHE_AUTH_HEADER, token.as_str()),
            _ => request,
        }
    }

    /// Apply webhook-endpoint authentication
    pub fn apply_webhook(&self, request: HttpRequest) -> Result<HttpRequest> {
        let token = self
            .personal_token
            .as_deref()
            .ok_or_else(|| Error::missing_field("personal_token"))?;
        Ok(request
            .header("Authorization", format!("Bearer {token}"))
            .header("Content-Type", "application/json"))
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<redacted>")
            .field("has_personal_token", &self.personal_token.is_some())
            .field("has_cache_token", &self.cache_token.is_some())
            .finish()
    }
}
