//! Client configuration
//!
//! Settings can come from a YAML file, from `AIRTABLE_*` environment
//! variables, or from the builder. Environment values override file values.
//!
//! ```yaml
//! api_key: keyXXXXXXXX
//! personal_token: patXXXXXXXX
//! base: appXXXXXXXX
//! process: true
//! cache:
//!   url: https://cache.example.com/airtable/v0
//!   token: mw-secret
//! http:
//!   timeout_secs: 30
//!   rate_limit:
//!     requests_per_second: 5
//!     burst_size: 5
//! ```

use crate::auth::Credentials;
use crate::error::{Error, Result};
use crate::http::{HttpClientConfig, RateLimiterConfig};
use crate::types::OptionStringExt;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Airtable REST API root
pub const DEFAULT_API_URL: &str = "https://api.airtable.com/v0";

// ============================================================================
// Client Config
// ============================================================================

/// Complete client configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Primary API key or token for record operations
    #[serde(default)]
    pub api_key: Option<String>,

    /// Personal access token for the webhook endpoints
    #[serde(default)]
    pub personal_token: Option<String>,

    /// Caching middleware for reads
    #[serde(default)]
    pub cache: Option<CacheConfig>,

    /// Default base id, used when a call does not name one
    #[serde(default)]
    pub base: Option<String>,

    /// Default for flat-row processing
    #[serde(default)]
    pub process: bool,

    /// API root URL
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// HTTP settings
    #[serde(default)]
    pub http: HttpSettings,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            personal_token: None,
            cache: None,
            base: None,
            process: false,
            api_url: default_api_url(),
            http: HttpSettings::default(),
        }
    }
}

/// Caching middleware endpoint and token
#[derive(Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Root URL that mirrors the API's `/{base}/{table}` layout
    pub url: String,
    /// Value sent in the `X-Mw-Bearer` header
    pub token: String,
}

/// HTTP settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpSettings {
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Rate limit, `null` to disable
    #[serde(default = "default_rate_limit")]
    pub rate_limit: Option<RateLimiterConfig>,

    /// Override the user agent
    #[serde(default)]
    pub user_agent: Option<String>,
}

fn default_timeout_secs() -> u64 {
    30
}

#[allow(clippy::unnecessary_wraps)]
fn default_rate_limit() -> Option<RateLimiterConfig> {
    Some(RateLimiterConfig::default())
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            rate_limit: default_rate_limit(),
            user_agent: None,
        }
    }
}

impl ClientConfig {
    /// Create a new config builder
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Load configuration from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.display().to_string(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Parse configuration from YAML text
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Configuration from environment variables only
    pub fn from_env() -> Self {
        Self::default().with_env()
    }

    /// Override fields from the process environment
    #[must_use]
    pub fn with_env(self) -> Self {
        self.with_env_from(|name| std::env::var(name).ok())
    }

    /// Override fields from `AIRTABLE_*` variables found by `lookup`
    ///
    /// Empty values are ignored. The cache route is only replaced when both
    /// its URL and token are available.
    #[must_use]
    pub fn with_env_from<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).none_if_empty();

        if let Some(key) = var("AIRTABLE_API_KEY") {
            self.api_key = Some(key);
        }
        if let Some(token) = var("AIRTABLE_PERSONAL_TOKEN") {
            self.personal_token = Some(token);
        }
        if let Some(base) = var("AIRTABLE_BASE") {
            self.base = Some(base);
        }
        if let Some(url) = var("AIRTABLE_API_URL") {
            self.api_url = url;
        }

        let cache_url = var("AIRTABLE_CACHE_URL");
        let cache_token = var("AIRTABLE_CACHE_TOKEN");
        match (cache_url, cache_token) {
            (Some(url), Some(token)) => self.cache = Some(CacheConfig { url, token }),
            (Some(url), None) => {
                if let Some(cache) = self.cache.as_mut() {
                    cache.url = url;
                }
            }
            (None, Some(token)) => {
                if let Some(cache) = self.cache.as_mut() {
                    cache.token = token;
                }
            }
            (None, None) => {}
        }

        self
    }

    /// Check that the configuration can build a client
    pub fn validate(&self) -> Result<()> {
        if self.api_key.as_deref().map_or(true, str::is_empty) {
            return Err(Error::missing_field("api_key"));
        }
        Url::parse(&self.api_url)
            .map_err(|e| Error::invalid_value("api_url", e.to_string()))?;
        if let Some(cache) = &self.cache {
            Url::parse(&cache.url)
                .map_err(|e| Error::invalid_value("cache.url", e.to_string()))?;
            if cache.token.is_empty() {
                return Err(Error::invalid_value("cache.token", "must not be empty"));
            }
        }
        if self.http.timeout_secs == 0 {
            return Err(Error::invalid_value("http.timeout_secs", "must be positive"));
        }
        Ok(())
    }

    /// Credentials described by this configuration
    pub fn credentials(&self) -> Result<Credentials> {
        let api_key = self
            .api_key
            .clone()
            .none_if_empty()
            .ok_or_else(|| Error::missing_field("api_key"))?;
        let mut credentials = Credentials::new(api_key);
        if let Some(token) = self.personal_token.clone().none_if_empty() {
            credentials = credentials.with_personal_token(token);
        }
        if let Some(cache) = &self.cache {
            credentials = credentials.with_cache_token(cache.token.clone());
        }
        Ok(credentials)
    }

    /// HTTP client configuration described by this configuration
    pub fn http_config(&self) -> HttpClientConfig {
        let mut builder =
            HttpClientConfig::builder().timeout(Duration::from_secs(self.http.timeout_secs));
        builder = match &self.http.rate_limit {
            Some(limit) => builder.rate_limit(limit.clone()),
            None => builder.no_rate_limit(),
        };
        if let Some(agent) = &self.http.user_agent {
            builder = builder.user_agent(agent.clone());
        }
        builder.build()
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("has_api_key", &self.api_key.is_some())
            .field("has_personal_token", &self.personal_token.is_some())
            .field("cache_url", &self.cache.as_ref().map(|c| c.url.as_str()))
            .field("base", &self.base)
            .field("process", &self.process)
            .field("api_url", &self.api_url)
            .field("http", &self.http)
            .finish()
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for client config
#[derive(Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Set the primary API key
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = Some(key.into());
        self
    }

    /// Set the personal access token
    pub fn personal_token(mut self, token: impl Into<String>) -> Self {
        self.config.personal_token = Some(token.into());
        self
    }

    /// Route reads through a caching middleware
    pub fn cache(mut self, url: impl Into<String>, token: impl Into<String>) -> Self {
        self.config.cache = Some(CacheConfig {
            url: url.into(),
            token: token.into(),
        });
        self
    }

    /// Set the default base
    pub fn base(mut self, base: impl Into<String>) -> Self {
        self.config.base = Some(base.into());
        self
    }

    /// Set the default process mode
    pub fn process(mut self, process: bool) -> Self {
        self.config.process = process;
        self
    }

    /// Set the API root URL
    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.config.api_url = url.into();
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.http.timeout_secs = timeout.as_secs().max(1);
        self
    }

    /// Set the rate limit
    pub fn rate_limit(mut self, config: RateLimiterConfig) -> Self {
        self.config.http.rate_limit = Some(config);
        self
    }

    /// Disable rate limiting
    pub fn no_rate_limit(mut self) -> Self {
        self.config.http.rate_limit = None;
        self
    }

    /// Build the config
    pub fn build(self) -> ClientConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert!(!config.process);
        assert_eq!(config.http.timeout_secs, 30);
        assert!(config.http.rate_limit.is_some());
    }

    #[test]
    fn test_from_yaml() {
        let config = ClientConfig::from_yaml_str(
            r"
api_key: key1
base: app1
process: true
cache:
  url: https://cache.example.com/airtable/v0
  token: mw1
http:
  timeout_secs: 10
  rate_limit: null
",
        )
        .unwrap();

        assert_eq!(config.api_key.as_deref(), Some("key1"));
        assert_eq!(config.base.as_deref(), Some("app1"));
        assert!(config.process);
        assert_eq!(config.cache.as_ref().unwrap().token, "mw1");
        assert_eq!(config.http.timeout_secs, 10);
        assert!(config.http.rate_limit.is_none());
        assert_eq!(config.api_url, DEFAULT_API_URL);
        config.validate().unwrap();
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "api_key: key1\nbase: app9").unwrap();

        let config = ClientConfig::from_file(file.path()).unwrap();
        assert_eq!(config.base.as_deref(), Some("app9"));

        let missing = ClientConfig::from_file("/nonexistent/airtable.yaml");
        assert!(matches!(missing, Err(Error::FileNotFound { .. })));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("AIRTABLE_API_KEY", "env-key"),
            ("AIRTABLE_BASE", ""),
            ("AIRTABLE_CACHE_URL", "https://mw.example.com/v0"),
            ("AIRTABLE_CACHE_TOKEN", "env-mw"),
        ]
        .into_iter()
        .collect();

        let config = ClientConfig::builder()
            .api_key("file-key")
            .base("appFile")
            .build()
            .with_env_from(|name| env.get(name).map(|v| (*v).to_string()));

        assert_eq!(config.api_key.as_deref(), Some("env-key"));
        // Empty values do not override
        assert_eq!(config.base.as_deref(), Some("appFile"));
        assert_eq!(config.cache.as_ref().unwrap().url, "https://mw.example.com/v0");
    }

    #[test]
    fn test_env_cache_token_alone_needs_url() {
        let config = ClientConfig::default()
            .with_env_from(|name| (name == "AIRTABLE_CACHE_TOKEN").then(|| "t".to_string()));
        assert!(config.cache.is_none());
    }

    #[test]
    fn test_validate() {
        assert!(matches!(
            ClientConfig::default().validate(),
            Err(Error::MissingConfigField { .. })
        ));

        let bad_url = ClientConfig::builder().api_key("k").api_url("not a url").build();
        assert!(matches!(
            bad_url.validate(),
            Err(Error::InvalidConfigValue { ref field, .. }) if field == "api_url"
        ));

        let bad_cache = ClientConfig::builder()
            .api_key("k")
            .cache("https://mw.example.com", "")
            .build();
        assert!(bad_cache.validate().is_err());
    }

    #[test]
    fn test_credentials() {
        let config = ClientConfig::builder()
            .api_key("k")
            .personal_token("pat")
            .cache("https://mw.example.com", "mw")
            .build();
        let creds = config.credentials().unwrap();
        assert!(creds.has_cache_token());
        assert!(creds.has_personal_token());

        assert!(ClientConfig::default().credentials().is_err());
    }

    #[test]
    fn test_http_config() {
        let config = ClientConfig::builder()
            .api_key("k")
            .timeout(Duration::from_secs(5))
            .no_rate_limit()
            .build();
        let http = config.http_config();
        assert_eq!(http.timeout, Duration::from_secs(5));
        assert!(http.rate_limit.is_none());
    }

    #[test]
    fn test_debug_redacts() {
        let config = ClientConfig::builder().api_key("secret").build();
        assert!(!format!("{config:?}").contains("secret"));
    }
}
