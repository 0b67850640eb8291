//! Webhook management
//!
//! Webhook endpoints authenticate with a personal access token and live under
//! `{api}/bases/{base}/webhooks`. Status handling is the same as for record
//! endpoints: anything outside 2xx fails the call without a retry.

mod types;


pub use types::{
    CreatedWebhook, PayloadsPage, RefreshResponse, Webhook, WebhookList, MAX_PAYLOAD_LIMIT,
};

use crate::auth::Credentials;
use crate::client::join_segments;
use crate::error::{Error, Result};
use crate::http::{HttpRequest, HttpResponse, Transport};
use crate::types::{JsonValue, Method};
use serde_json::json;
use tracing::{debug, info};
use types::CreateWebhookRequest;
use url::Url;

/// Webhook calls sharing a client's transport and credentials
pub struct WebhookClient<'a> {
    transport: &'a dyn Transport,
    credentials: &'a Credentials,
    api_url: &'a Url,
}

impl<'a> WebhookClient<'a> {
    pub(crate) fn new(
        transport: &'a dyn Transport,
        credentials: &'a Credentials,
        api_url: &'a Url,
    ) -> Self {
        Self {
            transport,
            credentials,
            api_url,
        }
    }

    /// Register a webhook for changes described by `specification`
    pub async fn create(
        &self,
        base: &str,
        specification: &JsonValue,
        notification_url: Option<&str>,
    ) -> Result<CreatedWebhook> {
        let body = serde_json::to_value(CreateWebhookRequest {
            notification_url,
            specification,
        })?;
        let url = self.url(base, &[])?;
        let created: CreatedWebhook = self.send(Method::POST, url, |r| r.json(body)).await?.json()?;
        info!("Created webhook {} on {}", created.id, base);
        Ok(created)
    }

    pub async fn delete(&self, base: &str, webhook_id: &str) -> Result<()> {
        let url = self.url(base, &[webhook_id])?;
        self.send(Method::DELETE, url, |r| r).await?;
        info!("Deleted webhook {} on {}", webhook_id, base);
        Ok(())
    }

    pub async fn list(&self, base: &str) -> Result<WebhookList> {
        let url = self.url(base, &[])?;
        self.send(Method::GET, url, |r| r).await?.json()
    }

    /// Poll payloads recorded since `cursor`
    ///
    /// `limit` may not exceed [`MAX_PAYLOAD_LIMIT`].
    pub async fn payloads(
        &self,
        base: &str,
        webhook_id: &str,
        cursor: Option<u64>,
        limit: Option<u32>,
    ) -> Result<PayloadsPage> {
        if let Some(limit) = limit {
            if limit > MAX_PAYLOAD_LIMIT {
                return Err(Error::invalid_value(
                    "limit",
                    format!("must be at most {MAX_PAYLOAD_LIMIT}, got {limit}"),
                ));
            }
        }
        let url = self.url(base, &[webhook_id, "payloads"])?;
        let page: PayloadsPage = self
            .send(Method::GET, url, |mut r| {
                if let Some(cursor) = cursor {
                    r = r.query("cursor", cursor.to_string());
                }
                if let Some(limit) = limit {
                    r = r.query("limit", limit.to_string());
                }
                r
            })
            .await?
            .json()?;
        debug!(
            "Polled {} payloads from webhook {} (more: {})",
            page.payloads.len(),
            webhook_id,
            page.might_have_more
        );
        Ok(page)
    }

    /// Extend a webhook's expiration
    pub async fn refresh(&self, base: &str, webhook_id: &str) -> Result<RefreshResponse> {
        let url = self.url(base, &[webhook_id, "refresh"])?;
        self.send(Method::POST, url, |r| r).await?.json()
    }

    /// Turn notification pings on or off
    pub async fn set_notifications(&self, base: &str, webhook_id: &str, enable: bool) -> Result<()> {
        let url = self.url(base, &[webhook_id, "enableNotifications"])?;
        self.send(Method::POST, url, |r| r.json(json!({ "enable": enable })))
            .await?;
        debug!("Notifications for webhook {} set to {}", webhook_id, enable);
        Ok(())
    }

    fn url(&self, base: &str, rest: &[&str]) -> Result<Url> {
        let mut segments = vec!["bases", base, "webhooks"];
        segments.extend_from_slice(rest);
        join_segments(self.api_url, &segments)
    }

    async fn send<F>(&self, method: Method, url: Url, build: F) -> Result<HttpResponse>
    where
        F: FnOnce(HttpRequest) -> HttpRequest + Send,
    {
        let request = self
            .credentials
            .apply_webhook(build(HttpRequest::new(method, url)))?;
        self.transport.send(request).await?.error_for_status()
    }
}

impl std::fmt::Debug for WebhookClient<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookClient")
            .field("api_url", &self.api_url.as_str())
            .finish_non_exhaustive()
    }
}
