//! Webhook payload types

use crate::error::{Error, Result};
use crate::types::JsonValue;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

/// Maximum number of payloads Airtable returns per page
pub const MAX_PAYLOAD_LIMIT: u32 = 50;

/// Body of a webhook creation request
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateWebhookRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification_url: Option<&'a str>,
    pub specification: &'a JsonValue,
}

/// Webhook returned by a creation request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedWebhook {
    pub id: String,
    /// Secret for verifying notification pings, base64 encoded
    pub mac_secret_base64: String,
    #[serde(default)]
    pub expiration_time: Option<String>,
}

impl CreatedWebhook {
    /// Decoded MAC secret
    pub fn mac_secret(&self) -> Result<Vec<u8>> {
        STANDARD
            .decode(&self.mac_secret_base64)
            .map_err(|e| Error::decode(format!("invalid MAC secret: {e}")))
    }
}

/// Webhook as listed for a base
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Webhook {
    pub id: String,
    #[serde(default)]
    pub specification: JsonValue,
    #[serde(default)]
    pub notification_url: Option<String>,
    #[serde(default)]
    pub cursor_for_next_payload: Option<u64>,
    #[serde(default)]
    pub are_notifications_enabled: bool,
    #[serde(default)]
    pub is_hook_enabled: bool,
    #[serde(default)]
    pub expiration_time: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WebhookList {
    #[serde(default)]
    pub webhooks: Vec<Webhook>,
}

/// One page of webhook payloads
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayloadsPage {
    /// Cursor to pass when polling for the next page
    pub cursor: u64,
    #[serde(default)]
    pub might_have_more: bool,
    #[serde(default)]
    pub payloads: Vec<JsonValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    #[serde(default)]
    pub expiration_time: Option<String>,
}
