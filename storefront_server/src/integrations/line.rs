//! Client for the LINE Messaging API.
//!
//! A stateless forwarder: the server relays admin notifications and webhook replies
//! through here. Provider-side rejections are captured in [`PushOutcome`] rather than
//! raised, so callers decide how loudly to fail.

use std::sync::Arc;

use log::*;
use pgs_common::Secret;
use reqwest::{
    header::{HeaderMap, HeaderValue},
    Client,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const LINE_API_BASE: &str = "https://api.line.me";
/// LINE rejects text messages longer than this.
pub const MAX_TEXT_LEN: usize = 5000;

#[derive(Debug, Error)]
pub enum LineApiError {
    #[error("Could not initialize LINE client: {0}")]
    Initialization(String),
    #[error("Could not reach the LINE API: {0}")]
    TransportError(String),
    #[error("No push destination given and no admin recipients configured.")]
    NoDestination,
}

//--------------------------------------     LineConfig     -----------------------------------------------------------
#[derive(Debug, Clone, Default)]
pub struct LineConfig {
    pub channel_access_token: Secret<String>,
    pub channel_secret: Secret<String>,
    /// Default push recipients (user/group/room ids) used when a push request names no
    /// destination. Collected via the webhook's `register` flow.
    pub admin_ids: Vec<String>,
}

impl LineConfig {
    pub fn from_env_or_default() -> Self {
        let channel_access_token = std::env::var("PGS_LINE_CHANNEL_ACCESS_TOKEN").map(Secret::new).unwrap_or_else(|_| {
            warn!("💬️ PGS_LINE_CHANNEL_ACCESS_TOKEN is not set. LINE pushes will be rejected by the provider.");
            Secret::default()
        });
        let channel_secret = std::env::var("PGS_LINE_CHANNEL_SECRET").map(Secret::new).unwrap_or_else(|_| {
            warn!("💬️ PGS_LINE_CHANNEL_SECRET is not set. Webhook signature checks will fail.");
            Secret::default()
        });
        let admin_ids = std::env::var("PGS_LINE_ADMIN_IDS")
            .map(|s| s.split(',').map(|s| s.trim().to_string()).filter(|s| !s.is_empty()).collect::<Vec<_>>())
            .unwrap_or_default();
        if admin_ids.is_empty() {
            info!("💬️ PGS_LINE_ADMIN_IDS is empty. Pushes without an explicit destination will be rejected.");
        }
        Self { channel_access_token, channel_secret, admin_ids }
    }
}

//--------------------------------------   Message objects  -----------------------------------------------------------
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MessageObject {
    Text { text: String },
    #[serde(rename_all = "camelCase")]
    Image {
        original_content_url: String,
        preview_image_url: String,
    },
}

impl MessageObject {
    pub fn text<S: Into<String>>(text: S) -> Self {
        let mut text: String = text.into();
        if text.chars().count() > MAX_TEXT_LEN {
            text = text.chars().take(MAX_TEXT_LEN).collect();
        }
        Self::Text { text }
    }

    pub fn image<S: Into<String>>(url: S) -> Self {
        let url = url.into();
        Self::Image { original_content_url: url.clone(), preview_image_url: url }
    }
}

/// Build the message list for a push: text first (truncated), then the image, and a
/// placeholder when the request carries neither.
pub fn build_messages(text: Option<&str>, image_url: Option<&str>) -> Vec<MessageObject> {
    let mut messages = Vec::with_capacity(2);
    if let Some(text) = text.filter(|t| !t.is_empty()) {
        messages.push(MessageObject::text(text));
    }
    if let Some(url) = image_url.filter(|u| !u.is_empty()) {
        messages.push(MessageObject::image(url));
    }
    if messages.is_empty() {
        messages.push(MessageObject::text("No content"));
    }
    messages
}

/// Where a push ends up, decided from the request's routing fields and the configured
/// admin recipients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushRoute {
    Broadcast,
    Push(String),
    Multicast(Vec<String>),
}

impl PushRoute {
    pub fn resolve(
        broadcast: bool,
        to: Option<Vec<String>>,
        admin_ids: &[String],
    ) -> Result<Self, LineApiError> {
        if broadcast {
            return Ok(Self::Broadcast);
        }
        let mut targets = to.unwrap_or_default();
        targets.retain(|t| !t.trim().is_empty());
        if targets.is_empty() {
            targets = admin_ids.to_vec();
        }
        match targets.len() {
            0 => Err(LineApiError::NoDestination),
            1 => Ok(Self::Push(targets.remove(0))),
            _ => Ok(Self::Multicast(targets)),
        }
    }
}

/// The provider's verdict on a push. `ok == false` is not an error from the relay's
/// point of view; the caller checks the flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushOutcome {
    pub ok: bool,
    pub status: u16,
    pub body: String,
}

//--------------------------------------       LineApi      -----------------------------------------------------------
#[derive(Clone)]
pub struct LineApi {
    config: LineConfig,
    client: Arc<Client>,
    base_url: String,
}

impl LineApi {
    pub fn new(config: LineConfig) -> Result<Self, LineApiError> {
        let mut headers = HeaderMap::with_capacity(2);
        let bearer = format!("Bearer {}", config.channel_access_token.reveal());
        let val = HeaderValue::from_str(&bearer).map_err(|e| LineApiError::Initialization(e.to_string()))?;
        headers.insert("Authorization", val);
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));
        let client =
            Client::builder().default_headers(headers).build().map_err(|e| LineApiError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client), base_url: LINE_API_BASE.to_string() })
    }

    pub fn admin_ids(&self) -> &[String] {
        &self.config.admin_ids
    }

    pub fn channel_secret(&self) -> &Secret<String> {
        &self.config.channel_secret
    }

    async fn call(&self, path: &str, payload: serde_json::Value) -> Result<PushOutcome, LineApiError> {
        let url = format!("{}{path}", self.base_url);
        trace!("💬️ POST {url}");
        let response =
            self.client.post(&url).json(&payload).send().await.map_err(|e| LineApiError::TransportError(e.to_string()))?;
        let status = response.status().as_u16();
        let ok = response.status().is_success();
        let body = response.text().await.unwrap_or_default();
        if !ok {
            warn!("💬️ LINE API call to {path} failed with status {status}: {body}");
        }
        Ok(PushOutcome { ok, status, body })
    }

    /// Push messages out, choosing broadcast/push/multicast from the routing fields.
    /// Falls back to the configured admin recipients when no destination is named.
    pub async fn push(
        &self,
        broadcast: bool,
        to: Option<Vec<String>>,
        messages: Vec<MessageObject>,
    ) -> Result<PushOutcome, LineApiError> {
        let route = PushRoute::resolve(broadcast, to, &self.config.admin_ids)?;
        match route {
            PushRoute::Broadcast => {
                debug!("💬️ Broadcasting {} message(s) to all followers", messages.len());
                self.call("/v2/bot/message/broadcast", serde_json::json!({ "messages": messages })).await
            },
            PushRoute::Push(to) => {
                debug!("💬️ Pushing {} message(s) to one recipient", messages.len());
                self.call("/v2/bot/message/push", serde_json::json!({ "to": to, "messages": messages })).await
            },
            PushRoute::Multicast(to) => {
                debug!("💬️ Multicasting {} message(s) to {} recipients", messages.len(), to.len());
                self.call("/v2/bot/message/multicast", serde_json::json!({ "to": to, "messages": messages })).await
            },
        }
    }

    /// Answer a webhook event. Reply failures are logged and reflected in the outcome;
    /// the webhook handler never fails the whole delivery over one reply.
    pub async fn reply(&self, reply_token: &str, messages: Vec<MessageObject>) -> Result<PushOutcome, LineApiError> {
        debug!("💬️ Replying with {} message(s)", messages.len());
        self.call("/v2/bot/message/reply", serde_json::json!({ "replyToken": reply_token, "messages": messages })).await
    }
}
