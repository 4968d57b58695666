use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonResponse {
    pub success: bool,
    pub message: String,
}

impl JsonResponse {
    pub fn success<S: Display>(message: S) -> Self {
        Self { success: true, message: message.to_string() }
    }
}

/// Outcome of saving an admin note: the note save itself plus the best-effort buyer
/// email that follows it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteSavedResponse {
    pub success: bool,
    pub message: String,
    pub email_sent: bool,
}

//--------------------------------------    Push request    -----------------------------------------------------------
/// The `to` field of a push request accepts either a single recipient id or a list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            Self::One(s) => vec![s],
            Self::Many(v) => v,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushRequest {
    #[serde(default)]
    pub to: Option<OneOrMany>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default, rename = "imageUrl")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub broadcast: bool,
}

//--------------------------------------   Admin requests   -----------------------------------------------------------
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveMessageParams {
    pub detels: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MyOrdersQuery {
    #[serde(default)]
    pub email: String,
}

//--------------------------------------   Webhook events   -----------------------------------------------------------
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookPayload {
    #[serde(default)]
    pub events: Vec<WebhookEvent>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default, rename = "replyToken")]
    pub reply_token: Option<String>,
    #[serde(default)]
    pub source: Option<EventSource>,
    #[serde(default)]
    pub message: Option<EventMessage>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSource {
    #[serde(default, rename = "type")]
    pub source_type: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub group_id: Option<String>,
    #[serde(default)]
    pub room_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventMessage {
    #[serde(rename = "type")]
    pub message_type: String,
    #[serde(default)]
    pub text: Option<String>,
}
