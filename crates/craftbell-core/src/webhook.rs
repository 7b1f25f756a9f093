//! Inbound webhook envelope, as the LINE platform delivers it.
//!
//! Only the fields the dispatcher branches on are modeled; everything
//! else in the payload is ignored.

use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebhookEnvelope {
    #[serde(default)]
    pub events: Vec<WebhookEvent>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub source: EventSource,
    #[serde(default)]
    pub message: Option<EventMessage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventSource {
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "type", default)]
    pub source_type: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventMessage {
    #[serde(rename = "type")]
    pub message_type: String,
    #[serde(default)]
    pub text: String,
}
