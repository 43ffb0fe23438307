//! Webhook payload wire types (schema owned by the LINE platform).

use serde::Deserialize;

/// Body of a webhook POST: a batch of zero or more events.
#[derive(Debug, Deserialize)]
pub struct WebhookPayload {
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub events: Vec<WebhookEvent>,
}

/// One webhook event (message, follow, unfollow, ...). Only text message
/// events are handled; everything else is ignored.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookEvent {
    #[serde(rename = "type")]
    pub typ: String,
    /// One-time token for sending a correlated reply. Absent on events that
    /// cannot be replied to (e.g. unfollow).
    #[serde(default)]
    pub reply_token: Option<String>,
    #[serde(default)]
    pub source: Option<EventSource>,
    #[serde(default)]
    pub message: Option<EventMessage>,
}

/// Message content of a message event.
#[derive(Debug, Deserialize)]
pub struct EventMessage {
    #[serde(rename = "type")]
    pub typ: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

/// Sender of an event (user, group, or room).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSource {
    #[serde(rename = "type", default)]
    pub typ: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
}

impl WebhookEvent {
    /// Reply token and text for a text message event; None for any other
    /// event shape (non-message, non-text, or missing reply token).
    pub fn text_message(&self) -> Option<(&str, &str)> {
        if self.typ != "message" {
            return None;
        }
        let msg = self.message.as_ref()?;
        if msg.typ != "text" {
            return None;
        }
        let text = msg.text.as_deref()?;
        let reply_token = self.reply_token.as_deref()?;
        Some((reply_token, text))
    }
}
