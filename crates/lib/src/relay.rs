//! Relay handler: one text message in, one completion call, one reply attempt.
//!
//! Completion failures are absorbed into a fixed apology text so the reply path
//! always has content to send; reply-delivery failures are absorbed into a typed
//! outcome the caller can log or assert on. Nothing here retries or queues.

use crate::line::{LineClient, LineError, WebhookEvent};
use crate::llm::{ChatMessage, OpenAiClient, OpenAiError};

/// Outcome of handling one webhook event.
#[derive(Debug)]
pub enum EventOutcome {
    /// Not a text message event; no calls were made.
    Ignored,
    /// Reply delivered to the platform.
    Replied,
    /// Completion produced a reply (or the fallback text) but the reply API
    /// reported failure. The reply token is spent; there is no retry.
    DeliveryFailed(LineError),
}

/// Stateless message handler: completion client, reply client, and the fixed
/// request parameters, constructed once and shared across requests.
pub struct Relay {
    llm: OpenAiClient,
    line: LineClient,
    model: String,
    temperature: f32,
    persona: String,
}

impl Relay {
    pub fn new(
        llm: OpenAiClient,
        line: LineClient,
        model: String,
        temperature: f32,
        persona: String,
    ) -> Self {
        Self {
            llm,
            line,
            model,
            temperature,
            persona,
        }
    }

    /// Handle one webhook event: for a text message, fetch a completion and
    /// reply via the event's reply token. All other event types are ignored.
    pub async fn handle_event(&self, event: &WebhookEvent) -> EventOutcome {
        let Some((reply_token, text)) = event.text_message() else {
            return EventOutcome::Ignored;
        };
        let reply = self.completion_reply(text).await;
        match self.line.reply_message(reply_token, &reply).await {
            Ok(()) => EventOutcome::Replied,
            Err(e) => EventOutcome::DeliveryFailed(e),
        }
    }

    /// Call the completion API with the persona and the user's message. Any
    /// failure degrades to the fallback apology text instead of propagating.
    pub async fn completion_reply(&self, user_text: &str) -> String {
        let messages = persona_messages(&self.persona, user_text);
        match self.llm.chat(&self.model, messages, self.temperature).await {
            Ok(res) => res.content().to_string(),
            Err(e) => {
                log::warn!("completion call failed: {}", e);
                fallback_reply(&e)
            }
        }
    }
}

/// Completion message list: the fixed system persona, then the user's raw text.
/// Exactly two entries; the user text is passed through unmodified.
pub fn persona_messages(persona: &str, user_text: &str) -> Vec<ChatMessage> {
    vec![ChatMessage::system(persona), ChatMessage::user(user_text)]
}

/// Apology text sent when the completion call fails, embedding the error detail.
fn fallback_reply(err: &OpenAiError) -> String {
    format!("抱歉，目前無法回應您的訊息。錯誤：{}", err)
}
