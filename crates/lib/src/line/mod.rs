//! LINE Messaging API: webhook payload types and the reply client.
//!
//! Inbound events arrive as a signed webhook POST (see [`crate::webhook`]);
//! replies go out through [`LineClient`] keyed by the event's one-time reply token.

mod client;
mod events;

pub use client::{LineClient, LineError};
pub use events::{EventMessage, EventSource, WebhookEvent, WebhookPayload};
