//! Webhook endpoint: signed callback POST from the platform.
//!
//! The raw body is verified against the `X-Line-Signature` header before any
//! parsing; verified payloads are dispatched event-by-event to the relay.

mod server;
mod signature;

pub use server::run_server;
