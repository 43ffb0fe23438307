//! Kotori core library — configuration, webhook endpoint, LINE reply client,
//! completion API client, and the relay handler tying them together.

pub mod config;
pub mod init;
pub mod line;
pub mod llm;
pub mod relay;
pub mod webhook;
