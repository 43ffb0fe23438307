//! Completion API client (OpenAI-compatible chat completions).

mod openai;

pub use openai::{ChatChoice, ChatMessage, ChatResponse, OpenAiClient, OpenAiError};
