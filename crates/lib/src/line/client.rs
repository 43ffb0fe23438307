//! LINE reply client: POST /v2/bot/message/reply with the channel access token.

use serde_json::json;

const DEFAULT_BASE_URL: &str = "https://api.line.me";

/// Client for the LINE Messaging API reply endpoint.
#[derive(Clone)]
pub struct LineClient {
    base_url: String,
    access_token: String,
    client: reqwest::Client,
}

#[derive(Debug, thiserror::Error)]
pub enum LineError {
    #[error("line request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("line api error: {0}")]
    Api(String),
}

impl LineClient {
    pub fn new(access_token: String, base_url: Option<String>) -> Self {
        let base_url = base_url
            .map(|u| u.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Self {
            base_url,
            access_token,
            client: reqwest::Client::new(),
        }
    }

    /// Send one text message in reply to an event, keyed by its one-time reply
    /// token. The token is consumed whether or not the call succeeds; there is
    /// no retry.
    pub async fn reply_message(&self, reply_token: &str, text: &str) -> Result<(), LineError> {
        let url = format!("{}/v2/bot/message/reply", self.base_url);
        let body = json!({
            "replyToken": reply_token,
            "messages": [{ "type": "text", "text": text }]
        });
        let res = self
            .client
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await?;
        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(LineError::Api(format!("reply failed: {} {}", status, body)));
        }
        Ok(())
    }
}
