//! Configuration types and loading.
//!
//! Config is loaded from a JSON file (e.g. `~/.kotori/config.json`) and environment.
//! Secrets are resolved once at startup and passed into the server; nothing reads
//! the environment after that.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level application config.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Webhook server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// LINE Messaging API settings (channel secret, access token).
    #[serde(default)]
    pub line: LineConfig,

    /// Completion API settings (key, model, persona).
    #[serde(default)]
    pub completion: CompletionConfig,
}

/// Webhook server bind and port.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    /// Port for the webhook HTTP server (default 8000).
    #[serde(default = "default_server_port")]
    pub port: u16,

    /// Bind address (default "127.0.0.1"). Bind to 0.0.0.0 (or front with a
    /// reverse proxy) so the platform can reach the webhook.
    #[serde(default = "default_server_bind")]
    pub bind: String,
}

fn default_server_port() -> u16 {
    8000
}

fn default_server_bind() -> String {
    "127.0.0.1".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_server_port(),
            bind: default_server_bind(),
        }
    }
}

/// LINE Messaging API config.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineConfig {
    /// Channel secret used to verify webhook signatures. Overridden by
    /// LINE_CHANNEL_SECRET env when set.
    pub channel_secret: Option<String>,

    /// Channel access token for the reply API. Overridden by
    /// LINE_CHANNEL_ACCESS_TOKEN env when set.
    pub channel_access_token: Option<String>,

    /// LINE API base URL (default "https://api.line.me"). Override for tests.
    #[serde(default = "default_line_api_base_url")]
    pub api_base_url: String,
}

fn default_line_api_base_url() -> String {
    "https://api.line.me".to_string()
}

impl Default for LineConfig {
    fn default() -> Self {
        Self {
            channel_secret: None,
            channel_access_token: None,
            api_base_url: default_line_api_base_url(),
        }
    }
}

/// Completion API config (OpenAI-compatible chat completions).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionConfig {
    /// API key for the completion endpoint. Overridden by OPENAI_API_KEY env when set.
    pub api_key: Option<String>,

    /// Completion API base URL (default "https://api.openai.com/v1"). Override for tests.
    #[serde(default = "default_completion_base_url")]
    pub base_url: String,

    /// Model identifier sent with every completion request.
    #[serde(default = "default_completion_model")]
    pub model: String,

    /// Sampling temperature sent with every completion request.
    #[serde(default = "default_completion_temperature")]
    pub temperature: f32,

    /// System persona prepended to every completion request. The default is the
    /// bot's built-in character; set this to change the reply style without a
    /// code change.
    #[serde(default = "default_persona")]
    pub persona: String,
}

fn default_completion_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_completion_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_completion_temperature() -> f32 {
    0.7
}

/// Built-in system persona (a chatty five-year-old from Xinzhuang who loves
/// battle tops). Byte-identical across calls unless overridden in config.
fn default_persona() -> String {
    concat!(
        "你是一個五歲的嬰兒，住在新莊昌平街。你個性非常愛講話，",
        "總是跟大家分享你每天的冒險故事，尤其喜歡玩陀螺。",
        "你最喜歡的陀螺是戰鬥陀螺，經常和朋友們在街角一同競賽，",
        "享受陀螺旋轉的樂趣。你的生日是2020年6月13日，每年的生日都特別期待，",
        "希望能收到更多的陀螺禮物來提升戰鬥技術！\n\n",
        "當別人問你家裡有誰時，你會回答：爸爸、媽媽、大脯、小脯、阿公、阿嬤。\n\n",
        "你最喜歡看《米你特攻隊》和《超級飛俠》，",
        "常常跟朋友們討論劇情。\n\n",
        "當人家問你有什麼招式時，你會說：鯊魚左輪槍、黃牛裂地垂。"
    )
    .to_string()
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_completion_base_url(),
            model: default_completion_model(),
            temperature: default_completion_temperature(),
            persona: default_persona(),
        }
    }
}

/// Resolve the channel secret: env LINE_CHANNEL_SECRET overrides config.
pub fn resolve_channel_secret(config: &Config) -> Option<String> {
    env_or(&config.line.channel_secret, "LINE_CHANNEL_SECRET")
}

/// Resolve the channel access token: env LINE_CHANNEL_ACCESS_TOKEN overrides config.
pub fn resolve_channel_access_token(config: &Config) -> Option<String> {
    env_or(&config.line.channel_access_token, "LINE_CHANNEL_ACCESS_TOKEN")
}

/// Resolve the completion API key: env OPENAI_API_KEY overrides config.
pub fn resolve_api_key(config: &Config) -> Option<String> {
    env_or(&config.completion.api_key, "OPENAI_API_KEY")
}

fn env_or(config_value: &Option<String>, var: &str) -> Option<String> {
    std::env::var(var)
        .ok()
        .and_then(|s| {
            let t = s.trim();
            if t.is_empty() {
                None
            } else {
                Some(t.to_string())
            }
        })
        .or_else(|| {
            config_value
                .as_ref()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        })
}

/// Resolve config path from env or default.
pub fn default_config_path() -> PathBuf {
    std::env::var("KOTORI_CONFIG_PATH").map(PathBuf::from).unwrap_or_else(|_| {
        dirs::home_dir()
            .map(|h| h.join(".kotori").join("config.json"))
            .unwrap_or_else(|| PathBuf::from("config.json"))
    })
}

/// Load config from the default path (or KOTORI_CONFIG_PATH). Missing file => default config.
/// Returns the config and the path that was used.
pub fn load_config(path: Option<PathBuf>) -> Result<(Config, PathBuf)> {
    let path = path.unwrap_or_else(default_config_path);
    let config = if !path.exists() {
        log::debug!("config file not found, using defaults: {}", path.display());
        Config::default()
    } else {
        let s = std::fs::read_to_string(&path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        serde_json::from_str(&s)
            .with_context(|| format!("parsing config from {}", path.display()))?
    };
    Ok((config, path))
}
