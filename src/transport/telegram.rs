//! Telegram Bot API transport.
//!
//! Long-polls `getUpdates` and replies with `sendMessage`. The token is part
//! of every request URL, so URLs are stripped from errors before they are
//! logged.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use super::{ChatTransport, InboundMessage, Update};
use crate::commands::{ChatId, ReplyFormat};
use crate::config::BotConfig;
use crate::error::{RelayError, Result};

/// Longest message Telegram accepts.
pub const MAX_MESSAGE_CHARS: usize = 4096;

/// Slack on top of the long-poll timeout before the HTTP request gives up.
const REQUEST_GRACE_SECS: u64 = 10;

/// Telegram client configuration.
#[derive(Clone)]
pub struct TelegramConfig {
    /// Bot API token.
    pub token: String,
    /// Bot API base URL.
    pub api_url: String,
    /// Long-poll timeout in seconds.
    pub poll_timeout_secs: u64,
}

impl TelegramConfig {
    /// Builds the transport config from the bot section and a resolved token.
    pub fn from_bot_config(bot: &BotConfig, token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            api_url: bot.api_url.trim_end_matches('/').to_string(),
            poll_timeout_secs: bot.poll_timeout_secs,
        }
    }
}

impl std::fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("token", &"***")
            .field("api_url", &self.api_url)
            .field("poll_timeout_secs", &self.poll_timeout_secs)
            .finish()
    }
}

/// Telegram Bot API client.
#[derive(Debug, Clone)]
pub struct TelegramTransport {
    config: TelegramConfig,
    client: Client,
}

impl TelegramTransport {
    /// Creates a new client with the given configuration.
    pub fn new(config: TelegramConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(
                config.poll_timeout_secs + REQUEST_GRACE_SECS,
            ))
            .build()
            .map_err(|e| RelayError::transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.config.api_url, self.config.token, method)
    }

    async fn call<B, T>(&self, method: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: for<'de> Deserialize<'de>,
    {
        let response = self
            .client
            .post(self.method_url(method))
            .json(body)
            .send()
            .await
            .map_err(|e| RelayError::transport(format!("{} failed: {}", method, e.without_url())))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            RelayError::transport(format!("Failed to read {} response: {}", method, e.without_url()))
        })?;

        parse_response(method, status, &body)
    }
}

/// Decodes a Bot API envelope, surfacing `description` on failure.
fn parse_response<T>(method: &str, status: reqwest::StatusCode, body: &str) -> Result<T>
where
    T: for<'de> Deserialize<'de>,
{
    let envelope: ApiResponse<T> = serde_json::from_str(body).map_err(|e| {
        RelayError::transport(format!("{} returned {}: unreadable body ({})", method, status, e))
    })?;

    match envelope {
        ApiResponse {
            ok: true,
            result: Some(result),
            ..
        } => Ok(result),
        ApiResponse { description, .. } => Err(RelayError::transport(format!(
            "{} rejected ({}): {}",
            method,
            status,
            description.unwrap_or_else(|| "no description".to_string())
        ))),
    }
}

#[async_trait]
impl ChatTransport for TelegramTransport {
    async fn poll(&self, offset: i64) -> Result<Vec<Update>> {
        let request = GetUpdatesRequest {
            offset,
            timeout: self.config.poll_timeout_secs,
            allowed_updates: &["message"],
        };

        let updates: Vec<ApiUpdate> = self.call("getUpdates", &request).await?;
        debug!("Received {} updates", updates.len());

        Ok(updates.into_iter().map(Update::from).collect())
    }

    async fn send(&self, chat: ChatId, text: &str, format: ReplyFormat) -> Result<()> {
        let parse_mode = match format {
            ReplyFormat::Plain => None,
            ReplyFormat::Markdown => Some("Markdown"),
        };

        for chunk in split_message(text, MAX_MESSAGE_CHARS) {
            let request = SendMessageRequest {
                chat_id: chat,
                text: &chunk,
                parse_mode,
            };
            let _: serde_json::Value = self.call("sendMessage", &request).await?;
        }

        Ok(())
    }
}

/// Splits `text` into pieces of at most `max_chars` characters, breaking
/// after newlines where possible.
pub fn split_message(text: &str, max_chars: usize) -> Vec<String> {
    if text.chars().count() <= max_chars {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for line in text.split_inclusive('\n') {
        let line_len = line.chars().count();

        if current_len + line_len > max_chars && !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }

        if line_len > max_chars {
            let chars: Vec<char> = line.chars().collect();
            for piece in chars.chunks(max_chars) {
                if piece.len() == max_chars {
                    chunks.push(piece.iter().collect());
                } else {
                    current = piece.iter().collect();
                    current_len = piece.len();
                }
            }
            continue;
        }

        current.push_str(line);
        current_len += line_len;
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}

#[derive(Debug, Serialize)]
struct GetUpdatesRequest<'a> {
    offset: i64,
    timeout: u64,
    allowed_updates: &'a [&'a str],
}

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: ChatId,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    parse_mode: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiUpdate {
    update_id: i64,
    message: Option<ApiMessage>,
}

#[derive(Debug, Deserialize)]
struct ApiMessage {
    chat: ApiChat,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiChat {
    id: ChatId,
}

impl From<ApiUpdate> for Update {
    fn from(update: ApiUpdate) -> Self {
        let message = update.message.and_then(|m| {
            m.text.map(|text| InboundMessage {
                chat: m.chat.id,
                text,
            })
        });

        Self {
            id: update.update_id,
            message,
        }
    }
}
