//! Chat transport abstraction.
//!
//! The bot loop talks to the messaging service only through
//! [`ChatTransport`], so it can run against the Telegram Bot API or an
//! in-memory double.

pub mod mock;
pub mod telegram;

use async_trait::async_trait;

use crate::commands::{ChatId, ReplyFormat};
use crate::error::Result;

pub use mock::{MockTransport, SentMessage};
pub use telegram::{split_message, TelegramConfig, TelegramTransport, MAX_MESSAGE_CHARS};

/// One inbound update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Update {
    /// Monotonic update identifier. The next poll starts after it.
    pub id: i64,
    /// The message carried by the update, if it is a text message.
    pub message: Option<InboundMessage>,
}

/// A text message from a chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub chat: ChatId,
    pub text: String,
}

/// Trait for messaging services the bot can be driven by.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Fetches updates with an id of at least `offset`, waiting for new ones
    /// if there are none.
    async fn poll(&self, offset: i64) -> Result<Vec<Update>>;

    /// Sends `text` to `chat`.
    async fn send(&self, chat: ChatId, text: &str, format: ReplyFormat) -> Result<()>;
}
