//! Per-chat interaction state.
//!
//! `/connect` and `/search` without an inline argument ask a question and
//! wait for the next message from that chat. The wait is recorded here
//! instead of blocking the update loop, so other chats keep being served.
//! While a chat waits, a known command cancels the wait; anything else,
//! including text like `/24` that only looks like a command, is the answer.

use std::collections::HashMap;
use std::sync::Mutex;

/// Chat identifier as assigned by the transport.
pub type ChatId = i64;

/// What a pending free-text reply will be used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Purpose {
    /// The reply is a connection string.
    Connect,
    /// The reply is a search term.
    Search,
}

/// Interaction state of one chat.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Interaction {
    /// The next message is dispatched as a command.
    #[default]
    AwaitingCommand,
    /// The next plain-text message answers a prompt.
    AwaitingFreeText(Purpose),
}

/// Interaction state for every chat that has talked to the bot.
#[derive(Debug, Default)]
pub struct Conversations {
    states: Mutex<HashMap<ChatId, Interaction>>,
}

impl Conversations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state of a chat.
    pub fn state(&self, chat: ChatId) -> Interaction {
        self.states
            .lock()
            .ok()
            .and_then(|states| states.get(&chat).copied())
            .unwrap_or_default()
    }

    /// Marks a chat as waiting for free text.
    pub fn await_free_text(&self, chat: ChatId, purpose: Purpose) {
        if let Ok(mut states) = self.states.lock() {
            states.insert(chat, Interaction::AwaitingFreeText(purpose));
        }
    }

    /// Returns the chat to command mode, yielding any pending purpose.
    pub fn take_pending(&self, chat: ChatId) -> Option<Purpose> {
        let mut states = self.states.lock().ok()?;
        match states.remove(&chat) {
            Some(Interaction::AwaitingFreeText(purpose)) => Some(purpose),
            _ => None,
        }
    }
}
