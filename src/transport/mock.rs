//! In-memory chat transport for testing.
//!
//! Serves scripted batches of updates and records every reply.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use super::{ChatTransport, InboundMessage, Update};
use crate::commands::{ChatId, ReplyFormat};
use crate::error::{RelayError, Result};

/// How long an empty poll waits before returning.
const IDLE_POLL: Duration = Duration::from_millis(50);

/// A reply captured by [`MockTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub chat: ChatId,
    pub text: String,
    pub format: ReplyFormat,
}

/// Transport that never touches the network.
#[derive(Debug, Default)]
pub struct MockTransport {
    batches: Mutex<VecDeque<Result<Vec<Update>>>>,
    offsets: Mutex<Vec<i64>>,
    sent: Mutex<Vec<SentMessage>>,
    fail_sends: Mutex<bool>,
}

impl MockTransport {
    /// Creates a transport with nothing queued.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a batch of text messages, numbered from `first_id`.
    pub fn push_messages(&self, first_id: i64, messages: &[(ChatId, &str)]) {
        let batch = messages
            .iter()
            .zip(first_id..)
            .map(|((chat, text), id)| Update {
                id,
                message: Some(InboundMessage {
                    chat: *chat,
                    text: text.to_string(),
                }),
            })
            .collect();
        self.push_batch(Ok(batch));
    }

    /// Queues a raw poll result.
    pub fn push_batch(&self, batch: Result<Vec<Update>>) {
        if let Ok(mut batches) = self.batches.lock() {
            batches.push_back(batch);
        }
    }

    /// Makes every subsequent `send` fail.
    pub fn fail_sends(&self, fail: bool) {
        if let Ok(mut flag) = self.fail_sends.lock() {
            *flag = fail;
        }
    }

    /// Offsets passed to `poll`, in order.
    pub fn offsets(&self) -> Vec<i64> {
        self.offsets.lock().map(|o| o.clone()).unwrap_or_default()
    }

    /// Replies sent so far, in order.
    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }

    /// Reply texts sent to `chat`, in order.
    pub fn texts_for(&self, chat: ChatId) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter(|m| m.chat == chat)
            .map(|m| m.text)
            .collect()
    }
}

#[async_trait]
impl ChatTransport for MockTransport {
    async fn poll(&self, offset: i64) -> Result<Vec<Update>> {
        if let Ok(mut offsets) = self.offsets.lock() {
            offsets.push(offset);
        }

        let next = self
            .batches
            .lock()
            .map_err(|_| RelayError::internal("mock transport lock poisoned"))?
            .pop_front();

        match next {
            Some(batch) => batch,
            None => {
                // Behave like an idle long poll.
                tokio::time::sleep(IDLE_POLL).await;
                Ok(Vec::new())
            }
        }
    }

    async fn send(&self, chat: ChatId, text: &str, format: ReplyFormat) -> Result<()> {
        if self.fail_sends.lock().map(|f| *f).unwrap_or(false) {
            return Err(RelayError::transport("sendMessage rejected"));
        }

        if let Ok(mut sent) = self.sent.lock() {
            sent.push(SentMessage {
                chat,
                text: text.to_string(),
                format,
            });
        }
        Ok(())
    }
}
