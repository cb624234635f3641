//! The update loop.
//!
//! Polls the transport, hands each message to the dispatcher and sends the
//! reply back, strictly one message at a time.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, error, info, warn};

use crate::commands::Dispatcher;
use crate::transport::{ChatTransport, Update};

/// Pause after a failed poll before trying again.
const POLL_BACKOFF: Duration = Duration::from_secs(3);

/// Drives a [`Dispatcher`] from a [`ChatTransport`].
pub struct Bot<T> {
    transport: T,
    dispatcher: Dispatcher,
    offset: i64,
}

impl<T: ChatTransport> Bot<T> {
    pub fn new(transport: T, dispatcher: Dispatcher) -> Self {
        Self {
            transport,
            dispatcher,
            offset: 0,
        }
    }

    /// The transport the bot talks through.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// The dispatcher handling messages.
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Offset the next poll will start from.
    pub fn offset(&self) -> i64 {
        self.offset
    }

    /// Runs until `shutdown` resolves.
    pub async fn run_until<F>(&mut self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        info!("Bot started");

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Shutdown requested, stopping bot");
                    break;
                }
                polled = self.poll_once() => {
                    if !polled {
                        tokio::time::sleep(POLL_BACKOFF).await;
                    }
                }
            }
        }
    }

    /// Fetches and handles one batch of updates.
    ///
    /// Returns `false` if the poll itself failed.
    pub async fn poll_once(&mut self) -> bool {
        let updates = match self.transport.poll(self.offset).await {
            Ok(updates) => updates,
            Err(e) => {
                warn!("Polling failed: {}", e);
                return false;
            }
        };

        for update in updates {
            self.handle_update(update).await;
        }
        true
    }

    async fn handle_update(&mut self, update: Update) {
        // Advance first so a message is never handled twice.
        self.offset = self.offset.max(update.id + 1);

        let Some(message) = update.message else {
            debug!("Skipping update {} without text", update.id);
            return;
        };

        let Some(reply) = self.dispatcher.handle(message.chat, &message.text).await else {
            return;
        };

        if let Err(e) = self
            .transport
            .send(message.chat, &reply.text, reply.format)
            .await
        {
            error!("Failed to reply to chat {}: {}", message.chat, e);
        }
    }
}
