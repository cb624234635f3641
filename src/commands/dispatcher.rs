//! Routes inbound chat messages to command handlers.
//!
//! Messages are handled one at a time, each to completion. The dispatcher
//! owns the per-chat interaction state; the database session behind the
//! executor is shared by every chat.

use tracing::debug;

use super::conversation::{ChatId, Conversations, Purpose};
use super::handlers::{connection, queries, system, CommandContext};
use super::output::{CommandOutput, Reply};
use super::router::{Command, CommandRouter, Inbound};
use crate::error::RelayError;
use crate::query::{QueryExecutor, SearchTemplate};

/// Dispatches commands and prompt answers for every chat.
pub struct Dispatcher {
    executor: QueryExecutor,
    search: SearchTemplate,
    conversations: Conversations,
}

impl Dispatcher {
    pub fn new(executor: QueryExecutor, search: SearchTemplate) -> Self {
        Self {
            executor,
            search,
            conversations: Conversations::new(),
        }
    }

    /// The executor, and through it the shared session.
    pub fn executor(&self) -> &QueryExecutor {
        &self.executor
    }

    /// Per-chat interaction state.
    pub fn conversations(&self) -> &Conversations {
        &self.conversations
    }

    /// Handles one message from `chat`.
    ///
    /// Returns `None` for plain text that answers no prompt.
    pub async fn handle(&self, chat: ChatId, text: &str) -> Option<Reply> {
        let ctx = CommandContext {
            executor: &self.executor,
            search: &self.search,
        };

        let output = match CommandRouter::parse(text) {
            Inbound::Command(command) => match (command, self.conversations.take_pending(chat)) {
                // Not a command after all: an answer such as `/24`.
                (Command::Unknown(_), Some(purpose)) => {
                    answer_prompt(&ctx, purpose, text.trim()).await
                }
                (command, pending) => {
                    // A known command abandons any unanswered prompt.
                    if let Some(purpose) = pending {
                        debug!("Chat {} dropped pending {:?} prompt", chat, purpose);
                    }
                    dispatch(&ctx, command).await
                }
            },
            Inbound::Text(answer) => {
                let purpose = self.conversations.take_pending(chat)?;
                answer_prompt(&ctx, purpose, &answer).await
            }
        };

        if let CommandOutput::Prompt { purpose, .. } = &output {
            self.conversations.await_free_text(chat, *purpose);
        }

        Some(output.into_reply())
    }
}

async fn dispatch(ctx: &CommandContext<'_>, command: Command) -> CommandOutput {
    match command {
        Command::Start => system::handle_start(),
        Command::Connect(args) => connection::handle_connect(ctx, &args).await,
        Command::Query(sql) => queries::handle_query(ctx, &sql).await,
        Command::Search(term) => queries::handle_search(ctx, &term).await,
        Command::Disconnect => connection::handle_disconnect(ctx).await,
        Command::Unknown(name) => system::handle_unknown(&name),
    }
}

async fn answer_prompt(ctx: &CommandContext<'_>, purpose: Purpose, answer: &str) -> CommandOutput {
    if answer.is_empty() {
        let usage = match purpose {
            Purpose::Connect => "/connect, then send the connection string",
            Purpose::Search => "/search, then send the search term",
        };
        return CommandOutput::from_error(&RelayError::empty_argument(usage));
    }

    match purpose {
        Purpose::Connect => connection::connect_output(ctx, answer).await,
        Purpose::Search => queries::search_with(ctx, answer).await,
    }
}
