//! Command handlers for db-relay.
//!
//! Each handler takes a command context and returns the output for the chat.
//! Errors are turned into error output here and never abort the bot loop.

pub mod connection;
pub mod queries;
pub mod system;

use crate::query::{QueryExecutor, SearchTemplate};

/// Context provided to command handlers.
pub struct CommandContext<'a> {
    /// Executor bound to the shared session.
    pub executor: &'a QueryExecutor,
    /// Target of `/search`.
    pub search: &'a SearchTemplate,
}
