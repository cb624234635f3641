//! Command parsing and dispatch for db-relay.
//!
//! Parsing is kept separate from execution so commands can be tested
//! without a database or a chat transport.

pub mod conversation;
pub mod dispatcher;
pub mod handlers;
pub mod help;
pub mod output;
pub mod router;

pub use conversation::{ChatId, Conversations, Interaction, Purpose};
pub use dispatcher::Dispatcher;
pub use handlers::CommandContext;
pub use output::{CommandOutput, Reply, ReplyFormat};
pub use router::{Command, CommandRouter, Inbound};
