//! Connection command handlers (/connect, /disconnect).

use tracing::warn;

use super::CommandContext;
use crate::commands::conversation::Purpose;
use crate::commands::help::CONNECT_PROMPT;
use crate::commands::output::CommandOutput;
use crate::db::ConnectionDescriptor;
use crate::error::Result;

/// Handle /connect command.
///
/// Without an inline connection string this asks for one; the answer comes
/// back through [`connect_with`].
pub async fn handle_connect(ctx: &CommandContext<'_>, args: &str) -> CommandOutput {
    if args.trim().is_empty() {
        return CommandOutput::prompt(Purpose::Connect, CONNECT_PROMPT);
    }
    connect_output(ctx, args).await
}

/// Classifies `conn_str`, probes it and makes it the active session.
///
/// The session is only replaced when the probe succeeds.
pub async fn connect_with(ctx: &CommandContext<'_>, conn_str: &str) -> Result<ConnectionDescriptor> {
    let descriptor = ConnectionDescriptor::parse(conn_str)?;

    ctx.executor.test_connectivity(&descriptor).await?;
    ctx.executor.session().connect(descriptor.clone()).await;

    Ok(descriptor)
}

/// Runs [`connect_with`] and converts the outcome to chat output.
pub async fn connect_output(ctx: &CommandContext<'_>, conn_str: &str) -> CommandOutput {
    match connect_with(ctx, conn_str).await {
        Ok(descriptor) => CommandOutput::info(format!("Connected: {}", descriptor.dialect())),
        Err(e) => {
            warn!("Connect failed ({}): {}", e.category(), e);
            CommandOutput::from_error(&e)
        }
    }
}

/// Handle /disconnect command.
pub async fn handle_disconnect(ctx: &CommandContext<'_>) -> CommandOutput {
    match ctx.executor.session().clear().await {
        Some(previous) => CommandOutput::info(format!("Disconnected from {}.", previous.dialect())),
        None => CommandOutput::info("Not connected."),
    }
}
