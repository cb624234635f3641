//! System command handlers (/start, unknown commands).

use crate::commands::help::HELP_TEXT;
use crate::commands::output::CommandOutput;

/// Handle /start command.
pub fn handle_start() -> CommandOutput {
    CommandOutput::markdown(HELP_TEXT)
}

/// Handle unknown command.
pub fn handle_unknown(command: &str) -> CommandOutput {
    CommandOutput::error(format!(
        "Unknown command: {command}. Use /start to see the available commands."
    ))
}
