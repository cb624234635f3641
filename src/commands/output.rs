//! Transport-agnostic command output types.
//!
//! Handlers produce a [`CommandOutput`]; the dispatcher turns prompts into
//! interaction state and hands a [`Reply`] to whichever chat transport is in
//! use.

use super::conversation::Purpose;
use crate::error::RelayError;

/// Output from a command handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutput {
    /// Plain informational message.
    Info(String),

    /// Message formatted with the transport's Markdown dialect.
    Markdown(String),

    /// Error message.
    Error(String),

    /// A question whose answer is the chat's next plain-text message.
    Prompt {
        /// What the answer will be used for.
        purpose: Purpose,
        /// Question shown to the user.
        text: String,
    },
}

impl CommandOutput {
    /// Creates an info message.
    pub fn info(msg: impl Into<String>) -> Self {
        Self::Info(msg.into())
    }

    /// Creates a Markdown message.
    pub fn markdown(msg: impl Into<String>) -> Self {
        Self::Markdown(msg.into())
    }

    /// Creates an error message.
    pub fn error(msg: impl Into<String>) -> Self {
        Self::Error(msg.into())
    }

    /// Creates a prompt.
    pub fn prompt(purpose: Purpose, text: impl Into<String>) -> Self {
        Self::Prompt {
            purpose,
            text: text.into(),
        }
    }

    /// Wraps an error, keeping the driver or classifier message.
    pub fn from_error(err: &RelayError) -> Self {
        Self::Error(format!("Error: {err}"))
    }

    /// Converts to the reply sent to the chat.
    pub fn into_reply(self) -> Reply {
        match self {
            Self::Info(text) | Self::Error(text) | Self::Prompt { text, .. } => Reply::plain(text),
            Self::Markdown(text) => Reply::markdown(text),
        }
    }
}

/// How the transport should interpret reply text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReplyFormat {
    #[default]
    Plain,
    Markdown,
}

/// Text sent back to a chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub format: ReplyFormat,
}

impl Reply {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            format: ReplyFormat::Plain,
        }
    }

    pub fn markdown(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            format: ReplyFormat::Markdown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_info_output() {
        let output = CommandOutput::info("Connected: postgres");
        assert_eq!(output.into_reply(), Reply::plain("Connected: postgres"));
    }

    #[test]
    fn test_markdown_output() {
        let output = CommandOutput::markdown("*bold*");
        assert_eq!(output.into_reply().format, ReplyFormat::Markdown);
    }

    #[test]
    fn test_prompt_reply_is_question_text() {
        let output = CommandOutput::prompt(Purpose::Search, "Send the search term.");
        assert_eq!(output.into_reply(), Reply::plain("Send the search term."));
    }

    #[test]
    fn test_from_error_keeps_message() {
        let output = CommandOutput::from_error(&RelayError::query("permission denied for table x"));
        assert_eq!(
            output,
            CommandOutput::Error("Error: Query error: permission denied for table x".to_string())
        );
    }
}
