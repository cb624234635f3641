//! Command parsing and routing for db-relay.
//!
//! Splits an inbound chat message into a command name and its argument text.
//! Anything that does not start with `/` is free text.

/// Parsed command with arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Show the help message.
    Start,
    /// Connect using an inline connection string, or prompt for one.
    Connect(String),
    /// Run raw SQL.
    Query(String),
    /// Run the templated search with an inline term, or prompt for one.
    Search(String),
    /// Drop the active session.
    Disconnect,
    /// Unknown command.
    Unknown(String),
}

/// A classified inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    /// A slash command.
    Command(Command),
    /// Plain text, possibly the answer to a prompt.
    Text(String),
}

/// Command router for parsing user input.
pub struct CommandRouter;

impl CommandRouter {
    /// Parse a message into a command or free text.
    pub fn parse(input: &str) -> Inbound {
        let trimmed = input.trim();

        let Some(rest) = trimmed.strip_prefix('/') else {
            return Inbound::Text(trimmed.to_string());
        };

        let (head, args) = match rest.find(char::is_whitespace) {
            Some(pos) => (&rest[..pos], rest[pos..].trim()),
            None => (rest, ""),
        };

        // Group chats address commands as /name@bot_username.
        let name = head.split('@').next().unwrap_or(head).to_lowercase();

        let command = match name.as_str() {
            "start" | "help" => Command::Start,
            "connect" => Command::Connect(args.to_string()),
            "query" => Command::Query(args.to_string()),
            "search" => Command::Search(args.to_string()),
            "disconnect" => Command::Disconnect,
            _ => Command::Unknown(format!("/{name}")),
        };

        Inbound::Command(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(input: &str) -> Command {
        match CommandRouter::parse(input) {
            Inbound::Command(cmd) => cmd,
            Inbound::Text(text) => panic!("expected a command, got text {text:?}"),
        }
    }

    #[test]
    fn test_parse_free_text() {
        assert_eq!(
            CommandRouter::parse("  A1-  "),
            Inbound::Text("A1-".to_string())
        );
    }

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(command("/start"), Command::Start);
        assert_eq!(command("/help"), Command::Start);
        assert_eq!(command("/disconnect"), Command::Disconnect);
        assert_eq!(command("/connect"), Command::Connect(String::new()));
        assert_eq!(command("/search"), Command::Search(String::new()));
    }

    #[test]
    fn test_parse_query_keeps_argument_verbatim() {
        assert_eq!(
            command("/query SELECT *  FROM t WHERE a = 'x y'"),
            Command::Query("SELECT *  FROM t WHERE a = 'x y'".to_string())
        );
        assert_eq!(command("/query"), Command::Query(String::new()));
        assert_eq!(command("/query   "), Command::Query(String::new()));
    }

    #[test]
    fn test_parse_multiline_query() {
        assert_eq!(
            command("/query\nSELECT 1\nFROM dual"),
            Command::Query("SELECT 1\nFROM dual".to_string())
        );
    }

    #[test]
    fn test_parse_inline_arguments() {
        assert_eq!(
            command("/connect postgres://localhost/app"),
            Command::Connect("postgres://localhost/app".to_string())
        );
        assert_eq!(command("/search A1-"), Command::Search("A1-".to_string()));
    }

    #[test]
    fn test_parse_strips_bot_suffix() {
        assert_eq!(
            command("/query@relay_bot SELECT 1"),
            Command::Query("SELECT 1".to_string())
        );
        assert_eq!(command("/start@relay_bot"), Command::Start);
    }

    #[test]
    fn test_case_insensitive_commands() {
        assert_eq!(command("/START"), Command::Start);
        assert_eq!(
            command("/Query SELECT 1"),
            Command::Query("SELECT 1".to_string())
        );
    }

    #[test]
    fn test_parse_unknown_command() {
        assert_eq!(command("/drop"), Command::Unknown("/drop".to_string()));
        assert_eq!(command("/"), Command::Unknown("/".to_string()));
    }
}
