//! Error types for db-relay.
//!
//! Defines the main error enum used throughout the service. Every variant is
//! recoverable at the command boundary except the bootstrap ones (`Config`).

use thiserror::Error;

/// Main error type for db-relay operations.
#[derive(Error, Debug)]
pub enum RelayError {
    /// The connection could not be opened or the liveness probe failed.
    #[error("Connection error: {0}")]
    Connection(String),

    /// A query was attempted while no session is active.
    #[error("Not connected to a database. Use /connect first.")]
    NotConnected,

    /// The driver rejected the query (syntax, permissions, network, etc.)
    #[error("Query error: {0}")]
    Query(String),

    /// Result-set column metadata could not be read.
    #[error("Column error: {0}")]
    Column(String),

    /// A result row could not be decoded.
    #[error("Scan error: {0}")]
    Scan(String),

    /// The connection string matched no supported dialect.
    #[error("Unsupported database: {0}")]
    UnsupportedDialect(String),

    /// A command was invoked without its required argument text.
    #[error("Missing argument. Usage: {0}")]
    EmptyArgument(String),

    /// Configuration errors (invalid config file, missing token, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Chat transport errors (HTTP failures, API rejections, etc.)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Internal application errors (unexpected states, bugs, etc.)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl RelayError {
    /// Creates a connection error with the given message.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Creates a query error with the given message.
    pub fn query(msg: impl Into<String>) -> Self {
        Self::Query(msg.into())
    }

    /// Creates a column metadata error with the given message.
    pub fn column(msg: impl Into<String>) -> Self {
        Self::Column(msg.into())
    }

    /// Creates a row decoding error with the given message.
    pub fn scan(msg: impl Into<String>) -> Self {
        Self::Scan(msg.into())
    }

    /// Creates an unsupported dialect error for the given (redacted) input.
    pub fn unsupported_dialect(msg: impl Into<String>) -> Self {
        Self::UnsupportedDialect(msg.into())
    }

    /// Creates an empty argument error carrying the usage line.
    pub fn empty_argument(usage: impl Into<String>) -> Self {
        Self::EmptyArgument(usage.into())
    }

    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates a transport error with the given message.
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Creates an internal error with the given message.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Connection(_) => "Connection Error",
            Self::NotConnected => "Not Connected",
            Self::Query(_) => "Query Error",
            Self::Column(_) => "Column Error",
            Self::Scan(_) => "Scan Error",
            Self::UnsupportedDialect(_) => "Unsupported Database",
            Self::EmptyArgument(_) => "Missing Argument",
            Self::Config(_) => "Configuration Error",
            Self::Transport(_) => "Transport Error",
            Self::Internal(_) => "Internal Error",
        }
    }
}

/// Result type alias using RelayError.
pub type Result<T> = std::result::Result<T, RelayError>;
