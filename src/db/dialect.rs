//! Connection-string classification.
//!
//! Dialects are recognised by plain substring containment, checked in a fixed
//! order. Nothing is parsed, so a credential that happens to contain one of
//! the markers (a password holding `@tcp(`, say) can misclassify.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use url::Url;

use crate::error::{RelayError, Result};

/// Supported database backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    Postgres,
    MySql,
    SqlServer,
}

impl Dialect {
    /// Returns the driver name used in replies and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Postgres => "postgres",
            Self::MySql => "mysql",
            Self::SqlServer => "sqlserver",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Markers for each dialect, in evaluation order. First match wins.
const RULES: &[(Dialect, &[&str])] = &[
    (Dialect::Postgres, &["postgresql://", "postgres://"]),
    (Dialect::MySql, &["@tcp("]),
    (Dialect::SqlServer, &["sqlserver://", "server="]),
];

/// Maps a connection string to its dialect, or `None` when unsupported.
pub fn classify(conn_str: &str) -> Option<Dialect> {
    RULES
        .iter()
        .find(|(_, markers)| markers.iter().any(|m| conn_str.contains(m)))
        .map(|(dialect, _)| *dialect)
}

/// A validated `(dialect, connection string)` pair.
///
/// Only constructed through [`ConnectionDescriptor::parse`], so the dialect
/// always agrees with the string.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionDescriptor {
    dialect: Dialect,
    connection_string: String,
}

impl ConnectionDescriptor {
    /// Classifies `conn_str` and builds a descriptor for it.
    pub fn parse(conn_str: &str) -> Result<Self> {
        let conn_str = conn_str.trim();
        let dialect = classify(conn_str)
            .ok_or_else(|| RelayError::unsupported_dialect(redact(conn_str)))?;

        Ok(Self {
            dialect,
            connection_string: conn_str.to_string(),
        })
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn connection_string(&self) -> &str {
        &self.connection_string
    }

    /// Returns the connection string with any password masked.
    pub fn redacted(&self) -> String {
        redact(&self.connection_string)
    }
}

impl fmt::Debug for ConnectionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionDescriptor")
            .field("dialect", &self.dialect)
            .field("connection_string", &self.redacted())
            .finish()
    }
}

fn ado_password_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)((?:password|pwd)\s*=)[^;]*").expect("static regex is valid")
    })
}

fn dsn_password_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([^:@/]*):[^@]*@").expect("static regex is valid"))
}

fn is_password_key(key: &str) -> bool {
    key.eq_ignore_ascii_case("password") || key.eq_ignore_ascii_case("pwd")
}

/// Masks the password in URL, ADO (`password=...;`) and Go DSN
/// (`user:pass@tcp(...)`) connection strings.
pub fn redact(conn_str: &str) -> String {
    if let Ok(mut url) = Url::parse(conn_str) {
        let mut masked = url.password().is_some() && url.set_password(Some("***")).is_ok();

        if url.query_pairs().any(|(key, _)| is_password_key(&key)) {
            let pairs: Vec<(String, String)> = url
                .query_pairs()
                .map(|(key, value)| {
                    let value = if is_password_key(&key) {
                        "***".to_string()
                    } else {
                        value.into_owned()
                    };
                    (key.into_owned(), value)
                })
                .collect();
            url.query_pairs_mut().clear().extend_pairs(pairs);
            masked = true;
        }

        if masked {
            return url.to_string();
        }
        if url.has_host() {
            return conn_str.to_string();
        }
    }

    if ado_password_re().is_match(conn_str) {
        return ado_password_re()
            .replace_all(conn_str, "${1}***")
            .into_owned();
    }

    dsn_password_re()
        .replace(conn_str, "${1}:***@")
        .into_owned()
}
