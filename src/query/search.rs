//! Templated substring search.
//!
//! Builds `SELECT * FROM <table> WHERE <column> LIKE '%<term>%'` from a
//! configured table/column pair. The term is interpolated as-is: quotes in it
//! reach the database unescaped, so this path is open to SQL injection and
//! must only be exposed to trusted operators.

use serde::{Deserialize, Serialize};

/// Table and column searched by `/search`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchTemplate {
    /// Table to search.
    #[serde(default = "default_table")]
    pub table: String,

    /// Column matched with LIKE.
    #[serde(default = "default_column")]
    pub column: String,
}

fn default_table() -> String {
    "Sheet1".to_string()
}

fn default_column() -> String {
    "Column_2".to_string()
}

impl Default for SearchTemplate {
    fn default() -> Self {
        Self {
            table: default_table(),
            column: default_column(),
        }
    }
}

impl SearchTemplate {
    /// Creates a template for the given table and column.
    pub fn new(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            column: column.into(),
        }
    }

    /// Builds the search statement for `term`.
    pub fn build(&self, term: &str) -> String {
        format!(
            "SELECT * FROM {} WHERE {} LIKE '%{}%'",
            self.table, self.column, term
        )
    }
}
