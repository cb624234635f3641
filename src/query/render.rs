//! Text rendering of result tables for chat replies.
//!
//! Each cell becomes a `〔column〕value` line in the row's column order and
//! every row is closed by a `──` separator line. An empty table renders to an
//! empty string; substituting a "no results" message is the caller's job.

use std::fmt::Write;

use crate::db::ResultTable;

/// Line written after every row.
pub const ROW_SEPARATOR: &str = "──";

/// Renders a result table to reply text.
pub fn render_table(table: &ResultTable) -> String {
    let mut out = String::new();
    for row in &table.rows {
        for (column, value) in row.iter() {
            // Writing to a String cannot fail.
            let _ = writeln!(out, "〔{}〕{}", column, value);
        }
        out.push_str(ROW_SEPARATOR);
        out.push('\n');
    }
    out
}
