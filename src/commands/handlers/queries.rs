//! Query command handlers (/query, /search).

use super::CommandContext;
use crate::commands::conversation::Purpose;
use crate::commands::help::{QUERY_USAGE, SEARCH_PROMPT};
use crate::commands::output::CommandOutput;
use crate::error::RelayError;

/// Reply used when `/query` renders to nothing.
pub const NO_ROWS: &str = "Query returned no rows.";

/// Reply used when `/search` renders to nothing.
pub const NO_RESULTS: &str = "No results found.";

/// Handle /query command.
pub async fn handle_query(ctx: &CommandContext<'_>, sql: &str) -> CommandOutput {
    let sql = sql.trim();
    if sql.is_empty() {
        return CommandOutput::from_error(&RelayError::empty_argument(QUERY_USAGE));
    }

    run(ctx, sql, NO_ROWS).await
}

/// Handle /search command.
///
/// Without an inline term this asks for one; the answer comes back through
/// [`search_with`].
pub async fn handle_search(ctx: &CommandContext<'_>, term: &str) -> CommandOutput {
    if term.trim().is_empty() {
        return CommandOutput::prompt(Purpose::Search, SEARCH_PROMPT);
    }
    search_with(ctx, term).await
}

/// Runs the configured search for `term`.
pub async fn search_with(ctx: &CommandContext<'_>, term: &str) -> CommandOutput {
    let sql = ctx.search.build(term.trim());
    run(ctx, &sql, NO_RESULTS).await
}

async fn run(ctx: &CommandContext<'_>, sql: &str, empty_reply: &str) -> CommandOutput {
    match ctx.executor.execute(sql).await {
        Ok(text) if text.is_empty() => CommandOutput::info(empty_reply),
        Ok(text) => CommandOutput::info(text),
        Err(e) => CommandOutput::from_error(&e),
    }
}
