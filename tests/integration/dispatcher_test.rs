//! Command dispatch integration tests.
//!
//! Exercises the full command path (router, handlers, executor, rendering)
//! against the counting driver.

use std::sync::Arc;

use db_relay::commands::{Dispatcher, Interaction, Purpose, ReplyFormat};
use db_relay::connection::SessionStore;
use db_relay::db::{CountingDriver, MockBehavior, ResultRow, ResultTable, Value};
use db_relay::query::{QueryExecutor, SearchTemplate};
use pretty_assertions::assert_eq;

const CHAT: i64 = 100;

fn dispatcher(driver: &CountingDriver) -> Dispatcher {
    let executor = QueryExecutor::new(Arc::new(driver.clone()), Arc::new(SessionStore::new()));
    Dispatcher::new(executor, SearchTemplate::default())
}

async fn reply(dispatcher: &Dispatcher, text: &str) -> String {
    dispatcher
        .handle(CHAT, text)
        .await
        .map(|r| r.text)
        .unwrap_or_default()
}

fn inventory() -> ResultTable {
    ResultTable::with_data(
        vec!["id".to_string(), "label".to_string(), "note".to_string()],
        vec![
            ResultRow::new()
                .with("id", 1i64)
                .with("label", "A1-01")
                .with("note", Value::Null),
            ResultRow::new()
                .with("id", 2i64)
                .with("label", "A1-02")
                .with("note", "spare"),
        ],
    )
}

#[tokio::test]
async fn test_full_session_lifecycle() {
    let driver = CountingDriver::with_table(inventory());
    let dispatcher = dispatcher(&driver);

    assert_eq!(
        reply(&dispatcher, "/query SELECT * FROM Sheet1").await,
        "Error: Not connected to a database. Use /connect first."
    );
    assert_eq!(driver.stats().opened(), 0);

    assert_eq!(
        reply(&dispatcher, "/connect postgresql://app:pw@db:5432/inventory").await,
        "Connected: postgres"
    );

    assert_eq!(
        reply(&dispatcher, "/query SELECT * FROM Sheet1").await,
        "〔id〕1\n〔label〕A1-01\n〔note〕nil\n──\n〔id〕2\n〔label〕A1-02\n〔note〕spare\n──\n"
    );

    assert_eq!(
        reply(&dispatcher, "/disconnect").await,
        "Disconnected from postgres."
    );
    assert_eq!(
        reply(&dispatcher, "/query SELECT 1").await,
        "Error: Not connected to a database. Use /connect first."
    );

    let stats = driver.stats();
    assert_eq!(stats.opened(), 2);
    assert_eq!(stats.opened(), stats.closed());
}

#[tokio::test]
async fn test_unsupported_dialect_never_reaches_driver() {
    let driver = CountingDriver::new();
    let dispatcher = dispatcher(&driver);

    assert_eq!(
        reply(&dispatcher, "/connect redis://localhost:6379").await,
        "Error: Unsupported database: redis://localhost:6379"
    );
    assert_eq!(driver.stats().opened(), 0);
    assert!(!dispatcher.executor().session().is_connected().await);
}

#[tokio::test]
async fn test_unsupported_dialect_reply_hides_password() {
    let driver = CountingDriver::new();
    let dispatcher = dispatcher(&driver);

    let text = reply(&dispatcher, "/connect mongodb://admin:hunter2@db:27017").await;
    assert!(text.starts_with("Error: Unsupported database:"));
    assert!(!text.contains("hunter2"));
}

#[tokio::test]
async fn test_empty_query_reports_usage_without_driver_call() {
    let driver = CountingDriver::new();
    let dispatcher = dispatcher(&driver);

    reply(&dispatcher, "/connect user:pw@tcp(db:3306)/shop").await;
    let opened = driver.stats().opened();

    assert_eq!(
        reply(&dispatcher, "/query").await,
        "Error: Missing argument. Usage: /query 〔SQL statement〕"
    );
    assert_eq!(driver.stats().opened(), opened);
}

#[tokio::test]
async fn test_search_two_step_flow() {
    let driver = CountingDriver::with_table(ResultTable::new());
    let dispatcher = dispatcher(&driver);

    reply(&dispatcher, "/connect server=db;user id=sa;password=pw;database=ops").await;

    assert_eq!(reply(&dispatcher, "/search").await, "Send the search term.");
    assert_eq!(
        dispatcher.conversations().state(CHAT),
        Interaction::AwaitingFreeText(Purpose::Search)
    );

    assert_eq!(reply(&dispatcher, "A1-").await, "No results found.");
    assert_eq!(
        driver.stats().last_query().as_deref(),
        Some("SELECT * FROM Sheet1 WHERE Column_2 LIKE '%A1-%'")
    );
    assert_eq!(
        dispatcher.conversations().state(CHAT),
        Interaction::AwaitingCommand
    );
}

#[tokio::test]
async fn test_slash_prefixed_answer_reaches_search() {
    let driver = CountingDriver::with_table(ResultTable::new());
    let dispatcher = dispatcher(&driver);

    reply(&dispatcher, "/connect postgres://localhost/app").await;
    reply(&dispatcher, "/search").await;

    assert_eq!(reply(&dispatcher, "/24").await, "No results found.");
    assert_eq!(
        driver.stats().last_query().as_deref(),
        Some("SELECT * FROM Sheet1 WHERE Column_2 LIKE '%/24%'")
    );
}

#[tokio::test]
async fn test_known_command_cancels_pending_search() {
    let driver = CountingDriver::with_table(ResultTable::new());
    let dispatcher = dispatcher(&driver);

    reply(&dispatcher, "/connect postgres://localhost/app").await;
    reply(&dispatcher, "/search").await;
    let statements = driver.stats().executed().len();

    assert!(reply(&dispatcher, "/start").await.contains("/query"));
    assert_eq!(driver.stats().executed().len(), statements);
    assert_eq!(
        dispatcher.conversations().state(CHAT),
        Interaction::AwaitingCommand
    );
}

#[tokio::test]
async fn test_search_term_is_not_escaped() {
    let driver = CountingDriver::with_table(ResultTable::new());
    let dispatcher = dispatcher(&driver);

    reply(&dispatcher, "/connect postgres://localhost/app").await;
    reply(&dispatcher, "/search x' OR '1'='1").await;

    assert_eq!(
        driver.stats().last_query().as_deref(),
        Some("SELECT * FROM Sheet1 WHERE Column_2 LIKE '%x' OR '1'='1%'")
    );
}

#[tokio::test]
async fn test_connect_two_step_flow() {
    let driver = CountingDriver::new();
    let dispatcher = dispatcher(&driver);

    assert_eq!(
        reply(&dispatcher, "/connect").await,
        "Send the database connection string."
    );
    assert_eq!(
        reply(&dispatcher, "sqlserver://sa:pw@db:1433?database=ops").await,
        "Connected: sqlserver"
    );
    assert_eq!(driver.stats().open_handles(), 0);
}

#[tokio::test]
async fn test_connect_is_idempotent() {
    let driver = CountingDriver::new();
    let dispatcher = dispatcher(&driver);

    for _ in 0..2 {
        assert_eq!(
            reply(&dispatcher, "/connect postgres://localhost/app").await,
            "Connected: postgres"
        );
    }

    let current = dispatcher.executor().session().current().await.unwrap();
    assert_eq!(current.connection_string(), "postgres://localhost/app");
}

#[tokio::test]
async fn test_driver_errors_keep_bot_usable() {
    let driver = CountingDriver::new();
    let dispatcher = dispatcher(&driver);
    reply(&dispatcher, "/connect postgres://localhost/app").await;

    driver.set_behavior(MockBehavior::FailQuery(
        "syntax error at or near \"SELEC\"".to_string(),
    ));
    assert_eq!(
        reply(&dispatcher, "/query SELEC 1").await,
        "Error: Query error: syntax error at or near \"SELEC\""
    );

    driver.set_behavior(MockBehavior::FailScan("invalid byte sequence".to_string()));
    assert_eq!(
        reply(&dispatcher, "/query SELECT 1").await,
        "Error: Scan error: invalid byte sequence"
    );

    driver.set_behavior(MockBehavior::Echo);
    assert_eq!(
        reply(&dispatcher, "/query SELECT 1").await,
        "〔result〕Mock result for: SELECT 1\n──\n"
    );

    let stats = driver.stats();
    assert_eq!(stats.opened(), stats.closed());
}

#[tokio::test]
async fn test_non_select_statement_reports_no_rows() {
    let driver = CountingDriver::new();
    let dispatcher = dispatcher(&driver);
    reply(&dispatcher, "/connect postgres://localhost/app").await;

    assert_eq!(
        reply(&dispatcher, "/query UPDATE t SET a = 1").await,
        "Query returned no rows."
    );
}

#[tokio::test]
async fn test_start_and_unknown() {
    let dispatcher = dispatcher(&CountingDriver::new());

    let help = dispatcher.handle(CHAT, "/start@relay_bot").await.unwrap();
    assert_eq!(help.format, ReplyFormat::Markdown);
    assert!(help.text.contains("/query"));

    assert_eq!(
        reply(&dispatcher, "/select").await,
        "Unknown command: /select. Use /start to see the available commands."
    );
}
