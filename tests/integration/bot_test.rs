//! Bot loop integration tests.
//!
//! Drives the update loop through the in-memory transport.

use std::sync::Arc;
use std::time::Duration;

use db_relay::bot::Bot;
use db_relay::commands::{Dispatcher, ReplyFormat};
use db_relay::connection::SessionStore;
use db_relay::db::{CountingDriver, ResultRow, ResultTable};
use db_relay::query::{QueryExecutor, SearchTemplate};
use db_relay::transport::{MockTransport, SentMessage};
use pretty_assertions::assert_eq;

fn bot(driver: &CountingDriver) -> Bot<MockTransport> {
    let executor = QueryExecutor::new(Arc::new(driver.clone()), Arc::new(SessionStore::new()));
    Bot::new(
        MockTransport::new(),
        Dispatcher::new(executor, SearchTemplate::new("Ports", "Label")),
    )
}

#[tokio::test]
async fn test_interleaved_chats_keep_their_own_prompts() {
    let table = ResultTable::with_data(
        vec!["Label".to_string()],
        vec![ResultRow::new().with("Label", "eth0")],
    );
    let driver = CountingDriver::with_table(table);
    let mut bot = bot(&driver);

    bot.transport().push_messages(
        1,
        &[
            (1, "/connect postgres://localhost/net"),
            (1, "/search"),
            (2, "/connect"),
            (1, "eth"),
            (2, "/disconnect"),
        ],
    );
    bot.poll_once().await;

    assert_eq!(
        bot.transport().texts_for(1),
        vec![
            "Connected: postgres".to_string(),
            "Send the search term.".to_string(),
            "〔Label〕eth0\n──\n".to_string(),
        ]
    );
    assert_eq!(
        bot.transport().texts_for(2),
        vec![
            "Send the database connection string.".to_string(),
            "Disconnected from postgres.".to_string(),
        ]
    );
    assert_eq!(
        driver.stats().last_query().as_deref(),
        Some("SELECT * FROM Ports WHERE Label LIKE '%eth%'")
    );
    assert_eq!(bot.offset(), 6);
}

#[tokio::test]
async fn test_help_is_sent_as_markdown() {
    let mut bot = bot(&CountingDriver::new());
    bot.transport().push_messages(1, &[(9, "/START")]);
    bot.poll_once().await;

    let sent: Vec<SentMessage> = bot.transport().sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].chat, 9);
    assert_eq!(sent[0].format, ReplyFormat::Markdown);
}

#[tokio::test(start_paused = true)]
async fn test_run_until_drains_queued_updates() {
    let driver = CountingDriver::new();
    let mut bot = bot(&driver);
    bot.transport().push_messages(1, &[(1, "/connect postgres://localhost/app")]);
    bot.transport().push_messages(2, &[(1, "/query SELECT 1")]);

    bot.run_until(tokio::time::sleep(Duration::from_secs(1)))
        .await;

    assert_eq!(
        bot.transport().texts_for(1),
        vec![
            "Connected: postgres".to_string(),
            "〔result〕Mock result for: SELECT 1\n──\n".to_string(),
        ]
    );
    assert_eq!(driver.stats().open_handles(), 0);
}
