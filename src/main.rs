//! db-relay - run ad-hoc SQL against Postgres, MySQL and SQL Server from a chat.

use std::sync::Arc;

use anyhow::Context;
use tracing::{error, info, warn};

use db_relay::bot::Bot;
use db_relay::cli::Cli;
use db_relay::commands::Dispatcher;
use db_relay::config::Config;
use db_relay::connection::SessionStore;
use db_relay::db::NativeDriver;
use db_relay::query::QueryExecutor;
use db_relay::transport::{TelegramConfig, TelegramTransport};
use db_relay::{health, logging};

#[tokio::main]
async fn main() {
    // A missing .env file is fine; variables may come from the environment.
    let _ = dotenvy::dotenv();

    logging::init_logging();

    if let Err(e) = run().await {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse_args();

    let config_path = cli.config_path();
    info!("Loading config from: {}", config_path.display());
    let mut config = Config::load_from_file(&config_path)?;
    config.apply_overrides(cli.token.clone(), cli.port);

    let token = config.require_token()?.to_string();

    let listener = health::bind(config.http.port)
        .await
        .context("Failed to start liveness endpoint")?;
    let health_task = tokio::spawn(health::serve(listener, shutdown_signal()));

    let executor = QueryExecutor::new(Arc::new(NativeDriver::new()), Arc::new(SessionStore::new()))
        .with_limits(config.database.limits());
    let dispatcher = Dispatcher::new(executor, config.search.clone());

    let transport = TelegramTransport::new(TelegramConfig::from_bot_config(&config.bot, token))
        .context("Failed to create chat transport")?;

    info!(
        "Search target: {}.{}",
        config.search.table, config.search.column
    );

    Bot::new(transport, dispatcher)
        .run_until(shutdown_signal())
        .await;

    match health_task.await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => warn!("{}", e),
        Err(e) => warn!("Liveness endpoint task failed: {}", e),
    }

    info!("Stopped");
    Ok(())
}

/// Resolves on Ctrl-C.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}
