//! Query execution against the active session.
//!
//! Every call opens its own handle, runs exactly one probe or statement and
//! closes the handle again before returning, whatever the outcome.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::time::timeout;
use tracing::{debug, warn};

use crate::connection::SessionStore;
use crate::db::{ConnectionDescriptor, DatabaseConnection, DatabaseDriver, ResultTable};
use crate::error::{RelayError, Result};
use crate::query::render_table;

/// Default bound on opening a connection and on the liveness probe.
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Default bound on a single query round trip.
const DEFAULT_QUERY_TIMEOUT_SECS: u64 = 30;

/// Time budgets applied to driver calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutionLimits {
    pub connect_timeout: Duration,
    pub query_timeout: Duration,
}

impl Default for ExecutionLimits {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            query_timeout: Duration::from_secs(DEFAULT_QUERY_TIMEOUT_SECS),
        }
    }
}

/// Runs probes and queries through a driver.
pub struct QueryExecutor {
    driver: Arc<dyn DatabaseDriver>,
    session: Arc<SessionStore>,
    limits: ExecutionLimits,
}

impl QueryExecutor {
    /// Creates a new query executor with default limits.
    pub fn new(driver: Arc<dyn DatabaseDriver>, session: Arc<SessionStore>) -> Self {
        Self {
            driver,
            session,
            limits: ExecutionLimits::default(),
        }
    }

    /// Sets the time budgets.
    pub fn with_limits(mut self, limits: ExecutionLimits) -> Self {
        self.limits = limits;
        self
    }

    /// The session this executor reads from.
    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Opens a handle for `descriptor`, pings it and releases it.
    pub async fn test_connectivity(&self, descriptor: &ConnectionDescriptor) -> Result<()> {
        let mut conn = self.open(descriptor).await?;

        let outcome = match timeout(self.limits.connect_timeout, conn.ping()).await {
            Ok(result) => result,
            Err(_) => Err(RelayError::connection(format!(
                "ping timed out after {} seconds",
                self.limits.connect_timeout.as_secs()
            ))),
        };

        release(conn).await;
        outcome
    }

    /// Runs `sql` against the active session and renders the rows as text.
    ///
    /// An empty result renders to an empty string.
    pub async fn execute(&self, sql: &str) -> Result<String> {
        let table = self.execute_table(sql).await?;
        Ok(render_table(&table))
    }

    /// Runs `sql` against the active session and returns the decoded rows.
    pub async fn execute_table(&self, sql: &str) -> Result<ResultTable> {
        let descriptor = self.session.current().await.ok_or(RelayError::NotConnected)?;

        let start = Instant::now();
        let mut conn = self.open(&descriptor).await?;

        let outcome = match timeout(self.limits.query_timeout, conn.query(sql)).await {
            Ok(result) => result,
            Err(_) => Err(RelayError::query(format!(
                "Query timed out after {} seconds",
                self.limits.query_timeout.as_secs()
            ))),
        };

        release(conn).await;

        match &outcome {
            Ok(table) => debug!(
                "{} query returned {} rows in {:?}",
                descriptor.dialect(),
                table.row_count(),
                start.elapsed()
            ),
            Err(e) => warn!("{} query failed: {}", descriptor.dialect(), e),
        }

        outcome
    }

    async fn open(&self, descriptor: &ConnectionDescriptor) -> Result<Box<dyn DatabaseConnection>> {
        timeout(self.limits.connect_timeout, self.driver.open(descriptor))
            .await
            .map_err(|_| {
                RelayError::connection(format!(
                    "Connection timed out after {} seconds",
                    self.limits.connect_timeout.as_secs()
                ))
            })?
    }
}

/// Closes a handle, logging rather than surfacing close failures.
async fn release(conn: Box<dyn DatabaseConnection>) {
    if let Err(e) = conn.close().await {
        warn!("Failed to close connection: {}", e);
    }
}
