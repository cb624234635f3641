//! Database abstraction layer for db-relay.
//!
//! Provides a trait-based interface for opening short-lived connections, so
//! the query executor can run against Postgres, MySQL, SQL Server or a test
//! double interchangeably. No handle is pooled or reused between calls.

mod dialect;
mod mock;
mod mysql;
mod postgres;
mod sqlserver;
mod types;

pub use dialect::{classify, redact, ConnectionDescriptor, Dialect};
pub use mock::{CountingDriver, DriverStats, MockBehavior};
pub use mysql::{dsn_to_url, MySqlClient};
pub use postgres::PostgresClient;
pub use sqlserver::SqlServerClient;
pub use types::{ResultRow, ResultTable, Value, NULL_TOKEN};

use crate::error::Result;
use async_trait::async_trait;

/// Opens connections for a descriptor.
#[async_trait]
pub trait DatabaseDriver: Send + Sync {
    /// Opens a fresh connection. Fails with a connection error.
    async fn open(&self, descriptor: &ConnectionDescriptor) -> Result<Box<dyn DatabaseConnection>>;
}

/// A single open database handle.
///
/// Callers must finish with [`DatabaseConnection::close`] on every path.
#[async_trait]
pub trait DatabaseConnection: Send {
    /// Round-trips to the server to prove the handle is usable.
    async fn ping(&mut self) -> Result<()>;

    /// Runs `sql` verbatim and decodes every row.
    ///
    /// Fails with a query error when the driver rejects the statement, a
    /// column error when metadata cannot be read and a scan error on the
    /// first row that cannot be decoded.
    async fn query(&mut self, sql: &str) -> Result<ResultTable>;

    /// Releases the handle.
    async fn close(self: Box<Self>) -> Result<()>;
}

/// Driver that dispatches to the real client for each dialect.
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeDriver;

impl NativeDriver {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DatabaseDriver for NativeDriver {
    async fn open(&self, descriptor: &ConnectionDescriptor) -> Result<Box<dyn DatabaseConnection>> {
        let conn_str = descriptor.connection_string();
        match descriptor.dialect() {
            Dialect::Postgres => Ok(Box::new(PostgresClient::connect(conn_str).await?)),
            Dialect::MySql => Ok(Box::new(MySqlClient::connect(conn_str).await?)),
            Dialect::SqlServer => Ok(Box::new(SqlServerClient::connect(conn_str).await?)),
        }
    }
}
