//! Counting test double for the database layer.
//!
//! Returns scripted results or failures and records every open, close and
//! executed statement, so callers can assert that each handle they open is
//! also released.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use super::{ConnectionDescriptor, DatabaseConnection, DatabaseDriver, ResultRow, ResultTable};
use crate::error::{RelayError, Result};
use async_trait::async_trait;

/// What the mock does when asked to open, ping or query.
#[derive(Debug, Clone, Default)]
pub enum MockBehavior {
    /// SELECTs return one `result` column echoing the SQL; anything else is empty.
    #[default]
    Echo,
    /// Every query returns this table.
    Table(ResultTable),
    /// Opening a connection fails.
    FailOpen(String),
    /// The liveness probe fails.
    FailPing(String),
    /// The driver rejects every query.
    FailQuery(String),
    /// Column metadata cannot be read.
    FailColumns(String),
    /// Row decoding fails.
    FailScan(String),
}

/// Shared counters for a [`CountingDriver`].
#[derive(Debug, Default)]
pub struct DriverStats {
    opened: AtomicUsize,
    closed: AtomicUsize,
    executed: Mutex<Vec<String>>,
}

impl DriverStats {
    /// Number of handles opened so far.
    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    /// Number of handles closed so far.
    pub fn closed(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }

    /// Handles opened but not yet closed.
    pub fn open_handles(&self) -> usize {
        self.opened().saturating_sub(self.closed())
    }

    /// Every statement sent to `query`, in order.
    pub fn executed(&self) -> Vec<String> {
        self.executed.lock().map(|q| q.clone()).unwrap_or_default()
    }

    /// The most recent statement sent to `query`.
    pub fn last_query(&self) -> Option<String> {
        self.executed().pop()
    }

    fn record(&self, sql: &str) {
        if let Ok(mut executed) = self.executed.lock() {
            executed.push(sql.to_string());
        }
    }
}

/// A driver that never touches the network.
#[derive(Debug, Clone, Default)]
pub struct CountingDriver {
    behavior: Arc<Mutex<MockBehavior>>,
    stats: Arc<DriverStats>,
}

impl CountingDriver {
    /// Creates a driver with the echo behaviour.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a driver with the given behaviour.
    pub fn with_behavior(behavior: MockBehavior) -> Self {
        let driver = Self::new();
        driver.set_behavior(behavior);
        driver
    }

    /// Creates a driver whose queries all return `table`.
    pub fn with_table(table: ResultTable) -> Self {
        Self::with_behavior(MockBehavior::Table(table))
    }

    /// Replaces the behaviour for subsequent calls.
    pub fn set_behavior(&self, behavior: MockBehavior) {
        if let Ok(mut current) = self.behavior.lock() {
            *current = behavior;
        }
    }

    /// Shared counters.
    pub fn stats(&self) -> Arc<DriverStats> {
        Arc::clone(&self.stats)
    }

    fn behavior(&self) -> MockBehavior {
        self.behavior
            .lock()
            .map(|b| b.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl DatabaseDriver for CountingDriver {
    async fn open(&self, _descriptor: &ConnectionDescriptor) -> Result<Box<dyn DatabaseConnection>> {
        let behavior = self.behavior();
        if let MockBehavior::FailOpen(msg) = &behavior {
            return Err(RelayError::connection(msg.clone()));
        }

        self.stats.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MockConnection {
            behavior,
            stats: Arc::clone(&self.stats),
        }))
    }
}

struct MockConnection {
    behavior: MockBehavior,
    stats: Arc<DriverStats>,
}

#[async_trait]
impl DatabaseConnection for MockConnection {
    async fn ping(&mut self) -> Result<()> {
        match &self.behavior {
            MockBehavior::FailPing(msg) => Err(RelayError::connection(msg.clone())),
            _ => Ok(()),
        }
    }

    async fn query(&mut self, sql: &str) -> Result<ResultTable> {
        self.stats.record(sql);

        match &self.behavior {
            MockBehavior::FailQuery(msg) => Err(RelayError::query(msg.clone())),
            MockBehavior::FailColumns(msg) => Err(RelayError::column(msg.clone())),
            MockBehavior::FailScan(msg) => Err(RelayError::scan(msg.clone())),
            MockBehavior::Table(table) => Ok(table.clone()),
            _ if sql.trim_start().to_uppercase().starts_with("SELECT") => {
                let columns = vec!["result".to_string()];
                let row = ResultRow::new().with("result", format!("Mock result for: {}", sql));
                Ok(ResultTable::with_data(columns, vec![row]))
            }
            _ => Ok(ResultTable::new()),
        }
    }

    async fn close(self: Box<Self>) -> Result<()> {
        self.stats.closed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
