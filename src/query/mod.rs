//! Query execution and result rendering for db-relay.
//!
//! Isolates connection probing, SQL execution and text formatting from the
//! command handlers.

pub mod executor;
pub mod render;
pub mod search;

pub use executor::{ExecutionLimits, QueryExecutor};
pub use render::{render_table, ROW_SEPARATOR};
pub use search::SearchTemplate;
