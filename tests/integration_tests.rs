//! Integration tests for db-relay.
//!
//! Most tests drive the bot end to end through the in-memory transport and
//! the counting driver. The live database tests skip themselves unless
//! DATABASE_URL is set.
//!
//! Run with: `cargo test --test integration_tests`

mod integration;
