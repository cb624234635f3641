//! db-relay - run ad-hoc SQL against Postgres, MySQL and SQL Server from a chat.
//!
//! This library exposes the core modules for use in integration tests.

pub mod bot;
pub mod cli;
pub mod commands;
pub mod config;
pub mod connection;
pub mod db;
pub mod error;
pub mod health;
pub mod logging;
pub mod query;
pub mod transport;
