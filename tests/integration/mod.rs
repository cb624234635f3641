//! Integration tests for db-relay.

pub mod bot_test;
pub mod dispatcher_test;
pub mod postgres_test;
