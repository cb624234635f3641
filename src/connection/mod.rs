//! Session management for db-relay.
//!
//! Holds the single active connection descriptor shared by every chat.

pub mod session;

pub use session::SessionStore;
