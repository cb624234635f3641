//! Process-wide session state.
//!
//! At most one descriptor is active at a time. Connect and clear swap the
//! value under a write lock, so a query reading the session never observes a
//! half-applied change.

use tokio::sync::RwLock;
use tracing::info;

use crate::db::ConnectionDescriptor;

/// The single active (dialect, connection string) pair.
#[derive(Debug, Default)]
pub struct SessionStore {
    active: RwLock<Option<ConnectionDescriptor>>,
}

impl SessionStore {
    /// Creates a disconnected session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if there's an active descriptor.
    pub async fn is_connected(&self) -> bool {
        self.active.read().await.is_some()
    }

    /// Replaces the active descriptor unconditionally.
    pub async fn connect(&self, descriptor: ConnectionDescriptor) {
        info!(
            "Session connected: {} ({})",
            descriptor.dialect(),
            descriptor.redacted()
        );
        *self.active.write().await = Some(descriptor);
    }

    /// Returns a copy of the active descriptor.
    pub async fn current(&self) -> Option<ConnectionDescriptor> {
        self.active.read().await.clone()
    }

    /// Drops the active descriptor, returning it.
    pub async fn clear(&self) -> Option<ConnectionDescriptor> {
        let previous = self.active.write().await.take();
        if let Some(ref descriptor) = previous {
            info!("Session cleared: {}", descriptor.dialect());
        }
        previous
    }
}
