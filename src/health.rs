//! Liveness endpoint.
//!
//! Hosting platforms that expect a web process probe `GET /`; the bot itself
//! does not serve anything else over HTTP.

use std::future::Future;
use std::net::{Ipv4Addr, SocketAddr};

use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tracing::info;

use crate::error::{RelayError, Result};

/// Body returned by the liveness endpoint.
pub const ALIVE_BODY: &str = "Bot is running";

/// Builds the liveness router.
pub fn router() -> Router {
    Router::new().route("/", get(|| async { ALIVE_BODY }))
}

/// Binds `0.0.0.0:port`.
pub async fn bind(port: u16) -> Result<TcpListener> {
    let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, port));
    TcpListener::bind(addr)
        .await
        .map_err(|e| RelayError::internal(format!("Failed to bind {}: {}", addr, e)))
}

/// Serves the liveness router on `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        info!("Liveness endpoint listening on {}", addr);
    }

    axum::serve(listener, router())
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| RelayError::internal(format!("Liveness endpoint failed: {}", e)))
}
