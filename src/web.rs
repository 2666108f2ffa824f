//! HTTP surface: health check plus the serving helper.
//!
//! `GET /` answers a small JSON status payload in both run modes. In webhook
//! mode the router returned by teloxide's webhook listener is merged in by
//! `main`, so the update endpoint and the health check share one port. The
//! webhook endpoint itself acknowledges every delivered update with 200 —
//! processing failures are logged, never surfaced to Telegram.

use anyhow::{Context, Result};
use axum::{response::Json, routing::get, Router};
use log::info;
use serde_json::{json, Value};
use std::future::Future;
use std::net::SocketAddr;
use tokio::net::TcpListener;

/// Router with the unauthenticated health route.
pub fn health_router() -> Router {
    Router::new().route("/", get(health_handler))
}

/// GET / — service status.
async fn health_handler() -> Json<Value> {
    Json(status_payload())
}

/// The health-check body.
pub fn status_payload() -> Value {
    json!({
        "status": "running",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    })
}

/// Bind and serve the router until `shutdown` resolves.
pub async fn serve(
    app: Router,
    addr: SocketAddr,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<()> {
    info!("Starting HTTP server on http://{}", addr);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .context("HTTP server failed")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_payload_reports_running() {
        let payload = status_payload();
        assert_eq!(payload["status"].as_str(), Some("running"));
        assert!(payload["version"].as_str().is_some());
    }
}
