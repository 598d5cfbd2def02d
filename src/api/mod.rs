// src/api/mod.rs — HTTP surface: webhook, backend callback, health

pub mod auth;
pub mod handlers;
pub mod types;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::relay::Relay;

/// Shared state for API handlers.
#[derive(Clone)]
pub struct ApiState {
    pub relay: Relay,
    pub verify_token: Arc<str>,
}

impl ApiState {
    pub fn new(relay: Relay, verify_token: impl Into<Arc<str>>) -> Self {
        Self {
            relay,
            verify_token: verify_token.into(),
        }
    }
}

/// Build the axum router with all routes.
pub fn build_router(state: ApiState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route(
            "/webhook",
            get(handlers::verify_webhook).post(handlers::receive_webhook),
        )
        .route("/dx-result", post(handlers::receive_result))
        .route("/api/v1/health", get(handlers::health))
        .with_state(state)
}

/// Serve on an already-bound listener until `shutdown` is cancelled.
pub async fn serve(
    listener: TcpListener,
    state: ApiState,
    shutdown: CancellationToken,
) -> anyhow::Result<()> {
    let router = build_router(state);

    tracing::info!("Relay listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;
    Ok(())
}
