// src/api/handlers.rs

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;

use crate::api::{auth, types::*, ApiState};
use crate::relay::{BackendResult, WebhookEvent};

/// GET / — Liveness banner.
pub async fn root() -> Json<StatusResponse> {
    Json(StatusResponse::new("Running"))
}

/// GET /webhook — Subscription verification handshake.
pub async fn verify_webhook(
    State(state): State<ApiState>,
    Query(query): Query<VerifyQuery>,
) -> (StatusCode, String) {
    match auth::verify_subscription(&query, &state.verify_token) {
        Some(challenge) => {
            tracing::info!("[Webhook Verified]");
            (StatusCode::OK, challenge.to_string())
        }
        None => {
            tracing::warn!("Webhook verification failed");
            (StatusCode::FORBIDDEN, "Forbidden".into())
        }
    }
}

/// POST /webhook — Inbound message events. Always acknowledged.
pub async fn receive_webhook(
    State(state): State<ApiState>,
    Json(body): Json<WebhookEvent>,
) -> Json<StatusResponse> {
    let summary = state.relay.handle_inbound(&body, Utc::now()).await;
    tracing::info!(
        "[WEBHOOK EVENT] {} message(s), {} dispatched, {} failed",
        summary.processed,
        summary.dispatched,
        summary.failed
    );
    Json(StatusResponse::new("ok"))
}

/// POST /dx-result — Backend answer, relayed to the original sender.
pub async fn receive_result(
    State(state): State<ApiState>,
    Json(body): Json<BackendResult>,
) -> Json<StatusResponse> {
    tracing::info!(
        "[DX RESULT] chat_id={}",
        body.chat_id.as_deref().unwrap_or("<none>")
    );
    let outcome = state.relay.handle_result(&body).await;
    Json(StatusResponse::new(outcome.status()))
}

/// GET /api/v1/health — Health check with the live session count.
pub async fn health(State(state): State<ApiState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        active_sessions: state.relay.sessions.len(),
    })
}
