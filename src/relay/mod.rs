// src/relay/mod.rs — Webhook ⇄ backend relay logic
//
// Independent of HTTP: the axum handlers parse bodies and hand them here.
// Downstream failures end in a log line, never in an error for the caller.

pub mod inbound;
pub mod outbound;

use std::sync::Arc;

use crate::integrations::types::{BackendClient, ReplySender};
use crate::session::SessionStore;

pub use inbound::{InboundSummary, WebhookEvent};
pub use outbound::{BackendResult, ResultOutcome};

/// Everything the relay handlers share. Cheap to clone.
#[derive(Clone)]
pub struct Relay {
    pub sessions: SessionStore,
    backend: Arc<dyn BackendClient>,
    replies: Arc<dyn ReplySender>,
    file_ids: Arc<Vec<String>>,
}

impl Relay {
    pub fn new(
        sessions: SessionStore,
        backend: Arc<dyn BackendClient>,
        replies: Arc<dyn ReplySender>,
        file_ids: Vec<String>,
    ) -> Self {
        Self {
            sessions,
            backend,
            replies,
            file_ids: Arc::new(file_ids),
        }
    }

    pub fn file_ids(&self) -> &[String] {
        &self.file_ids
    }
}
