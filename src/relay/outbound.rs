// src/relay/outbound.rs — Backend result callback → reply to the original sender

use serde::{Deserialize, Serialize};

use crate::relay::Relay;

/// Callback body posted by the backend when an answer is ready.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BackendResult {
    #[serde(default)]
    pub chat_id: Option<String>,
    #[serde(default)]
    pub ai_response: Option<String>,
}

/// What became of a backend result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultOutcome {
    /// Reply accepted by the chat platform.
    Delivered,
    /// Session found but the reply could not be sent (logged).
    SendFailed,
    /// No live session for the chat id; nothing was sent.
    MissingSender,
}

impl ResultOutcome {
    /// Status string returned to the backend. Send failures are not its concern.
    pub fn status(&self) -> &'static str {
        match self {
            ResultOutcome::Delivered | ResultOutcome::SendFailed => "received",
            ResultOutcome::MissingSender => "missing-sender",
        }
    }
}

impl Relay {
    /// Look up who asked and forward the backend's answer to them.
    pub async fn handle_result(&self, result: &BackendResult) -> ResultOutcome {
        let chat_id = result.chat_id.as_deref().unwrap_or_default();
        let Some(session) = self.sessions.lookup(chat_id) else {
            tracing::warn!("No sender found for chat_id: {}", chat_id);
            return ResultOutcome::MissingSender;
        };

        let text = result.ai_response.as_deref().unwrap_or_default();
        match self.replies.send_reply(&session.sender_id, text).await {
            Ok(()) => {
                tracing::info!("AI Reply sent to {}", session.sender_id);
                ResultOutcome::Delivered
            }
            Err(e) => {
                tracing::error!("Messenger Send Error: {}", e);
                ResultOutcome::SendFailed
            }
        }
    }
}
