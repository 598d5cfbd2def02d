// src/integrations/types.rs — Outbound payloads and adapter traits

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Value of `callback_type` the backend uses to route its result back here.
pub const CALLBACK_TYPE: &str = "messenger";

/// Body POSTed to the AI backend for each inbound message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendPayload {
    pub chat_id: String,
    /// `null` when the message carried only attachments.
    pub user_message: Option<String>,
    pub file_ids: Vec<String>,
    pub file_urls: Vec<String>,
    pub callback_type: String,
}

impl BackendPayload {
    pub fn new(
        chat_id: impl Into<String>,
        user_message: Option<String>,
        file_ids: Vec<String>,
        file_urls: Vec<String>,
    ) -> Self {
        Self {
            chat_id: chat_id.into(),
            user_message,
            file_ids,
            file_urls,
            callback_type: CALLBACK_TYPE.into(),
        }
    }
}

/// Send API body: `{ recipient: { id }, message: { text } }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplyPayload {
    pub recipient: Recipient,
    pub message: ReplyMessage,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipient {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplyMessage {
    pub text: String,
}

impl ReplyPayload {
    pub fn text(recipient_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            recipient: Recipient {
                id: recipient_id.into(),
            },
            message: ReplyMessage { text: text.into() },
        }
    }
}

/// Forwards normalized user messages to the AI backend.
#[async_trait]
pub trait BackendClient: Send + Sync {
    async fn dispatch(&self, payload: &BackendPayload) -> anyhow::Result<()>;
}

/// Delivers backend answers to a chat-platform user.
#[async_trait]
pub trait ReplySender: Send + Sync {
    async fn send_reply(&self, recipient_id: &str, text: &str) -> anyhow::Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_backend_payload_shape() {
        let payload = BackendPayload::new(
            "123",
            None,
            vec!["f1".into()],
            vec!["https://cdn.example.com/a.png".into()],
        );
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "chat_id": "123",
                "user_message": null,
                "file_ids": ["f1"],
                "file_urls": ["https://cdn.example.com/a.png"],
                "callback_type": "messenger",
            })
        );
    }

    #[test]
    fn test_reply_payload_shape() {
        let json = serde_json::to_value(ReplyPayload::text("42", "hello")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "recipient": { "id": "42" },
                "message": { "text": "hello" },
            })
        );
    }
}
