// src/relay/inbound.rs — Inbound webhook events → session upsert + backend dispatch

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

use crate::integrations::types::BackendPayload;
use crate::relay::Relay;
use crate::util::truncate_str;

/// The `object` value carried by page subscriptions.
pub const PAGE_OBJECT: &str = "page";

// -- Webhook body types --

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebhookEvent {
    #[serde(default)]
    pub object: Option<String>,
    #[serde(default)]
    pub entry: Vec<Entry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Entry {
    #[serde(default)]
    pub messaging: Vec<MessagingEvent>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessagingEvent {
    #[serde(default)]
    pub sender: Option<Party>,
    /// Absent for deliveries, reads, postbacks, etc.
    #[serde(default)]
    pub message: Option<IncomingMessage>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Party {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: String,
}

/// Page-scoped ids arrive as strings, but accept bare numbers too.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Number(n) => n.to_string(),
    })
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct IncomingMessage {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Attachment {
    #[serde(default)]
    pub payload: Option<AttachmentPayload>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AttachmentPayload {
    #[serde(default)]
    pub url: Option<String>,
}

impl IncomingMessage {
    /// Attachment URLs in delivery order; attachments without one are skipped.
    pub fn file_urls(&self) -> Vec<String> {
        self.attachments
            .iter()
            .filter_map(|a| a.payload.as_ref()?.url.clone())
            .collect()
    }
}

impl WebhookEvent {
    pub fn is_page(&self) -> bool {
        self.object.as_deref() == Some(PAGE_OBJECT)
    }
}

/// Per-request tally, for logging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InboundSummary {
    /// Message events that produced a session upsert.
    pub processed: usize,
    pub dispatched: usize,
    pub failed: usize,
}

impl Relay {
    /// Record a session for every message event and forward it to the backend.
    pub async fn handle_inbound(&self, event: &WebhookEvent, now: DateTime<Utc>) -> InboundSummary {
        let mut summary = InboundSummary::default();

        if !event.is_page() {
            tracing::debug!(
                "Ignoring webhook for object {:?}",
                event.object.as_deref().unwrap_or("<none>")
            );
            return summary;
        }

        for messaging in event.entry.iter().flat_map(|e| &e.messaging) {
            let Some(ref message) = messaging.message else {
                continue;
            };

            let sender_id = messaging
                .sender
                .as_ref()
                .map(|p| p.id.as_str())
                .unwrap_or_default();
            if sender_id.is_empty() {
                tracing::warn!("Skipping message event without a sender id");
                continue;
            }

            tracing::info!(
                "Message from {}: {}",
                sender_id,
                truncate_str(message.text.as_deref().unwrap_or("<no text>"), 200)
            );

            // The sender id doubles as the conversation key.
            let chat_id = sender_id;
            self.sessions.upsert(chat_id, sender_id, now);
            summary.processed += 1;

            let payload = BackendPayload::new(
                chat_id,
                message.text.clone(),
                self.file_ids().to_vec(),
                message.file_urls(),
            );
            tracing::info!(
                "[DX PAYLOAD] chat_id={} files={} attachments={}",
                payload.chat_id,
                payload.file_ids.len(),
                payload.file_urls.len()
            );

            match self.backend.dispatch(&payload).await {
                Ok(()) => summary.dispatched += 1,
                Err(e) => {
                    tracing::error!("DX API Error: {}", e);
                    summary.failed += 1;
                }
            }
        }

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relay::testing::{relay_with, RecordingBackend, RecordingSender};
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn parse(json: serde_json::Value) -> WebhookEvent {
        serde_json::from_value(json).unwrap()
    }

    fn t0() -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000, 0).unwrap()
    }

    #[tokio::test]
    async fn test_text_message_creates_session_and_dispatches() {
        let backend = RecordingBackend::default();
        let relay = relay_with(backend.clone(), RecordingSender::default(), vec!["f1".into()]);

        let event = parse(serde_json::json!({
            "object": "page",
            "entry": [{ "messaging": [{
                "sender": { "id": "u1" },
                "recipient": { "id": "page" },
                "message": { "mid": "m1", "text": "hello" }
            }]}]
        }));

        let summary = relay.handle_inbound(&event, t0()).await;
        assert_eq!(summary, InboundSummary { processed: 1, dispatched: 1, failed: 0 });

        let session = relay.sessions.lookup("u1").unwrap();
        assert_eq!(session.sender_id, "u1");
        assert_eq!(session.last_active, t0());

        let sent = backend.payloads();
        assert_eq!(
            sent,
            vec![BackendPayload::new("u1", Some("hello".into()), vec!["f1".into()], vec![])]
        );
    }

    #[tokio::test]
    async fn test_attachments_become_file_urls() {
        let backend = RecordingBackend::default();
        let relay = relay_with(backend.clone(), RecordingSender::default(), vec![]);

        let event = parse(serde_json::json!({
            "object": "page",
            "entry": [{ "messaging": [{
                "sender": { "id": "u2" },
                "message": { "attachments": [
                    { "type": "image", "payload": { "url": "https://cdn.example.com/a.jpg" } },
                    { "type": "fallback", "payload": {} },
                    { "type": "file", "payload": { "url": "https://cdn.example.com/b.pdf" } },
                    { "type": "sticker" }
                ]}
            }]}]
        }));

        relay.handle_inbound(&event, t0()).await;
        let sent = backend.payloads();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].user_message.is_none());
        assert_eq!(
            sent[0].file_urls,
            vec!["https://cdn.example.com/a.jpg", "https://cdn.example.com/b.pdf"]
        );
    }

    #[tokio::test]
    async fn test_non_message_events_skipped() {
        let backend = RecordingBackend::default();
        let relay = relay_with(backend.clone(), RecordingSender::default(), vec![]);

        let event = parse(serde_json::json!({
            "object": "page",
            "entry": [{ "messaging": [
                { "sender": { "id": "u1" }, "delivery": { "mids": ["m1"] } },
                { "sender": { "id": "u1" }, "read": { "watermark": 1 } }
            ]}]
        }));

        let summary = relay.handle_inbound(&event, t0()).await;
        assert_eq!(summary, InboundSummary::default());
        assert!(relay.sessions.is_empty());
        assert!(backend.payloads().is_empty());
    }

    #[tokio::test]
    async fn test_missing_sender_skipped() {
        let backend = RecordingBackend::default();
        let relay = relay_with(backend.clone(), RecordingSender::default(), vec![]);

        let event = parse(serde_json::json!({
            "object": "page",
            "entry": [{ "messaging": [
                { "message": { "text": "orphan" } },
                { "sender": { "id": "" }, "message": { "text": "blank" } }
            ]}]
        }));

        let summary = relay.handle_inbound(&event, t0()).await;
        assert_eq!(summary.processed, 0);
        assert!(relay.sessions.is_empty());
    }

    #[tokio::test]
    async fn test_numeric_sender_id_accepted() {
        let backend = RecordingBackend::default();
        let relay = relay_with(backend.clone(), RecordingSender::default(), vec![]);

        let event = parse(serde_json::json!({
            "object": "page",
            "entry": [{ "messaging": [{
                "sender": { "id": 1234567890123u64 },
                "message": { "text": "hi" }
            }]}]
        }));

        let summary = relay.handle_inbound(&event, t0()).await;
        assert_eq!(summary.processed, 1);
        assert_eq!(relay.sessions.lookup("1234567890123").unwrap().sender_id, "1234567890123");
        assert_eq!(backend.payloads()[0].chat_id, "1234567890123");
    }

    #[tokio::test]
    async fn test_non_page_object_ignored() {
        let backend = RecordingBackend::default();
        let relay = relay_with(backend.clone(), RecordingSender::default(), vec![]);

        let event = parse(serde_json::json!({
            "object": "instagram",
            "entry": [{ "messaging": [{ "sender": { "id": "u1" }, "message": { "text": "hi" } }]}]
        }));

        assert_eq!(relay.handle_inbound(&event, t0()).await, InboundSummary::default());
        assert!(relay.sessions.lookup("u1").is_none());
    }

    #[tokio::test]
    async fn test_backend_failure_still_records_session() {
        let backend = RecordingBackend::failing();
        let relay = relay_with(backend.clone(), RecordingSender::default(), vec![]);

        let event = parse(serde_json::json!({
            "object": "page",
            "entry": [
                { "messaging": [{ "sender": { "id": "u1" }, "message": { "text": "a" } }] },
                { "messaging": [{ "sender": { "id": "u2" }, "message": { "text": "b" } }] }
            ]
        }));

        let summary = relay.handle_inbound(&event, t0()).await;
        assert_eq!(summary, InboundSummary { processed: 2, dispatched: 0, failed: 2 });
        assert!(relay.sessions.lookup("u1").is_some());
        assert!(relay.sessions.lookup("u2").is_some());
    }
}
