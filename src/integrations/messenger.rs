// src/integrations/messenger.rs — Messenger Send API adapter
//
// Uses the Graph API send endpoint (POST /{version}/me/messages) with the
// page access token as a bearer token.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::infra::config::MessengerConfig;
use crate::infra::errors::RelayError;
use crate::integrations::types::{ReplyPayload, ReplySender};
use crate::util::truncate_str;

/// Messenger reply adapter.
#[derive(Debug, Clone)]
pub struct MessengerClient {
    client: Client,
    send_url: String,
    access_token: Option<String>,
    timeout: Duration,
}

// -- Send API response types --

#[derive(Deserialize)]
struct SendResponse {
    message_id: Option<String>,
}

impl MessengerClient {
    pub fn new(client: Client, config: &MessengerConfig) -> Self {
        Self {
            client,
            send_url: config.send_url(),
            access_token: config.page_access_token.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    pub fn has_token(&self) -> bool {
        self.access_token.is_some()
    }
}

#[async_trait]
impl ReplySender for MessengerClient {
    async fn send_reply(&self, recipient_id: &str, text: &str) -> anyhow::Result<()> {
        let Some(ref token) = self.access_token else {
            return Err(RelayError::MissingAccessToken {
                recipient: recipient_id.to_string(),
            }
            .into());
        };

        let resp = self
            .client
            .post(&self.send_url)
            .bearer_auth(token)
            .json(&ReplyPayload::text(recipient_id, text))
            .timeout(self.timeout)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(RelayError::Downstream {
                target: "messenger",
                status: status.as_u16(),
                body: truncate_str(&body, 200).to_string(),
            }
            .into());
        }

        // The message id is informational; an unexpected body is not a failure.
        let message_id = resp
            .json::<SendResponse>()
            .await
            .ok()
            .and_then(|r| r.message_id);
        tracing::debug!(
            "Messenger accepted reply to {} (message_id={})",
            recipient_id,
            message_id.as_deref().unwrap_or("-")
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_uses_configured_endpoint() {
        let client = MessengerClient::new(Client::new(), &MessengerConfig::default());
        assert_eq!(
            client.send_url,
            "https://graph.facebook.com/v21.0/me/messages"
        );
        assert!(!client.has_token());
    }

    #[tokio::test]
    async fn test_send_without_token_fails_fast() {
        let client = MessengerClient::new(Client::new(), &MessengerConfig::default());
        let err = client.send_reply("42", "hello").await.unwrap_err();
        let relay_err = err.downcast_ref::<RelayError>().unwrap();
        assert!(matches!(relay_err, RelayError::MissingAccessToken { recipient } if recipient == "42"));
    }
}
