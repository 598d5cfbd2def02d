// src/integrations/backend.rs — AI backend dispatch over HTTP

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::infra::config::BackendConfig;
use crate::infra::errors::RelayError;
use crate::integrations::types::{BackendClient, BackendPayload};
use crate::util::truncate_str;

/// POSTs message payloads to the configured backend endpoint.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    endpoint: String,
    timeout: Duration,
}

impl HttpBackend {
    pub fn new(client: Client, endpoint: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            timeout,
        }
    }

    pub fn from_config(client: Client, config: &BackendConfig) -> anyhow::Result<Self> {
        let endpoint = config
            .endpoint
            .clone()
            .ok_or_else(|| RelayError::Config("backend.endpoint is not set".into()))?;
        Ok(Self::new(
            client,
            endpoint,
            Duration::from_secs(config.timeout_secs),
        ))
    }
}

#[async_trait]
impl BackendClient for HttpBackend {
    async fn dispatch(&self, payload: &BackendPayload) -> anyhow::Result<()> {
        let resp = self
            .client
            .post(&self.endpoint)
            .json(payload)
            .timeout(self.timeout)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(RelayError::Downstream {
                target: "backend",
                status: status.as_u16(),
                body: truncate_str(&body, 200).to_string(),
            }
            .into());
        }

        tracing::info!("DX API Success: {}", status.as_u16());
        Ok(())
    }
}
