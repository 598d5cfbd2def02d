// src/infra/config.rs — Configuration loading (TOML + environment)

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::infra::errors::RelayError;
use crate::infra::paths;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub webhook: WebhookConfig,

    #[serde(default)]
    pub messenger: MessengerConfig,

    #[serde(default)]
    pub backend: BackendConfig,

    #[serde(default)]
    pub session: SessionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8000,
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookConfig {
    /// Shared secret echoed back by the platform during `hub.mode=subscribe`.
    pub verify_token: String,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            verify_token: "myverifytoken".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessengerConfig {
    #[serde(default)]
    pub page_access_token: Option<String>,
    #[serde(default = "default_graph_api_base")]
    pub graph_api_base: String,
    #[serde(default = "default_graph_api_version")]
    pub graph_api_version: String,
    #[serde(default = "default_reply_timeout")]
    pub timeout_secs: u64,
}

fn default_graph_api_base() -> String {
    "https://graph.facebook.com".into()
}

fn default_graph_api_version() -> String {
    "v21.0".into()
}

fn default_reply_timeout() -> u64 {
    10
}

impl Default for MessengerConfig {
    fn default() -> Self {
        Self {
            page_access_token: None,
            graph_api_base: default_graph_api_base(),
            graph_api_version: default_graph_api_version(),
            timeout_secs: default_reply_timeout(),
        }
    }
}

impl MessengerConfig {
    /// Full send-message endpoint, e.g. `https://graph.facebook.com/v21.0/me/messages`.
    pub fn send_url(&self) -> String {
        format!(
            "{}/{}/me/messages",
            self.graph_api_base.trim_end_matches('/'),
            self.graph_api_version
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Opaque document ids forwarded with every message.
    #[serde(default)]
    pub file_ids: Vec<String>,
    #[serde(default = "default_backend_timeout")]
    pub timeout_secs: u64,
}

fn default_backend_timeout() -> u64 {
    5
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            file_ids: Vec::new(),
            timeout_secs: default_backend_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    pub timeout_secs: u64,
    pub sweep_interval_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 300,
            sweep_interval_secs: 5,
        }
    }
}

impl SessionConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

impl Config {
    /// Load config from the default path (if present), then apply env overrides.
    pub fn load() -> anyhow::Result<Self> {
        let path = paths::config_file_path();
        let mut config = if path.exists() {
            Self::load_from(&path)?
        } else {
            Self::default()
        };
        config.apply_env();
        Ok(config)
    }

    /// Load config from an explicit file, then apply env overrides.
    pub fn load_with_env(path: &Path) -> anyhow::Result<Self> {
        let mut config = Self::load_from(path)?;
        config.apply_env();
        Ok(config)
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Overlay values from an environment-like lookup. Empty values are ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(token) = get("FB_VERIFY_TOKEN") {
            self.webhook.verify_token = token;
        }
        if let Some(token) = get("PAGE_ACCESS_TOKEN") {
            self.messenger.page_access_token = Some(token);
        }
        if let Some(endpoint) = get("DX_API_SEND_MESSAGE") {
            self.backend.endpoint = Some(endpoint);
        }
        if let Some(port) = get("RELAY_PORT") {
            match port.parse() {
                Ok(port) => self.server.port = port,
                Err(_) => tracing::warn!("Ignoring invalid RELAY_PORT value: {}", port),
            }
        }
    }

    /// Check the options the relay cannot run without.
    pub fn validate(&self) -> Result<(), RelayError> {
        let endpoint = self
            .backend
            .endpoint
            .as_deref()
            .ok_or_else(|| RelayError::Config("backend.endpoint (DX_API_SEND_MESSAGE) is not set".into()))?;

        let parsed = url::Url::parse(endpoint)
            .map_err(|e| RelayError::Config(format!("backend.endpoint '{endpoint}' is not a valid URL: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(RelayError::Config(format!(
                "backend.endpoint must be http(s), got '{}'",
                parsed.scheme()
            )));
        }

        if self.session.timeout_secs == 0 {
            return Err(RelayError::Config("session.timeout_secs must be > 0".into()));
        }
        if self.session.sweep_interval_secs == 0 {
            return Err(RelayError::Config(
                "session.sweep_interval_secs must be > 0".into(),
            ));
        }
        if self.webhook.verify_token.is_empty() {
            return Err(RelayError::Config("webhook.verify_token must not be empty".into()));
        }

        Ok(())
    }
}
