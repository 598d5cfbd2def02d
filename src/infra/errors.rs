// src/infra/errors.rs — Error types for the relay

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RelayError {
    // Startup errors
    #[error("Configuration error: {0}")]
    Config(String),

    // Downstream errors (logged, never surfaced to the webhook caller)
    #[error("No page access token configured; cannot reply to '{recipient}'")]
    MissingAccessToken { recipient: String },

    #[error("{target} returned HTTP {status}: {body}")]
    Downstream {
        target: &'static str,
        status: u16,
        body: String,
    },

    /// Returned by a `Sweep` target whose backing store cannot be read.
    #[error("Session store unavailable: {0}")]
    Store(String),
}
