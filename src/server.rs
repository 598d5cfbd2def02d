// src/server.rs — Process lifecycle: state, expiry loop, HTTP server, shutdown

use std::future::Future;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::api::{self, ApiState};
use crate::infra::config::Config;
use crate::integrations::{HttpBackend, MessengerClient};
use crate::relay::Relay;
use crate::session::{ExpiryScheduler, SessionStore};

/// Wire the production relay from config.
pub fn build_relay(config: &Config, sessions: SessionStore) -> anyhow::Result<Relay> {
    let client = reqwest::Client::builder()
        .user_agent(format!("messenger-relay/{}", env!("CARGO_PKG_VERSION")))
        .build()?;

    let backend = HttpBackend::from_config(client.clone(), &config.backend)?;
    let messenger = MessengerClient::new(client, &config.messenger);
    if !messenger.has_token() {
        tracing::warn!("PAGE_ACCESS_TOKEN is not set; replies to Messenger will fail");
    }

    Ok(Relay::new(
        sessions,
        Arc::new(backend),
        Arc::new(messenger),
        config.backend.file_ids.clone(),
    ))
}

/// Validate, bind the configured address and run until Ctrl-C.
pub async fn run(config: Config) -> anyhow::Result<()> {
    config.validate()?;
    let listener = TcpListener::bind(config.server.bind_addr()).await?;
    run_until(config, listener, shutdown_signal()).await
}

/// Run on `listener` until `shutdown` resolves.
///
/// The session store lives exactly as long as this call.
pub async fn run_until<F>(config: Config, listener: TcpListener, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    config.validate()?;

    let sessions = SessionStore::new();
    let relay = build_relay(&config, sessions.clone())?;
    let state = ApiState::new(relay, config.webhook.verify_token.as_str());

    let cancel = CancellationToken::new();
    let expiry = ExpiryScheduler::from_config(&config.session).spawn(sessions, cancel.clone());

    let trigger = spawn_shutdown_trigger(shutdown, cancel.clone());

    let served = api::serve(listener, state, cancel.clone()).await;

    // The server may also stop on its own error; the trigger and the expiry
    // loop both end with it.
    cancel.cancel();
    for (name, task) in [("Shutdown trigger", trigger), ("Session expiry", expiry)] {
        if let Err(e) = task.await {
            tracing::error!("{} task ended abnormally: {}", name, e);
        }
    }

    tracing::info!("Relay stopped.");
    served
}

/// Cancel `cancel` once `shutdown` resolves. The task also ends, dropping
/// `shutdown`, as soon as `cancel` is cancelled by anyone else.
fn spawn_shutdown_trigger<F>(shutdown: F, cancel: CancellationToken) -> JoinHandle<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    tokio::spawn(async move {
        tokio::select! {
            _ = shutdown => {
                tracing::info!("Shutdown signal received");
                cancel.cancel();
            }
            _ = cancel.cancelled() => {}
        }
    })
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl-C: {}", e);
        // Without a signal handler, run until killed.
        std::future::pending::<()>().await;
    }
}
