// src/session/scheduler.rs — Periodic session expiry
//
// Runs for the life of the process and stops at the next await point once
// its cancellation token fires. A sweep that fails is logged and the loop
// carries on, so one bad pass never stops later expirations.

use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::infra::config::SessionConfig;
use crate::infra::errors::RelayError;
use crate::session::store::SessionStore;

/// Anything the scheduler can expire sessions from.
///
/// A store that can fail returns `RelayError::Store`; the scheduler logs it
/// and tries again on the next tick. The in-memory `SessionStore` never fails.
pub trait Sweep: Send + Sync + 'static {
    fn sweep_expired(
        &self,
        now: DateTime<Utc>,
        timeout: Duration,
    ) -> Result<Vec<String>, RelayError>;
}

impl Sweep for SessionStore {
    fn sweep_expired(
        &self,
        now: DateTime<Utc>,
        timeout: Duration,
    ) -> Result<Vec<String>, RelayError> {
        Ok(self.sweep(now, timeout))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ExpiryScheduler {
    interval: Duration,
    timeout: Duration,
}

impl ExpiryScheduler {
    pub fn new(interval: Duration, timeout: Duration) -> Self {
        Self { interval, timeout }
    }

    pub fn from_config(config: &SessionConfig) -> Self {
        Self::new(config.sweep_interval(), config.timeout())
    }

    /// Run one expiry pass at `now`. Returns how many sessions were evicted.
    pub fn run_once<S: Sweep>(&self, target: &S, now: DateTime<Utc>) -> usize {
        match target.sweep_expired(now, self.timeout) {
            Ok(evicted) => {
                for id in &evicted {
                    tracing::info!("[SESSION EXPIRED] Removing chat_id: {}", id);
                }
                evicted.len()
            }
            Err(e) => {
                tracing::error!("Session sweep failed: {}", e);
                0
            }
        }
    }

    /// Spawn the sweep loop on the current runtime.
    ///
    /// The first sweep happens one full interval after spawning.
    pub fn spawn<S: Sweep>(self, target: S, cancel: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // Consume the immediate first tick
            ticker.tick().await;

            tracing::info!(
                "Session expiry started ({}s interval, {}s timeout)",
                self.interval.as_secs(),
                self.timeout.as_secs()
            );

            loop {
                tokio::select! {
                    _ = cancel.cancelled() => {
                        tracing::info!("Session expiry stopping");
                        break;
                    }
                    _ = ticker.tick() => {
                        self.run_once(&target, Utc::now());
                    }
                }
            }
        })
    }
}
