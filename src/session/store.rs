// src/session/store.rs — In-memory conversation → sender registry
//
// One map, shared by the request handlers and the expiry scheduler.
// Every structural change (insert, overwrite, remove) happens under the
// write lock; lookups take the read lock and clone the whole record, so a
// reader never sees a half-written Session.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// One active conversation awaiting (or having produced) a backend reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    pub conversation_id: String,
    /// Platform-side recipient the reply goes to.
    pub sender_id: String,
    pub last_active: DateTime<Utc>,
}

impl Session {
    /// Idle for strictly longer than `timeout` as of `now`.
    pub fn is_expired(&self, now: DateTime<Utc>, timeout: Duration) -> bool {
        match chrono::Duration::from_std(timeout) {
            Ok(timeout) => now.signed_duration_since(self.last_active) > timeout,
            // A timeout too large for chrono never elapses.
            Err(_) => false,
        }
    }
}

/// Concurrency-safe session map. Cloning yields another handle to the same map.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<String, Session>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    // Entries are only ever replaced whole, so a panic elsewhere while the
    // lock was held cannot leave a torn record behind. Keep serving.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Session>> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Session>> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert or overwrite the session for `conversation_id`.
    ///
    /// Callers pass non-empty ids. `last_active` never moves backwards: if the
    /// stored timestamp is later than `now` it is kept.
    pub fn upsert(&self, conversation_id: &str, sender_id: &str, now: DateTime<Utc>) {
        let mut map = self.write();
        let last_active = match map.get(conversation_id) {
            Some(existing) if existing.last_active > now => existing.last_active,
            _ => now,
        };
        map.insert(
            conversation_id.to_string(),
            Session {
                conversation_id: conversation_id.to_string(),
                sender_id: sender_id.to_string(),
                last_active,
            },
        );
    }

    /// Current session for `conversation_id`, if any. Does not refresh it.
    pub fn lookup(&self, conversation_id: &str) -> Option<Session> {
        self.read().get(conversation_id).cloned()
    }

    /// Remove every session idle for longer than `timeout`; returns the
    /// evicted ids, sorted.
    pub fn sweep(&self, now: DateTime<Utc>, timeout: Duration) -> Vec<String> {
        let mut map = self.write();
        let mut evicted: Vec<String> = map
            .values()
            .filter(|s| s.is_expired(now, timeout))
            .map(|s| s.conversation_id.clone())
            .collect();
        for id in &evicted {
            map.remove(id);
        }
        evicted.sort();
        evicted
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }
}
