// src/session/mod.rs — Conversation session tracking with idle expiry

pub mod scheduler;
pub mod store;

pub use scheduler::{ExpiryScheduler, Sweep};
pub use store::{Session, SessionStore};
