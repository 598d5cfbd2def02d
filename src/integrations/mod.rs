// src/integrations/mod.rs — Outbound collaborators (AI backend, chat platform)

pub mod backend;
pub mod messenger;
pub mod types;

pub use backend::HttpBackend;
pub use messenger::MessengerClient;
pub use types::{BackendClient, BackendPayload, ReplyPayload, ReplySender};
