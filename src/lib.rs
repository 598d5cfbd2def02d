// src/lib.rs — Library root for messenger-relay

pub mod api;
pub mod cli;
pub mod infra;
pub mod integrations;
pub mod relay;
pub mod server;
pub mod session;
pub mod util;
