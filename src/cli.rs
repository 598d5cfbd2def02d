// src/cli.rs — CLI definition (clap derive)

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "messenger-relay",
    about = "Relay Messenger webhooks to an AI backend and its answers back",
    version
)]
pub struct Cli {
    /// Config file path (defaults to $RELAY_HOME/config.toml or ~/.messenger-relay/config.toml)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Run the relay server (default)
    Serve {
        /// Override the listen port
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Load and validate configuration, then exit
    CheckConfig,
}
