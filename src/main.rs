// src/main.rs — messenger-relay entry point

use clap::Parser;

use messenger_relay::cli::{Cli, Commands};
use messenger_relay::infra::config::Config;
use messenger_relay::infra::logger;
use messenger_relay::server;
use messenger_relay::util::redact;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging (RUST_LOG overrides --log-level)
    logger::init_logging(&cli.log_level);

    if let Err(e) = run(cli).await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // Defaults → config file → environment
    let mut config = if let Some(ref path) = cli.config {
        Config::load_with_env(std::path::Path::new(path))?
    } else {
        Config::load()?
    };

    match cli.command {
        Some(Commands::CheckConfig) => check_config(&config),
        Some(Commands::Serve { port }) => {
            if let Some(port) = port {
                config.server.port = port;
            }
            server::run(config).await
        }
        None => server::run(config).await,
    }
}

fn check_config(config: &Config) -> anyhow::Result<()> {
    config.validate()?;

    println!("listen:           {}", config.server.bind_addr());
    println!("verify token:     {}", redact(&config.webhook.verify_token));
    println!(
        "page token:       {}",
        config
            .messenger
            .page_access_token
            .as_deref()
            .map(redact)
            .unwrap_or_else(|| "(not set, replies disabled)".into())
    );
    println!("send endpoint:    {}", config.messenger.send_url());
    println!(
        "backend:          {}",
        config.backend.endpoint.as_deref().unwrap_or_default()
    );
    println!("file ids:         {}", config.backend.file_ids.len());
    println!(
        "session timeout:  {}s (sweep every {}s)",
        config.session.timeout_secs, config.session.sweep_interval_secs
    );
    Ok(())
}
