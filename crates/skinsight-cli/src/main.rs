mod commands;
mod config;
mod display;
mod repl;
mod session;

use std::io;

use anyhow::Context;
use clap::Parser;
use skinsight_client::BackendClient;
use tracing_subscriber::EnvFilter;

use config::{Cli, Command, Config};
use session::Session;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging();
    let config = Config::from_cli(&cli);
    tracing::debug!(version = env!("CARGO_PKG_VERSION"), api = %config.client.base_url, "skinsight starting");

    let client = BackendClient::new(config.client.clone()).context("creating HTTP client")?;

    let base_url = client.base_url().to_string();
    let mut out = io::stdout();
    match cli.command {
        Command::Ping => commands::ping(&client, &mut out).await,
        Command::Classify { file } => {
            commands::classify(client, &config, &base_url, &file, &mut out).await
        }
        Command::History { limit, download } => {
            commands::history(&client, &config, &base_url, limit, download.as_deref(), &mut out)
                .await
        }
        Command::Session => {
            let mut session = Session::new(client, config.linger);
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            repl::run(&mut session, stdin, &mut out, &base_url, true).await
        }
    }
}

/// Logs go to stderr; stdout carries rendered output only.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
