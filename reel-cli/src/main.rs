//! Reel CLI
//!
//! Command-line interface for downloading videos through the remote job API.

mod commands;
mod config;
mod output;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use tokio_util::sync::CancellationToken;
use tracing::warn;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "reel")]
#[command(about = "Download videos through the Sieve job API", long_about = None)]
struct Cli {
    /// API key for the job API, not needed by `fetch`
    #[arg(long, env = "SIEVE_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Base URL of the job API
    #[arg(
        long,
        env = "SIEVE_API_URL",
        default_value = reel_client::config::DEFAULT_BASE_URL
    )]
    api_url: String,

    /// Attempts per status or download request on network failures
    #[arg(long, env = "SIEVE_MAX_RETRIES", default_value_t = 3)]
    max_retries: u32,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    // A local .env may carry the API key
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "reel_cli=info,reel_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = Config {
        api_key: cli.api_key,
        api_url: cli.api_url,
        max_retries: cli.max_retries,
    };

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling");
            on_interrupt.cancel();
        }
    });

    handle_command(cli.command, &config, &cancel).await
}
