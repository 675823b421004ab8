//! Qanvas CLI
//!
//! Command-line interface for the Qanvas rendering service.

mod commands;
mod config;
mod io;
mod types;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "qanvas")]
#[command(about = "Qanvas rendering service CLI", long_about = None)]
struct Cli {
    /// Rendering service URL
    #[arg(long, env = "QANVAS_URL", default_value = "http://localhost:8080")]
    url: String,

    /// API key sent with every request
    #[arg(long, env = "QANVAS_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Timeout in seconds for each request and each wait
    #[arg(long, env = "QANVAS_TIMEOUT", default_value_t = 55)]
    timeout: u64,

    /// Directory for scratch files
    #[arg(long, env = "QANVAS_CACHE_DIR")]
    cache_dir: Option<PathBuf>,

    /// Accept enqueue responses that are not valid URLs
    #[arg(long)]
    no_validate_url: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so artifacts written to stdout stay clean
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "qanvas=warn,qanvas_client=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = Config {
        url: cli.url,
        api_key: cli.api_key,
        timeout_secs: cli.timeout,
        cache_dir: cli.cache_dir,
        validate_url: !cli.no_validate_url,
    };

    handle_command(cli.command, &config).await
}
