//! webhook-dl server binary
//!
//! Thin shell over the library: initializes logging, loads configuration
//! (from an optional JSON file given as the first argument), and serves the
//! authenticated REST API until SIGTERM/SIGINT.

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use webhook_dl::{Config, WebhookDownloader, run_with_shutdown};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => {
            tracing::info!(path, "Loading configuration file");
            Config::from_file(&path)?
        }
        None => Config::default(),
    };

    let downloader = Arc::new(WebhookDownloader::new(config));
    let api_handle = downloader.spawn_api_server();

    run_with_shutdown(&downloader).await?;
    api_handle.abort();

    Ok(())
}
