//! # webhook-dl
//!
//! Authenticated webhook server that queues media downloads and runs them
//! through yt-dlp, one at a time, in submission order.
//!
//! ## Design Philosophy
//!
//! webhook-dl is designed to be:
//! - **Asynchronous acceptance** - Submissions return immediately with a job
//!   id; downloads happen on a background consumer task
//! - **Strictly sequential** - One download process at a time, strict FIFO,
//!   so the external mechanism is never contended
//! - **Failure-contained** - A failed or timed-out download is a terminal
//!   job result, never a dead worker
//! - **Library-first** - The server binary is a thin shell over the crate
//!
//! ## Quick Start
//!
//! ```no_run
//! use webhook_dl::{Config, WebhookDownloader};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let downloader = Arc::new(WebhookDownloader::new(Config::default()));
//!
//!     // Serve the authenticated REST API (blocks until shutdown)
//!     let config = downloader.config();
//!     webhook_dl::api::start_api_server(downloader, config).await?;
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// REST API module
pub mod api;
/// Configuration types
pub mod config;
/// Job dispatch queue and consumer task
pub mod dispatcher;
/// Error types
pub mod error;
/// Download execution
pub mod executor;
/// External download mechanism
pub mod fetcher;
/// In-memory job ledger
pub mod ledger;
/// Service facade
pub mod service;
/// Bearer token persistence
pub mod token_store;
/// Core types
pub mod types;

// Re-export commonly used types
pub use config::{ApiConfig, Config, DownloadConfig};
pub use dispatcher::JobDispatcher;
pub use error::{ApiError, Error, ErrorDetail, Result, ToHttpStatus};
pub use executor::DownloadExecutor;
pub use fetcher::{FetchOutput, MediaFetcher, YtDlpFetcher};
pub use ledger::JobLedger;
pub use service::WebhookDownloader;
pub use token_store::TokenStore;
pub use types::{
    JobId, JobOutcome, JobSnapshot, JobStatus, JobStatusResponse, QueueStats, WebhookAccepted,
    WebhookRequest,
};

/// Helper function to run the downloader with graceful signal handling.
///
/// Waits for a termination signal and then calls the downloader's
/// `shutdown()` method.
///
/// - **Unix:** listens for SIGTERM and SIGINT, with fallbacks if signal registration fails.
/// - **Windows/other:** listens for Ctrl+C via `tokio::signal::ctrl_c()`.
///
/// # Example
///
/// ```no_run
/// use webhook_dl::{Config, WebhookDownloader, run_with_shutdown};
/// use std::sync::Arc;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let downloader = Arc::new(WebhookDownloader::new(Config::default()));
///     let api_handle = downloader.spawn_api_server();
///
///     // Run with automatic signal handling
///     run_with_shutdown(&downloader).await?;
///     api_handle.abort();
///
///     Ok(())
/// }
/// ```
pub async fn run_with_shutdown(downloader: &WebhookDownloader) -> Result<()> {
    wait_for_signal().await;
    downloader.shutdown().await
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    // Set up signal handlers - these may fail in restricted environments (containers, tests)
    let sigterm_result = signal(SignalKind::terminate());
    let sigint_result = signal(SignalKind::interrupt());

    match (sigterm_result, sigint_result) {
        (Ok(mut sigterm), Ok(mut sigint)) => {
            tokio::select! {
                _ = sigterm.recv() => {
                    tracing::info!("Received SIGTERM signal");
                }
                _ = sigint.recv() => {
                    tracing::info!("Received SIGINT signal (Ctrl+C)");
                }
            }
        }
        (Err(e), _) => {
            tracing::warn!(error = %e, "Could not register SIGTERM handler, waiting for SIGINT only");
            if let Ok(mut sigint) = signal(SignalKind::interrupt()) {
                sigint.recv().await;
                tracing::info!("Received SIGINT signal (Ctrl+C)");
            } else {
                tracing::error!("Could not register any signal handlers, using ctrl_c fallback");
                tokio::signal::ctrl_c().await.ok();
            }
        }
        (_, Err(e)) => {
            tracing::warn!(error = %e, "Could not register SIGINT handler, waiting for SIGTERM only");
            if let Ok(mut sigterm) = signal(SignalKind::terminate()) {
                sigterm.recv().await;
                tracing::info!("Received SIGTERM signal");
            } else {
                tracing::error!("Could not register any signal handlers, using ctrl_c fallback");
                tokio::signal::ctrl_c().await.ok();
            }
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            tracing::info!("Received Ctrl+C signal");
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C signal");
        }
    }
}
