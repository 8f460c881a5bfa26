//! Service facade
//!
//! [`WebhookDownloader`] wires the credential store, job ledger, executor,
//! and dispatcher together with explicit construction — no process-wide
//! globals — and is what the API layer talks to. All fields are Arc-wrapped,
//! so cloning is cheap and every clone shares the same state.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::dispatcher::JobDispatcher;
use crate::error::Result;
use crate::executor::DownloadExecutor;
use crate::fetcher::{MediaFetcher, YtDlpFetcher};
use crate::ledger::JobLedger;
use crate::token_store::TokenStore;
use crate::types::{JobId, JobSnapshot, QueueStats};

/// Main service instance (cloneable - all fields are Arc-wrapped)
#[derive(Clone)]
pub struct WebhookDownloader {
    ledger: Arc<JobLedger>,
    dispatcher: JobDispatcher,
    token: Arc<TokenStore>,
    config: Arc<Config>,
    cancel: CancellationToken,
    consumer: Arc<tokio::sync::Mutex<Option<JoinHandle<()>>>>,
}

impl WebhookDownloader {
    /// Create a service with the production yt-dlp fetcher
    ///
    /// Obtains (or generates) the bearer token, builds the ledger, and
    /// spawns the single consumer task. Must be called within a Tokio
    /// runtime.
    pub fn new(config: Config) -> Self {
        let fetcher = Arc::new(YtDlpFetcher::from_config(&config.download));
        Self::with_fetcher(config, fetcher)
    }

    /// Create a service with a custom download mechanism
    pub fn with_fetcher(config: Config, fetcher: Arc<dyn MediaFetcher>) -> Self {
        let config = Arc::new(config);
        let token = Arc::new(TokenStore::obtain(&config.token_file));
        let ledger = Arc::new(JobLedger::new());
        let executor = Arc::new(DownloadExecutor::new(
            Arc::clone(&ledger),
            fetcher,
            config.download.job_timeout(),
        ));
        let cancel = CancellationToken::new();
        let (dispatcher, consumer) = JobDispatcher::start(executor, cancel.clone());
        tracing::info!("Download worker task started");

        Self {
            ledger,
            dispatcher,
            token,
            config,
            cancel,
            consumer: Arc::new(tokio::sync::Mutex::new(Some(consumer))),
        }
    }

    /// Accept a new download job
    ///
    /// Creates the `pending` ledger entry, queues the job, and returns its
    /// id immediately — processing happens in the background.
    pub async fn enqueue_download(&self, url: &str) -> Result<JobId> {
        let id = JobId::new();
        self.ledger.create(id, url).await?;
        self.dispatcher.enqueue(id, url)?;
        tracing::info!(job_id = %id, url, "Queued download job");
        Ok(id)
    }

    /// Snapshot of a job's current status and result
    pub async fn job(&self, id: JobId) -> Result<JobSnapshot> {
        self.ledger.get(id).await
    }

    /// Aggregate counts over all jobs tracked this process
    pub async fn queue_stats(&self) -> QueueStats {
        self.ledger.stats().await
    }

    /// The bearer token every API call must present
    pub fn token(&self) -> &str {
        self.token.token()
    }

    /// The service configuration
    pub fn config(&self) -> Arc<Config> {
        Arc::clone(&self.config)
    }

    /// Stop the consumer task and wait for it to finish
    ///
    /// A job already handed to the executor runs to its terminal state
    /// first; jobs still waiting in the queue are dropped.
    pub async fn shutdown(&self) -> Result<()> {
        tracing::info!("Shutting down download service");
        self.cancel.cancel();
        if let Some(handle) = self.consumer.lock().await.take() {
            handle
                .await
                .map_err(|e| crate::error::Error::ApiServer(e.to_string()))?;
        }
        Ok(())
    }

    /// Spawn the REST API server as a background task
    pub fn spawn_api_server(&self) -> JoinHandle<Result<()>> {
        let downloader = Arc::new(self.clone());
        let config = self.config();
        tokio::spawn(async move { crate::api::start_api_server(downloader, config).await })
    }
}
