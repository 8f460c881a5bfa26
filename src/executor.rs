//! Download execution
//!
//! Drives a single job from `processing` to a terminal state. Exactly one of
//! four mutually exclusive outcomes is recorded per invocation: success,
//! mechanism failure, timeout, or invocation fault. `run` itself is
//! infallible by contract — no failure mode may escape to the dispatcher,
//! whose consumer loop must survive every job.

use std::sync::Arc;
use std::time::Duration;

use crate::fetcher::MediaFetcher;
use crate::ledger::JobLedger;
use crate::types::{JobId, JobOutcome, JobStatus};

/// Message recorded when the download mechanism exceeds its time limit.
/// Must stay distinct from the generic failure text.
const TIMEOUT_MESSAGE: &str = "Request timed out";

/// Runs one job at a time against the external download mechanism
pub struct DownloadExecutor {
    ledger: Arc<JobLedger>,
    fetcher: Arc<dyn MediaFetcher>,
    job_timeout: Duration,
}

impl DownloadExecutor {
    /// Create an executor writing outcomes into `ledger`
    pub fn new(
        ledger: Arc<JobLedger>,
        fetcher: Arc<dyn MediaFetcher>,
        job_timeout: Duration,
    ) -> Self {
        Self {
            ledger,
            fetcher,
            job_timeout,
        }
    }

    /// Run one job to a terminal state
    ///
    /// Invoked exactly once per job by the dispatcher's consumer task, off
    /// the request-handling path.
    pub async fn run(&self, id: JobId, url: &str) {
        tracing::info!(job_id = %id, url, "Starting download job");

        if let Err(e) = self.ledger.set_status(id, JobStatus::Processing).await {
            // No ledger entry to report against; nothing more to do
            tracing::error!(job_id = %id, error = %e, "Could not mark job processing");
            return;
        }

        let outcome = match tokio::time::timeout(self.job_timeout, self.fetcher.fetch(url)).await
        {
            Ok(Ok(output)) if output.success => {
                tracing::info!(job_id = %id, "Download job completed successfully");
                tracing::debug!(job_id = %id, stdout = %output.stdout, "Mechanism output");
                JobOutcome::Success {
                    video_info: output.stdout.trim().to_string(),
                    url: url.to_string(),
                }
            }
            Ok(Ok(output)) => {
                let stderr = output.stderr.trim();
                tracing::error!(job_id = %id, stderr, "Download job failed");
                JobOutcome::Error {
                    message: format!("{} failed: {}", self.fetcher.name(), stderr),
                }
            }
            Ok(Err(e)) => {
                tracing::error!(job_id = %id, error = %e, "Download job failed with fault");
                JobOutcome::Error {
                    message: e.to_string(),
                }
            }
            Err(_) => {
                tracing::error!(job_id = %id, timeout_secs = self.job_timeout.as_secs(), "Download job timed out");
                JobOutcome::Error {
                    message: TIMEOUT_MESSAGE.to_string(),
                }
            }
        };

        if let Err(e) = self.ledger.set_result(id, outcome).await {
            tracing::error!(job_id = %id, error = %e, "Could not record job result");
        }
    }
}
