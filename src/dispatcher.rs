//! Job dispatch
//!
//! A single unbounded FIFO queue with one long-lived consumer task. The
//! consumer awaits each job's executor run to completion before taking the
//! next, which gives three guarantees: at most one external download process
//! at a time, strict submission-order processing, and isolation of one job's
//! failure from every other (the executor contains all faults).
//!
//! The queue is deliberately unbounded and the consumer is a single point of
//! failure with no supervised restart; both are accepted trade-offs of this
//! design.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::error::{Error, Result};
use crate::executor::DownloadExecutor;
use crate::types::JobId;

/// One queued unit of work
#[derive(Clone, Debug)]
struct QueuedJob {
    id: JobId,
    url: String,
}

/// Producer handle to the dispatch queue
#[derive(Clone)]
pub struct JobDispatcher {
    tx: mpsc::UnboundedSender<QueuedJob>,
}

impl JobDispatcher {
    /// Spawn the consumer task
    ///
    /// Returns the producer handle and the consumer's [`JoinHandle`]. The
    /// consumer runs until `cancel` fires or every producer handle is
    /// dropped; a job already handed to the executor finishes first.
    pub fn start(
        executor: Arc<DownloadExecutor>,
        cancel: CancellationToken,
    ) -> (Self, JoinHandle<()>) {
        let (tx, mut rx) = mpsc::unbounded_channel::<QueuedJob>();

        let handle = tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => {
                        tracing::info!("Dispatcher consumer shutting down");
                        break;
                    }
                    job = rx.recv() => {
                        match job {
                            Some(job) => executor.run(job.id, &job.url).await,
                            None => break,
                        }
                    }
                }
            }
        });

        (Self { tx }, handle)
    }

    /// Queue a job for sequential background processing
    ///
    /// Non-blocking; fails only when the consumer is gone.
    pub fn enqueue(&self, id: JobId, url: impl Into<String>) -> Result<()> {
        self.tx
            .send(QueuedJob {
                id,
                url: url.into(),
            })
            .map_err(|_| Error::ShuttingDown)
    }
}
