//! In-memory job ledger
//!
//! The authoritative record of every job's status and terminal result, keyed
//! by job id. Entries are never evicted: the ledger lives for the process
//! lifetime and unbounded growth is an accepted non-goal of this design.
//!
//! The API server (producer, reader) and the dispatcher's consumer task
//! (writer) touch the ledger concurrently, so all access goes through an
//! internal RwLock. No lock is ever held across an await of external work.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::error::{Error, Result};
use crate::types::{JobId, JobOutcome, JobSnapshot, JobStatus, QueueStats};

/// Internal per-job record
#[derive(Clone, Debug)]
struct JobRecord {
    source_url: String,
    status: JobStatus,
    result: Option<JobOutcome>,
    created_at: DateTime<Utc>,
    started_at: Option<DateTime<Utc>>,
    finished_at: Option<DateTime<Utc>>,
}

/// Concurrency-safe store of all jobs for the process lifetime
#[derive(Debug, Default)]
pub struct JobLedger {
    jobs: RwLock<HashMap<JobId, JobRecord>>,
}

impl JobLedger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new job with status `pending`
    ///
    /// Fails with [`Error::Duplicate`] if the id already exists, which the
    /// id-generation guarantees make unreachable through the public API.
    pub async fn create(&self, id: JobId, source_url: impl Into<String>) -> Result<()> {
        let mut jobs = self.jobs.write().await;
        if jobs.contains_key(&id) {
            return Err(Error::Duplicate(id));
        }
        jobs.insert(
            id,
            JobRecord {
                source_url: source_url.into(),
                status: JobStatus::Pending,
                result: None,
                created_at: Utc::now(),
                started_at: None,
                finished_at: None,
            },
        );
        Ok(())
    }

    /// Update a job's status
    ///
    /// The caller is responsible for respecting the monotonic
    /// pending → processing → terminal ordering; the single consumer task is
    /// the only writer of these transitions.
    pub async fn set_status(&self, id: JobId, status: JobStatus) -> Result<()> {
        let mut jobs = self.jobs.write().await;
        let record = jobs.get_mut(&id).ok_or(Error::JobNotFound(id))?;
        record.status = status;
        if status == JobStatus::Processing && record.started_at.is_none() {
            record.started_at = Some(Utc::now());
        }
        Ok(())
    }

    /// Attach a terminal result, setting the status it implies
    ///
    /// Status and result are written under one lock so no reader can observe
    /// a terminal status without its result or vice versa.
    pub async fn set_result(&self, id: JobId, outcome: JobOutcome) -> Result<()> {
        let mut jobs = self.jobs.write().await;
        let record = jobs.get_mut(&id).ok_or(Error::JobNotFound(id))?;
        record.status = match outcome {
            JobOutcome::Success { .. } => JobStatus::Completed,
            JobOutcome::Error { .. } => JobStatus::Failed,
        };
        record.result = Some(outcome);
        record.finished_at = Some(Utc::now());
        Ok(())
    }

    /// Snapshot a job's current state
    pub async fn get(&self, id: JobId) -> Result<JobSnapshot> {
        let jobs = self.jobs.read().await;
        let record = jobs.get(&id).ok_or(Error::JobNotFound(id))?;
        Ok(JobSnapshot {
            id,
            source_url: record.source_url.clone(),
            status: record.status,
            result: record.result.clone(),
            created_at: record.created_at,
            started_at: record.started_at,
            finished_at: record.finished_at,
        })
    }

    /// Aggregate counts by status
    pub async fn stats(&self) -> QueueStats {
        let jobs = self.jobs.read().await;
        let mut stats = QueueStats {
            total: jobs.len(),
            ..QueueStats::default()
        };
        for record in jobs.values() {
            match record.status {
                JobStatus::Pending => stats.pending += 1,
                JobStatus::Processing => stats.processing += 1,
                JobStatus::Completed => stats.completed += 1,
                JobStatus::Failed => stats.failed += 1,
            }
        }
        stats
    }
}
