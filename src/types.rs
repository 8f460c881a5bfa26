//! Core types for webhook-dl

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Unique identifier for a download job
///
/// Generated at submission time and returned to the caller as the handle
/// for all subsequent status queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct JobId(pub Uuid);

impl JobId {
    /// Generate a fresh random JobId
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Get the inner Uuid value
    pub fn get(&self) -> Uuid {
        self.0
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for JobId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for JobId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

/// Job status
///
/// Progression is strictly pending → processing → {completed, failed};
/// a status never regresses and never skips `pending`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    /// Accepted and waiting in the queue
    Pending,
    /// Currently being downloaded (at most one job system-wide)
    Processing,
    /// Finished successfully
    Completed,
    /// Finished with an error or timeout
    Failed,
}

impl JobStatus {
    /// Whether this status is terminal (a result is attached)
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }

    /// Wire representation of the status
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Processing => "processing",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal result of a download job
///
/// Serializes to the wire shape merged into status responses: a success
/// carries the mechanism's captured output and the original URL, a failure
/// carries a human-readable message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum JobOutcome {
    /// The download mechanism exited successfully
    Success {
        /// Captured standard output of the download mechanism
        video_info: String,
        /// The originally submitted URL
        url: String,
    },
    /// The download mechanism failed, timed out, or faulted
    Error {
        /// Human-readable failure description
        message: String,
    },
}

/// Point-in-time view of a job held in the ledger
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JobSnapshot {
    /// The job's identifier
    pub id: JobId,
    /// The submitted source URL
    pub source_url: String,
    /// Current status
    pub status: JobStatus,
    /// Terminal result; present exactly when `status` is terminal
    pub result: Option<JobOutcome>,
    /// When the job was accepted
    pub created_at: DateTime<Utc>,
    /// When processing began, if it has
    pub started_at: Option<DateTime<Utc>>,
    /// When the job reached a terminal state, if it has
    pub finished_at: Option<DateTime<Utc>>,
}

/// Request body for `POST /webhook`
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct WebhookRequest {
    /// URL of the media resource to download
    pub url: String,
}

/// Response body for an accepted `POST /webhook` submission
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct WebhookAccepted {
    /// Always `pending` — the job has been queued, not started
    pub status: JobStatus,
    /// Handle for polling `GET /job/{job_id}`
    pub job_id: JobId,
    /// The submitted URL, echoed back
    pub url: String,
    /// Human-readable acceptance note
    pub message: String,
}

/// Response body for `GET /job/{job_id}`
///
/// In-flight jobs report `status` as `pending`/`processing`. Once terminal,
/// the result payload takes over the `status` field (`success`/`error`) and
/// contributes its own fields, matching the submission API's result shape.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct JobStatusResponse {
    /// The queried job id
    pub job_id: JobId,
    /// `pending`, `processing`, `success`, or `error`
    pub status: String,
    /// Captured downloader output (terminal success only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_info: Option<String>,
    /// Original source URL (terminal success only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Failure description (terminal failure only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<JobSnapshot> for JobStatusResponse {
    fn from(snapshot: JobSnapshot) -> Self {
        match snapshot.result {
            Some(JobOutcome::Success { video_info, url }) => Self {
                job_id: snapshot.id,
                status: "success".to_string(),
                video_info: Some(video_info),
                url: Some(url),
                message: None,
            },
            Some(JobOutcome::Error { message }) => Self {
                job_id: snapshot.id,
                status: "error".to_string(),
                video_info: None,
                url: None,
                message: Some(message),
            },
            None => Self {
                job_id: snapshot.id,
                status: snapshot.status.as_str().to_string(),
                video_info: None,
                url: None,
                message: None,
            },
        }
    }
}

/// Aggregate statistics over the job ledger
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct QueueStats {
    /// Jobs accepted but not yet started
    pub pending: usize,
    /// Jobs currently downloading (0 or 1 by design)
    pub processing: usize,
    /// Jobs finished successfully
    pub completed: usize,
    /// Jobs finished with an error
    pub failed: usize,
    /// All jobs tracked since process start
    pub total: usize,
}
