//! Job status handlers.

use crate::api::AppState;
use crate::error::ApiError;
use crate::types::{JobId, JobStatusResponse};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// GET /job/:job_id - Current status and, once terminal, result of a job
#[utoipa::path(
    get,
    path = "/job/{job_id}",
    tag = "jobs",
    params(
        ("job_id" = String, Path, description = "Job identifier returned at submission")
    ),
    responses(
        (status = 200, description = "Current job status, with result fields once terminal", body = crate::types::JobStatusResponse),
        (status = 401, description = "Missing or invalid bearer token", body = crate::error::ApiError),
        (status = 404, description = "Unknown job id", body = crate::error::ApiError)
    ),
    security(("bearer_token" = []))
)]
pub async fn get_job(State(state): State<AppState>, Path(job_id): Path<String>) -> Response {
    // Anything that does not parse as an id cannot name a job
    let Ok(id) = job_id.parse::<JobId>() else {
        return (
            StatusCode::NOT_FOUND,
            Json(ApiError::new(
                "job_not_found",
                format!("job {job_id} not found"),
            )),
        )
            .into_response();
    };

    match state.downloader.job(id).await {
        Ok(snapshot) => {
            (StatusCode::OK, Json(JobStatusResponse::from(snapshot))).into_response()
        }
        Err(e) => e.into_response(),
    }
}
