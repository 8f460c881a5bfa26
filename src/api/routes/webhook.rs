//! Job submission handler.

use crate::api::AppState;
use crate::error::ApiError;
use crate::types::{JobStatus, WebhookAccepted};
use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// POST /webhook - Queue a new download job
///
/// Responds 202 before processing begins; the returned job id is the handle
/// for polling GET /job/{job_id}.
#[utoipa::path(
    post,
    path = "/webhook",
    tag = "webhook",
    request_body = crate::types::WebhookRequest,
    responses(
        (status = 202, description = "Download job accepted and queued", body = crate::types::WebhookAccepted),
        (status = 400, description = "Missing or invalid url field", body = crate::error::ApiError),
        (status = 401, description = "Missing or invalid bearer token", body = crate::error::ApiError),
        (status = 500, description = "Unexpected failure during submission", body = crate::error::ApiError)
    ),
    security(("bearer_token" = []))
)]
pub async fn submit_webhook(
    State(state): State<AppState>,
    payload: Option<Json<serde_json::Value>>,
) -> Response {
    // A body that is not valid JSON is treated the same as a missing field
    let url = payload
        .as_ref()
        .and_then(|Json(value)| value.get("url"))
        .and_then(|value| value.as_str());

    let Some(url) = url else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiError::validation("Missing 'url' field in JSON payload")),
        )
            .into_response();
    };

    if let Err(e) = url::Url::parse(url) {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiError::validation(format!("Invalid url '{url}': {e}"))),
        )
            .into_response();
    }

    match state.downloader.enqueue_download(url).await {
        Ok(job_id) => (
            StatusCode::ACCEPTED,
            Json(WebhookAccepted {
                status: JobStatus::Pending,
                job_id,
                url: url.to_string(),
                message: "Download job has been queued".to_string(),
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(url, error = %e, "Failed to queue download job");
            e.into_response()
        }
    }
}
