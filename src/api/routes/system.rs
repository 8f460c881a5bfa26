//! System handlers: health, queue statistics, OpenAPI.

use crate::api::AppState;
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;

/// GET /health - Health check
#[utoipa::path(
    get,
    path = "/health",
    tag = "system",
    responses(
        (status = 200, description = "Service is healthy"),
        (status = 401, description = "Missing or invalid bearer token", body = crate::error::ApiError)
    ),
    security(("bearer_token" = []))
)]
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// GET /queue/stats - Get queue statistics
#[utoipa::path(
    get,
    path = "/queue/stats",
    tag = "system",
    responses(
        (status = 200, description = "Job counts by status", body = crate::types::QueueStats),
        (status = 401, description = "Missing or invalid bearer token", body = crate::error::ApiError)
    ),
    security(("bearer_token" = []))
)]
pub async fn queue_stats(State(state): State<AppState>) -> impl IntoResponse {
    let stats = state.downloader.queue_stats().await;
    (StatusCode::OK, Json(stats))
}

/// GET /openapi.json - OpenAPI specification
#[utoipa::path(
    get,
    path = "/openapi.json",
    tag = "system",
    responses(
        (status = 200, description = "OpenAPI 3.1 specification in JSON format"),
        (status = 401, description = "Missing or invalid bearer token", body = crate::error::ApiError)
    ),
    security(("bearer_token" = []))
)]
pub async fn openapi_spec() -> impl IntoResponse {
    use crate::api::openapi::ApiDoc;
    use utoipa::OpenApi;

    Json(ApiDoc::openapi())
}
