//! Authentication middleware for the REST API
//!
//! Every endpoint requires a bearer token in the Authorization header that
//! matches the secret held by the credential store. Requests without a
//! valid credential are rejected with 401 before any other processing
//! occurs, so an unauthenticated request has no observable side effects.

use axum::{
    Json,
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::error::ApiError;

/// Authentication middleware that checks the Authorization header for a
/// valid bearer token
///
/// # Arguments
///
/// * `State(expected_token)` - The token requests must present
/// * `request` - The incoming HTTP request
/// * `next` - The next middleware/handler in the chain
///
/// # Returns
///
/// Returns either:
/// - 401 Unauthorized if the header is missing, not a bearer credential,
///   or carries the wrong token
/// - The response from the next handler if authentication succeeds
pub async fn require_bearer_token(
    State(expected_token): State<String>,
    request: Request,
    next: Next,
) -> Response {
    let auth_header = request
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    let Some(header) = auth_header else {
        return unauthorized_response("Authorization header missing");
    };

    // Scheme is matched exactly; "bearer" and friends are malformed
    let Some(provided) = header.strip_prefix("Bearer ") else {
        return unauthorized_response("Invalid authorization format. Use 'Bearer <token>'");
    };

    // Constant-time comparison to prevent timing side-channel attacks
    if constant_time_eq(provided.as_bytes(), expected_token.as_bytes()) {
        next.run(request).await
    } else {
        unauthorized_response("Invalid bearer token")
    }
}

/// Constant-time byte comparison to prevent timing side-channel attacks.
/// Always compares all bytes regardless of where the first mismatch occurs.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut result: u8 = 0;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}

/// Helper to create a 401 Unauthorized response with a JSON error body
fn unauthorized_response(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(ApiError::unauthorized(message)),
    )
        .into_response()
}
