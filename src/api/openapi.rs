//! OpenAPI documentation and schema generation
//!
//! This module defines the OpenAPI specification for the webhook-dl REST API
//! using utoipa for compile-time spec generation.

use utoipa::OpenApi;

/// OpenAPI documentation for the webhook-dl REST API
///
/// The spec can be accessed via:
/// - `/openapi.json` - JSON format OpenAPI specification
/// - `/swagger-ui` - Interactive Swagger UI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "webhook-dl REST API",
        version = "0.1.0",
        description = "Authenticated webhook API for queueing media downloads and polling job status",
        contact(
            name = "webhook-dl",
            url = "https://github.com/jvz-devx/webhook-dl"
        ),
        license(
            name = "MIT OR Apache-2.0"
        )
    ),
    servers(
        (url = "http://localhost:5000", description = "Local development server")
    ),
    paths(
        // Job submission
        crate::api::routes::submit_webhook,

        // Job status
        crate::api::routes::get_job,

        // System
        crate::api::routes::health_check,
        crate::api::routes::queue_stats,
        crate::api::routes::openapi_spec,
    ),
    components(schemas(
        // Core types from types.rs
        crate::types::JobId,
        crate::types::JobStatus,
        crate::types::JobOutcome,
        crate::types::WebhookRequest,
        crate::types::WebhookAccepted,
        crate::types::JobStatusResponse,
        crate::types::QueueStats,

        // Error types from error.rs
        crate::error::ApiError,
        crate::error::ErrorDetail,
    )),
    tags(
        (name = "webhook", description = "Job submission - Queue media URLs for asynchronous download"),
        (name = "jobs", description = "Job status - Poll queued jobs for completion and results"),
        (name = "system", description = "System endpoints - Health checks, queue statistics, OpenAPI spec"),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Security addon to add the bearer token scheme to the OpenAPI spec
struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = &mut openapi.components {
            components.add_security_scheme(
                "bearer_token",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::Http::new(
                        utoipa::openapi::security::HttpAuthScheme::Bearer,
                    ),
                ),
            );
        }
    }
}
