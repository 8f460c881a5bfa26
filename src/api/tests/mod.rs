use super::*;
use crate::config::Config;
use crate::fetcher::test_support::MockFetcher;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::json;
use std::time::Duration;
use tower::ServiceExt; // for oneshot

mod webhook;

/// Helper to create a test WebhookDownloader with a scripted fetcher and a
/// throwaway token file
///
/// Returns the fetcher handle too so tests can assert on invocation order
/// and concurrency.
fn create_test_downloader(
    fetcher: MockFetcher,
) -> (Arc<WebhookDownloader>, Arc<MockFetcher>, tempfile::TempDir) {
    let temp_dir = tempfile::tempdir().unwrap();
    let config = Config::default();
    create_test_downloader_with(config, fetcher, temp_dir)
}

/// Variant taking a prepared config (the token file path is overridden to
/// stay inside the test's temp directory)
fn create_test_downloader_with(
    mut config: Config,
    fetcher: MockFetcher,
    temp_dir: tempfile::TempDir,
) -> (Arc<WebhookDownloader>, Arc<MockFetcher>, tempfile::TempDir) {
    config.token_file = temp_dir.path().join("api_token.txt");
    let fetcher = Arc::new(fetcher);
    let downloader = Arc::new(WebhookDownloader::with_fetcher(
        config,
        Arc::clone(&fetcher) as Arc<dyn crate::fetcher::MediaFetcher>,
    ));
    (downloader, fetcher, temp_dir)
}

fn test_router(downloader: &Arc<WebhookDownloader>) -> Router {
    create_router(Arc::clone(downloader), downloader.config())
}

fn webhook_request(token: Option<&str>, body: serde_json::Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/webhook")
        .header("Content-Type", "application/json");
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn job_request(token: Option<&str>, id: &str) -> Request<Body> {
    let mut builder = Request::builder().uri(format!("/job/{id}"));
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).expect("response should be valid JSON")
}

/// Poll GET /job/{id} until its wire status is one of `want`
async fn poll_job_until(app: &Router, token: &str, id: &str, want: &[&str]) -> serde_json::Value {
    for _ in 0..500 {
        let response = app
            .clone()
            .oneshot(job_request(Some(token), id))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let value = body_json(response).await;
        let status = value["status"].as_str().unwrap().to_string();
        if want.contains(&status.as_str()) {
            return value;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("job {id} never reached one of {want:?}");
}

#[tokio::test]
async fn test_api_server_spawns() {
    let (downloader, _fetcher, _temp_dir) = create_test_downloader(MockFetcher::ok());

    // Use a random available port for testing
    let mut config = (*downloader.config()).clone();
    config.api.bind_address = "127.0.0.1:0".parse().unwrap(); // Port 0 = OS assigns a free port
    let config = Arc::new(config);

    // Spawn the API server
    let api_handle = tokio::spawn({
        let downloader = downloader.clone();
        let config = config.clone();
        async move { start_api_server(downloader, config).await }
    });

    // Give it a moment to start
    tokio::time::sleep(Duration::from_millis(100)).await;

    api_handle.abort();
}

#[tokio::test]
async fn test_health_requires_token() {
    let (downloader, _fetcher, _temp_dir) = create_test_downloader(MockFetcher::ok());
    let app = test_router(&downloader);

    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let request = Request::builder()
        .uri("/health")
        .header("Authorization", format!("Bearer {}", downloader.token()))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let value = body_json(response).await;
    assert_eq!(value["status"], "ok");
    assert_eq!(value["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_cors_enabled() {
    let (downloader, _fetcher, _temp_dir) = create_test_downloader(MockFetcher::ok());
    let app = test_router(&downloader);

    // Make an authenticated request with Origin header
    let request = Request::builder()
        .uri("/health")
        .header("Origin", "http://localhost:3000")
        .header("Authorization", format!("Bearer {}", downloader.token()))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // The CORS middleware should add access-control-allow-origin header
    assert!(
        response.headers().contains_key("access-control-allow-origin"),
        "CORS header should be present when CORS is enabled"
    );
}

#[tokio::test]
async fn test_queue_stats_endpoint() {
    let (downloader, _fetcher, _temp_dir) = create_test_downloader(MockFetcher::ok());
    let app = test_router(&downloader);
    let token = downloader.token().to_string();

    let response = app
        .clone()
        .oneshot(webhook_request(
            Some(&token),
            json!({"url": "https://example.com/v"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    let request = Request::builder()
        .uri("/queue/stats")
        .header("Authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let value = body_json(response).await;
    assert_eq!(value["total"], 1);
}

#[tokio::test]
async fn test_openapi_endpoint() {
    let (downloader, _fetcher, _temp_dir) = create_test_downloader(MockFetcher::ok());
    let app = test_router(&downloader);

    let request = Request::builder()
        .uri("/openapi.json")
        .header("Authorization", format!("Bearer {}", downloader.token()))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let value = body_json(response).await;
    assert!(value["paths"]["/webhook"].is_object());
    assert!(value["paths"]["/job/{job_id}"].is_object());
}

#[tokio::test]
async fn test_swagger_ui_disabled() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config = Config {
        api: crate::config::ApiConfig {
            swagger_ui: false,
            ..crate::config::ApiConfig::default()
        },
        ..Config::default()
    };
    let (downloader, _fetcher, _temp_dir) =
        create_test_downloader_with(config, MockFetcher::ok(), temp_dir);
    let app = test_router(&downloader);

    let request = Request::builder()
        .uri("/swagger-ui")
        .header("Authorization", format!("Bearer {}", downloader.token()))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
