use super::*;
use crate::fetcher::test_support::MockFetcher;
use std::collections::HashSet;

#[tokio::test]
async fn test_submit_accepts_and_queues() {
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

    let value = body_json(response).await;
    assert_eq!(value["status"], "pending");
    assert_eq!(value["url"], "https://example.com/v");
    assert_eq!(value["message"], "Download job has been queued");

    let job_id = value["job_id"].as_str().unwrap().to_string();
    // The returned id is a UUID and immediately queryable
    assert!(job_id.parse::<uuid::Uuid>().is_ok());

    let response = app
        .oneshot(job_request(Some(&token), &job_id))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let value = body_json(response).await;
    assert!(
        ["pending", "processing", "success"].contains(&value["status"].as_str().unwrap()),
        "freshly queued job must be pending or later, got {}",
        value["status"]
    );
}

#[tokio::test]
async fn test_submit_missing_url_field() {
    let (downloader, _fetcher, _temp_dir) = create_test_downloader(MockFetcher::ok());
    let app = test_router(&downloader);
    let token = downloader.token().to_string();

    let response = app
        .oneshot(webhook_request(
            Some(&token),
            json!({"video": "https://example.com/v"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let value = body_json(response).await;
    assert_eq!(value["error"]["code"], "validation_error");
    assert!(
        value["error"]["message"]
            .as_str()
            .unwrap()
            .contains("Missing 'url' field")
    );

    // No job was created
    assert_eq!(downloader.queue_stats().await.total, 0);
}

#[tokio::test]
async fn test_submit_non_string_url() {
    let (downloader, _fetcher, _temp_dir) = create_test_downloader(MockFetcher::ok());
    let app = test_router(&downloader);
    let token = downloader.token().to_string();

    let response = app
        .oneshot(webhook_request(Some(&token), json!({"url": 42})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(downloader.queue_stats().await.total, 0);
}

#[tokio::test]
async fn test_submit_unparseable_url() {
    let (downloader, _fetcher, _temp_dir) = create_test_downloader(MockFetcher::ok());
    let app = test_router(&downloader);
    let token = downloader.token().to_string();

    let response = app
        .oneshot(webhook_request(Some(&token), json!({"url": "not a url"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let value = body_json(response).await;
    assert_eq!(value["error"]["code"], "validation_error");
    assert_eq!(downloader.queue_stats().await.total, 0);
}

#[tokio::test]
async fn test_submit_malformed_json_body() {
    let (downloader, _fetcher, _temp_dir) = create_test_downloader(MockFetcher::ok());
    let app = test_router(&downloader);

    let request = Request::builder()
        .method("POST")
        .uri("/webhook")
        .header("Content-Type", "application/json")
        .header("Authorization", format!("Bearer {}", downloader.token()))
        .body(Body::from("{not json"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(downloader.queue_stats().await.total, 0);
}

#[tokio::test]
async fn test_submit_without_token_has_no_side_effects() {
    let (downloader, fetcher, _temp_dir) = create_test_downloader(MockFetcher::ok());
    let app = test_router(&downloader);

    let response = app
        .oneshot(webhook_request(
            None,
            json!({"url": "https://example.com/v"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Rejected before any processing: no ledger entry, no download attempt
    assert_eq!(downloader.queue_stats().await.total, 0);
    assert!(fetcher.calls().is_empty());
}

#[tokio::test]
async fn test_submit_with_wrong_token_rejected() {
    let (downloader, _fetcher, _temp_dir) = create_test_downloader(MockFetcher::ok());
    let app = test_router(&downloader);

    let response = app
        .oneshot(webhook_request(
            Some("not-the-right-token"),
            json!({"url": "https://example.com/v"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(downloader.queue_stats().await.total, 0);
}

#[tokio::test]
async fn test_job_ids_unique_across_submissions() {
    let (downloader, _fetcher, _temp_dir) = create_test_downloader(MockFetcher::ok());
    let app = test_router(&downloader);
    let token = downloader.token().to_string();

    let mut seen = HashSet::new();
    for i in 0..5 {
        let response = app
            .clone()
            .oneshot(webhook_request(
                Some(&token),
                json!({"url": format!("https://example.com/video/{i}")}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);

        let value = body_json(response).await;
        let job_id = value["job_id"].as_str().unwrap().to_string();
        assert!(seen.insert(job_id), "job id repeated across submissions");
    }
}

#[tokio::test]
async fn test_success_scenario_end_to_end() {
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
    let job_id = body_json(response).await["job_id"]
        .as_str()
        .unwrap()
        .to_string();

    let value = poll_job_until(&app, &token, &job_id, &["success", "error"]).await;

    assert_eq!(value["status"], "success");
    assert_eq!(value["video_info"], "OK");
    assert_eq!(value["url"], "https://example.com/v");
    assert_eq!(value["job_id"], job_id);
    assert!(value.get("message").is_none());
}

#[tokio::test]
async fn test_fifo_processing_order() {
    let (downloader, fetcher, _temp_dir) =
        create_test_downloader(MockFetcher::ok().with_delay(Duration::from_millis(20)));
    let app = test_router(&downloader);
    let token = downloader.token().to_string();

    let urls: Vec<String> = (0..4)
        .map(|i| format!("https://example.com/video/{i}"))
        .collect();
    let mut job_ids = Vec::new();
    for url in &urls {
        let response = app
            .clone()
            .oneshot(webhook_request(Some(&token), json!({"url": url})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);
        job_ids.push(
            body_json(response).await["job_id"]
                .as_str()
                .unwrap()
                .to_string(),
        );
    }

    for job_id in &job_ids {
        poll_job_until(&app, &token, job_id, &["success", "error"]).await;
    }

    // Submission order equals processing order, one download at a time
    assert_eq!(fetcher.calls(), urls);
    assert_eq!(fetcher.max_in_flight(), 1);

    let stats = downloader.queue_stats().await;
    assert_eq!(stats.completed, urls.len());
    assert_eq!(stats.total, urls.len());
}

#[tokio::test]
async fn test_earlier_job_blocks_later_one() {
    // First job hangs inside the mock; the second must stay pending
    let (downloader, _fetcher, _temp_dir) =
        create_test_downloader(MockFetcher::ok().with_delay(Duration::from_secs(60)));
    let app = test_router(&downloader);
    let token = downloader.token().to_string();

    let response = app
        .clone()
        .oneshot(webhook_request(
            Some(&token),
            json!({"url": "https://example.com/first"}),
        ))
        .await
        .unwrap();
    let first = body_json(response).await["job_id"]
        .as_str()
        .unwrap()
        .to_string();

    poll_job_until(&app, &token, &first, &["processing"]).await;

    let response = app
        .clone()
        .oneshot(webhook_request(
            Some(&token),
            json!({"url": "https://example.com/second"}),
        ))
        .await
        .unwrap();
    let second = body_json(response).await["job_id"]
        .as_str()
        .unwrap()
        .to_string();

    // Strict FIFO: the later job cannot overtake the one in flight
    let response = app
        .clone()
        .oneshot(job_request(Some(&token), &second))
        .await
        .unwrap();
    assert_eq!(body_json(response).await["status"], "pending");

    // And only one job is ever processing
    let stats = downloader.queue_stats().await;
    assert_eq!(stats.processing, 1);
    assert_eq!(stats.pending, 1);
}
