//! Relay endpoint integration tests.
//!
//! Tests verify the `POST /api/process` contract:
//! - Missing file field and non-multipart requests
//! - Misconfiguration answered before any outbound call
//! - Pass-through identity of the worker reply
//! - Worker failure mapping (unreachable, non-success, unparseable body)

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use transcript_relay::error::WorkerError;
use transcript_relay::server::RouterConfig;

use super::test_utils::{
    body_json, file_upload_body, multipart_body, multipart_request, test_router,
    test_router_with_config, MockWorkerClient,
};

// =============================================================================
// Pass-Through Success
// =============================================================================

#[tokio::test]
async fn test_upload_relayed_and_reply_passed_through() {
    let reply = json!({"ok": true, "text": "Hello world", "meta": {"type": "vtt"}});
    let worker = MockWorkerClient::replying(reply.clone());
    let router = test_router(Some(worker.clone()), None);

    // A ~10 KB VTT file
    let mut data = b"WEBVTT\n\n00:00.000 --> 00:01.000\nHello world\n".to_vec();
    data.resize(10 * 1024, b'.');

    let request = multipart_request(
        "/api/process",
        file_upload_body("file", "notes.vtt", "text/vtt", &data),
    );
    let response = router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    // Pass-through identity: the worker's body comes back unmodified
    let body = body_json(response).await;
    assert_eq!(body, reply);

    // The worker saw exactly the uploaded file
    assert_eq!(worker.call_count(), 1);
    let uploads = worker.recorded_uploads().await;
    assert_eq!(uploads.len(), 1);
    assert_eq!(uploads[0].file_name, "notes.vtt");
    assert_eq!(uploads[0].content_type.as_deref(), Some("text/vtt"));
    assert_eq!(uploads[0].size, 10 * 1024);
}

#[tokio::test]
async fn test_pass_through_preserves_ok_false_replies() {
    // The relay checks HTTP status and parseability only; a worker-level
    // {ok:false} still passes through with status 200
    let reply = json!({"ok": false, "error": "could_not_extract"});
    let worker = MockWorkerClient::replying(reply.clone());
    let router = test_router(Some(worker), None);

    let request = multipart_request(
        "/api/process",
        file_upload_body("file", "notes.pdf", "application/pdf", b"%PDF-1.4"),
    );
    let response = router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, reply);
}

#[tokio::test]
async fn test_extra_fields_ignored() {
    let worker = MockWorkerClient::replying(json!({"ok": true, "text": "", "meta": null}));
    let router = test_router(Some(worker.clone()), None);

    let body = multipart_body(&[
        ("note", None, None, b"please be quick"),
        ("file", Some("a.txt"), Some("text/plain"), b"hello"),
    ]);
    let response = router
        .oneshot(multipart_request("/api/process", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let uploads = worker.recorded_uploads().await;
    assert_eq!(uploads.len(), 1);
    assert_eq!(uploads[0].file_name, "a.txt");
}

// =============================================================================
// Missing File
// =============================================================================

#[tokio::test]
async fn test_missing_file_field_returns_400() {
    let worker = MockWorkerClient::replying(json!({"ok": true}));
    let router = test_router(Some(worker.clone()), None);

    let body = multipart_body(&[("document", Some("notes.vtt"), Some("text/vtt"), b"WEBVTT")]);
    let response = router
        .oneshot(multipart_request("/api/process", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["ok"], false);
    assert_eq!(body["error"], "no_file_provided");

    // Nothing was relayed
    assert_eq!(worker.call_count(), 0);
}

#[tokio::test]
async fn test_empty_multipart_returns_400() {
    let worker = MockWorkerClient::replying(json!({"ok": true}));
    let router = test_router(Some(worker.clone()), None);

    let response = router
        .oneshot(multipart_request("/api/process", multipart_body(&[])))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "no_file_provided");
    assert_eq!(worker.call_count(), 0);
}

#[tokio::test]
async fn test_non_multipart_request_returns_400() {
    let worker = MockWorkerClient::replying(json!({"ok": true}));
    let router = test_router(Some(worker.clone()), None);

    let request = Request::builder()
        .method("POST")
        .uri("/api/process")
        .header("content-type", "application/json")
        .body(Body::from(r#"{"file": "not-a-file"}"#))
        .unwrap();
    let response = router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "no_file_provided");
    assert_eq!(worker.call_count(), 0);
}

// =============================================================================
// Misconfiguration
// =============================================================================

#[tokio::test]
async fn test_misconfigured_server_returns_500() {
    // No worker configured: the relay endpoint must fail fast, before any
    // outbound call could exist
    let router = test_router(None, None);

    let request = multipart_request(
        "/api/process",
        file_upload_body("file", "notes.vtt", "text/vtt", b"WEBVTT"),
    );
    let response = router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["ok"], false);
    assert_eq!(body["error"], "server_misconfigured");
}

#[tokio::test]
async fn test_missing_file_reported_before_misconfiguration() {
    // Matches the endpoint contract: the file check comes first
    let router = test_router(None, None);

    let response = router
        .oneshot(multipart_request("/api/process", multipart_body(&[])))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "no_file_provided");
}

// =============================================================================
// Worker Failure Mapping
// =============================================================================

#[tokio::test]
async fn test_worker_non_success_maps_to_502_with_details() {
    let upstream = json!({"ok": false, "error": "worker exploded"});
    let worker = MockWorkerClient::failing(WorkerError::UpstreamStatus {
        status: 500,
        details: Some(upstream.clone()),
    });
    let router = test_router(Some(worker), None);

    let request = multipart_request(
        "/api/process",
        file_upload_body("file", "notes.vtt", "text/vtt", b"WEBVTT"),
    );
    let response = router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = body_json(response).await;
    assert_eq!(body["ok"], false);
    assert_eq!(body["error"], "worker_error");
    assert_eq!(body["details"], upstream);
}

#[tokio::test]
async fn test_worker_malformed_body_maps_to_502_null_details() {
    let worker = MockWorkerClient::failing(WorkerError::MalformedBody { status: 200 });
    let router = test_router(Some(worker), None);

    let request = multipart_request(
        "/api/process",
        file_upload_body("file", "notes.vtt", "text/vtt", b"WEBVTT"),
    );
    let response = router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = body_json(response).await;
    assert_eq!(body["error"], "worker_error");
    // The details member is present and explicitly null
    assert!(body.as_object().unwrap().contains_key("details"));
    assert_eq!(body["details"], serde_json::Value::Null);
}

#[tokio::test]
async fn test_worker_unreachable_maps_to_502() {
    let worker =
        MockWorkerClient::failing(WorkerError::Unreachable("connection refused".to_string()));
    let router = test_router(Some(worker), None);

    let request = multipart_request(
        "/api/process",
        file_upload_body("file", "notes.vtt", "text/vtt", b"WEBVTT"),
    );
    let response = router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(body_json(response).await["error"], "worker_error");
}

// =============================================================================
// Upload Size Cap
// =============================================================================

#[tokio::test]
async fn test_oversize_upload_rejected() {
    let worker = MockWorkerClient::replying(json!({"ok": true}));
    let router = test_router_with_config(
        Some(worker.clone()),
        None,
        RouterConfig::new()
            .with_max_upload_bytes(1024)
            .with_tracing(false),
    );

    let data = vec![b'x'; 8 * 1024];
    let request = multipart_request(
        "/api/process",
        file_upload_body("file", "big.txt", "text/plain", &data),
    );
    let response = router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(worker.call_count(), 0);
}
