mod common;

use axum::{body::Body, http::{header, Request}};
use common::{parse_body, TestApp};
use tower::ServiceExt;

#[tokio::test]
async fn test_root_describes_api() {
    let app = TestApp::new().await;

    let response = app.request("GET", "/", None).await;
    assert_eq!(response.status(), 200);
    let body = parse_body(response).await;
    assert_eq!(body["name"], "Event Tracker API");
    assert_eq!(body["status"], "Running");
    assert!(body["endpoints"]["POST /api/events/{id}/attendees"].is_string());
}

#[tokio::test]
async fn test_health_check() {
    let app = TestApp::new().await;

    let response = app.request("GET", "/api/health", None).await;
    assert_eq!(response.status(), 200);
    let body = parse_body(response).await;
    assert_eq!(body["status"], "OK");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_status_counts() {
    let app = TestApp::new().await;
    let id = app.create_event("Trivia", 10).await;
    app.join(id, "Ana", "+15550000001").await;
    app.join(id, "Ben", "+15550000002").await;

    let body = parse_body(app.request("GET", "/api/status", None).await).await;
    assert_eq!(body["status"], "OK");
    assert_eq!(body["totalEvents"], 1);
    assert_eq!(body["totalAttendees"], 2);
}

#[tokio::test]
async fn test_security_headers_present() {
    let app = TestApp::new().await;

    let response = app.request("GET", "/api/health", None).await;
    let headers = response.headers();
    assert_eq!(headers[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
    assert_eq!(headers[header::X_FRAME_OPTIONS], "DENY");
    assert_eq!(headers[header::REFERRER_POLICY], "strict-origin-when-cross-origin");
    assert!(headers.contains_key(header::STRICT_TRANSPORT_SECURITY));
}

#[tokio::test]
async fn test_enforced_https_redirects_plain_requests() {
    let app = TestApp::with_config(|config| config.enforce_https = true).await;

    let response = app.router.clone().oneshot(
        Request::builder().method("GET").uri("/api/events?upcoming=1")
            .header(header::HOST, "events.example.org")
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(response.status(), 301);
    assert_eq!(response.headers()[header::LOCATION], "https://events.example.org/api/events?upcoming=1");

    let response = app.router.clone().oneshot(
        Request::builder().method("GET").uri("/api/health")
            .header(header::HOST, "events.example.org")
            .header("x-forwarded-proto", "https")
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_non_numeric_event_id_is_rejected() {
    let app = TestApp::new().await;

    let response = app.request("GET", "/api/events/not-a-number", None).await;
    assert!(response.status().is_client_error());
}
