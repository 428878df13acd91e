//! HTTP API tests against the router with an in-memory mail transport

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use thillai_cable::{
    logging::{LogLevel, Logger},
    mail::{MailTransport, MemoryTransport},
    models::{Config, MailSettings},
    server::{self, AppState},
};
use tower::ServiceExt;

fn configured() -> Config {
    Config {
        mail: MailSettings {
            username: Some("relay@thillaicable.com".to_string()),
            password: Some("app-password".to_string()),
            admin_email: Some("admin@thillaicable.com".to_string()),
            ..MailSettings::default()
        },
        ..Config::default()
    }
}

fn app_with(config: Config, transport: Arc<MemoryTransport>) -> Router {
    let (logger, _) = Logger::in_memory("TEST", LogLevel::Error);
    let transport: Arc<dyn MailTransport> = transport;
    server::router(AppState::with_transport(Arc::new(config), transport, logger))
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, body.to_vec())
}

async fn send_json(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let (status, body) = send(app, request).await;
    (status, serde_json::from_slice(&body).unwrap())
}

fn error_fields(body: &Value) -> Vec<&str> {
    body["errors"]
        .as_array()
        .map(|errors| errors.iter().filter_map(|e| e["field"].as_str()).collect())
        .unwrap_or_default()
}

#[tokio::test]
async fn contact_submission_sends_two_messages() {
    let transport = Arc::new(MemoryTransport::new());
    let app = app_with(configured(), transport.clone());

    let (status, body) = send_json(
        app,
        post_json("/api/mail", r#"{"name":"A","email":"a@b.com","message":"hi"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true, "message": "Message sent successfully" }));

    let sent = transport.sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].to, "admin@thillaicable.com");
    assert_eq!(sent[1].to, "a@b.com");
    assert!(sent.iter().all(|m| m.from_address == "relay@thillaicable.com"));
}

#[tokio::test]
async fn contact_missing_fields_are_enumerated() {
    let transport = Arc::new(MemoryTransport::new());
    let app = app_with(configured(), transport.clone());

    let (status, body) = send_json(app, post_json("/api/mail", "{}")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Invalid request data");
    assert_eq!(error_fields(&body), vec!["name", "email", "message"]);
    assert_eq!(transport.sent_count(), 0);
}

#[tokio::test]
async fn contact_invalid_email_is_rejected() {
    let transport = Arc::new(MemoryTransport::new());
    let app = app_with(configured(), transport.clone());

    let (status, body) = send_json(
        app,
        post_json("/api/mail", r#"{"name":"A","email":"not-an-email","message":"hi"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_fields(&body), vec!["email"]);
    assert_eq!(body["errors"][0]["message"], "Invalid email address");
    assert_eq!(transport.sent_count(), 0);
}

#[tokio::test]
async fn malformed_json_is_a_validation_failure() {
    let transport = Arc::new(MemoryTransport::new());
    let app = app_with(configured(), transport.clone());

    let (status, body) = send_json(app, post_json("/api/mail", "{not json")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid request data");
    assert_eq!(error_fields(&body), vec!["body"]);
}

#[tokio::test]
async fn missing_configuration_wins_over_body_errors() {
    let transport = Arc::new(MemoryTransport::new());
    let app = app_with(Config::default(), transport.clone());

    let (status, body) = send_json(app, post_json("/api/mail", "{not json")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "success": false, "message": "Server configuration error" }));
    assert_eq!(transport.sent_count(), 0);
}

#[tokio::test]
async fn missing_configuration_wins_over_oversized_body() {
    let app = app_with(Config::default(), Arc::new(MemoryTransport::new()));
    let message = "x".repeat(9 * 1024 * 1024);
    let payload = json!({ "name": "A", "email": "a@b.com", "message": message }).to_string();

    let (status, body) = send_json(app, post_json("/api/mail", &payload)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Server configuration error");
}

#[tokio::test]
async fn oversized_submission_is_rejected() {
    let transport = Arc::new(MemoryTransport::new());
    let app = app_with(configured(), transport.clone());
    let message = "x".repeat(thillai_cable::defaults::MAX_SUBMISSION_BYTES);
    let payload = json!({ "name": "A", "email": "a@b.com", "plan": "Fiber 100", "message": message }).to_string();

    let (status, body) = send_json(app, post_json("/api/submit-quote", &payload)).await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body, json!({ "success": false, "message": "Request body too large" }));
    assert_eq!(transport.sent_count(), 0);
}

#[tokio::test]
async fn one_missing_variable_disables_the_relay() {
    let mut config = configured();
    config.mail.password = None;
    let app = app_with(config, Arc::new(MemoryTransport::new()));

    let (status, body) = send_json(
        app,
        post_json("/api/submit-quote", r#"{"name":"A","email":"a@b.com","plan":"Fiber 100"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Server configuration error");
}

#[tokio::test]
async fn transport_failure_returns_generic_message() {
    let app = app_with(configured(), Arc::new(MemoryTransport::failing()));

    let (status, body) = send_json(
        app,
        post_json("/api/mail", r#"{"name":"A","email":"a@b.com","message":"hi"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "success": false, "message": "Error sending message" }));
}

#[tokio::test]
async fn acknowledgment_failure_fails_the_submission() {
    let transport = Arc::new(MemoryTransport::failing_after(1));
    let app = app_with(configured(), transport.clone());

    let (status, body) = send_json(
        app,
        post_json("/api/submit-quote", r#"{"name":"A","email":"a@b.com","plan":"Fiber 100"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Error submitting quote request");
    assert_eq!(transport.sent_count(), 1);
}

#[tokio::test]
async fn quote_submission_requires_plan() {
    let transport = Arc::new(MemoryTransport::new());
    let app = app_with(configured(), transport.clone());

    let (status, body) = send_json(
        app,
        post_json("/api/submit-quote", r#"{"name":"A","email":"a@b.com"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_fields(&body), vec!["plan"]);
    assert_eq!(transport.sent_count(), 0);
}

#[tokio::test]
async fn quote_submission_succeeds() {
    let transport = Arc::new(MemoryTransport::new());
    let app = app_with(configured(), transport.clone());

    let (status, body) = send_json(
        app,
        post_json(
            "/api/submit-quote",
            r#"{"name":"Karthik","email":"karthik@example.com","phone":"+91 9000000000","plan":"Fiber 100"}"#,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Quote request submitted successfully");

    let sent = transport.sent();
    assert_eq!(sent.len(), 2);
    assert!(sent[0].html.contains("Fiber 100"));
    assert_eq!(sent[1].to, "karthik@example.com");
}

#[tokio::test]
async fn submission_routes_reject_get() {
    let app = app_with(configured(), Arc::new(MemoryTransport::new()));
    let (status, _) = send(app.clone(), get("/api/mail")).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);

    let (status, _) = send(app, get("/api/submit-quote")).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn ping_answers_ok() {
    let app = app_with(configured(), Arc::new(MemoryTransport::new()));
    let (status, body) = send_json(app, get("/api/ping")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}

fn multipart_upload(payload: &[u8]) -> Request<Body> {
    let boundary = "thillai-test-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
    body.extend_from_slice(b"Content-Disposition: form-data; name=\"file\"; filename=\"testfile.dat\"\r\n");
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(payload);
    body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());

    Request::builder()
        .method(Method::POST)
        .uri("/api/upload-test")
        .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={}", boundary))
        .header(header::CONTENT_LENGTH, body.len())
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn upload_counts_and_discards_payload() {
    let app = app_with(configured(), Arc::new(MemoryTransport::new()));
    let (status, body) = send_json(app, multipart_upload(&vec![7u8; 100_000])).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "success", "bytes_received": 100_000 }));
}

#[tokio::test]
async fn upload_limit_is_not_the_framework_default() {
    // Larger than axum's built-in 2 MB body cap
    let app = app_with(configured(), Arc::new(MemoryTransport::new()));
    let (status, body) = send_json(app, multipart_upload(&vec![1u8; 3 * 1024 * 1024])).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["bytes_received"], 3 * 1024 * 1024);
}

#[tokio::test]
async fn upload_over_the_limit_is_rejected() {
    let mut config = configured();
    config.max_upload_bytes = 1024;
    let app = app_with(config, Arc::new(MemoryTransport::new()));

    let (status, _) = send(app, multipart_upload(&[0u8; 4096])).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn upload_without_multipart_is_rejected() {
    let app = app_with(configured(), Arc::new(MemoryTransport::new()));
    let (status, _) = send(app, post_json("/api/upload-test", "{}")).await;
    assert!(status.is_client_error());
}

#[tokio::test]
async fn download_streams_requested_size() {
    let app = app_with(configured(), Arc::new(MemoryTransport::new()));
    let response = app.oneshot(get("/api/download?bytes=100000")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_LENGTH], "100000");
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/octet-stream");

    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(body.len(), 100_000);
    assert!(body.iter().all(|b| *b == 0));
}

#[tokio::test]
async fn download_defaults_to_one_mebibyte() {
    let app = app_with(configured(), Arc::new(MemoryTransport::new()));
    let (status, body) = send(app, get("/api/download")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.len(), 1024 * 1024);
}

#[tokio::test]
async fn download_out_of_range_is_rejected() {
    let app = app_with(configured(), Arc::new(MemoryTransport::new()));

    let (status, body) = send_json(app.clone(), get("/api/download?bytes=0")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");

    let too_large = format!("/api/download?bytes={}", 64 * 1024 * 1024 + 1);
    let (status, _) = send(app, get(&too_large)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn plans_lists_standard_and_rural() {
    let app = app_with(configured(), Arc::new(MemoryTransport::new()));
    let (status, body) = send_json(app, get("/api/plans")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["standard"].as_array().map(Vec::len), Some(6));
    assert_eq!(body["rural"].as_array().map(Vec::len), Some(3));
}

#[tokio::test]
async fn health_reports_relay_state() {
    let app = app_with(configured(), Arc::new(MemoryTransport::new()));
    let (status, body) = send_json(app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(body["mail_relay"], "enabled");

    let app = app_with(Config::default(), Arc::new(MemoryTransport::new()));
    let (_, body) = send_json(app, get("/health")).await;
    assert_eq!(body["mail_relay"], "disabled");
}

#[tokio::test]
async fn cors_preflight_allows_any_origin() {
    let app = app_with(configured(), Arc::new(MemoryTransport::new()));
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/mail")
        .header(header::ORIGIN, "https://thillaicable.com")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert!(response.status().is_success());
    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
}
