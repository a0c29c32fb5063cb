//! Router tests that exercise auth, role guards, and input validation.
//!
//! None of these requests reach the database, so the state carries a
//! disconnected connection.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use farmstead_api::{AppState, create_router};
use farmstead_shared::{JwtConfig, JwtService, config::StorageConfig};
use http_body_util::BodyExt;
use rstest::rstest;
use sea_orm::DatabaseConnection;
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

fn jwt() -> JwtService {
    JwtService::new(JwtConfig {
        secret: "router-test-secret".to_string(),
        ..JwtConfig::default()
    })
}

fn app() -> Router {
    create_router(AppState {
        db: Arc::new(DatabaseConnection::default()),
        jwt_service: Arc::new(jwt()),
        storage: Arc::new(StorageConfig {
            upload_dir: std::env::temp_dir()
                .join("farmstead-router-test")
                .to_string_lossy()
                .into_owned(),
            max_upload_bytes: 16,
        }),
    })
}

fn token(user_id: Uuid, role: &str) -> String {
    jwt()
        .generate_access_token(user_id, Uuid::now_v7(), role)
        .unwrap()
}

fn request(method: &str, uri: &str, bearer: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(t) = bearer {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {t}"));
    }
    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(req: Request<Body>) -> (StatusCode, Value) {
    let response = app().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn test_health_is_public() {
    let (status, body) = send(request("GET", "/api/v1/health", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_responses_carry_request_id() {
    let response = app()
        .oneshot(request("GET", "/api/v1/health", None, None))
        .await
        .unwrap();
    assert!(response.headers().contains_key("x-request-id"));
}

#[rstest]
#[case("GET", "/api/v1/dashboard")]
#[case("GET", "/api/v1/auth/me")]
#[case("GET", "/api/v1/branches")]
#[case("GET", "/api/v1/reports/activities")]
#[tokio::test]
async fn test_missing_token(#[case] method: &str, #[case] uri: &str) {
    let (status, body) = send(request(method, uri, None, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "missing_token");
}

#[tokio::test]
async fn test_garbage_token() {
    let (status, body) = send(request("GET", "/api/v1/dashboard", Some("not.a.jwt"), None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid_token");
}

#[tokio::test]
async fn test_refresh_token_rejected_as_bearer() {
    let refresh = jwt()
        .generate_refresh_token(Uuid::now_v7(), Uuid::now_v7(), "admin")
        .unwrap();
    let (status, body) = send(request("GET", "/api/v1/dashboard", Some(&refresh), None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid_token");
}

#[tokio::test]
async fn test_access_token_rejected_by_refresh() {
    let access = token(Uuid::now_v7(), "staff");
    let (status, body) = send(request(
        "POST",
        "/api/v1/auth/refresh",
        None,
        Some(json!({ "refresh_token": access })),
    ))
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid_token");
}

#[rstest]
#[case("POST", "/api/v1/branches", Some(json!({"name": "North", "location": "Hill"})))]
#[case("GET", "/api/v1/users", None)]
#[case("POST", "/api/v1/resources", Some(json!({"name": "Feed"})))]
#[case("POST", "/api/v1/workers", Some(json!({"name": "Ama", "hourly_rate": "10"})))]
#[case("DELETE", "/api/v1/schedules/0190f0b8-0000-7000-8000-000000000000", None)]
#[tokio::test]
async fn test_staff_forbidden_on_admin_routes(
    #[case] method: &str,
    #[case] uri: &str,
    #[case] body: Option<Value>,
) {
    let staff = token(Uuid::now_v7(), "staff");
    let (status, body) = send(request(method, uri, Some(&staff), body)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "FORBIDDEN");
}

#[tokio::test]
async fn test_staff_cannot_read_other_user() {
    let staff = token(Uuid::now_v7(), "staff");
    let uri = format!("/api/v1/users/{}", Uuid::now_v7());
    let (status, _) = send(request("GET", &uri, Some(&staff), None)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_staff_cannot_chart_other_user() {
    let staff = token(Uuid::now_v7(), "staff");
    let uri = format!("/api/v1/performance/chart?user_id={}", Uuid::now_v7());
    let (status, _) = send(request("GET", &uri, Some(&staff), None)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[rstest]
#[case("POST", "/api/v1/branches", json!({"name": "  ", "location": "Hill"}))]
#[case("POST", "/api/v1/users", json!({"username": "kofi", "email": "nope", "password": "longenough", "branch_id": Uuid::nil()}))]
#[case("POST", "/api/v1/users", json!({"username": "kofi", "email": "k@farm.io", "password": "short", "branch_id": Uuid::nil()}))]
#[case("POST", "/api/v1/resources", json!({"name": "Feed", "quantity": -3}))]
#[case("POST", "/api/v1/workers", json!({"name": "Ama", "hourly_rate": "0"}))]
#[case("POST", "/api/v1/activities", json!({"description": "", "activity_type": "revenue", "amount": "5", "activity_date": "2024-01-01"}))]
#[case("POST", "/api/v1/activities", json!({"description": "Sold eggs", "activity_type": "expense", "amount": "-5", "activity_date": "2024-01-01"}))]
#[case("POST", "/api/v1/activities", json!({"description": "Sold eggs", "activity_type": "gift", "amount": "5", "activity_date": "2024-01-01"}))]
#[case("POST", "/api/v1/activities", json!({"description": "Sold eggs"}))]
#[case("POST", "/api/v1/schedules", json!({"activity_id": Uuid::nil(), "scheduled_date": "2000-01-01"}))]
#[case("POST", "/api/v1/resources", json!({"name": "Feed", "unit": "u".repeat(51)}))]
#[case("POST", "/api/v1/activities", json!({"description": "Sold eggs", "activity_type": "revenue", "amount": "1.23456789", "activity_date": "2024-01-01"}))]
#[case("POST", "/api/v1/activities", json!({"description": "Sold eggs", "activity_type": "revenue", "amount": "10000000000000000", "activity_date": "2024-01-01"}))]
#[case("POST", "/api/v1/workers", json!({"name": "Ama", "hourly_rate": "0.00001"}))]
#[case("POST", "/api/v1/workers", json!({"name": "Ama", "hourly_rate": "1000000000000000"}))]
#[tokio::test]
async fn test_invalid_input_is_400(#[case] method: &str, #[case] uri: &str, #[case] body: Value) {
    let admin = token(Uuid::now_v7(), "admin");
    let (status, body) = send(request(method, uri, Some(&admin), Some(body))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");
}

/// Upper-case enum names deserialize, so these fail on the later field rule
/// rather than on the enum.
#[rstest]
#[case("/api/v1/activities", json!({"description": "Sold eggs", "activity_type": "REVENUE", "amount": "0", "activity_date": "2024-01-01"}), "amount must be greater than zero")]
#[case("/api/v1/resources", json!({"name": "Tractor driver", "resource_type": "HUMAN", "quantity": -1}), "quantity must not be negative")]
#[case("/api/v1/users", json!({"username": "kofi", "email": "k@farm.io", "password": "short", "branch_id": Uuid::nil(), "role": "ADMIN"}), "at least 8 characters")]
#[tokio::test]
async fn test_enum_names_accept_any_case(
    #[case] uri: &str,
    #[case] body: Value,
    #[case] expected: &str,
) {
    let admin = token(Uuid::now_v7(), "admin");
    let (status, body) = send(request("POST", uri, Some(&admin), Some(body))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let message = body["message"].as_str().unwrap();
    assert!(message.contains(expected), "{message}");
    assert!(!message.contains("unknown variant"), "{message}");
}

#[rstest]
#[case("/api/v1/reports/activities?sort=colour")]
#[case("/api/v1/reports/activities?order=sideways")]
#[case("/api/v1/reports/activities?sort=date")]
#[case("/api/v1/reports/activities/export?sort=colour")]
#[case("/api/v1/reports/monthly?year=1800")]
#[case("/api/v1/activities?activity_type=gift")]
#[case("/api/v1/activities?from=2024-05-01&to=2024-04-01")]
#[case("/api/v1/schedules?from=2024-05-01&to=2024-04-01")]
#[tokio::test]
async fn test_invalid_query_is_400(#[case] uri: &str) {
    let staff = token(Uuid::now_v7(), "staff");
    let (status, body) = send(request("GET", uri, Some(&staff), None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_malformed_path_id_is_400() {
    let staff = token(Uuid::now_v7(), "staff");
    let (status, _) = send(request("GET", "/api/v1/activities/not-a-uuid", Some(&staff), None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_admin_cannot_delete_self() {
    let me = Uuid::now_v7();
    let admin = token(me, "admin");
    let uri = format!("/api/v1/users/{me}");
    let (status, body) = send(request("DELETE", &uri, Some(&admin), None)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "BUSINESS_RULE_VIOLATION");
}

fn multipart(field: &str, filename: Option<&str>, data: &str) -> Request<Body> {
    let disposition = match filename {
        Some(f) => format!("form-data; name=\"{field}\"; filename=\"{f}\""),
        None => format!("form-data; name=\"{field}\""),
    };
    let body = format!(
        "--XBOUNDARY\r\nContent-Disposition: {disposition}\r\n\r\n{data}\r\n--XBOUNDARY--\r\n"
    );
    Request::builder()
        .method("POST")
        .uri("/api/v1/users/upload")
        .header(
            header::AUTHORIZATION,
            format!("Bearer {}", token(Uuid::now_v7(), "staff")),
        )
        .header(header::CONTENT_TYPE, "multipart/form-data; boundary=XBOUNDARY")
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn test_upload_without_file_is_400() {
    let (status, _) = send(multipart("note", None, "hello")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_upload_too_large_is_413() {
    let (status, body) = send(multipart("file", Some("big.png"), &"x".repeat(64))).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["error"], "PAYLOAD_TOO_LARGE");
}

#[tokio::test]
async fn test_upload_stores_file() {
    let (status, body) = send(multipart("file", Some("my hen.png"), "tiny")).await;
    assert_eq!(status, StatusCode::CREATED);
    let path = body["file_path"].as_str().unwrap();
    assert!(path.starts_with("/uploads/"));
    assert!(path.ends_with("-my_hen.png"));
}
