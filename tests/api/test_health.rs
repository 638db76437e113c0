//! Health and readiness endpoints.

use actix_web::http::StatusCode;
use actix_web::test;
use reporthub_lib::middleware::REQUEST_ID_HEADER;

use super::test_helpers::*;

#[actix_rt::test]
async fn test_health_reports_healthy() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;

    let (status, body) = get_json(&app, "/api/v1/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert!(body["timestamp"].is_string());
}

#[actix_rt::test]
async fn test_ready_checks_database() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;

    let (status, body) = get_json(&app, "/api/v1/ready").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["database"], "connected");
}

#[actix_rt::test]
async fn test_responses_carry_request_id() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;

    let req = test::TestRequest::get().uri("/api/v1/health").to_request();
    let resp = test::call_service(&app, req).await;
    let id = resp
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .expect("request id header");
    assert!(uuid::Uuid::parse_str(id).is_ok());
}
