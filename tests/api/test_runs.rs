//! Run creation and lookup.

use actix_web::http::StatusCode;
use actix_web::test;
use std::time::Duration;

use super::test_helpers::*;

#[actix_rt::test]
async fn test_create_run_starts_running() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;

    let run = create_run(&app, "nightly").await;
    assert_eq!(run["name"], "nightly");
    assert_eq!(run["status"], "running");
    assert!(run["started_at"].is_string());
    assert!(run["finished_at"].is_null());
    assert!(run["duration_s"].is_null());

    let (status, fetched) = get_json(&app, &format!("/api/v1/runs/{}", run_id(&run))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["id"], run["id"]);
    assert_eq!(fetched["name"], "nightly");
    assert_eq!(fetched["status"], "running");
}

#[actix_rt::test]
async fn test_create_run_from_query_string() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/runs?name=from-query")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["name"], "from-query");
}

#[actix_rt::test]
async fn test_create_run_requires_name() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;

    let req = test::TestRequest::post().uri("/api/v1/runs").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "INVALID_INPUT");
}

#[actix_rt::test]
async fn test_get_unknown_run_is_not_found() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;

    let (status, body) = get_json(&app, &format!("/api/v1/runs/{}", uuid::Uuid::now_v7())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NOT_FOUND");
}

#[actix_rt::test]
async fn test_latest_run() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;

    let (status, body) = get_json(&app, "/api/v1/runs/latest").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NOT_FOUND");

    create_run(&app, "first").await;
    tokio::time::sleep(Duration::from_millis(5)).await;
    let second = create_run(&app, "second").await;

    let (status, latest) = get_json(&app, "/api/v1/runs/latest").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(latest["id"], second["id"]);
}

#[actix_rt::test]
async fn test_list_runs_newest_first_with_summaries() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;

    let first = create_run(&app, "first").await;
    tokio::time::sleep(Duration::from_millis(5)).await;
    let second = create_run(&app, "second").await;
    let (status, _) = upload_report(&app, &run_id(&first), TWO_SUITES_REPORT.as_bytes()).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = get_json(&app, "/api/v1/runs").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 2);
    assert_eq!(body["limit"], 20);
    assert_eq!(body["offset"], 0);

    let runs = body["runs"].as_array().unwrap();
    assert_eq!(runs.len(), 2);
    assert_eq!(runs[0]["id"], second["id"]);
    assert_eq!(runs[0]["summary"]["total"], 0);
    assert!(runs[0]["summary"]["pass_rate"].is_null());

    assert_eq!(runs[1]["id"], first["id"]);
    assert_eq!(runs[1]["status"], "failed");
    assert_eq!(runs[1]["summary"]["total"], 5);
    assert_eq!(runs[1]["summary"]["failed"], 2);

    let (_, page) = get_json(&app, "/api/v1/runs?limit=1&offset=1").await;
    let runs = page["runs"].as_array().unwrap();
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0]["id"], first["id"]);
    assert_eq!(page["total"], 2);
}
