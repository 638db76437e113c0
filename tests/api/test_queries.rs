//! Test case listing and run summaries.

use actix_web::http::StatusCode;

use super::test_helpers::*;

async fn ingested_run<S>(app: &S) -> String
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let id = run_id(&create_run(app, "queries").await);
    let (status, _) = upload_report(app, &id, TWO_SUITES_REPORT.as_bytes()).await;
    assert_eq!(status, StatusCode::OK);
    id
}

#[actix_rt::test]
async fn test_cases_listed_in_report_order() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;
    let id = ingested_run(&app).await;

    let (status, body) = get_json(&app, &format!("/api/v1/runs/{}/tests", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 5);

    let names: Vec<&str> = body["tests"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(
        names,
        ["test_add", "test_div", "test_read", "test_write", "test_network"]
    );

    let skipped = &body["tests"][4];
    assert_eq!(skipped["status"], "skipped");
    assert_eq!(skipped["classname"], "tests.io");
    assert!(skipped["failure_message"].is_null());
}

#[actix_rt::test]
async fn test_status_filter_and_pagination() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;
    let id = ingested_run(&app).await;

    let (_, passed) = get_json(&app, &format!("/api/v1/runs/{}/tests?status=passed", id)).await;
    assert_eq!(passed["total"], 2);
    assert!(
        passed["tests"]
            .as_array()
            .unwrap()
            .iter()
            .all(|t| t["status"] == "passed")
    );

    let (_, all) = get_json(&app, &format!("/api/v1/runs/{}/tests?status=all", id)).await;
    assert_eq!(all["total"], 5);

    let (_, page) = get_json(&app, &format!("/api/v1/runs/{}/tests?limit=2&offset=2", id)).await;
    assert_eq!(page["total"], 5);
    assert_eq!(page["limit"], 2);
    assert_eq!(page["offset"], 2);
    let tests = page["tests"].as_array().unwrap();
    assert_eq!(tests.len(), 2);
    assert_eq!(tests[0]["name"], "test_read");
    assert_eq!(tests[1]["name"], "test_write");
}

#[actix_rt::test]
async fn test_unknown_status_filter_is_rejected() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;
    let id = ingested_run(&app).await;

    let (status, body) = get_json(&app, &format!("/api/v1/runs/{}/tests?status=flaky", id)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "INVALID_INPUT");
}

#[actix_rt::test]
async fn test_cases_of_unknown_run_is_not_found() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;

    let (status, _) = get_json(
        &app,
        &format!("/api/v1/runs/{}/tests", uuid::Uuid::now_v7()),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn test_summary_of_ingested_run() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;
    let id = ingested_run(&app).await;

    let (status, body) = get_json(&app, &format!("/api/v1/runs/{}/summary", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["run_id"], id.as_str());
    assert_eq!(body["name"], "queries");
    assert_eq!(body["status"], "failed");
    assert_eq!(body["total"], 5);
    assert_eq!(body["passed"], 2);
    assert_eq!(body["failed"], 2);
    assert_eq!(body["skipped"], 1);
    assert_eq!(body["pass_rate"], 40.0);
    assert_eq!(body["duration_s"], 2.0);
}

#[actix_rt::test]
async fn test_summary_of_empty_run() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;
    let id = run_id(&create_run(&app, "pending").await);

    let (status, body) = get_json(&app, &format!("/api/v1/runs/{}/summary", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "running");
    assert_eq!(body["total"], 0);
    assert!(body["pass_rate"].is_null());
    assert!(body["duration_s"].is_null());
}

#[actix_rt::test]
async fn test_summary_of_unknown_run_is_not_found() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;

    let (status, body) = get_json(
        &app,
        &format!("/api/v1/runs/{}/summary", uuid::Uuid::now_v7()),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NOT_FOUND");
}
