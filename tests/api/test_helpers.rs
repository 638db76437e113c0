//! Shared helpers for API tests.

use actix_web::http::{StatusCode, header};
use actix_web::{App, dev::ServiceResponse, test, web};
use reporthub_lib::config::DatabaseConfig;
use reporthub_lib::db::DbPool;
use reporthub_lib::middleware::RequestLogger;
use serde_json::{Value, json};

/// Upload limit used unless a test overrides it.
pub const TEST_MAX_UPLOAD_SIZE: usize = 1024 * 1024;

/// Two suites with two and three cases: one failure, one error, one skip.
pub const TWO_SUITES_REPORT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<testsuites name="all">
  <testsuite name="math" tests="2">
    <testcase classname="tests.math" name="test_add" time="0.25"/>
    <testcase classname="tests.math" name="test_div" time="0.5">
      <failure message="ZeroDivisionError">division by zero</failure>
    </testcase>
  </testsuite>
  <testsuite name="io" tests="3">
    <testcase classname="tests.io" name="test_read" time="1.0"/>
    <testcase classname="tests.io" name="test_write" time="0.25">
      <error message="disk full"/>
    </testcase>
    <testcase classname="tests.io" name="test_network">
      <skipped message="offline"/>
    </testcase>
  </testsuite>
</testsuites>"#;

/// A single passing suite.
pub const PASSING_REPORT: &str = r#"<testsuite name="smoke">
  <testcase classname="tests.smoke" name="test_boot" time="0.1"/>
  <testcase classname="tests.smoke" name="test_ping" time="0.2"/>
</testsuite>"#;

/// Create a migrated in-memory database.
pub async fn create_test_pool() -> DbPool {
    let pool = DbPool::connect(&DatabaseConfig::single("sqlite::memory:"))
        .await
        .expect("Failed to open in-memory database");
    pool.run_migrations()
        .await
        .expect("Failed to run migrations");
    pool
}

/// Create a test app with the default upload limit.
pub async fn create_test_app(
    pool: &DbPool,
) -> impl actix_web::dev::Service<
    actix_http::Request,
    Response = ServiceResponse,
    Error = actix_web::Error,
> {
    create_test_app_with_limit(pool, TEST_MAX_UPLOAD_SIZE).await
}

/// Create a test app with an explicit upload limit.
pub async fn create_test_app_with_limit(
    pool: &DbPool,
    max_upload_size: usize,
) -> impl actix_web::dev::Service<
    actix_http::Request,
    Response = ServiceResponse,
    Error = actix_web::Error,
> {
    test::init_service(
        App::new()
            .wrap(RequestLogger)
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(max_upload_size))
            .service(
                web::scope("/api/v1")
                    .configure(reporthub_lib::api::configure_health_routes)
                    .configure(reporthub_lib::api::configure_run_routes),
            ),
    )
    .await
}

/// GET a URI and return status and JSON body.
pub async fn get_json<S>(app: &S, uri: &str) -> (StatusCode, Value)
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let req = test::TestRequest::get().uri(uri).to_request();
    let resp = test::call_service(app, req).await;
    let status = resp.status();
    let body: Value = test::read_body_json(resp).await;
    (status, body)
}

/// Create a run and return its JSON representation.
pub async fn create_run<S>(app: &S, name: &str) -> Value
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let req = test::TestRequest::post()
        .uri("/api/v1/runs")
        .set_json(json!({ "name": name }))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    test::read_body_json(resp).await
}

/// Upload a raw XML body to a run.
pub async fn upload_report<S>(app: &S, run_id: &str, body: &[u8]) -> (StatusCode, Value)
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/runs/{}/report", run_id))
        .insert_header((header::CONTENT_TYPE, "application/xml"))
        .set_payload(body.to_vec())
        .to_request();
    let resp = test::call_service(app, req).await;
    let status = resp.status();
    let body: Value = test::read_body_json(resp).await;
    (status, body)
}

/// Upload a report as the `file` field of a multipart form.
pub async fn upload_report_multipart<S>(app: &S, run_id: &str, xml: &str) -> (StatusCode, Value)
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let boundary = "----reporthubtestboundary";
    let body = format!(
        "--{b}\r\n\
         Content-Disposition: form-data; name=\"comment\"\r\n\r\n\
         nightly build\r\n\
         --{b}\r\n\
         Content-Disposition: form-data; name=\"file\"; filename=\"junit.xml\"\r\n\
         Content-Type: application/xml\r\n\r\n\
         {xml}\r\n\
         --{b}--\r\n",
        b = boundary,
        xml = xml
    );

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/runs/{}/report", run_id))
        .insert_header((
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", boundary),
        ))
        .set_payload(body)
        .to_request();
    let resp = test::call_service(app, req).await;
    let status = resp.status();
    let body: Value = test::read_body_json(resp).await;
    (status, body)
}

/// Extract the run ID string from a run JSON body.
pub fn run_id(run: &Value) -> String {
    run["id"].as_str().expect("run has an id").to_string()
}
