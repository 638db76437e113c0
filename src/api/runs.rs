//! Run API handlers.

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, http::header, web};
use futures_util::StreamExt;
use uuid::Uuid;

use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::{
    CreateRunQuery, CreateRunRequest, ListCasesQuery, ListRunsQuery, Page, Run,
    RunListResponse, RunSummary, RunSummaryResponse, TestCaseListResponse,
};
use crate::services::{ingestion, runs};

/// Multipart field name preferred for the report file.
const REPORT_FIELD: &str = "file";

/// Create a new run.
///
/// The run starts in the `running` state and accepts exactly one report.
#[utoipa::path(
    post,
    path = "/runs",
    tag = "Runs",
    params(
        ("name" = Option<String>, Query, description = "Run name, when not sent as JSON body")
    ),
    request_body = CreateRunRequest,
    responses(
        (status = 201, description = "Run created", body = Run),
        (status = 400, description = "Missing name", body = crate::error::ErrorResponse),
    )
)]
pub async fn create_run(
    pool: web::Data<DbPool>,
    query: web::Query<CreateRunQuery>,
    body: Option<web::Json<CreateRunRequest>>,
) -> AppResult<HttpResponse> {
    let name = body
        .map(|b| b.into_inner().name)
        .or_else(|| query.into_inner().name)
        .filter(|name| !name.trim().is_empty())
        .ok_or_else(|| AppError::InvalidInput("Run name is required".to_string()))?;

    let run = runs::create_run(&pool, name.trim()).await?;
    Ok(HttpResponse::Created().json(run))
}

/// List runs, newest first, each with its test summary.
#[utoipa::path(
    get,
    path = "/runs",
    tag = "Runs",
    params(
        ("limit" = Option<i64>, Query, description = "Results per page (default 20, max 100)"),
        ("offset" = Option<i64>, Query, description = "Pagination offset")
    ),
    responses(
        (status = 200, description = "List of runs", body = RunListResponse),
    )
)]
pub async fn list_runs(
    pool: web::Data<DbPool>,
    query: web::Query<ListRunsQuery>,
) -> AppResult<HttpResponse> {
    let page = Page::new(query.limit, query.offset);
    let (runs, total) = runs::list_runs(&pool, page).await?;

    Ok(HttpResponse::Ok().json(RunListResponse {
        runs,
        total,
        limit: page.limit,
        offset: page.offset,
    }))
}

/// Get the most recently started run.
#[utoipa::path(
    get,
    path = "/runs/latest",
    tag = "Runs",
    responses(
        (status = 200, description = "Latest run", body = Run),
        (status = 404, description = "No runs exist", body = crate::error::ErrorResponse),
    )
)]
pub async fn get_latest_run(pool: web::Data<DbPool>) -> AppResult<HttpResponse> {
    let run = runs::get_latest_run(&pool).await?;
    Ok(HttpResponse::Ok().json(run))
}

/// Get a run by ID.
#[utoipa::path(
    get,
    path = "/runs/{run_id}",
    tag = "Runs",
    params(
        ("run_id" = Uuid, Path, description = "Run UUID")
    ),
    responses(
        (status = 200, description = "Run", body = Run),
        (status = 404, description = "Run not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn get_run(pool: web::Data<DbPool>, path: web::Path<Uuid>) -> AppResult<HttpResponse> {
    let run = runs::get_run(&pool, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(run))
}

/// Upload the JUnit XML report of a run.
///
/// Accepts a multipart form (the `file` field, or the first field carrying a
/// filename) or the raw XML as request body. A run accepts one report.
#[utoipa::path(
    post,
    path = "/runs/{run_id}/report",
    tag = "Runs",
    params(
        ("run_id" = Uuid, Path, description = "Run UUID")
    ),
    request_body(content = String, description = "JUnit XML report", content_type = "application/xml"),
    responses(
        (status = 200, description = "Report ingested", body = RunSummary),
        (status = 400, description = "Report is not UTF-8 or not well-formed XML", body = crate::error::ErrorResponse),
        (status = 404, description = "Run not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Run already has a report", body = crate::error::ErrorResponse),
        (status = 413, description = "Report too large", body = crate::error::ErrorResponse),
        (status = 422, description = "Report contains no test cases", body = crate::error::ErrorResponse),
    )
)]
pub async fn upload_report(
    pool: web::Data<DbPool>,
    max_upload_size: web::Data<usize>,
    path: web::Path<Uuid>,
    req: HttpRequest,
    payload: web::Payload,
) -> AppResult<HttpResponse> {
    let run_id = path.into_inner();
    // Missing and finished runs are rejected before the upload is read
    ingestion::ensure_accepting(&pool, run_id).await?;
    let data = read_report_body(&req, payload, **max_upload_size).await?;

    let summary = ingestion::ingest_report(&pool, run_id, &data).await?;
    Ok(HttpResponse::Ok().json(summary))
}

/// List a run's test cases in report order.
#[utoipa::path(
    get,
    path = "/runs/{run_id}/tests",
    tag = "Runs",
    params(
        ("run_id" = Uuid, Path, description = "Run UUID"),
        ("status" = Option<String>, Query, description = "Filter by status (passed, failed, skipped)"),
        ("limit" = Option<i64>, Query, description = "Results per page (default 20, max 100)"),
        ("offset" = Option<i64>, Query, description = "Pagination offset")
    ),
    responses(
        (status = 200, description = "Test cases", body = TestCaseListResponse),
        (status = 400, description = "Unknown status filter", body = crate::error::ErrorResponse),
        (status = 404, description = "Run not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn list_cases(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    query: web::Query<ListCasesQuery>,
) -> AppResult<HttpResponse> {
    let status = query.status_filter()?;
    let page = Page::new(query.limit, query.offset);
    let (tests, total) = runs::list_cases(&pool, path.into_inner(), status, page).await?;

    Ok(HttpResponse::Ok().json(TestCaseListResponse {
        tests,
        total,
        limit: page.limit,
        offset: page.offset,
    }))
}

/// Get pass/fail/skip statistics of a run.
#[utoipa::path(
    get,
    path = "/runs/{run_id}/summary",
    tag = "Runs",
    params(
        ("run_id" = Uuid, Path, description = "Run UUID")
    ),
    responses(
        (status = 200, description = "Run summary", body = RunSummaryResponse),
        (status = 404, description = "Run not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn get_summary(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let (run, summary) = runs::get_summary(&pool, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(RunSummaryResponse::new(run, summary)))
}

/// Collect the report bytes from a multipart form or a raw body.
async fn read_report_body(
    req: &HttpRequest,
    payload: web::Payload,
    limit: usize,
) -> AppResult<Vec<u8>> {
    let is_multipart = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("multipart/"));

    if !is_multipart {
        let mut payload = payload;
        let mut data = Vec::new();
        while let Some(chunk) = payload.next().await {
            let chunk = chunk.map_err(|e| AppError::InvalidInput(format!("Read error: {}", e)))?;
            append_limited(&mut data, &chunk, limit)?;
        }
        return Ok(data);
    }

    let mut multipart = Multipart::new(req.headers(), payload);
    while let Some(item) = multipart.next().await {
        let mut field =
            item.map_err(|e| AppError::InvalidInput(format!("Multipart error: {}", e)))?;

        let is_report = field.name() == Some(REPORT_FIELD)
            || field
                .content_disposition()
                .and_then(|cd| cd.get_filename())
                .is_some();

        let mut data = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(|e| AppError::InvalidInput(format!("Read error: {}", e)))?;
            if is_report {
                append_limited(&mut data, &chunk, limit)?;
            }
        }

        if is_report {
            return Ok(data);
        }
    }

    Err(AppError::InvalidInput(
        "Multipart upload contains no report file".to_string(),
    ))
}

fn append_limited(data: &mut Vec<u8>, chunk: &[u8], limit: usize) -> AppResult<()> {
    if data.len() + chunk.len() > limit {
        return Err(AppError::PayloadTooLarge(limit));
    }
    data.extend_from_slice(chunk);
    Ok(())
}

/// Configure run routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/runs")
            .route(web::get().to(list_runs))
            .route(web::post().to(create_run)),
    )
    // Registered before /runs/{run_id} so "latest" is not parsed as an ID
    .service(web::resource("/runs/latest").route(web::get().to(get_latest_run)))
    .service(web::resource("/runs/{run_id}").route(web::get().to(get_run)))
    .service(web::resource("/runs/{run_id}/report").route(web::post().to(upload_report)))
    .service(web::resource("/runs/{run_id}/tests").route(web::get().to(list_cases)))
    .service(web::resource("/runs/{run_id}/summary").route(web::get().to(get_summary)));
}
