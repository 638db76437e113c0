//! OpenAPI documentation configuration.

use utoipa::OpenApi;

use crate::{api, error, models};

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "ReportHub Server",
        version = "0.1.0",
        description = "API server for collecting JUnit XML reports into test runs and querying their results"
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health endpoints
        api::health::health,
        api::health::ready,
        // Run endpoints
        api::runs::create_run,
        api::runs::list_runs,
        api::runs::get_latest_run,
        api::runs::get_run,
        api::runs::upload_report,
        api::runs::list_cases,
        api::runs::get_summary,
    ),
    components(
        schemas(
            // Common
            error::ErrorResponse,
            // Health
            api::health::HealthResponse,
            api::health::ReadyResponse,
            // Runs
            models::RunStatus,
            models::Run,
            models::CreateRunRequest,
            models::RunListItem,
            models::RunListResponse,
            models::RunSummaryResponse,
            // Test cases
            models::TestStatus,
            models::TestCase,
            models::TestCaseListResponse,
            // Summaries
            models::Summary,
            models::RunSummary,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Runs", description = "Run lifecycle, report ingestion and result queries")
    )
)]
pub struct ApiDoc;
