//! Run domain models and DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::run;
use crate::error::AppError;

use super::Summary;

/// Run lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    /// Created, waiting for its report.
    Running,
    /// Report ingested with no failed cases.
    Passed,
    /// Report ingested with at least one failed case.
    Failed,
}

impl RunStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Passed => "passed",
            Self::Failed => "failed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "running" => Some(Self::Running),
            "passed" => Some(Self::Passed),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }

    /// Whether a report has already been ingested.
    pub fn is_finished(&self) -> bool {
        !matches!(self, Self::Running)
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One test execution session.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Run {
    pub id: Uuid,
    pub name: String,
    pub status: RunStatus,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    /// Total duration in seconds, absent until a report with timings is ingested.
    pub duration_s: Option<f64>,
}

impl TryFrom<run::Model> for Run {
    type Error = AppError;

    fn try_from(model: run::Model) -> Result<Self, Self::Error> {
        let status = RunStatus::parse(&model.status).ok_or_else(|| {
            AppError::Database(format!(
                "Run {} has unknown status '{}'",
                model.id, model.status
            ))
        })?;

        Ok(Run {
            id: model.id,
            name: model.name,
            status,
            started_at: model.started_at,
            finished_at: model.finished_at,
            duration_s: model.duration_s,
        })
    }
}

/// Derived fields written onto a run when its report is ingested.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutcome {
    pub status: RunStatus,
    pub duration_s: Option<f64>,
    pub finished_at: DateTime<Utc>,
}

/// Request body for creating a run.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateRunRequest {
    pub name: String,
}

/// Query-string form of [`CreateRunRequest`].
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct CreateRunQuery {
    pub name: Option<String>,
}

/// Query parameters for listing runs.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ListRunsQuery {
    /// Results per page (default 20, max 100).
    pub limit: Option<i64>,
    /// Pagination offset.
    pub offset: Option<i64>,
}

/// A run together with its case statistics.
#[derive(Debug, Serialize, ToSchema)]
pub struct RunListItem {
    #[serde(flatten)]
    pub run: Run,
    pub summary: Summary,
}

/// Paginated run list response.
#[derive(Debug, Serialize, ToSchema)]
pub struct RunListResponse {
    pub runs: Vec<RunListItem>,
    pub total: u64,
    pub limit: u64,
    pub offset: u64,
}

/// Run fields alongside the statistics of its cases.
#[derive(Debug, Serialize, ToSchema)]
pub struct RunSummaryResponse {
    pub run_id: Uuid,
    pub name: String,
    pub status: RunStatus,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub summary: Summary,
}

impl RunSummaryResponse {
    pub fn new(run: Run, summary: Summary) -> Self {
        RunSummaryResponse {
            run_id: run.id,
            name: run.name,
            status: run.status,
            started_at: run.started_at,
            finished_at: run.finished_at,
            summary,
        }
    }
}
