//! Statistics models.

use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::RunStatus;

/// Summary statistics over a collection of test cases.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Summary {
    pub total: u64,
    pub passed: u64,
    pub failed: u64,
    pub skipped: u64,
    /// Percentage of passed cases, rounded to two decimals. Null when there are no cases.
    pub pass_rate: Option<f64>,
    /// Sum of case times in seconds. Null when there are no cases.
    pub duration_s: Option<f64>,
}

/// Result of ingesting a report into a run.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub total: u64,
    pub passed: u64,
    pub failed: u64,
    pub skipped: u64,
    pub status: RunStatus,
    pub duration_s: Option<f64>,
}
