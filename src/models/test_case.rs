//! Test case domain models and DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::test_case;
use crate::error::AppError;

/// Outcome of a single test case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    Passed,
    Failed,
    Skipped,
}

impl TestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Passed => "passed",
            Self::Failed => "failed",
            Self::Skipped => "skipped",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "passed" => Some(Self::Passed),
            "failed" => Some(Self::Failed),
            "skipped" => Some(Self::Skipped),
            _ => None,
        }
    }
}

impl std::fmt::Display for TestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A test case extracted from a report, not yet persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTestCase {
    pub name: String,
    pub classname: Option<String>,
    pub status: TestStatus,
    pub time_s: Option<f64>,
    pub failure_message: Option<String>,
}

/// A stored test case.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct TestCase {
    pub id: Uuid,
    pub run_id: Uuid,
    pub name: String,
    /// Grouping label, usually the module or class under test.
    pub classname: Option<String>,
    pub status: TestStatus,
    /// Elapsed time in seconds.
    pub time_s: Option<f64>,
    /// Present only for failed cases.
    pub failure_message: Option<String>,
    /// Position within the uploaded report.
    pub sequence: i32,
}

impl TryFrom<test_case::Model> for TestCase {
    type Error = AppError;

    fn try_from(model: test_case::Model) -> Result<Self, Self::Error> {
        let status = TestStatus::parse(&model.status).ok_or_else(|| {
            AppError::Database(format!(
                "Test case {} has unknown status '{}'",
                model.id, model.status
            ))
        })?;

        Ok(TestCase {
            id: model.id,
            run_id: model.run_id,
            name: model.name,
            classname: model.classname,
            status,
            time_s: model.time_s,
            failure_message: model.failure_message,
            sequence: model.sequence,
        })
    }
}

/// Query parameters for listing the test cases of a run.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ListCasesQuery {
    /// Filter by status (passed, failed, skipped).
    pub status: Option<String>,
    /// Results per page (default 20, max 100).
    pub limit: Option<i64>,
    /// Pagination offset.
    pub offset: Option<i64>,
}

impl ListCasesQuery {
    /// Parse the optional status filter.
    pub fn status_filter(&self) -> Result<Option<TestStatus>, AppError> {
        match self.status.as_deref() {
            None | Some("") | Some("all") => Ok(None),
            Some(s) => TestStatus::parse(s).map(Some).ok_or_else(|| {
                AppError::InvalidInput(format!(
                    "Unknown status filter '{}'. Expected passed, failed or skipped",
                    s
                ))
            }),
        }
    }
}

/// Paginated test cases response.
#[derive(Debug, Serialize, ToSchema)]
pub struct TestCaseListResponse {
    pub tests: Vec<TestCase>,
    pub total: u64,
    pub limit: u64,
    pub offset: u64,
}
