//! Domain models for the report hub.

pub mod run;
pub mod summary;
pub mod test_case;

// Re-export commonly used types
pub use run::{
    CreateRunQuery, CreateRunRequest, ListRunsQuery, Run, RunListItem, RunListResponse,
    RunOutcome, RunStatus, RunSummaryResponse,
};
pub use summary::{RunSummary, Summary};
pub use test_case::{ListCasesQuery, NewTestCase, TestCase, TestCaseListResponse, TestStatus};

const DEFAULT_LIMIT: i64 = 20;
const MAX_LIMIT: i64 = 100;

/// Offset/limit window applied to list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: u64,
    pub offset: u64,
}

impl Page {
    /// Build a page from raw query values, clamping the limit to 1..=100
    /// and the offset to zero or more.
    pub fn new(limit: Option<i64>, offset: Option<i64>) -> Self {
        Page {
            limit: limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT) as u64,
            offset: offset.unwrap_or(0).max(0) as u64,
        }
    }
}
