//! Database queries for test cases.

use std::collections::HashMap;

use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect};
use uuid::Uuid;

use crate::entity::test_case::{self as test_case, Entity as TestCase};
use crate::error::{AppError, AppResult};
use crate::models::{Page, TestStatus};

use super::DbPool;

impl DbPool {
    /// Get all test cases of a run in report order.
    pub async fn get_cases_by_run_id(&self, run_id: Uuid) -> AppResult<Vec<test_case::Model>> {
        let result = TestCase::find()
            .filter(test_case::Column::RunId.eq(run_id))
            .order_by_asc(test_case::Column::Sequence)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get test cases: {}", e)))?;

        Ok(result)
    }

    /// Batch fetch test cases for several runs.
    /// Returns a HashMap of run_id -> cases in report order.
    pub async fn get_cases_by_run_ids(
        &self,
        run_ids: &[Uuid],
    ) -> AppResult<HashMap<Uuid, Vec<test_case::Model>>> {
        if run_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let cases = TestCase::find()
            .filter(test_case::Column::RunId.is_in(run_ids.iter().copied()))
            .order_by_asc(test_case::Column::RunId)
            .order_by_asc(test_case::Column::Sequence)
            .all(self.connection())
            .await
            .map_err(|e| {
                AppError::Database(format!("Failed to batch get test cases: {}", e))
            })?;

        let mut by_run: HashMap<Uuid, Vec<test_case::Model>> = HashMap::new();
        for case in cases {
            by_run.entry(case.run_id).or_default().push(case);
        }

        Ok(by_run)
    }

    /// Query a run's test cases with an optional status filter and pagination.
    /// Returns the page and the total number of matching cases.
    pub async fn query_cases(
        &self,
        run_id: Uuid,
        status: Option<TestStatus>,
        page: Page,
    ) -> AppResult<(Vec<test_case::Model>, u64)> {
        let mut select = TestCase::find().filter(test_case::Column::RunId.eq(run_id));

        if let Some(status) = status {
            select = select.filter(test_case::Column::Status.eq(status.as_str()));
        }

        // Count total before pagination
        let total = select
            .clone()
            .count(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to count test cases: {}", e)))?;

        let cases = select
            .order_by_asc(test_case::Column::Sequence)
            .offset(page.offset)
            .limit(page.limit)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to query test cases: {}", e)))?;

        Ok((cases, total))
    }
}
