//! Database queries for runs.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::entity::run::{self as run, ActiveModel, Entity as Run};
use crate::entity::test_case::{self as test_case, Entity as TestCase};
use crate::error::{AppError, AppResult};
use crate::models::{NewTestCase, Page, RunOutcome, RunStatus};

use super::DbPool;

/// Rows per INSERT statement, kept well under SQLite's bound-parameter limit.
const INSERT_BATCH_SIZE: usize = 500;

impl DbPool {
    /// Insert a new run in the `running` state.
    pub async fn insert_run(&self, name: &str) -> AppResult<run::Model> {
        let model = ActiveModel {
            id: Set(Uuid::now_v7()),
            name: Set(name.to_string()),
            status: Set(RunStatus::Running.as_str().to_string()),
            started_at: Set(Utc::now()),
            finished_at: Set(None),
            duration_s: Set(None),
        };

        let result = model
            .insert(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to insert run: {}", e)))?;

        Ok(result)
    }

    /// Get a run by ID.
    pub async fn get_run_by_id(&self, id: Uuid) -> AppResult<Option<run::Model>> {
        let result = Run::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get run: {}", e)))?;

        Ok(result)
    }

    /// Get the most recently started run.
    pub async fn get_latest_run(&self) -> AppResult<Option<run::Model>> {
        let result = Run::find()
            .order_by_desc(run::Column::StartedAt)
            .order_by_desc(run::Column::Id) // UUIDv7 is time-ordered
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get latest run: {}", e)))?;

        Ok(result)
    }

    /// List runs newest first. Returns the page and the total run count.
    pub async fn list_runs(&self, page: Page) -> AppResult<(Vec<run::Model>, u64)> {
        let total = Run::find()
            .count(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to count runs: {}", e)))?;

        let runs = Run::find()
            .order_by_desc(run::Column::StartedAt)
            .order_by_desc(run::Column::Id)
            .offset(page.offset)
            .limit(page.limit)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list runs: {}", e)))?;

        Ok((runs, total))
    }

    /// Record a run's report: replace its test cases and write the derived
    /// run fields in a single transaction.
    ///
    /// The run update only matches a run that is still `running`, so of two
    /// concurrent uploads for the same run exactly one commits and the other
    /// gets `Conflict`.
    pub async fn finish_run(
        &self,
        run_id: Uuid,
        cases: &[NewTestCase],
        outcome: &RunOutcome,
    ) -> AppResult<run::Model> {
        let txn = self
            .connection()
            .begin()
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

        let update = ActiveModel {
            status: Set(outcome.status.as_str().to_string()),
            finished_at: Set(Some(outcome.finished_at)),
            duration_s: Set(outcome.duration_s),
            ..Default::default()
        };

        let updated = Run::update_many()
            .set(update)
            .filter(run::Column::Id.eq(run_id))
            .filter(run::Column::Status.eq(RunStatus::Running.as_str()))
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(format!("Failed to update run: {}", e)))?;

        if updated.rows_affected == 0 {
            let exists = Run::find_by_id(run_id).one(&txn).await?.is_some();
            txn.rollback().await?;
            return Err(if exists {
                AppError::Conflict(format!("Run {} already has a report", run_id))
            } else {
                AppError::NotFound(format!("Run {}", run_id))
            });
        }

        TestCase::delete_many()
            .filter(test_case::Column::RunId.eq(run_id))
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(format!("Failed to clear test cases: {}", e)))?;

        for (batch_index, batch) in cases.chunks(INSERT_BATCH_SIZE).enumerate() {
            let models = batch.iter().enumerate().map(|(i, case)| {
                let sequence = (batch_index * INSERT_BATCH_SIZE + i) as i32;
                test_case::ActiveModel {
                    id: Set(Uuid::now_v7()),
                    run_id: Set(run_id),
                    sequence: Set(sequence),
                    name: Set(case.name.clone()),
                    classname: Set(case.classname.clone()),
                    status: Set(case.status.as_str().to_string()),
                    time_s: Set(case.time_s),
                    failure_message: Set(case.failure_message.clone()),
                }
            });

            TestCase::insert_many(models)
                .exec(&txn)
                .await
                .map_err(|e| AppError::Database(format!("Failed to insert test cases: {}", e)))?;
        }

        let run = Run::find_by_id(run_id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Run {}", run_id)))?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(format!("Failed to commit report: {}", e)))?;

        Ok(run)
    }
}
