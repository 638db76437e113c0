//! Run and test case read/create operations backing the HTTP layer.

use tracing::info;
use uuid::Uuid;

use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::{Page, Run, RunListItem, Summary, TestCase, TestStatus};

use super::aggregator::summarize;

/// Create an empty run in the `running` state.
pub async fn create_run(pool: &DbPool, name: &str) -> AppResult<Run> {
    let run: Run = pool.insert_run(name).await?.try_into()?;
    info!(run_id = %run.id, name = %run.name, "Run created");
    Ok(run)
}

/// Fetch a run or fail with `NotFound`.
pub async fn get_run(pool: &DbPool, run_id: Uuid) -> AppResult<Run> {
    pool.get_run_by_id(run_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Run {}", run_id)))?
        .try_into()
}

/// Most recently started run.
pub async fn get_latest_run(pool: &DbPool) -> AppResult<Run> {
    pool.get_latest_run()
        .await?
        .ok_or_else(|| AppError::NotFound("Run".to_string()))?
        .try_into()
}

/// Runs newest first, each with the summary of its cases, plus the total run count.
pub async fn list_runs(pool: &DbPool, page: Page) -> AppResult<(Vec<RunListItem>, u64)> {
    let (models, total) = pool.list_runs(page).await?;

    let run_ids: Vec<Uuid> = models.iter().map(|r| r.id).collect();
    let mut cases_by_run = pool.get_cases_by_run_ids(&run_ids).await?;

    let items = models
        .into_iter()
        .map(|model| -> AppResult<RunListItem> {
            let cases = cases_by_run
                .remove(&model.id)
                .unwrap_or_default()
                .into_iter()
                .map(TestCase::try_from)
                .collect::<AppResult<Vec<_>>>()?;
            Ok(RunListItem {
                run: model.try_into()?,
                summary: summarize(&cases),
            })
        })
        .collect::<AppResult<Vec<_>>>()?;

    Ok((items, total))
}

/// A run's test cases, optionally filtered by status. Returns the page and
/// the number of matching cases.
pub async fn list_cases(
    pool: &DbPool,
    run_id: Uuid,
    status: Option<TestStatus>,
    page: Page,
) -> AppResult<(Vec<TestCase>, u64)> {
    // Distinguish an unknown run from a run without matching cases
    get_run(pool, run_id).await?;

    let (models, total) = pool.query_cases(run_id, status, page).await?;
    let cases = models
        .into_iter()
        .map(TestCase::try_from)
        .collect::<AppResult<Vec<_>>>()?;

    Ok((cases, total))
}

/// Summary statistics of a run's test cases.
pub async fn get_summary(pool: &DbPool, run_id: Uuid) -> AppResult<(Run, Summary)> {
    let run = get_run(pool, run_id).await?;
    let cases = pool
        .get_cases_by_run_id(run_id)
        .await?
        .into_iter()
        .map(TestCase::try_from)
        .collect::<AppResult<Vec<_>>>()?;

    Ok((run, summarize(&cases)))
}
