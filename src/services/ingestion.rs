//! Report ingestion pipeline.
//!
//! Turns an uploaded JUnit document into a run's test case set:
//! 1. the run must exist and still be `running`
//! 2. the bytes must be UTF-8 and well-formed XML
//! 3. at least one test case must be extracted
//! 4. cases and derived run fields are committed in one transaction

use chrono::{DateTime, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::{NewTestCase, Run, RunOutcome, RunStatus, RunSummary, TestStatus};

use super::aggregator::summarize;
use super::junit::extract_testcases;

/// Decode upload bytes, dropping a leading byte-order mark.
pub fn decode_report(raw: &[u8]) -> AppResult<&str> {
    let text = std::str::from_utf8(raw)?;
    Ok(text.strip_prefix('\u{feff}').unwrap_or(text))
}

/// Decode, parse and classify a report. Fails on an empty case set.
pub fn parse_report(raw: &[u8]) -> AppResult<Vec<NewTestCase>> {
    let text = decode_report(raw)?;
    let cases = extract_testcases(text)?;
    if cases.is_empty() {
        return Err(AppError::EmptyReport);
    }
    Ok(cases)
}

/// Derive the run fields written when a report is accepted.
///
/// The run fails if any case failed. Its duration is the sum of case times,
/// absent when that sum is zero.
pub fn derive_outcome(cases: &[NewTestCase], finished_at: DateTime<Utc>) -> RunOutcome {
    let status = if cases.iter().any(|c| c.status == TestStatus::Failed) {
        RunStatus::Failed
    } else {
        RunStatus::Passed
    };

    let total: f64 = cases.iter().filter_map(|c| c.time_s).sum();
    let duration_s = if total == 0.0 { None } else { Some(total) };

    RunOutcome {
        status,
        duration_s,
        finished_at,
    }
}

/// Check that a run exists and still accepts a report.
///
/// Callers run this before reading an upload so that a missing or finished
/// run is reported regardless of the upload's content.
pub async fn ensure_accepting(pool: &DbPool, run_id: Uuid) -> AppResult<Run> {
    let result = find_open_run(pool, run_id).await;
    if let Err(e) = &result {
        warn!(run_id = %run_id, error = %e, "Report rejected");
    }
    result
}

/// Ingest a report into a run.
pub async fn ingest_report(pool: &DbPool, run_id: Uuid, raw: &[u8]) -> AppResult<RunSummary> {
    let result = try_ingest(pool, run_id, raw).await;
    match &result {
        Ok(summary) => info!(
            run_id = %run_id,
            total = summary.total,
            failed = summary.failed,
            skipped = summary.skipped,
            status = %summary.status,
            "Report ingested"
        ),
        Err(e) => warn!(run_id = %run_id, error = %e, "Report rejected"),
    }
    result
}

async fn find_open_run(pool: &DbPool, run_id: Uuid) -> AppResult<Run> {
    let run: Run = pool
        .get_run_by_id(run_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Run {}", run_id)))?
        .try_into()?;

    if run.status.is_finished() {
        return Err(AppError::Conflict(format!(
            "Run {} already has a report. Create a new run to upload another",
            run_id
        )));
    }

    Ok(run)
}

async fn try_ingest(pool: &DbPool, run_id: Uuid, raw: &[u8]) -> AppResult<RunSummary> {
    find_open_run(pool, run_id).await?;

    let cases = parse_report(raw)?;
    let outcome = derive_outcome(&cases, Utc::now());
    let stats = summarize(&cases);

    let run: Run = pool.finish_run(run_id, &cases, &outcome).await?.try_into()?;

    Ok(RunSummary {
        run_id,
        total: stats.total,
        passed: stats.passed,
        failed: stats.failed,
        skipped: stats.skipped,
        status: run.status,
        duration_s: run.duration_s,
    })
}
