//! Summary statistics over test case collections.

use crate::models::{NewTestCase, Summary, TestCase, TestStatus};

/// The parts of a test case that statistics are computed from.
pub trait CaseOutcome {
    fn status(&self) -> TestStatus;
    fn time_s(&self) -> Option<f64>;
}

impl CaseOutcome for TestCase {
    fn status(&self) -> TestStatus {
        self.status
    }

    fn time_s(&self) -> Option<f64> {
        self.time_s
    }
}

impl CaseOutcome for NewTestCase {
    fn status(&self) -> TestStatus {
        self.status
    }

    fn time_s(&self) -> Option<f64> {
        self.time_s
    }
}

/// Compute summary statistics.
///
/// `passed` is derived as `total - failed - skipped` so the three counts
/// always add up to `total`. Rate and duration are null for an empty
/// collection.
pub fn summarize<'a, C, I>(cases: I) -> Summary
where
    C: CaseOutcome + 'a,
    I: IntoIterator<Item = &'a C>,
{
    let mut total = 0u64;
    let mut failed = 0u64;
    let mut skipped = 0u64;
    let mut duration = 0.0f64;

    for case in cases {
        total += 1;
        match case.status() {
            TestStatus::Failed => failed += 1,
            TestStatus::Skipped => skipped += 1,
            TestStatus::Passed => {}
        }
        duration += case.time_s().unwrap_or(0.0);
    }

    let passed = total - failed - skipped;

    if total == 0 {
        return Summary {
            total,
            passed,
            failed,
            skipped,
            pass_rate: None,
            duration_s: None,
        };
    }

    Summary {
        total,
        passed,
        failed,
        skipped,
        pass_rate: Some(round2(passed as f64 / total as f64 * 100.0)),
        duration_s: Some(duration),
    }
}

/// Round to two decimals, ties to even.
fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}
