//! Business logic services.

pub mod aggregator;
pub mod ingestion;
pub mod junit;
pub mod runs;

pub use aggregator::{CaseOutcome, summarize};
pub use ingestion::ingest_report;
