//! HTTP API test suite.
//!
//! Runs every test against a fresh in-memory SQLite database.
//!
//! Run with: cargo test --test api

mod test_helpers;

mod test_health;
mod test_queries;
mod test_runs;
