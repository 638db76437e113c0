//! ReportHub server library.
//!
//! Collects JUnit XML reports into test runs and serves their results:
//! database access, report ingestion, and the HTTP API.

pub mod api;
pub mod config;
pub mod db;
pub mod entity;
pub mod error;
pub mod middleware;
pub mod migration;
pub mod models;
pub mod services;
