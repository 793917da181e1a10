//! Data-access boundary for run and benchmark documents
//!
//! Pages never fetch directly; they are handed a [`RunSource`]. Two sources
//! exist:
//!
//! - [`HttpRunSource`]: the auditability service over JSON/HTTP
//! - [`FixtureSource`]: a directory of JSON documents, for offline use and tests
//!
//! Legacy run document shapes are upgraded here, before typed decoding.

mod fixture;
mod http;

pub use fixture::FixtureSource;
pub use http::{HttpRunSource, HttpRunSourceBuilder};

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::models::{
    BenchmarkRecord, BenchmarkResponse, BenchmarkStatus, LogEntry, RunMetadata, RunRecord,
    upgrade_run_document,
};

/// Read access to runs and benchmarks, plus the benchmark start command
#[async_trait]
pub trait RunSource: Send + Sync {
    /// Fetch a run by id
    async fn fetch_run(&self, run_id: &str) -> Result<RunRecord>;

    /// Fetch the most recent run
    async fn fetch_latest_run(&self) -> Result<RunRecord>;

    /// List stored runs
    async fn list_runs(&self) -> Result<Vec<RunMetadata>>;

    /// Fetch the benchmark results for a run
    async fn fetch_benchmark(&self, run_id: &str) -> Result<BenchmarkRecord>;

    /// Query whether a benchmark is currently running
    async fn benchmark_status(&self) -> Result<BenchmarkStatus>;

    /// Ask the service to benchmark a run. No deduplication happens here.
    async fn start_benchmark(&self, run_id: &str) -> Result<BenchmarkResponse>;

    /// Log lines for a run's benchmark
    async fn benchmark_logs(&self, run_id: &str) -> Result<Vec<LogEntry>>;
}

/// Reject ids that are empty or would escape their path segment
pub fn validate_id(run_id: &str) -> Result<&str> {
    let trimmed = run_id.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidInput("run id must not be empty".to_string()));
    }
    if trimmed.contains(['/', '\\', '?', '#']) || trimmed == "." || trimmed == ".." {
        return Err(Error::InvalidInput(format!("invalid run id '{}'", run_id)));
    }
    Ok(trimmed)
}

/// Upgrade a run document to the canonical shape and decode it
pub(crate) fn decode_run(mut document: Value, context: &str) -> Result<RunRecord> {
    upgrade_run_document(&mut document);
    serde_json::from_value(document).map_err(|e| Error::decode(context, e))
}
