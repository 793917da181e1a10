//! Directory-backed run source
//!
//! Layout, relative to the root directory:
//!
//! ```text
//! runs/<id>.json              runs/latest.json       runs/index.json
//! benchmarks/<id>.json        benchmarks/status.json benchmarks/<id>.logs.json
//! ```

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::models::{
    BenchmarkRecord, BenchmarkResponse, BenchmarkStatus, LogEntry, RunMetadata, RunRecord,
};

use super::{RunSource, decode_run, validate_id};

/// Reads JSON documents from a directory tree. Start requests are recorded
/// in memory and never touch the files.
#[derive(Debug)]
pub struct FixtureSource {
    root: PathBuf,
    started: Mutex<Vec<String>>,
}

impl FixtureSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            started: Mutex::new(Vec::new()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Run ids passed to `start_benchmark`, in call order
    pub fn started(&self) -> Vec<String> {
        self.started
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    async fn read(&self, relative: &str, context: &str) -> Result<String> {
        let path = self.root.join(relative);
        debug!(path = %path.display(), "Reading fixture");
        match tokio::fs::read_to_string(&path).await {
            Ok(body) => Ok(body),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(Error::NotFound(format!("{} ({})", context, relative)))
            }
            Err(e) => Err(Error::Io(e)),
        }
    }

    async fn read_json<T: DeserializeOwned>(&self, relative: &str, context: &str) -> Result<T> {
        let body = self.read(relative, context).await?;
        serde_json::from_str(&body).map_err(|e| Error::decode(context, e))
    }

    async fn read_run(&self, relative: &str, context: &str) -> Result<RunRecord> {
        let document: Value = self.read_json(relative, context).await?;
        decode_run(document, context)
    }
}

#[async_trait]
impl RunSource for FixtureSource {
    async fn fetch_run(&self, run_id: &str) -> Result<RunRecord> {
        let run_id = validate_id(run_id)?;
        self.read_run(&format!("runs/{}.json", run_id), "run data")
            .await
    }

    async fn fetch_latest_run(&self) -> Result<RunRecord> {
        self.read_run("runs/latest.json", "latest run data").await
    }

    async fn list_runs(&self) -> Result<Vec<RunMetadata>> {
        let runs: Option<Vec<RunMetadata>> = self.read_json("runs/index.json", "runs").await?;
        Ok(runs.unwrap_or_default())
    }

    async fn fetch_benchmark(&self, run_id: &str) -> Result<BenchmarkRecord> {
        let run_id = validate_id(run_id)?;
        self.read_json(&format!("benchmarks/{}.json", run_id), "benchmark data")
            .await
    }

    async fn benchmark_status(&self) -> Result<BenchmarkStatus> {
        self.read_json("benchmarks/status.json", "benchmark status")
            .await
    }

    async fn start_benchmark(&self, run_id: &str) -> Result<BenchmarkResponse> {
        let run_id = validate_id(run_id)?.to_string();
        info!(run_id = %run_id, "Recording fixture benchmark start");
        self.started
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(run_id.clone());

        Ok(BenchmarkResponse {
            message: format!("Benchmark queued for run {}", run_id),
            id: run_id,
            status: "queued".to_string(),
            estimated_completion_time: None,
        })
    }

    async fn benchmark_logs(&self, run_id: &str) -> Result<Vec<LogEntry>> {
        let run_id = validate_id(run_id)?;
        let logs: Option<Vec<LogEntry>> = self
            .read_json(&format!("benchmarks/{}.logs.json", run_id), "benchmark logs")
            .await?;
        Ok(logs.unwrap_or_default())
    }
}
