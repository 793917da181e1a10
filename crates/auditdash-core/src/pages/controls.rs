//! Start-benchmark control
//!
//! The service does not deduplicate start requests. The control disables
//! itself while the status is unknown, while a start is in flight, and once
//! a benchmark is known to be running.

use serde::Serialize;
use tracing::{info, warn};

use crate::client::RunSource;
use crate::error::{Error, Result};
use crate::models::{BenchmarkResponse, BenchmarkStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkControls {
    loading: bool,
    is_running: bool,
}

impl Default for BenchmarkControls {
    fn default() -> Self {
        Self {
            loading: true,
            is_running: false,
        }
    }
}

impl BenchmarkControls {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_running(&self) -> bool {
        self.is_running
    }

    /// Apply the result of a status query. A failed query leaves the running
    /// flag as it was.
    pub fn status_loaded<E>(&mut self, status: std::result::Result<BenchmarkStatus, E>) {
        if let Ok(status) = status {
            self.is_running = status.is_running;
        }
        self.loading = false;
    }

    pub fn can_start(&self) -> bool {
        !self.loading && !self.is_running
    }

    /// Enter the in-flight state. Returns false, changing nothing, when a
    /// start is not allowed.
    pub fn begin_start(&mut self) -> bool {
        if !self.can_start() {
            return false;
        }
        self.loading = true;
        true
    }

    pub fn start_finished(&mut self, succeeded: bool) {
        if succeeded {
            self.is_running = true;
        }
        self.loading = false;
    }

    pub fn label(&self) -> &'static str {
        if self.is_running {
            "Benchmark Running..."
        } else if self.loading {
            "Checking..."
        } else {
            "Start Benchmark"
        }
    }

    /// Query the service and apply the result
    pub async fn refresh(&mut self, source: &dyn RunSource) {
        let status = source.benchmark_status().await;
        if let Err(e) = &status {
            warn!(error = %e, "Failed to check benchmark status");
        }
        self.status_loaded(status);
    }

    /// Start a benchmark through the guard
    pub async fn start(
        &mut self,
        source: &dyn RunSource,
        run_id: &str,
    ) -> Result<BenchmarkResponse> {
        if !self.begin_start() {
            return Err(Error::InvalidInput(format!(
                "cannot start a benchmark for run {}: {}",
                run_id,
                self.label()
            )));
        }

        let result = source.start_benchmark(run_id).await;
        self.start_finished(result.is_ok());
        if result.is_ok() {
            info!(run_id, "Benchmark started");
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state_is_checking() {
        let controls = BenchmarkControls::new();
        assert!(controls.is_loading());
        assert!(!controls.can_start());
        assert_eq!(controls.label(), "Checking...");
    }

    #[test]
    fn test_status_loaded() {
        let mut controls = BenchmarkControls::new();
        controls.status_loaded::<()>(Ok(BenchmarkStatus { is_running: false }));
        assert!(controls.can_start());
        assert_eq!(controls.label(), "Start Benchmark");

        let mut running = BenchmarkControls::new();
        running.status_loaded::<()>(Ok(BenchmarkStatus { is_running: true }));
        assert!(!running.can_start());
        assert_eq!(running.label(), "Benchmark Running...");
    }

    #[test]
    fn test_failed_status_query_still_enables() {
        let mut controls = BenchmarkControls::new();
        controls.status_loaded::<&str>(Err("connection refused"));
        assert!(!controls.is_running());
        assert!(controls.can_start());
    }

    #[test]
    fn test_start_cycle() {
        let mut controls = BenchmarkControls::new();
        controls.status_loaded::<()>(Ok(BenchmarkStatus::default()));

        assert!(controls.begin_start());
        assert_eq!(controls.label(), "Checking...");
        assert!(!controls.begin_start());

        controls.start_finished(true);
        assert!(controls.is_running());
        assert!(!controls.can_start());
    }

    #[test]
    fn test_failed_start_reenables() {
        let mut controls = BenchmarkControls::new();
        controls.status_loaded::<()>(Ok(BenchmarkStatus::default()));
        assert!(controls.begin_start());
        controls.start_finished(false);
        assert!(controls.can_start());
    }
}
