//! HTTP client for the auditability service
//!
//! One request per call: no retries, no caching. A non-success status is
//! reported with the response body so the page can show what the service
//! said.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::config::{ApiConfig, DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS};
use crate::error::{Error, Result};
use crate::models::{
    BenchmarkRecord, BenchmarkResponse, BenchmarkStatus, LogEntry, RunMetadata, RunRecord,
};

use super::{RunSource, decode_run, validate_id};

/// Client for the service's `/v1` JSON API
#[derive(Clone)]
pub struct HttpRunSource {
    http_client: HttpClient,
    base_url: String,
    timeout_secs: u64,
}

impl std::fmt::Debug for HttpRunSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpRunSource")
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Builder for creating an HttpRunSource
#[derive(Debug, Default)]
pub struct HttpRunSourceBuilder {
    config: Option<ApiConfig>,
    base_url: Option<String>,
    timeout_secs: Option<u64>,
}

impl HttpRunSourceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take base URL and timeout from the API config
    pub fn config(mut self, config: ApiConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the base URL, overriding the config
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the request timeout
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    pub fn build(self) -> Result<HttpRunSource> {
        let config = self.config.unwrap_or_default();
        let timeout_secs = self.timeout_secs.unwrap_or(config.timeout_secs);
        if timeout_secs == 0 {
            return Err(Error::ConfigError(
                "api.timeout_secs must be greater than 0".to_string(),
            ));
        }

        let base_url = self.base_url.unwrap_or(config.base_url);
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(Error::ConfigError(format!(
                "api.base_url must be an http(s) URL, got '{}'",
                base_url
            )));
        }

        let http_client = HttpClient::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(HttpRunSource {
            http_client,
            base_url,
            timeout_secs,
        })
    }
}

impl Default for HttpRunSource {
    fn default() -> Self {
        Self {
            http_client: HttpClient::new(),
            base_url: DEFAULT_API_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl HttpRunSource {
    pub fn builder() -> HttpRunSourceBuilder {
        HttpRunSourceBuilder::new()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Send a request and return the body of a successful response
    async fn send(&self, request: reqwest::RequestBuilder, context: &str) -> Result<String> {
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            debug!(status = status.as_u16(), context, "Service returned an error");
            return Err(Error::http(
                context,
                status.as_u16(),
                status.canonical_reason().unwrap_or_default(),
                body,
            ));
        }

        Ok(response.text().await?)
    }

    async fn get_text(&self, path: &str, context: &str) -> Result<String> {
        let url = self.url(path);
        debug!(url = %url, "GET");
        self.send(self.http_client.get(&url), context).await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, context: &str) -> Result<T> {
        let body = self.get_text(path, context).await?;
        serde_json::from_str(&body).map_err(|e| Error::decode(context, e))
    }

    async fn get_run(&self, path: &str, context: &str) -> Result<RunRecord> {
        let body = self.get_text(path, context).await?;
        let document = serde_json::from_str(&body).map_err(|e| Error::decode(context, e))?;
        decode_run(document, context)
    }
}

#[async_trait]
impl RunSource for HttpRunSource {
    async fn fetch_run(&self, run_id: &str) -> Result<RunRecord> {
        let run_id = validate_id(run_id)?;
        self.get_run(&format!("runs/{}", run_id), "run data").await
    }

    async fn fetch_latest_run(&self) -> Result<RunRecord> {
        self.get_run("runs/latest", "latest run data").await
    }

    async fn list_runs(&self) -> Result<Vec<RunMetadata>> {
        // The service answers `null` when nothing has been stored yet
        let runs: Option<Vec<RunMetadata>> = self.get_json("runs", "runs").await?;
        Ok(runs.unwrap_or_default())
    }

    async fn fetch_benchmark(&self, run_id: &str) -> Result<BenchmarkRecord> {
        let run_id = validate_id(run_id)?;
        self.get_json(&format!("benchmarks/{}", run_id), "benchmark data")
            .await
    }

    async fn benchmark_status(&self) -> Result<BenchmarkStatus> {
        self.get_json("benchmarks/status", "benchmark status").await
    }

    async fn start_benchmark(&self, run_id: &str) -> Result<BenchmarkResponse> {
        let run_id = validate_id(run_id)?;
        let url = self.url(&format!("benchmarks/create/{}", run_id));
        info!(run_id, "Starting benchmark");

        let body = self
            .send(self.http_client.post(&url), "benchmark start")
            .await?;
        serde_json::from_str(&body).map_err(|e| Error::decode("benchmark start", e))
    }

    async fn benchmark_logs(&self, run_id: &str) -> Result<Vec<LogEntry>> {
        let run_id = validate_id(run_id)?;
        let logs: Option<Vec<LogEntry>> = self
            .get_json(&format!("benchmarks/{}/logs", run_id), "benchmark logs")
            .await?;
        Ok(logs.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let source = HttpRunSource::builder().build().unwrap();
        assert_eq!(source.base_url(), "http://localhost:8080/v1");
        assert_eq!(source.timeout_secs, 30);
    }

    #[test]
    fn test_builder_overrides_config() {
        let config = ApiConfig {
            base_url: "http://config.example/v1".to_string(),
            timeout_secs: 10,
        };
        let source = HttpRunSource::builder()
            .config(config)
            .base_url("https://override.example/v1/")
            .timeout_secs(5)
            .build()
            .unwrap();

        assert_eq!(source.base_url(), "https://override.example/v1");
        assert_eq!(source.timeout_secs, 5);
        assert_eq!(source.url("runs/latest"), "https://override.example/v1/runs/latest");
    }

    #[test]
    fn test_builder_rejects_bad_config() {
        assert!(HttpRunSource::builder().timeout_secs(0).build().is_err());
        let err = HttpRunSource::builder().base_url("localhost:8080").build().unwrap_err();
        assert_eq!(err.code(), "E600");
    }

    #[test]
    fn test_debug_output() {
        let debug = format!("{:?}", HttpRunSource::default());
        assert!(debug.contains("HttpRunSource"));
        assert!(debug.contains("localhost:8080"));
    }

    #[test]
    fn test_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<HttpRunSource>();
    }

    #[tokio::test]
    async fn test_invalid_id_fails_before_request() {
        let source = HttpRunSource::builder()
            .base_url("http://127.0.0.1:9")
            .build()
            .unwrap();
        let err = source.fetch_run("a/b").await.unwrap_err();
        assert_eq!(err.code(), "E800");
    }
}
