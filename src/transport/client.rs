use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::errors::ReviewError;
use crate::models::record::AnalysisRecord;
use crate::utils::truncation::truncate_error;
use super::source::HttpChunkSource;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

#[derive(Debug, Serialize)]
struct RepositoryRequest<'a> {
    repo_url: &'a str,
    use_rag: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct CodeRequest<'a> {
    code: &'a str,
    filename: &'a str,
    use_rag: bool,
}

#[derive(Debug, Deserialize)]
struct QueuedResponse {
    message: String,
}

/// HTTP client for the code review analysis service.
#[derive(Debug, Clone)]
pub struct AnalysisClient {
    client: Client,
    base_url: String,
    use_rag: bool,
}

impl AnalysisClient {
    pub fn new(base_url: &str, connect_timeout: Duration, use_rag: bool) -> Result<Self, ReviewError> {
        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| ReviewError::Config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            use_rag,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Prepares the streaming repository analysis. Nothing is sent until the
    /// session connects the returned source.
    pub fn stream_repository(&self, repo_url: &str) -> HttpChunkSource {
        let request = self
            .client
            .post(self.url("/analyze/github"))
            .header("accept", "application/x-ndjson")
            .json(&RepositoryRequest { repo_url, use_rag: self.use_rag, email: None });
        HttpChunkSource::new(request, &format!("POST /analyze/github ({})", repo_url))
    }

    /// Queues a repository analysis whose report the service emails to
    /// `email`. Returns the service's acknowledgement message.
    pub async fn queue_repository(&self, repo_url: &str, email: &str) -> Result<String, ReviewError> {
        let resp = self
            .client
            .post(self.url("/analyze/github"))
            .json(&RepositoryRequest { repo_url, use_rag: self.use_rag, email: Some(email) })
            .send()
            .await
            .map_err(|e| ReviewError::Transport(format!("Queue request failed: {}", e)))?;

        let resp = check_status(resp).await?;
        let queued: QueuedResponse = resp
            .json()
            .await
            .map_err(|e| ReviewError::Api(format!("Unexpected queue response: {}", e)))?;
        info!(%repo_url, "Repository analysis queued");
        Ok(queued.message)
    }

    /// Non-streaming analysis of a single source text.
    pub async fn analyze_code(&self, code: &str, filename: &str) -> Result<AnalysisRecord, ReviewError> {
        let resp = self
            .client
            .post(self.url("/analyze"))
            .json(&CodeRequest { code, filename, use_rag: self.use_rag })
            .send()
            .await
            .map_err(|e| ReviewError::Transport(format!("Analyze request failed: {}", e)))?;

        let resp = check_status(resp).await?;
        let mut record: AnalysisRecord = resp
            .json()
            .await
            .map_err(|e| ReviewError::Api(format!("Failed to parse analysis response: {}", e)))?;
        if record.filename.is_empty() {
            record.filename = filename.to_string();
        }

        debug!(
            filename,
            static_issues = record.static_issues.len(),
            security_issues = record.security_issues.len(),
            "Analysis response received"
        );
        Ok(record)
    }

    /// Liveness probe against `GET /health`.
    pub async fn health(&self) -> Result<(), ReviewError> {
        let resp = self
            .client
            .get(self.url("/health"))
            .send()
            .await
            .map_err(|e| ReviewError::Transport(format!("Health check failed: {}", e)))?;

        let data: Value = check_status(resp)
            .await?
            .json()
            .await
            .map_err(|e| ReviewError::Api(format!("Failed to parse health response: {}", e)))?;

        match data["status"].as_str() {
            Some("ok") => Ok(()),
            other => Err(ReviewError::Api(format!(
                "Service reported status {}",
                other.unwrap_or("<missing>")
            ))),
        }
    }
}

async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, ReviewError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    // FastAPI wraps failures as {"detail": "..."}
    let detail = serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|v| v["detail"].as_str().map(str::to_string))
        .unwrap_or(body);
    Err(ReviewError::Api(format!("HTTP {}: {}", status, truncate_error(&detail))))
}
