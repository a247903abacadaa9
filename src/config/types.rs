use serde::{Deserialize, Serialize};

use crate::reporting::ReportFormat;
use crate::transport::DEFAULT_BASE_URL;

pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_OUTPUT_DIR: &str = "./reports";

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct ReviewConfig {
    pub server: Option<ServerConfig>,
    pub analysis: Option<AnalysisConfig>,
    pub output: Option<OutputConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct ServerConfig {
    pub base_url: Option<String>,
    /// Connection establishment only; the response body has no deadline.
    pub connect_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct AnalysisConfig {
    pub use_rag: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct OutputConfig {
    pub directory: Option<String>,
    pub formats: Option<Vec<ReportFormat>>,
}

impl ReviewConfig {
    pub fn base_url(&self) -> &str {
        self.server
            .as_ref()
            .and_then(|s| s.base_url.as_deref())
            .unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn connect_timeout_secs(&self) -> u64 {
        self.server
            .as_ref()
            .and_then(|s| s.connect_timeout_secs)
            .unwrap_or(DEFAULT_CONNECT_TIMEOUT_SECS)
    }

    pub fn use_rag(&self) -> bool {
        self.analysis.as_ref().and_then(|a| a.use_rag).unwrap_or(true)
    }

    pub fn output_dir(&self) -> &str {
        self.output
            .as_ref()
            .and_then(|o| o.directory.as_deref())
            .unwrap_or(DEFAULT_OUTPUT_DIR)
    }

    pub fn formats(&self) -> Vec<ReportFormat> {
        self.output
            .as_ref()
            .and_then(|o| o.formats.clone())
            .unwrap_or_else(|| vec![ReportFormat::Html])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_review_config_defaults() {
        let config = ReviewConfig::default();
        assert_eq!(config.base_url(), "http://localhost:8000");
        assert_eq!(config.connect_timeout_secs(), 10);
        assert!(config.use_rag());
        assert_eq!(config.output_dir(), "./reports");
        assert_eq!(config.formats(), vec![ReportFormat::Html]);
    }

    #[test]
    fn test_report_format_deserialize() {
        let parsed: Vec<ReportFormat> = serde_yaml::from_str("[html, markdown, json]").unwrap();
        assert_eq!(parsed, vec![ReportFormat::Html, ReportFormat::Markdown, ReportFormat::Json]);
    }

    #[test]
    fn test_partial_sections() {
        let config: ReviewConfig = serde_yaml::from_str("analysis:\n  use_rag: false\n").unwrap();
        assert!(!config.use_rag());
        assert!(config.server.is_none());
    }
}
