use std::path::Path;

use tracing::warn;

use crate::errors::ReviewError;
use super::types::ReviewConfig;

const MAX_CONFIG_BYTES: u64 = 1_048_576;

/// Environment override for the analysis service URL.
pub const SERVER_URL_ENV: &str = "REVIEWLENS_SERVER_URL";

pub async fn parse_config(path: &Path) -> Result<ReviewConfig, ReviewError> {
    if !path.exists() {
        return Err(ReviewError::Config(format!("Config file not found: {}", path.display())));
    }

    let metadata = tokio::fs::metadata(path).await?;
    if metadata.len() > MAX_CONFIG_BYTES {
        return Err(ReviewError::Config("Config file exceeds 1MB limit".into()));
    }

    let content = tokio::fs::read_to_string(path).await?;
    let config = parse_config_str(&content)?;
    Ok(config)
}

pub fn parse_config_str(content: &str) -> Result<ReviewConfig, ReviewError> {
    // An empty document is a valid, all-defaults config
    if content.trim().is_empty() {
        return Ok(ReviewConfig::default());
    }
    let config: ReviewConfig = serde_yaml::from_str(content)?;
    validate_config(&config)?;
    Ok(config)
}

/// Applies `REVIEWLENS_SERVER_URL` when no CLI flag overrides it.
pub fn apply_env_overrides(config: &mut ReviewConfig) {
    if let Ok(url) = std::env::var(SERVER_URL_ENV) {
        if !url.trim().is_empty() {
            config.server.get_or_insert_with(Default::default).base_url = Some(url);
        }
    }
}

/// Semantic checks serde cannot express.
pub fn validate_config(config: &ReviewConfig) -> Result<(), ReviewError> {
    if let Some(server) = &config.server {
        if let Some(url) = &server.base_url {
            validate_base_url(url)?;
        }
        if server.connect_timeout_secs == Some(0) {
            return Err(ReviewError::Config("server.connect_timeout_secs must be greater than 0".into()));
        }
    }

    if let Some(output) = &config.output {
        if let Some(formats) = &output.formats {
            if formats.is_empty() {
                return Err(ReviewError::Config("output.formats must name at least one format".into()));
            }
            let mut seen = std::collections::HashSet::new();
            for format in formats {
                if !seen.insert(format) {
                    warn!(%format, "Report format listed more than once");
                }
            }
        }
    }

    Ok(())
}

pub fn validate_base_url(url: &str) -> Result<(), ReviewError> {
    let url = url.trim();
    if url.is_empty() {
        return Err(ReviewError::Config("server.base_url must not be empty".into()));
    }
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(ReviewError::Config(format!(
            "server.base_url must be an http(s) URL, got '{}'",
            url
        )));
    }
    Ok(())
}
