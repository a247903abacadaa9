use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::{self, ReviewConfig};
use crate::errors::ReviewError;
use crate::reporting::ReportFormat;
use crate::transport::AnalysisClient;
use super::commands::{Cli, OutputArgs};

/// Settings shared by every command: file config, environment and global
/// flags, resolved in that order of increasing precedence.
pub struct Context {
    pub config: ReviewConfig,
    pub quiet: bool,
}

impl Context {
    pub async fn load(cli: &Cli) -> Result<Self, ReviewError> {
        let mut config = match &cli.config {
            Some(path) => config::parse_config(Path::new(path)).await?,
            None => ReviewConfig::default(),
        };
        config::apply_env_overrides(&mut config);
        if let Some(url) = &cli.server {
            config.server.get_or_insert_with(Default::default).base_url = Some(url.clone());
        }
        config::validate_base_url(config.base_url())?;

        Ok(Self { config, quiet: cli.quiet })
    }

    pub fn client(&self, no_rag: bool) -> Result<AnalysisClient, ReviewError> {
        AnalysisClient::new(
            self.config.base_url(),
            Duration::from_secs(self.config.connect_timeout_secs()),
            self.config.use_rag() && !no_rag,
        )
    }

    /// Output directory and formats, CLI flags first.
    pub fn output_target(&self, args: &OutputArgs) -> (PathBuf, Vec<ReportFormat>) {
        let dir = args
            .output
            .clone()
            .unwrap_or_else(|| self.config.output_dir().to_string());
        let formats = if args.formats.is_empty() {
            self.config.formats()
        } else {
            args.formats.clone()
        };
        (PathBuf::from(dir), formats)
    }
}
