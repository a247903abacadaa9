pub mod assembler;
pub mod formatter;
pub mod html;

use serde::{Deserialize, Serialize};

use crate::models::report::CumulativeReport;

pub use assembler::{report_file_name, write_reports, REPORT_FILE_STEM};
pub use formatter::format_report_markdown;
pub use html::{render_html, render_html_at};

/// Headline numbers embedded in a rendered report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportCounts {
    pub static_issues: usize,
    pub security_issues: usize,
    /// Known only when the report came out of a streaming session.
    pub files_analyzed: Option<usize>,
    pub warnings: usize,
}

impl ReportCounts {
    pub fn from_report(report: &CumulativeReport) -> Self {
        Self {
            static_issues: report.static_issues.len(),
            security_issues: report.security_issues.len(),
            files_analyzed: None,
            warnings: report.warnings.len(),
        }
    }

    pub fn with_files(mut self, files: usize) -> Self {
        self.files_analyzed = Some(files);
        self
    }
}

/// Output document kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    Html,
    Markdown,
    Json,
}

impl ReportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Markdown => "md",
            Self::Json => "json",
        }
    }
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Html => f.write_str("html"),
            Self::Markdown => f.write_str("markdown"),
            Self::Json => f.write_str("json"),
        }
    }
}
