use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::info;

use crate::errors::ReviewError;
use crate::models::report::CumulativeReport;
use super::{formatter, html, ReportCounts, ReportFormat};

/// Every exported document is named `code_review_report.<ext>`.
pub const REPORT_FILE_STEM: &str = "code_review_report";

pub fn report_file_name(format: ReportFormat) -> String {
    format!("{}.{}", REPORT_FILE_STEM, format.extension())
}

/// Renders `report` in each requested format into `output_dir`, creating
/// the directory if needed. Returns the written paths in request order.
pub async fn write_reports(
    report: &CumulativeReport,
    counts: &ReportCounts,
    output_dir: &Path,
    formats: &[ReportFormat],
) -> Result<Vec<PathBuf>, ReviewError> {
    tokio::fs::create_dir_all(output_dir).await?;

    let generated_at = Utc::now();
    let mut written = Vec::with_capacity(formats.len());
    for format in formats {
        let content = match format {
            ReportFormat::Html => html::render_html_at(report, counts, generated_at)?,
            ReportFormat::Markdown => formatter::format_report_markdown(report, counts, generated_at),
            ReportFormat::Json => serde_json::to_string_pretty(report)?,
        };
        let path = output_dir.join(report_file_name(*format));
        tokio::fs::write(&path, &content).await?;
        info!(path = %path.display(), %format, "Report written");
        written.push(path);
    }
    Ok(written)
}
