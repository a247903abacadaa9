use chrono::{DateTime, Utc};

use crate::models::report::CumulativeReport;
use super::ReportCounts;

const NO_SUGGESTIONS: &str = "No AI suggestions generated.";

/// Table cells must stay on one line and must not close the cell early.
fn cell(text: &str) -> String {
    text.replace('|', "\\|").replace(['\n', '\r'], " ")
}

pub fn format_summary_markdown(counts: &ReportCounts) -> String {
    let mut out = String::from("## Summary\n\n");
    out.push_str(&format!("- **Static issues found:** {}\n", counts.static_issues));
    out.push_str(&format!("- **Security warnings:** {}\n", counts.security_issues));
    if let Some(files) = counts.files_analyzed {
        out.push_str(&format!("- **Files analyzed:** {}\n", files));
    }
    if counts.warnings > 0 {
        out.push_str(&format!("- **Files with errors:** {}\n", counts.warnings));
    }
    out
}

/// Markdown rendition of the report, for terminals and plain-text review.
pub fn format_report_markdown(report: &CumulativeReport, counts: &ReportCounts, generated_at: DateTime<Utc>) -> String {
    let mut out = String::from("# AI Code Review Report\n\n");
    out.push_str(&format!("Generated at: {}\n\n---\n\n", generated_at.format("%Y-%m-%d %H:%M:%S UTC")));
    out.push_str(&format_summary_markdown(counts));

    out.push_str("\n## Security Analysis\n\n");
    if report.security_issues.is_empty() {
        out.push_str("- No security issues found.\n");
    } else {
        out.push_str("| Severity | Issue | Line |\n|----------|-------|------|\n");
        for issue in &report.security_issues {
            out.push_str(&format!(
                "| {} | {} | {} |\n",
                super::html::tier_class(&issue.severity),
                cell(&issue.issue_text),
                issue.line_number
            ));
        }
    }

    out.push_str("\n## Static Analysis\n\n");
    if report.static_issues.is_empty() {
        out.push_str("- No static issues found.\n");
    } else {
        out.push_str("| Line | Col | Issue | Severity |\n|------|-----|-------|----------|\n");
        for issue in &report.static_issues {
            let col = issue.col.map(|c| c.to_string()).unwrap_or_else(|| "-".to_string());
            out.push_str(&format!(
                "| {} | {} | {} | {} |\n",
                issue.line,
                col,
                cell(&issue.text),
                super::html::tier_class(&issue.severity)
            ));
        }
    }

    out.push_str("\n## Best Practice Recommendations\n\n");
    if report.best_practices.is_empty() {
        out.push_str("- No best practice suggestions.\n");
    } else {
        for practice in &report.best_practices {
            out.push_str(&format!("- {}\n", practice));
        }
    }

    out.push_str("\n## AI Suggestions\n\n");
    let feedback = report.ai_feedback.trim();
    out.push_str(if feedback.is_empty() { NO_SUGGESTIONS } else { feedback });
    out.push('\n');

    if !report.warnings.is_empty() {
        out.push_str("\n## Warnings\n\n");
        for warning in &report.warnings {
            out.push_str(&format!("- {}\n", warning));
        }
    }
    out
}
