use askama::Template;
use chrono::{DateTime, Utc};

use crate::errors::ReviewError;
use crate::models::record::Severity;
use crate::models::report::CumulativeReport;
use super::ReportCounts;

pub const NO_FEEDBACK_PLACEHOLDER: &str = "No specific AI feedback provided.";

/// One issue as shown in the document.
pub struct IssueView<'a> {
    /// CSS class and badge text: `LOW`, `MEDIUM` or `HIGH`.
    pub tier: &'static str,
    pub line: u32,
    pub text: &'a str,
}

#[derive(Template)]
#[template(path = "report.html")]
pub struct ReportTemplate<'a> {
    pub version: String,
    pub generated_at: String,
    pub static_count: usize,
    pub security_count: usize,
    pub files_analyzed: Option<usize>,
    pub ai_feedback: &'a str,
    pub security_issues: Vec<IssueView<'a>>,
    pub static_issues: Vec<IssueView<'a>>,
    pub best_practices: &'a [String],
    pub warnings: Vec<String>,
}

/// Three-tier display class. Missing or unknown labels render as LOW.
pub fn tier_class(severity: &Severity) -> &'static str {
    match severity.tier() {
        Severity::High => "HIGH",
        Severity::Medium => "MEDIUM",
        _ => "LOW",
    }
}

fn build_label() -> String {
    let git_hash = option_env!("REVIEWLENS_GIT_HASH").unwrap_or("dev");
    format!("{} ({})", env!("CARGO_PKG_VERSION"), git_hash)
}

/// Renders the standalone HTML document, stamped with the current time.
pub fn render_html(report: &CumulativeReport, counts: &ReportCounts) -> Result<String, ReviewError> {
    render_html_at(report, counts, Utc::now())
}

/// Same as [`render_html`] with an explicit timestamp. The output depends
/// only on its arguments.
pub fn render_html_at(
    report: &CumulativeReport,
    counts: &ReportCounts,
    generated_at: DateTime<Utc>,
) -> Result<String, ReviewError> {
    let template = ReportTemplate {
        version: build_label(),
        generated_at: generated_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        static_count: counts.static_issues,
        security_count: counts.security_issues,
        files_analyzed: counts.files_analyzed,
        ai_feedback: if report.ai_feedback.is_empty() {
            NO_FEEDBACK_PLACEHOLDER
        } else {
            &report.ai_feedback
        },
        security_issues: report
            .security_issues
            .iter()
            .map(|i| IssueView { tier: tier_class(&i.severity), line: i.line_number, text: &i.issue_text })
            .collect(),
        static_issues: report
            .static_issues
            .iter()
            .map(|i| IssueView { tier: tier_class(&i.severity), line: i.line, text: &i.text })
            .collect(),
        best_practices: report.best_practices.as_slice(),
        warnings: report.warnings.iter().map(|w| w.to_string()).collect(),
    };
    Ok(template.render()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use crate::models::record::{SecurityIssue, StaticIssue};

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap()
    }

    #[test]
    fn test_tier_class_defaults_to_low() {
        assert_eq!(tier_class(&Severity::High), "HIGH");
        assert_eq!(tier_class(&Severity::Medium), "MEDIUM");
        assert_eq!(tier_class(&Severity::Unrecognized("CRITICAL".into())), "LOW");
        assert_eq!(tier_class(&Severity::default()), "LOW");
    }

    #[test]
    fn test_empty_feedback_uses_placeholder() {
        let report = CumulativeReport::new();
        let html = render_html_at(&report, &ReportCounts::from_report(&report), fixed_time()).unwrap();
        assert!(html.contains(NO_FEEDBACK_PLACEHOLDER));
        assert!(html.contains("No security issues found."));
        assert!(html.contains("2025-03-14 09:26:53 UTC"));
    }

    #[test]
    fn test_issue_text_is_escaped() {
        let mut report = CumulativeReport::new();
        report.security_issues.push(SecurityIssue {
            line_number: 7,
            severity: Severity::High,
            issue_text: "<script>alert(1)</script>".into(),
        });
        report.static_issues.push(StaticIssue {
            line: 3,
            col: None,
            severity: Severity::Unrecognized("weird".into()),
            text: "a & b".into(),
        });
        let html = render_html_at(&report, &ReportCounts::from_report(&report), fixed_time()).unwrap();
        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("a &amp; b"));
        assert!(html.contains(r#"<div class="issue LOW">"#));
        assert!(html.contains("Line 7"));
    }
}
