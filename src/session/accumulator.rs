use crate::models::record::AnalysisRecord;
use crate::models::report::{CumulativeReport, RecordWarning};

/// Folds one record into the report and returns the result.
///
/// Deterministic: replaying the same records in the same order always
/// rebuilds the same report. Issues are appended in arrival order and are
/// never sorted, deduplicated or ranked.
pub fn merge(mut report: CumulativeReport, record: &AnalysisRecord) -> CumulativeReport {
    absorb(&mut report, record);
    report
}

/// In-place form of [`merge`], used by the session that owns the report.
pub fn absorb(report: &mut CumulativeReport, record: &AnalysisRecord) {
    if let Some(message) = record.diagnostic() {
        report.warnings.push(RecordWarning::new(&record.filename, message));
        return;
    }

    report.static_issues.extend(record.static_issues.iter().cloned());
    report.security_issues.extend(record.security_issues.iter().cloned());

    // Every block is prefixed with the delimiter, including the first one,
    // so the accumulated text starts with a blank line.
    if let Some(feedback) = record.feedback() {
        report.ai_feedback.push_str("\n\n### ");
        report.ai_feedback.push_str(&record.filename);
        report.ai_feedback.push('\n');
        report.ai_feedback.push_str(feedback);
    }

    for practice in record.practices() {
        report.best_practices.insert(practice);
    }
}
