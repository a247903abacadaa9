use thiserror::Error;

use crate::models::record::AnalysisRecord;

const EXCERPT_LEN: usize = 80;

/// A line that could not be decoded as an `AnalysisRecord`.
///
/// Recoverable: the line is skipped and the session keeps going.
#[derive(Debug, Error)]
#[error("line {line_no} is not a valid analysis record ({source}): {excerpt}")]
pub struct RecordParseError {
    pub line_no: usize,
    pub excerpt: String,
    #[source]
    pub source: serde_json::Error,
}

/// Outcome of decoding one well-formed line.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedRecord {
    /// A record carrying findings.
    Findings(AnalysisRecord),
    /// A record whose `error` field reports a per-file failure. It still
    /// goes through the accumulator but only ever produces a warning.
    Diagnostic(AnalysisRecord),
}

impl ParsedRecord {
    pub fn record(&self) -> &AnalysisRecord {
        match self {
            ParsedRecord::Findings(r) | ParsedRecord::Diagnostic(r) => r,
        }
    }

    pub fn into_record(self) -> AnalysisRecord {
        match self {
            ParsedRecord::Findings(r) | ParsedRecord::Diagnostic(r) => r,
        }
    }

    pub fn is_diagnostic(&self) -> bool {
        matches!(self, ParsedRecord::Diagnostic(_))
    }
}

/// Decodes one line. `line_no` is 1-based and only used for reporting.
pub fn parse_record(line: &str, line_no: usize) -> Result<ParsedRecord, RecordParseError> {
    let record: AnalysisRecord = serde_json::from_str(line).map_err(|source| RecordParseError {
        line_no,
        excerpt: excerpt(line),
        source,
    })?;

    if record.is_diagnostic() {
        Ok(ParsedRecord::Diagnostic(record))
    } else {
        Ok(ParsedRecord::Findings(record))
    }
}

fn excerpt(line: &str) -> String {
    let trimmed = line.trim();
    match trimmed.char_indices().nth(EXCERPT_LEN) {
        Some((cut, _)) => format!("{}...", &trimmed[..cut]),
        None => trimmed.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::record::Severity;

    #[test]
    fn test_parse_findings_record() {
        let line = r#"{"filename":"a.py","static_issues":[{"line":1,"col":0,"severity":"LOW","text":"x"}],"security_issues":[],"ai_feedback":"ok","best_practices":["p"]}"#;
        let parsed = parse_record(line, 1).unwrap();
        assert!(!parsed.is_diagnostic());
        assert_eq!(parsed.record().filename, "a.py");
        assert_eq!(parsed.record().static_issues.len(), 1);
    }

    #[test]
    fn test_parse_diagnostic_record() {
        let parsed = parse_record(r#"{"error": "Error analyzing b.py: boom"}"#, 2).unwrap();
        assert!(parsed.is_diagnostic());
    }

    #[test]
    fn test_null_severity_keeps_whole_record() {
        let line = r#"{"filename":"a.py","static_issues":[{"line":1,"severity":null,"text":"x"},{"line":2,"severity":"HIGH","text":"y"}],"security_issues":null,"ai_feedback":"keep me"}"#;
        let parsed = parse_record(line, 1).unwrap();
        let record = parsed.record();
        assert_eq!(record.static_issues.len(), 2);
        assert_eq!(record.static_issues[0].severity.tier(), Severity::Low);
        assert_eq!(record.static_issues[1].severity, Severity::High);
        assert!(record.security_issues.is_empty());
        assert_eq!(record.feedback(), Some("keep me"));
    }

    #[test]
    fn test_malformed_json_is_isolated() {
        let err = parse_record(r#"{"filename": "a.py", "static_issues": ["#, 7).unwrap_err();
        assert_eq!(err.line_no, 7);
        assert!(err.to_string().contains("line 7"));
    }

    #[test]
    fn test_schema_mismatch_is_parse_error() {
        assert!(parse_record(r#"{"filename": 42}"#, 1).is_err());
        assert!(parse_record(r#"[1, 2, 3]"#, 1).is_err());
        assert!(parse_record(r#"{"static_issues": [{"severity": "LOW"}]}"#, 1).is_err());
    }

    #[test]
    fn test_excerpt_is_truncated_on_char_boundary() {
        let long = "\u{e9}".repeat(200);
        let err = parse_record(&long, 1).unwrap_err();
        assert!(err.excerpt.ends_with("..."));
        assert_eq!(err.excerpt.chars().count(), EXCERPT_LEN + 3);
    }
}
