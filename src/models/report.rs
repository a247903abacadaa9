use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use super::record::{AnalysisRecord, SecurityIssue, StaticIssue};

/// Insertion-ordered set of advisory strings. Serialized as a plain list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct BestPractices {
    items: Vec<String>,
    seen: HashSet<String>,
}

impl BestPractices {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `item` unless an identical string is already present.
    /// Returns whether it was added.
    pub fn insert(&mut self, item: &str) -> bool {
        if self.seen.contains(item) {
            return false;
        }
        self.seen.insert(item.to_string());
        self.items.push(item.to_string());
        true
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.items
    }
}

impl From<Vec<String>> for BestPractices {
    fn from(items: Vec<String>) -> Self {
        let mut set = BestPractices::new();
        for item in &items {
            set.insert(item);
        }
        set
    }
}

impl From<BestPractices> for Vec<String> {
    fn from(set: BestPractices) -> Self {
        set.items
    }
}

impl<'a> IntoIterator for &'a BestPractices {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// A per-file failure reported by the service instead of findings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordWarning {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub filename: String,
    pub message: String,
}

impl RecordWarning {
    pub fn new(filename: &str, message: &str) -> Self {
        Self {
            filename: filename.to_string(),
            message: message.to_string(),
        }
    }
}

impl std::fmt::Display for RecordWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.filename.is_empty() {
            f.write_str(&self.message)
        } else {
            write!(f, "{}: {}", self.filename, self.message)
        }
    }
}

/// The running merge of every record processed in one session.
///
/// Only `session::accumulator` mutates it; every field is append-only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CumulativeReport {
    pub static_issues: Vec<StaticIssue>,
    pub security_issues: Vec<SecurityIssue>,
    pub ai_feedback: String,
    pub best_practices: BestPractices,
    #[serde(default)]
    pub warnings: Vec<RecordWarning>,
}

impl CumulativeReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the report for the non-streaming mode, where the service
    /// returns exactly one record for the whole input.
    ///
    /// Feedback is taken verbatim: a single record needs no per-file heading.
    pub fn from_single_record(record: AnalysisRecord) -> Self {
        let mut report = Self::new();
        if let Some(message) = record.diagnostic() {
            report.warnings.push(RecordWarning::new(&record.filename, message));
            return report;
        }
        for practice in record.practices() {
            report.best_practices.insert(practice);
        }
        report.ai_feedback = record.ai_feedback.unwrap_or_default();
        report.static_issues = record.static_issues;
        report.security_issues = record.security_issues;
        report
    }

    pub fn total_issues(&self) -> usize {
        self.static_issues.len() + self.security_issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.static_issues.is_empty()
            && self.security_issues.is_empty()
            && self.ai_feedback.is_empty()
            && self.best_practices.is_empty()
            && self.warnings.is_empty()
    }
}
