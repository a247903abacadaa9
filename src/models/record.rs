use serde::{Deserialize, Deserializer, Serialize};

/// Severity label attached to an issue by the analysis service.
///
/// Matching is case-insensitive. Values outside the three known tiers are
/// kept verbatim so the raw label survives a round trip, and a missing or
/// `null` value deserializes as `Unrecognized("")`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub enum Severity {
    Low,
    Medium,
    High,
    Unrecognized(String),
}

impl Severity {
    /// The display tier: unknown or missing labels fall back to `Low`.
    pub fn tier(&self) -> Severity {
        match self {
            Severity::Medium => Severity::Medium,
            Severity::High => Severity::High,
            Severity::Low | Severity::Unrecognized(_) => Severity::Low,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Severity::Low => "LOW",
            Severity::Medium => "MEDIUM",
            Severity::High => "HIGH",
            Severity::Unrecognized(raw) => raw,
        }
    }

}

impl Default for Severity {
    fn default() -> Self {
        Severity::Unrecognized(String::new())
    }
}

impl From<String> for Severity {
    fn from(raw: String) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "LOW" => Severity::Low,
            "MEDIUM" => Severity::Medium,
            "HIGH" => Severity::High,
            _ => Severity::Unrecognized(raw),
        }
    }
}

impl From<Option<String>> for Severity {
    fn from(raw: Option<String>) -> Self {
        raw.map(Severity::from).unwrap_or_default()
    }
}

impl From<Severity> for String {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Unrecognized(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A lint / static-analysis finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticIssue {
    pub line: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub col: Option<u32>,
    #[serde(default)]
    pub severity: Severity,
    #[serde(default, deserialize_with = "null_as_default")]
    pub text: String,
}

/// A security-scanner finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityIssue {
    pub line_number: u32,
    #[serde(default)]
    pub severity: Severity,
    #[serde(default, deserialize_with = "null_as_default")]
    pub issue_text: String,
}

/// One analysed file as delivered on a single NDJSON line, or as the whole
/// body of a non-streaming `/analyze` response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    /// Service-level error lines carry no filename.
    #[serde(default, deserialize_with = "null_as_default")]
    pub filename: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub static_issues: Vec<StaticIssue>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub security_issues: Vec<SecurityIssue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_feedback: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best_practices: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AnalysisRecord {
    /// The diagnostic message when this record reports a per-file failure.
    /// An empty `error` string does not count.
    pub fn diagnostic(&self) -> Option<&str> {
        self.error.as_deref().filter(|e| !e.is_empty())
    }

    pub fn is_diagnostic(&self) -> bool {
        self.diagnostic().is_some()
    }

    /// AI commentary, if present and non-empty.
    pub fn feedback(&self) -> Option<&str> {
        self.ai_feedback.as_deref().filter(|f| !f.is_empty())
    }

    pub fn practices(&self) -> &[String] {
        self.best_practices.as_deref().unwrap_or(&[])
    }
}

/// The service emits `null` for fields it has no value for.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
