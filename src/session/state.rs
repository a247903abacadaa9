use serde::{Deserialize, Serialize};

/// Lifecycle of one streaming session.
///
/// `Init → Streaming → {Complete | Failed | Cancelled}`. A session that
/// fails to connect goes straight from `Init` to `Failed`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "status")]
pub enum SessionState {
    Init,
    Streaming,
    Complete,
    Failed { error: String },
    Cancelled,
}

impl SessionState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete | Self::Failed { .. } | Self::Cancelled)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Streaming => "streaming",
            Self::Complete => "complete",
            Self::Failed { .. } => "failed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Failed { error } => write!(f, "failed: {}", error),
            other => f.write_str(other.as_str()),
        }
    }
}

/// Counters kept by the session controller for diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    pub chunks: usize,
    pub bytes: usize,
    pub lines: usize,
    /// Records folded into the report, diagnostics included.
    pub records_merged: usize,
    pub diagnostics: usize,
    pub parse_failures: usize,
}

impl SessionStats {
    /// Records that carried findings rather than a diagnostic.
    pub fn files_analyzed(&self) -> usize {
        self.records_merged - self.diagnostics
    }
}
