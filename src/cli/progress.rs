use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::watch;

use crate::session::{SessionState, Snapshot};
use crate::utils::formatting::pluralize;

/// Spinner that follows a session's snapshots until the session ends.
pub struct SessionProgress {
    bar: ProgressBar,
}

impl SessionProgress {
    pub fn new(label: &str) -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::default_spinner()
                .template("  {spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message(format!("Connecting to {}...", label));
        bar.enable_steady_tick(Duration::from_millis(120));
        Self { bar }
    }

    /// Consumes snapshots until the sender is dropped. Only the counters
    /// are read; the report itself is never copied.
    pub async fn follow(self, mut rx: watch::Receiver<Snapshot>) {
        while rx.changed().await.is_ok() {
            let message = describe(&rx.borrow_and_update());
            self.bar.set_message(message);
        }
        self.bar.finish_and_clear();
    }
}

pub fn describe(snapshot: &Snapshot) -> String {
    let report = &snapshot.report;
    let verb = match &snapshot.state {
        SessionState::Init => "Waiting",
        SessionState::Streaming => "Analyzing",
        SessionState::Complete => "Complete",
        SessionState::Failed { .. } => "Failed",
        SessionState::Cancelled => "Cancelled",
    };
    let mut msg = format!(
        "{} | {} | {} static | {} security",
        verb,
        pluralize(snapshot.stats.files_analyzed(), "file"),
        report.static_issues.len(),
        report.security_issues.len(),
    );
    if !report.warnings.is_empty() {
        msg.push_str(&format!(" | {}", pluralize(report.warnings.len(), "warning")));
    }
    msg
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;
    use crate::models::{CumulativeReport, RecordWarning};
    use crate::session::SessionStats;

    #[test]
    fn test_describe_streaming_snapshot() {
        let mut report = CumulativeReport::new();
        report.warnings.push(RecordWarning::new("x.py", "timeout"));
        let snapshot = Snapshot {
            session_id: Uuid::nil(),
            state: SessionState::Streaming,
            report,
            stats: SessionStats { records_merged: 3, diagnostics: 1, ..Default::default() },
        };
        assert_eq!(describe(&snapshot), "Analyzing | 2 files | 0 static | 0 security | 1 warning");
    }
}
