use std::time::Instant;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};
use uuid::Uuid;

use crate::errors::ReviewError;
use crate::models::report::CumulativeReport;
use crate::reporting::ReportCounts;
use crate::stream::{parse_record, LineSplitter, ParsedRecord};
use crate::transport::ChunkSource;
use super::accumulator;
use super::snapshot::{Snapshot, SnapshotEmitter};
use super::state::{SessionState, SessionStats};

/// Drives split → parse → merge → emit for every chunk the transport
/// delivers. The cumulative report lives in the published snapshot and is
/// merged into in place.
///
/// A session runs once. Start a new one to analyse again; sessions never
/// share or resume state.
pub struct AnalysisSession {
    id: Uuid,
    state: SessionState,
    splitter: LineSplitter,
    stats: SessionStats,
    emitter: SnapshotEmitter,
    cancel_token: CancellationToken,
}

/// Terminal result of a session. The report is whatever was merged before
/// the session ended, including after a failure or cancellation.
#[derive(Debug, Clone)]
pub struct SessionOutcome {
    pub session_id: Uuid,
    pub state: SessionState,
    pub report: CumulativeReport,
    pub stats: SessionStats,
    pub elapsed_ms: u64,
}

impl SessionOutcome {
    pub fn is_complete(&self) -> bool {
        self.state == SessionState::Complete
    }

    pub fn counts(&self) -> ReportCounts {
        ReportCounts::from_report(&self.report).with_files(self.stats.files_analyzed())
    }
}

impl AnalysisSession {
    pub fn new() -> Self {
        let id = Uuid::new_v4();
        Self {
            id,
            state: SessionState::Init,
            splitter: LineSplitter::new(),
            stats: SessionStats::default(),
            emitter: SnapshotEmitter::new(Snapshot::initial(id)),
            cancel_token: CancellationToken::new(),
        }
    }

    /// Use an external token so the caller can cancel the running session.
    pub fn with_cancel_token(mut self, token: CancellationToken) -> Self {
        self.cancel_token = token;
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel_token.clone()
    }

    /// Live snapshots. Intermediate values may be skipped by a slow reader;
    /// the last value is always the terminal one.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.emitter.subscribe()
    }

    /// Runs the session to a terminal state. The source is dropped, and
    /// with it the underlying connection, before this returns.
    pub async fn run<S: ChunkSource>(mut self, mut source: S) -> SessionOutcome {
        let started = Instant::now();
        let cancel = self.cancel_token.clone();
        info!(session_id = %self.id, source = %source.describe(), "Analysis session started");

        let connected = tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            result = source.connect() => Some(result),
        };
        match connected {
            None => return self.cancelled(source, started),
            Some(Err(e)) => return self.failed(e, source, started),
            Some(Ok(())) => {}
        }
        self.state = SessionState::Streaming;

        loop {
            let next = tokio::select! {
                biased;
                _ = cancel.cancelled() => None,
                result = source.next_chunk() => Some(result),
            };
            match next {
                None => return self.cancelled(source, started),
                Some(Err(e)) => return self.failed(e, source, started),
                Some(Ok(None)) => break,
                Some(Ok(Some(chunk))) => {
                    if !self.ingest_chunk(&chunk) {
                        return self.cancelled(source, started);
                    }
                }
            }
        }

        let splitter = std::mem::take(&mut self.splitter);
        if let Some(line) = splitter.finish() {
            self.stats.lines += 1;
            merge_line(self.id, &mut self.emitter, &mut self.stats, &line);
        }

        self.state = SessionState::Complete;
        self.emit_state();
        let (static_issues, security_issues) = {
            let current = self.emitter.current();
            (current.report.static_issues.len(), current.report.security_issues.len())
        };
        info!(
            session_id = %self.id,
            records = self.stats.records_merged,
            diagnostics = self.stats.diagnostics,
            parse_failures = self.stats.parse_failures,
            static_issues,
            security_issues,
            "Analysis session complete"
        );
        self.into_outcome(source, started)
    }

    /// Processes every complete line in `chunk`. Returns false if the
    /// session was cancelled part-way through.
    fn ingest_chunk(&mut self, chunk: &[u8]) -> bool {
        self.stats.chunks += 1;
        self.stats.bytes += chunk.len();
        trace!(session_id = %self.id, len = chunk.len(), pending = self.splitter.pending(), "Chunk received");

        for line in self.splitter.push(chunk) {
            if self.cancel_token.is_cancelled() {
                return false;
            }
            self.stats.lines += 1;
            merge_line(self.id, &mut self.emitter, &mut self.stats, &line);
        }
        true
    }

    /// Publishes the current state and counters without touching the report.
    fn emit_state(&mut self) {
        let state = self.state.clone();
        let stats = self.stats;
        self.emitter.emit_with(|snapshot| {
            snapshot.state = state;
            snapshot.stats = stats;
        });
    }

    fn failed<S: ChunkSource>(mut self, error: ReviewError, source: S, started: Instant) -> SessionOutcome {
        let dropped = self.splitter.discard();
        warn!(
            session_id = %self.id,
            error = %error,
            records = self.stats.records_merged,
            dropped_bytes = dropped,
            "Analysis session failed, keeping partial report"
        );
        let error = match error {
            ReviewError::Transport(msg) => msg,
            other => other.to_string(),
        };
        self.state = SessionState::Failed { error };
        self.emit_state();
        self.into_outcome(source, started)
    }

    fn cancelled<S: ChunkSource>(mut self, source: S, started: Instant) -> SessionOutcome {
        info!(session_id = %self.id, records = self.stats.records_merged, "Analysis session cancelled");
        self.state = SessionState::Cancelled;
        self.into_outcome(source, started)
    }

    fn into_outcome<S: ChunkSource>(self, source: S, started: Instant) -> SessionOutcome {
        drop(source);
        debug!(session_id = %self.id, snapshots = self.emitter.emitted(), "Transport released");
        // Observers keep reading the published snapshot after the session
        // ends, so the outcome takes its own copy.
        let report = self.emitter.current().report.clone();
        SessionOutcome {
            session_id: self.id,
            state: self.state,
            report,
            stats: self.stats,
            elapsed_ms: started.elapsed().as_millis() as u64,
        }
    }
}

impl Default for AnalysisSession {
    fn default() -> Self {
        Self::new()
    }
}

/// Parses one line and folds it into the published report, emitting one
/// snapshot per merged record. Malformed lines are counted and skipped.
fn merge_line(session_id: Uuid, emitter: &mut SnapshotEmitter, stats: &mut SessionStats, line: &str) {
    let parsed = match parse_record(line, stats.lines) {
        Ok(parsed) => parsed,
        Err(e) => {
            stats.parse_failures += 1;
            warn!(%session_id, line_no = e.line_no, error = %e, "Skipping malformed record");
            return;
        }
    };

    if let ParsedRecord::Diagnostic(record) = &parsed {
        stats.diagnostics += 1;
        warn!(
            %session_id,
            filename = %record.filename,
            error = record.diagnostic().unwrap_or_default(),
            "Service reported a per-file failure"
        );
    }

    stats.records_merged += 1;
    let counters = *stats;
    emitter.emit_with(|snapshot| {
        accumulator::absorb(&mut snapshot.report, parsed.record());
        snapshot.state = SessionState::Streaming;
        snapshot.stats = counters;
    });
    trace!(%session_id, filename = %parsed.record().filename, records = stats.records_merged, "Record merged");
}
