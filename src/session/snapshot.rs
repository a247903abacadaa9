use tokio::sync::watch;
use uuid::Uuid;

use crate::models::report::CumulativeReport;
use super::state::{SessionState, SessionStats};

/// Read-only view of a session at one point in time.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub session_id: Uuid,
    pub state: SessionState,
    pub report: CumulativeReport,
    pub stats: SessionStats,
}

impl Snapshot {
    pub fn initial(session_id: Uuid) -> Self {
        Self {
            session_id,
            state: SessionState::Init,
            report: CumulativeReport::new(),
            stats: SessionStats::default(),
        }
    }

    /// Whether this is the final emission of its session.
    pub fn is_final(&self) -> bool {
        self.state.is_terminal()
    }
}

/// Publishes snapshots with replace-latest semantics.
///
/// The published snapshot is the session's only copy of the report and is
/// updated in place. Emitting never waits on observers and never copies the
/// report; an observer that wants to keep a view clones it from the borrow.
/// A slow observer only sees the newest value, so intermediate snapshots may
/// be skipped but the last one always reflects the fully merged report.
#[derive(Debug)]
pub struct SnapshotEmitter {
    tx: watch::Sender<Snapshot>,
    emitted: usize,
}

impl SnapshotEmitter {
    pub fn new(initial: Snapshot) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx, emitted: 0 }
    }

    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.tx.subscribe()
    }

    /// Applies `update` to the published snapshot and wakes observers.
    /// Works with or without live receivers.
    pub fn emit_with<F>(&mut self, update: F)
    where
        F: FnOnce(&mut Snapshot),
    {
        self.tx.send_modify(update);
        self.emitted += 1;
    }

    /// The currently published snapshot. Hold the borrow briefly: emission
    /// waits for it to be released.
    pub fn current(&self) -> watch::Ref<'_, Snapshot> {
        self.tx.borrow()
    }

    pub fn emitted(&self) -> usize {
        self.emitted
    }

    pub fn observers(&self) -> usize {
        self.tx.receiver_count()
    }
}
