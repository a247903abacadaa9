pub mod accumulator;
pub mod manager;
pub mod snapshot;
pub mod state;

pub use accumulator::{absorb, merge};
pub use manager::{AnalysisSession, SessionOutcome};
pub use snapshot::{Snapshot, SnapshotEmitter};
pub use state::{SessionState, SessionStats};
