//! Queued execution: submit now, fetch later.
//!
//! ```text
//!   submit ──→ PENDING ──poll()──→ RESOLVED
//!                 │
//!                 ├──poll()──→ FAILED     (RemoteJobFailed)
//!                 └──poll()──→ CANCELLED  (RemoteJobCancelled)
//! ```
//!
//! A [`QueuedCircuitRun`] is one submitted circuit; a [`QueuedProgramRun`]
//! aggregates the runs of a measurement program. Both are driven by the
//! caller: nothing polls in the background. Both serialize to a JSON
//! snapshot from which polling can resume in another process.

mod circuit;
mod program;

pub use circuit::{QueuedCircuitRecord, QueuedCircuitRun, RunKind, TaskRef};
pub use program::{ProgramOutcome, QueuedProgramRecord, QueuedProgramRun};

use std::time::Duration;

/// Bounded poll loop settings for the `wait` conveniences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Pause between two polls.
    pub interval: Duration,
    /// Polls before giving up with `PollTimeout`.
    pub max_polls: usize,
}

impl PollPolicy {
    pub fn new(interval: Duration, max_polls: usize) -> Self {
        Self {
            interval,
            max_polls,
        }
    }
}

impl Default for PollPolicy {
    /// 500ms between polls, for up to 5 minutes.
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(500),
            max_polls: 600,
        }
    }
}
