//! Task lifecycle types.
//!
//! The remote task state machine as reported by the task service:
//!
//! ```text
//!   submit() ──→ Created ──→ Queued ──→ Running ──→ Completed
//!                               │          │
//!                               │          ├──→ Failed(reason)
//!                               │          │
//!                               └──────────┴──→ Cancelling ──→ Cancelled
//! ```
//!
//! Terminal states (`Completed`, `Failed`, `Cancelled`) are permanent.
//! Raw samples are only available once a task is `Completed`.

use serde::{Deserialize, Serialize};

/// Identifier of a remote task (an ARN for Braket).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub String);

impl TaskId {
    /// Create a new task ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for TaskId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// State of a remote task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskState {
    /// Accepted but not yet queued.
    Created,
    /// Waiting in the device queue.
    Queued,
    /// Currently executing.
    Running,
    /// Finished; raw samples can be fetched.
    Completed,
    /// Failed with a reason.
    Failed(String),
    /// Cancellation requested but not yet confirmed.
    Cancelling,
    /// Cancelled.
    Cancelled,
}

impl TaskState {
    /// Check if this is a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TaskState::Completed | TaskState::Failed(_) | TaskState::Cancelled
        )
    }

    /// Check if the task is still in flight.
    pub fn is_pending(&self) -> bool {
        matches!(
            self,
            TaskState::Created | TaskState::Queued | TaskState::Running | TaskState::Cancelling
        )
    }

    /// Check if the task completed successfully.
    pub fn is_success(&self) -> bool {
        matches!(self, TaskState::Completed)
    }
}

impl std::fmt::Display for TaskState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskState::Created => write!(f, "Created"),
            TaskState::Queued => write!(f, "Queued"),
            TaskState::Running => write!(f, "Running"),
            TaskState::Completed => write!(f, "Completed"),
            TaskState::Failed(msg) => write!(f, "Failed: {msg}"),
            TaskState::Cancelling => write!(f, "Cancelling"),
            TaskState::Cancelled => write!(f, "Cancelled"),
        }
    }
}

/// A program ready to be handed to a task service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRequest {
    /// Device identifier (ARN or local simulator name).
    pub device: String,
    /// OpenQASM 3 source.
    pub source: String,
    /// Number of shots.
    pub shots: usize,
}

impl TaskRequest {
    pub fn new(device: impl Into<String>, source: impl Into<String>, shots: usize) -> Self {
        Self {
            device: device.into(),
            source: source.into(),
            shots,
        }
    }
}

/// Handle to a submitted remote task.
///
/// Holds enough to re-attach to the task from another process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskHandle {
    pub id: TaskId,
    /// Region the task was created in, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

impl TaskHandle {
    pub fn new(id: impl Into<TaskId>) -> Self {
        Self {
            id: id.into(),
            region: None,
        }
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }
}

/// Handles of a batch submission, in submission order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BatchHandle {
    pub tasks: Vec<TaskHandle>,
}

impl BatchHandle {
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

/// Raw per-shot samples of a completed task: rows are shots, columns are
/// measured bits. Values other than zero count as a measured one.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawSamples(pub Vec<Vec<u8>>);

impl RawSamples {
    /// Number of shots.
    pub fn shots(&self) -> usize {
        self.0.len()
    }

    /// Width of the widest row.
    pub fn width(&self) -> usize {
        self.0.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Threshold every sample to a boolean.
    pub fn to_bool_rows(&self) -> Vec<Vec<bool>> {
        self.0
            .iter()
            .map(|row| row.iter().map(|&v| v > 0).collect())
            .collect()
    }
}

impl From<Vec<Vec<u8>>> for RawSamples {
    fn from(rows: Vec<Vec<u8>>) -> Self {
        Self(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_classification() {
        assert!(TaskState::Completed.is_terminal());
        assert!(TaskState::Failed("x".into()).is_terminal());
        assert!(TaskState::Cancelled.is_terminal());
        assert!(!TaskState::Cancelling.is_terminal());
        assert!(TaskState::Cancelling.is_pending());
        assert!(TaskState::Created.is_pending());
        assert!(TaskState::Completed.is_success());
        assert!(!TaskState::Running.is_success());
    }

    #[test]
    fn test_state_display() {
        assert_eq!(TaskState::Failed("boom".into()).to_string(), "Failed: boom");
        assert_eq!(TaskState::Queued.to_string(), "Queued");
    }

    #[test]
    fn test_handle_serializes_region_only_when_set() {
        let bare = serde_json::to_string(&TaskHandle::new("arn:1")).unwrap();
        assert_eq!(bare, r#"{"id":"arn:1"}"#);
        let with = TaskHandle::new("arn:1").with_region("us-east-1");
        let json = serde_json::to_string(&with).unwrap();
        let back: TaskHandle = serde_json::from_str(&json).unwrap();
        assert_eq!(back, with);
    }

    #[test]
    fn test_threshold() {
        let raw = RawSamples(vec![vec![0, 1, 2], vec![1, 0, 0]]);
        assert_eq!(
            raw.to_bool_rows(),
            vec![vec![false, true, true], vec![true, false, false]]
        );
        assert_eq!(raw.shots(), 2);
        assert_eq!(raw.width(), 3);
    }
}
