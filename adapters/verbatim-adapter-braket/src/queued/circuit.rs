//! Queued run of a single circuit.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use verbatim_hal::{Registers, TaskHandle, TaskService, TaskState};

use super::PollPolicy;
use crate::assemble::assemble;
use crate::error::{BraketError, BraketResult};
use crate::planner::CircuitMetadata;

/// Where a circuit runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskRef {
    /// In-process execution; the result exists from the start.
    Local { id: String },
    /// A task on the remote service.
    Remote(TaskHandle),
}

/// Serialized form of [`TaskRef`]'s variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunKind {
    Local,
    Remote,
}

/// Snapshot of a [`QueuedCircuitRun`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueuedCircuitRecord {
    pub kind: RunKind,
    #[serde(default)]
    pub task_identity: Option<String>,
    #[serde(default)]
    pub region_or_locator: Option<String>,
    pub metadata: CircuitMetadata,
    #[serde(default)]
    pub resolved_results: Option<Registers>,
}

/// A submitted circuit whose registers may not be available yet.
///
/// Resolves at most once. After the first successful poll the registers are
/// cached and every later poll returns them without touching the service.
#[derive(Debug, Clone, PartialEq)]
pub struct QueuedCircuitRun {
    task: TaskRef,
    metadata: CircuitMetadata,
    results: Option<Registers>,
}

impl QueuedCircuitRun {
    /// Pending run of a remote task.
    pub fn remote(handle: TaskHandle, metadata: CircuitMetadata) -> Self {
        Self {
            task: TaskRef::Remote(handle),
            metadata,
            results: None,
        }
    }

    /// Run that already executed locally.
    pub fn local(id: impl Into<String>, metadata: CircuitMetadata, results: Registers) -> Self {
        Self {
            task: TaskRef::Local { id: id.into() },
            metadata,
            results: Some(results),
        }
    }

    pub fn task(&self) -> &TaskRef {
        &self.task
    }

    pub fn metadata(&self) -> &CircuitMetadata {
        &self.metadata
    }

    /// Whether the registers are available.
    pub fn is_resolved(&self) -> bool {
        self.results.is_some()
    }

    /// Cached registers, if resolved.
    pub fn results(&self) -> Option<&Registers> {
        self.results.as_ref()
    }

    /// Poll once.
    ///
    /// Returns `Ok(None)` while the task is in flight. A failed or
    /// cancelled task is a terminal error.
    pub async fn poll(&mut self, service: &dyn TaskService) -> BraketResult<Option<Registers>> {
        if let Some(results) = &self.results {
            return Ok(Some(results.clone()));
        }

        let handle = match &self.task {
            TaskRef::Remote(handle) => handle,
            TaskRef::Local { id } => {
                return Err(BraketError::InvalidSnapshot(format!(
                    "local run {id} has no results"
                )));
            }
        };

        match service.state(handle).await? {
            TaskState::Completed => {
                let raw = service.fetch_raw_samples(handle).await?;
                let results = assemble(&raw, &self.metadata);
                info!(
                    task = %handle.id,
                    readout = %self.metadata.readout_name,
                    shots = raw.shots(),
                    "task resolved"
                );
                self.results = Some(results.clone());
                Ok(Some(results))
            }
            TaskState::Failed(reason) => {
                warn!(task = %handle.id, %reason, "task failed");
                Err(BraketError::RemoteJobFailed {
                    task: handle.id.to_string(),
                    reason,
                })
            }
            TaskState::Cancelled => {
                warn!(task = %handle.id, "task cancelled");
                Err(BraketError::RemoteJobCancelled(handle.id.to_string()))
            }
            state => {
                debug!(task = %handle.id, %state, "task not finished");
                Ok(None)
            }
        }
    }

    /// Poll until resolved or the policy runs out.
    pub async fn wait(
        &mut self,
        service: &dyn TaskService,
        policy: &PollPolicy,
    ) -> BraketResult<Registers> {
        for attempt in 0..policy.max_polls {
            if let Some(results) = self.poll(service).await? {
                return Ok(results);
            }
            if attempt + 1 < policy.max_polls {
                tokio::time::sleep(policy.interval).await;
            }
        }
        Err(BraketError::PollTimeout {
            polls: policy.max_polls,
        })
    }

    /// Snapshot of this run.
    pub fn to_record(&self) -> QueuedCircuitRecord {
        let (kind, task_identity, region_or_locator) = match &self.task {
            TaskRef::Local { id } => (RunKind::Local, Some(id.clone()), None),
            TaskRef::Remote(handle) => (
                RunKind::Remote,
                Some(handle.id.to_string()),
                handle.region.clone(),
            ),
        };
        QueuedCircuitRecord {
            kind,
            task_identity,
            region_or_locator,
            metadata: self.metadata.clone(),
            resolved_results: self.results.clone(),
        }
    }

    /// Restore a run from its snapshot.
    pub fn from_record(record: QueuedCircuitRecord) -> BraketResult<Self> {
        let task = match record.kind {
            RunKind::Local => {
                if record.resolved_results.is_none() {
                    return Err(BraketError::InvalidSnapshot(
                        "local run without results".to_string(),
                    ));
                }
                TaskRef::Local {
                    id: record.task_identity.unwrap_or_default(),
                }
            }
            RunKind::Remote => {
                let id = record.task_identity.ok_or_else(|| {
                    BraketError::InvalidSnapshot("remote run without task identity".to_string())
                })?;
                let handle = TaskHandle {
                    id: id.into(),
                    region: record.region_or_locator,
                };
                TaskRef::Remote(handle)
            }
        };
        Ok(Self {
            task,
            metadata: record.metadata,
            results: record.resolved_results,
        })
    }

    pub fn to_json(&self) -> BraketResult<String> {
        Ok(serde_json::to_string(&self.to_record())?)
    }

    pub fn from_json(json: &str) -> BraketResult<Self> {
        Self::from_record(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolved() -> Registers {
        let mut regs = Registers::new();
        regs.bit.insert("ro".into(), vec![vec![true, false]]);
        regs
    }

    #[test]
    fn test_local_run_is_resolved() {
        let run = QueuedCircuitRun::local("local-1", CircuitMetadata::new("ro"), resolved());
        assert!(run.is_resolved());
        assert_eq!(run.results(), Some(&resolved()));
    }

    #[test]
    fn test_record_layout() {
        let handle = TaskHandle::new("arn:aws:braket:us-east-1:1:quantum-task/x")
            .with_region("us-east-1");
        let run = QueuedCircuitRun::remote(handle, CircuitMetadata::new("ro"));
        let value: serde_json::Value = serde_json::from_str(&run.to_json().unwrap()).unwrap();
        assert_eq!(value["kind"], "remote");
        assert_eq!(value["task_identity"], "arn:aws:braket:us-east-1:1:quantum-task/x");
        assert_eq!(value["region_or_locator"], "us-east-1");
        assert_eq!(value["metadata"]["readout_name"], "ro");
        assert!(value["resolved_results"].is_null());
    }

    #[test]
    fn test_round_trip_preserves_state() {
        let local = QueuedCircuitRun::local("local-1", CircuitMetadata::new("ro"), resolved());
        assert_eq!(QueuedCircuitRun::from_json(&local.to_json().unwrap()).unwrap(), local);

        let remote = QueuedCircuitRun::remote(TaskHandle::new("t-1"), CircuitMetadata::new("ro"));
        assert_eq!(QueuedCircuitRun::from_json(&remote.to_json().unwrap()).unwrap(), remote);
    }

    #[test]
    fn test_inconsistent_snapshots_are_rejected() {
        let local = r#"{"kind":"local","task_identity":"l","metadata":{"readout_name":"ro"}}"#;
        assert!(matches!(
            QueuedCircuitRun::from_json(local),
            Err(BraketError::InvalidSnapshot(_))
        ));
        let remote = r#"{"kind":"remote","metadata":{"readout_name":"ro"}}"#;
        assert!(matches!(
            QueuedCircuitRun::from_json(remote),
            Err(BraketError::InvalidSnapshot(_))
        ));
    }
}
