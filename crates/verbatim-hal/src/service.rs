//! Task service and local executor traits.
//!
//! ```text
//!   submit() / submit_batch() ──→ state() ──→ fetch_raw_samples()
//!          (async)                (async)          (async)
//! ```
//!
//! A [`TaskService`] is the remote execution fabric: device discovery,
//! credentials and result storage all live behind it. A [`LocalExecutor`]
//! runs a program in-process and returns samples directly, so there is
//! nothing to poll.

use async_trait::async_trait;
use tracing::debug;
use verbatim_ir::Circuit;

use crate::error::{HalError, HalResult};
use crate::task::{BatchHandle, RawSamples, TaskHandle, TaskRequest, TaskState};

/// Remote task interface.
///
/// # Contract
///
/// - `submit()` returns a handle whose first reported state is pending.
/// - `state()` never fails for a terminal task; it keeps reporting it.
/// - `fetch_raw_samples()` is only valid once `state()` is `Completed`.
#[async_trait]
pub trait TaskService: Send + Sync {
    /// Name of the service, for logging.
    fn name(&self) -> &str;

    /// Submit one program.
    async fn submit(&self, request: &TaskRequest) -> HalResult<TaskHandle>;

    /// Submit several programs sharing one device and shot count.
    ///
    /// The default implementation submits them one by one, in order.
    async fn submit_batch(&self, requests: &[TaskRequest]) -> HalResult<BatchHandle> {
        let mut tasks = Vec::with_capacity(requests.len());
        for request in requests {
            tasks.push(self.submit(request).await?);
        }
        debug!(service = self.name(), tasks = tasks.len(), "submitted batch");
        Ok(BatchHandle { tasks })
    }

    /// Current state of a task.
    async fn state(&self, handle: &TaskHandle) -> HalResult<TaskState>;

    /// Raw samples of a completed task.
    async fn fetch_raw_samples(&self, handle: &TaskHandle) -> HalResult<RawSamples>;
}

/// In-process execution target.
///
/// Receives both the rendered request and the circuit it came from; the
/// circuit is what a simulator would act on.
#[async_trait]
pub trait LocalExecutor: Send + Sync {
    /// Name of the executor, for logging.
    fn name(&self) -> &str;

    async fn execute(&self, request: &TaskRequest, circuit: &Circuit) -> HalResult<RawSamples>;
}

/// Task service for environments without remote access.
///
/// Every call fails with [`HalError::BackendUnavailable`]; it lets a
/// gateway run purely local workloads without a cloud client.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineTaskService;

impl OfflineTaskService {
    fn unavailable() -> HalError {
        HalError::BackendUnavailable("no remote task service configured".into())
    }
}

#[async_trait]
impl TaskService for OfflineTaskService {
    fn name(&self) -> &str {
        "offline"
    }

    async fn submit(&self, _request: &TaskRequest) -> HalResult<TaskHandle> {
        Err(Self::unavailable())
    }

    async fn state(&self, _handle: &TaskHandle) -> HalResult<TaskState> {
        Err(Self::unavailable())
    }

    async fn fetch_raw_samples(&self, _handle: &TaskHandle) -> HalResult<RawSamples> {
        Err(Self::unavailable())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct Recording {
        submitted: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl TaskService for Recording {
        fn name(&self) -> &str {
            "recording"
        }

        async fn submit(&self, request: &TaskRequest) -> HalResult<TaskHandle> {
            let mut submitted = self.submitted.lock().unwrap();
            submitted.push(request.source.clone());
            Ok(TaskHandle::new(format!("task-{}", submitted.len())))
        }

        async fn state(&self, _handle: &TaskHandle) -> HalResult<TaskState> {
            Ok(TaskState::Queued)
        }

        async fn fetch_raw_samples(&self, _handle: &TaskHandle) -> HalResult<RawSamples> {
            Err(HalError::Unsupported("not completed".into()))
        }
    }

    #[tokio::test]
    async fn test_default_batch_submits_in_order() {
        let service = Recording {
            submitted: Mutex::new(Vec::new()),
        };
        let requests = [
            TaskRequest::new("dev", "a", 10),
            TaskRequest::new("dev", "b", 10),
        ];
        let batch = service.submit_batch(&requests).await.unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch.tasks[1].id.as_str(), "task-2");
        assert_eq!(*service.submitted.lock().unwrap(), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_offline_service_is_unavailable() {
        let err = OfflineTaskService
            .submit(&TaskRequest::new("dev", "x", 1))
            .await
            .unwrap_err();
        assert!(matches!(err, HalError::BackendUnavailable(_)));
    }
}
