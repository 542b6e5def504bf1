//! Device selection and submission.
//!
//! The gateway turns planned circuits into [`QueuedCircuitRun`]s: remote
//! devices go through the [`TaskService`], local simulators through the
//! attached [`LocalExecutor`] and resolve immediately.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info};
use verbatim_hal::{LocalExecutor, TaskRequest, TaskService};
use verbatim_ir::Circuit;

use crate::assemble::assemble;
use crate::device::{is_local_simulator, is_remote_simulator, resolve_arn};
use crate::error::{BraketError, BraketResult};
use crate::planner::PlannedCircuit;
use crate::queued::QueuedCircuitRun;

/// A device the caller is allowed to run on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceHandle {
    /// In-process simulator.
    Local { name: String },
    /// Remote device by ARN.
    Remote { arn: String, simulator: bool },
}

impl DeviceHandle {
    /// Identifier to put into task requests.
    pub fn identifier(&self) -> &str {
        match self {
            DeviceHandle::Local { name } => name,
            DeviceHandle::Remote { arn, .. } => arn,
        }
    }

    pub fn is_local(&self) -> bool {
        matches!(self, DeviceHandle::Local { .. })
    }

    /// Whether running on this device costs hardware time.
    pub fn is_hardware(&self) -> bool {
        matches!(
            self,
            DeviceHandle::Remote {
                simulator: false,
                ..
            }
        )
    }
}

/// Resolve `identifier` to a device, refusing hardware unless allowed.
pub fn select_device(identifier: &str, allow_hardware: bool) -> BraketResult<DeviceHandle> {
    if is_local_simulator(identifier) {
        return Ok(DeviceHandle::Local {
            name: identifier.to_string(),
        });
    }
    if is_remote_simulator(identifier) {
        return Ok(DeviceHandle::Remote {
            arn: resolve_arn(identifier),
            simulator: true,
        });
    }
    if allow_hardware {
        return Ok(DeviceHandle::Remote {
            arn: resolve_arn(identifier),
            simulator: false,
        });
    }
    Err(BraketError::DeviceNotAllowed(identifier.to_string()))
}

/// Submits planned circuits to a task service or a local executor.
#[derive(Clone)]
pub struct ExecutionGateway {
    service: Arc<dyn TaskService>,
    local: Option<Arc<dyn LocalExecutor>>,
}

impl fmt::Debug for ExecutionGateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutionGateway")
            .field("service", &self.service.name())
            .field("local", &self.local.as_ref().map(|l| l.name()))
            .finish()
    }
}

impl ExecutionGateway {
    pub fn new(service: Arc<dyn TaskService>) -> Self {
        Self {
            service,
            local: None,
        }
    }

    /// Attach an in-process executor for local simulator names.
    pub fn with_local_executor(mut self, executor: Arc<dyn LocalExecutor>) -> Self {
        self.local = Some(executor);
        self
    }

    pub fn service(&self) -> &dyn TaskService {
        self.service.as_ref()
    }

    fn local_executor(&self, device: &DeviceHandle) -> BraketResult<&dyn LocalExecutor> {
        self.local
            .as_deref()
            .ok_or_else(|| BraketError::LocalSimulatorUnavailable(device.identifier().to_string()))
    }

    /// Submit one planned circuit.
    ///
    /// `circuit` is the circuit the plan was made from; local executors
    /// run it directly.
    pub async fn submit(
        &self,
        device: &DeviceHandle,
        circuit: &Circuit,
        planned: PlannedCircuit,
    ) -> BraketResult<QueuedCircuitRun> {
        let request = TaskRequest::new(
            device.identifier(),
            planned.program.source()?,
            planned.shots,
        );

        if device.is_local() {
            let executor = self.local_executor(device)?;
            let raw = executor.execute(&request, circuit).await?;
            let results = assemble(&raw, &planned.metadata);
            let id = uuid::Uuid::new_v4().to_string();
            debug!(device = %request.device, %id, shots = request.shots, "executed locally");
            return Ok(QueuedCircuitRun::local(id, planned.metadata, results));
        }

        let handle = self.service.submit(&request).await?;
        info!(
            device = %request.device,
            task = %handle.id,
            shots = request.shots,
            verbatim = planned.program.is_verbatim(),
            "submitted task"
        );
        Ok(QueuedCircuitRun::remote(handle, planned.metadata))
    }

    /// Submit circuits that share one shot count as a batch.
    ///
    /// Fails with [`BraketError::HeterogeneousShots`] before anything is
    /// submitted if the shot counts differ.
    pub async fn submit_batch(
        &self,
        device: &DeviceHandle,
        items: Vec<(&Circuit, PlannedCircuit)>,
    ) -> BraketResult<Vec<QueuedCircuitRun>> {
        let shots: Vec<usize> = items.iter().map(|(_, planned)| planned.shots).collect();
        if shots.windows(2).any(|pair| pair[0] != pair[1]) {
            return Err(BraketError::HeterogeneousShots { shots });
        }

        if device.is_local() {
            let mut runs = Vec::with_capacity(items.len());
            for (circuit, planned) in items {
                runs.push(self.submit(device, circuit, planned).await?);
            }
            return Ok(runs);
        }

        let mut requests = Vec::with_capacity(items.len());
        let mut metadata = Vec::with_capacity(items.len());
        for (_, planned) in items {
            requests.push(TaskRequest::new(
                device.identifier(),
                planned.program.source()?,
                planned.shots,
            ));
            metadata.push(planned.metadata);
        }

        let batch = self.service.submit_batch(&requests).await?;
        if batch.len() != metadata.len() {
            return Err(BraketError::BraketApi(format!(
                "batch of {} programs returned {} tasks",
                metadata.len(),
                batch.len()
            )));
        }
        info!(
            device = %device.identifier(),
            tasks = batch.len(),
            shots = shots.first().copied().unwrap_or_default(),
            "submitted batch"
        );
        Ok(batch
            .tasks
            .into_iter()
            .zip(metadata)
            .map(|(handle, metadata)| QueuedCircuitRun::remote(handle, metadata))
            .collect())
    }
}
