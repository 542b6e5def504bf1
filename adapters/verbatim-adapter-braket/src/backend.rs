//! Braket backend: planning, submission and program orchestration.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, info};
use verbatim_hal::{LocalExecutor, Measurement, OfflineTaskService, Registers, TaskService};
use verbatim_ir::Circuit;

use crate::api::BraketClient;
use crate::config::BraketConfig;
use crate::error::BraketResult;
use crate::gateway::{DeviceHandle, ExecutionGateway, select_device};
use crate::planner::plan;
use crate::queued::{PollPolicy, ProgramOutcome, QueuedCircuitRun, QueuedProgramRun};

/// Dispatches circuits and measurement programs to one configured device.
///
/// Every `run_*_queued` method returns as soon as the work is submitted;
/// the other `run_*` methods also drive the queued runs to completion with
/// the backend's [`PollPolicy`].
pub struct BraketBackend {
    config: BraketConfig,
    gateway: ExecutionGateway,
    poll_policy: PollPolicy,
}

impl fmt::Debug for BraketBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BraketBackend")
            .field("config", &self.config)
            .field("gateway", &self.gateway)
            .field("poll_policy", &self.poll_policy)
            .finish()
    }
}

impl BraketBackend {
    /// Create a backend over an existing task service.
    pub fn new(config: BraketConfig, service: Arc<dyn TaskService>) -> BraketResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            gateway: ExecutionGateway::new(service),
            poll_policy: PollPolicy::default(),
        })
    }

    /// Create a backend for local simulators only.
    pub fn local(config: BraketConfig, executor: Arc<dyn LocalExecutor>) -> BraketResult<Self> {
        Ok(Self::new(config, Arc::new(OfflineTaskService))?.with_local_executor(executor))
    }

    /// Connect to AWS Braket.
    ///
    /// Reads configuration from environment variables:
    /// - `VERBATIM_BRAKET_S3_BUCKET` (required): S3 bucket for task results
    /// - `VERBATIM_BRAKET_S3_PREFIX` (optional, default: `"verbatim-results"`)
    /// - `AWS_REGION` (optional, default: `"us-east-1"`)
    ///
    /// AWS credentials are loaded from the default chain (environment,
    /// SSO, config files, IAM role).
    pub async fn connect(config: BraketConfig) -> BraketResult<Self> {
        let client = BraketClient::from_env().await?;
        info!(device = %config.device, region = client.region(), "connected to Braket");
        Self::new(config, Arc::new(client))
    }

    pub fn with_local_executor(mut self, executor: Arc<dyn LocalExecutor>) -> Self {
        self.gateway = self.gateway.with_local_executor(executor);
        self
    }

    pub fn with_poll_policy(mut self, poll_policy: PollPolicy) -> Self {
        self.poll_policy = poll_policy;
        self
    }

    pub fn config(&self) -> &BraketConfig {
        &self.config
    }

    pub fn poll_policy(&self) -> &PollPolicy {
        &self.poll_policy
    }

    /// Task service queued runs are polled against.
    pub fn service(&self) -> &dyn TaskService {
        self.gateway.service()
    }

    /// The configured device, if the configuration allows it.
    pub fn device(&self) -> BraketResult<DeviceHandle> {
        select_device(&self.config.device, self.config.allow_hardware)
    }

    /// Plan and submit one circuit.
    pub async fn run_circuit_queued(&self, circuit: &Circuit) -> BraketResult<QueuedCircuitRun> {
        let device = self.device()?;
        let planned = plan(circuit, &self.config)?;
        self.gateway.submit(&device, circuit, planned).await
    }

    /// Run one circuit and wait for its registers.
    pub async fn run_circuit(&self, circuit: &Circuit) -> BraketResult<Registers> {
        let mut run = self.run_circuit_queued(circuit).await?;
        run.wait(self.service(), &self.poll_policy).await
    }

    /// Plan and submit several circuits, as one batch in batch mode.
    ///
    /// Every circuit is planned before anything is submitted.
    pub async fn run_circuits_queued(
        &self,
        circuits: &[Circuit],
    ) -> BraketResult<Vec<QueuedCircuitRun>> {
        let device = self.device()?;
        let mut items = Vec::with_capacity(circuits.len());
        for circuit in circuits {
            items.push((circuit, plan(circuit, &self.config)?));
        }

        if self.config.batch_mode {
            return self.gateway.submit_batch(&device, items).await;
        }
        let mut runs = Vec::with_capacity(items.len());
        for (circuit, planned) in items {
            runs.push(self.gateway.submit(&device, circuit, planned).await?);
        }
        Ok(runs)
    }

    /// Run several circuits and merge their registers in circuit order.
    pub async fn run_circuits_batch(&self, circuits: &[Circuit]) -> BraketResult<Registers> {
        let runs = self.run_circuits_queued(circuits).await?;
        let mut merged = Registers::new();
        for mut run in runs {
            merged.merge(run.wait(self.service(), &self.poll_policy).await?);
        }
        Ok(merged)
    }

    /// Submit every circuit of `measurement` and return the program run.
    pub async fn run_measurement_queued<M: Measurement>(
        &self,
        measurement: M,
    ) -> BraketResult<QueuedProgramRun<M>> {
        let circuits = measurement_circuits(&measurement);
        debug!(kind = %measurement.kind(), circuits = circuits.len(), "submitting measurement");
        let runs = self.run_circuits_queued(&circuits).await?;
        Ok(QueuedProgramRun::new(measurement, runs))
    }

    /// Run every circuit of `measurement` and return the merged registers.
    pub async fn run_measurement_registers<M: Measurement>(
        &self,
        measurement: &M,
    ) -> BraketResult<Registers> {
        self.run_circuits_batch(&measurement_circuits(measurement))
            .await
    }

    /// Run `measurement` and evaluate it on the merged registers.
    pub async fn run_measurement<M: Measurement>(
        &self,
        measurement: &M,
    ) -> BraketResult<HashMap<String, f64>> {
        let registers = self.run_measurement_registers(measurement).await?;
        Ok(measurement.evaluate(&registers.bit, &registers.float, &registers.complex)?)
    }

    /// Drive a program run to completion with the backend's poll policy.
    pub async fn wait_program<M: Measurement>(
        &self,
        program: &mut QueuedProgramRun<M>,
    ) -> BraketResult<ProgramOutcome> {
        program.wait(self.service(), &self.poll_policy).await
    }
}

/// Circuits to submit for `measurement`: the constant circuit, if any, runs
/// first in each of them.
pub fn measurement_circuits<M: Measurement + ?Sized>(measurement: &M) -> Vec<Circuit> {
    match measurement.constant_circuit() {
        Some(constant) => measurement
            .circuits()
            .iter()
            .map(|circuit| constant + circuit)
            .collect(),
        None => measurement.circuits().to_vec(),
    }
}
