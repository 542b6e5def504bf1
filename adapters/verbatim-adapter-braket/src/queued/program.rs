//! Queued run of a measurement program.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;
use verbatim_hal::{Measurement, MeasurementKind, Registers, TaskService};

use super::PollPolicy;
use super::circuit::{QueuedCircuitRecord, QueuedCircuitRun};
use crate::error::{BraketError, BraketResult};

/// Final result of a program run.
#[derive(Debug, Clone, PartialEq)]
pub enum ProgramOutcome {
    /// Merged registers of a register-only measurement.
    Registers(Registers),
    /// Values returned by the measurement's evaluator.
    Values(HashMap<String, f64>),
}

/// Snapshot of a [`QueuedProgramRun`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueuedProgramRecord {
    pub measurement_kind: MeasurementKind,
    pub measurement_payload: String,
    pub circuit_runs: Vec<QueuedCircuitRecord>,
}

/// The circuit runs of one measurement, in submission order.
///
/// Complete once every run has resolved. Runs may complete in any order;
/// their registers are always merged in submission order, so a readout
/// shared by two circuits holds the later circuit's rows.
#[derive(Debug)]
pub struct QueuedProgramRun<M: Measurement> {
    measurement: M,
    runs: Vec<QueuedCircuitRun>,
}

impl<M: Measurement> QueuedProgramRun<M> {
    pub fn new(measurement: M, runs: Vec<QueuedCircuitRun>) -> Self {
        Self { measurement, runs }
    }

    pub fn measurement(&self) -> &M {
        &self.measurement
    }

    pub fn runs(&self) -> &[QueuedCircuitRun] {
        &self.runs
    }

    /// Number of runs resolved so far.
    pub fn resolved_count(&self) -> usize {
        self.runs.iter().filter(|run| run.is_resolved()).count()
    }

    pub fn is_complete(&self) -> bool {
        self.runs.iter().all(QueuedCircuitRun::is_resolved)
    }

    /// Registers of the resolved runs merged in submission order.
    pub fn merged_registers(&self) -> Registers {
        let mut merged = Registers::new();
        for results in self.runs.iter().filter_map(QueuedCircuitRun::results) {
            merged.merge(results.clone());
        }
        merged
    }

    /// Poll every run once and return the merged registers once all have
    /// resolved.
    pub async fn poll_registers(
        &mut self,
        service: &dyn TaskService,
    ) -> BraketResult<Option<Registers>> {
        for run in &mut self.runs {
            run.poll(service).await?;
        }
        if !self.is_complete() {
            debug!(
                resolved = self.resolved_count(),
                total = self.runs.len(),
                "program not finished"
            );
            return Ok(None);
        }
        Ok(Some(self.merged_registers()))
    }

    /// Poll every run once; once all have resolved, return the registers or
    /// the evaluated values depending on the measurement kind.
    pub async fn poll(&mut self, service: &dyn TaskService) -> BraketResult<Option<ProgramOutcome>> {
        let Some(registers) = self.poll_registers(service).await? else {
            return Ok(None);
        };
        if self.measurement.kind().is_register_only() {
            return Ok(Some(ProgramOutcome::Registers(registers)));
        }
        let values =
            self.measurement
                .evaluate(&registers.bit, &registers.float, &registers.complex)?;
        Ok(Some(ProgramOutcome::Values(values)))
    }

    /// Poll until complete or the policy runs out.
    pub async fn wait(
        &mut self,
        service: &dyn TaskService,
        policy: &PollPolicy,
    ) -> BraketResult<ProgramOutcome> {
        for attempt in 0..policy.max_polls {
            if let Some(outcome) = self.poll(service).await? {
                return Ok(outcome);
            }
            if attempt + 1 < policy.max_polls {
                tokio::time::sleep(policy.interval).await;
            }
        }
        Err(BraketError::PollTimeout {
            polls: policy.max_polls,
        })
    }

    /// Snapshot of this program run.
    pub fn to_record(&self) -> BraketResult<QueuedProgramRecord> {
        Ok(QueuedProgramRecord {
            measurement_kind: self.measurement.kind(),
            measurement_payload: self.measurement.to_payload()?,
            circuit_runs: self.runs.iter().map(QueuedCircuitRun::to_record).collect(),
        })
    }

    /// Restore a program run from its snapshot.
    pub fn from_record(record: QueuedProgramRecord) -> BraketResult<Self> {
        let measurement = M::from_payload(record.measurement_kind, &record.measurement_payload)?;
        let runs = record
            .circuit_runs
            .into_iter()
            .map(QueuedCircuitRun::from_record)
            .collect::<BraketResult<Vec<_>>>()?;
        Ok(Self { measurement, runs })
    }

    pub fn to_json(&self) -> BraketResult<String> {
        Ok(serde_json::to_string(&self.to_record()?)?)
    }

    pub fn from_json(json: &str) -> BraketResult<Self> {
        Self::from_record(serde_json::from_str(json)?)
    }
}
