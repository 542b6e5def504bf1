//! Test doubles for the task service and the local executor.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use async_trait::async_trait;
use verbatim_hal::{
    BatchHandle, BitRegisters, ComplexRegisters, FloatRegisters, HalError, HalResult,
    LocalExecutor, Measurement, MeasurementKind, RawSamples, TaskHandle, TaskRequest, TaskService,
    TaskState,
};
use verbatim_ir::{Circuit, Operation};

struct MockTask {
    request: TaskRequest,
    state: TaskState,
    state_queries: usize,
    samples: Option<RawSamples>,
}

/// In-memory task service with scripted task states.
///
/// Tasks start `Queued` and stay there until the test moves them with
/// [`MockTaskService::complete`], [`MockTaskService::fail`] or
/// [`MockTaskService::cancel`], or until `complete_after` state queries.
pub struct MockTaskService {
    next_id: AtomicU64,
    tasks: Mutex<HashMap<String, MockTask>>,
    samples: Mutex<RawSamples>,
    complete_after: Option<usize>,
    submits: AtomicUsize,
    batch_submits: AtomicUsize,
    state_queries: AtomicUsize,
    fetches: AtomicUsize,
}

impl MockTaskService {
    /// Tasks stay pending until moved explicitly.
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(0),
            tasks: Mutex::new(HashMap::new()),
            samples: Mutex::new(RawSamples(vec![vec![1]])),
            complete_after: None,
            submits: AtomicUsize::new(0),
            batch_submits: AtomicUsize::new(0),
            state_queries: AtomicUsize::new(0),
            fetches: AtomicUsize::new(0),
        }
    }

    /// Tasks complete on their first state query.
    pub fn instant() -> Self {
        Self::completing_after(1)
    }

    /// Tasks complete on their `queries`-th state query.
    pub fn completing_after(queries: usize) -> Self {
        Self {
            complete_after: Some(queries),
            ..Self::new()
        }
    }

    /// Samples returned for every completed task.
    pub fn with_samples(self, rows: Vec<Vec<u8>>) -> Self {
        *self.samples.lock().unwrap() = RawSamples(rows);
        self
    }

    fn set_state(&self, id: &str, state: TaskState) {
        self.tasks
            .lock()
            .unwrap()
            .get_mut(id)
            .expect("unknown task")
            .state = state;
    }

    pub fn complete(&self, handle: &TaskHandle) {
        self.set_state(handle.id.as_str(), TaskState::Completed);
    }

    /// Complete one task with its own samples.
    pub fn complete_with(&self, handle: &TaskHandle, rows: Vec<Vec<u8>>) {
        let mut tasks = self.tasks.lock().unwrap();
        let task = tasks.get_mut(handle.id.as_str()).expect("unknown task");
        task.state = TaskState::Completed;
        task.samples = Some(RawSamples(rows));
    }

    pub fn fail(&self, handle: &TaskHandle, reason: &str) {
        self.set_state(handle.id.as_str(), TaskState::Failed(reason.to_string()));
    }

    pub fn cancel(&self, handle: &TaskHandle) {
        self.set_state(handle.id.as_str(), TaskState::Cancelled);
    }

    pub fn submits(&self) -> usize {
        self.submits.load(Ordering::SeqCst)
    }

    pub fn batch_submits(&self) -> usize {
        self.batch_submits.load(Ordering::SeqCst)
    }

    pub fn state_queries(&self) -> usize {
        self.state_queries.load(Ordering::SeqCst)
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    /// Sources of every submitted request, in submission order.
    pub fn submitted(&self) -> Vec<TaskRequest> {
        let tasks = self.tasks.lock().unwrap();
        let mut entries: Vec<(&String, &MockTask)> = tasks.iter().collect();
        entries.sort_by_key(|(id, _)| {
            id.trim_start_matches("mock-task-")
                .parse::<u64>()
                .unwrap_or_default()
        });
        entries
            .into_iter()
            .map(|(_, task)| task.request.clone())
            .collect()
    }

    fn insert(&self, request: &TaskRequest) -> TaskHandle {
        let id = format!(
            "mock-task-{}",
            self.next_id.fetch_add(1, Ordering::SeqCst)
        );
        self.tasks.lock().unwrap().insert(
            id.clone(),
            MockTask {
                request: request.clone(),
                state: TaskState::Queued,
                state_queries: 0,
                samples: None,
            },
        );
        TaskHandle::new(id).with_region("us-east-1")
    }
}

impl Default for MockTaskService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TaskService for MockTaskService {
    fn name(&self) -> &str {
        "mock"
    }

    async fn submit(&self, request: &TaskRequest) -> HalResult<TaskHandle> {
        self.submits.fetch_add(1, Ordering::SeqCst);
        Ok(self.insert(request))
    }

    async fn submit_batch(&self, requests: &[TaskRequest]) -> HalResult<BatchHandle> {
        self.batch_submits.fetch_add(1, Ordering::SeqCst);
        Ok(BatchHandle {
            tasks: requests.iter().map(|r| self.insert(r)).collect(),
        })
    }

    async fn state(&self, handle: &TaskHandle) -> HalResult<TaskState> {
        self.state_queries.fetch_add(1, Ordering::SeqCst);
        let mut tasks = self.tasks.lock().unwrap();
        let task = tasks
            .get_mut(handle.id.as_str())
            .ok_or_else(|| HalError::TaskNotFound(handle.id.to_string()))?;
        task.state_queries += 1;
        if let Some(after) = self.complete_after {
            if task.state.is_pending() && task.state_queries >= after {
                task.state = TaskState::Completed;
            }
        }
        Ok(task.state.clone())
    }

    async fn fetch_raw_samples(&self, handle: &TaskHandle) -> HalResult<RawSamples> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let tasks = self.tasks.lock().unwrap();
        match tasks.get(handle.id.as_str()) {
            Some(task) if task.state.is_success() => Ok(task
                .samples
                .clone()
                .unwrap_or_else(|| self.samples.lock().unwrap().clone())),
            Some(task) => Err(HalError::Backend(format!("task is {}", task.state))),
            None => Err(HalError::TaskNotFound(handle.id.to_string())),
        }
    }
}

/// Local executor that runs classical circuits: `PauliX` flips a bit and
/// `CNOT` flips the target when the control is set; every other operation
/// is ignored.
///
/// Measures the `MeasureQubit` targets in readout-index order, or every
/// qubit when the circuit has no `MeasureQubit`.
#[derive(Default)]
pub struct ClassicalExecutor {
    executions: AtomicUsize,
}

impl ClassicalExecutor {
    pub fn new() -> Self {
        Self {
            executions: AtomicUsize::new(0),
        }
    }

    pub fn executions(&self) -> usize {
        self.executions.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LocalExecutor for ClassicalExecutor {
    fn name(&self) -> &str {
        "classical"
    }

    async fn execute(&self, request: &TaskRequest, circuit: &Circuit) -> HalResult<RawSamples> {
        self.executions.fetch_add(1, Ordering::SeqCst);
        let mut bits = vec![false; circuit.number_of_qubits()];
        for op in circuit {
            match op {
                Operation::PauliX { qubit } => bits[*qubit] = !bits[*qubit],
                Operation::CNOT { control, target } if bits[*control] => {
                    bits[*target] = !bits[*target];
                }
                _ => {}
            }
        }

        let mut measured: Vec<(usize, usize)> = circuit
            .iter()
            .filter_map(|op| match op {
                Operation::MeasureQubit {
                    qubit,
                    readout_index,
                    ..
                } => Some((*readout_index, *qubit)),
                _ => None,
            })
            .collect();
        if measured.is_empty() {
            measured = (0..bits.len()).map(|q| (q, q)).collect();
        }
        measured.sort();

        let row: Vec<u8> = measured
            .iter()
            .map(|(_, qubit)| u8::from(bits[*qubit]))
            .collect();
        Ok(RawSamples(vec![row; request.shots]))
    }
}

/// Measurement that reports the fraction of set bits per readout.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct OnesFraction {
    pub circuits: Vec<Circuit>,
}

impl Measurement for OnesFraction {
    fn kind(&self) -> MeasurementKind {
        MeasurementKind::PauliZProduct
    }

    fn constant_circuit(&self) -> Option<&Circuit> {
        None
    }

    fn circuits(&self) -> &[Circuit] {
        &self.circuits
    }

    fn evaluate(
        &self,
        bit: &BitRegisters,
        _float: &FloatRegisters,
        _complex: &ComplexRegisters,
    ) -> HalResult<HashMap<String, f64>> {
        Ok(bit
            .iter()
            .map(|(name, rows)| {
                let total: usize = rows.iter().map(Vec::len).sum();
                let ones = rows.iter().flatten().filter(|b| **b).count();
                let fraction = if total == 0 {
                    0.0
                } else {
                    ones as f64 / total as f64
                };
                (name.clone(), fraction)
            })
            .collect())
    }

    fn to_payload(&self) -> HalResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    fn from_payload(kind: MeasurementKind, payload: &str) -> HalResult<Self> {
        if kind != MeasurementKind::PauliZProduct {
            return Err(HalError::MeasurementKindMismatch {
                expected: MeasurementKind::PauliZProduct,
                found: kind,
            });
        }
        Ok(serde_json::from_str(payload)?)
    }
}

/// `DefinitionBit(readout, length)` followed by `ops`.
pub fn circuit_with_readout(readout: &str, length: usize, ops: Vec<Operation>) -> Circuit {
    let mut all = vec![Operation::DefinitionBit {
        name: readout.to_string(),
        length,
        is_output: true,
    }];
    all.extend(ops);
    Circuit::from_operations(all).unwrap()
}

pub fn set_shots(shots: usize, readout: &str) -> Operation {
    Operation::PragmaSetNumberOfMeasurements {
        number_measurements: shots,
        readout: readout.to_string(),
    }
}

pub fn x(qubit: usize) -> Operation {
    Operation::PauliX { qubit }
}
