//! AWS Braket task service.
//!
//! Wraps the AWS SDK for Braket and S3: tasks are created from OpenQASM 3
//! programs, polled with `GetQuantumTask`, and their raw measurements are
//! read from the `results.json` in the output directory Braket reports for
//! the task. Tasks created in another region are queried through clients
//! for that region.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_braket::operation::get_quantum_task::GetQuantumTaskOutput;
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::debug;
use verbatim_hal::{HalResult, RawSamples, TaskHandle, TaskRequest, TaskService, TaskState};

use crate::device::region_from_arn;
use crate::error::{BraketError, BraketResult};

/// SDK clients bound to one region.
#[derive(Clone)]
struct RegionClients {
    braket: aws_sdk_braket::Client,
    s3: aws_sdk_s3::Client,
}

impl RegionClients {
    async fn load(region: &str) -> Self {
        let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(region.to_string()))
            .timeout_config(
                aws_config::timeout::TimeoutConfig::builder()
                    .operation_timeout(Duration::from_secs(60))
                    .connect_timeout(Duration::from_secs(10))
                    .build(),
            )
            .load()
            .await;
        Self {
            braket: aws_sdk_braket::Client::new(&config),
            s3: aws_sdk_s3::Client::new(&config),
        }
    }
}

/// AWS Braket API client.
pub struct BraketClient {
    /// Clients for the home region.
    home: RegionClients,
    /// Clients for other regions, created on first use.
    foreign: RwLock<HashMap<String, RegionClients>>,
    /// S3 bucket for task results.
    s3_bucket: String,
    /// S3 key prefix for task results.
    s3_prefix: String,
    /// AWS region.
    region: String,
}

impl fmt::Debug for BraketClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BraketClient")
            .field("s3_bucket", &self.s3_bucket)
            .field("s3_prefix", &self.s3_prefix)
            .field("region", &self.region)
            .field("credentials", &"[REDACTED]")
            .finish()
    }
}

impl BraketClient {
    /// Create a new Braket client.
    ///
    /// Loads AWS credentials from the default chain (environment, SSO, config files, IAM role).
    pub async fn new(
        region: impl Into<String>,
        s3_bucket: impl Into<String>,
        s3_prefix: impl Into<String>,
    ) -> BraketResult<Self> {
        let region = region.into();
        Ok(Self {
            home: RegionClients::load(&region).await,
            foreign: RwLock::new(HashMap::new()),
            s3_bucket: s3_bucket.into(),
            s3_prefix: s3_prefix.into(),
            region,
        })
    }

    /// Connect using environment variables:
    /// - `VERBATIM_BRAKET_S3_BUCKET` (required): S3 bucket for task results
    /// - `VERBATIM_BRAKET_S3_PREFIX` (optional, default: `"verbatim-results"`)
    /// - `AWS_REGION` (optional, default: `"us-east-1"`)
    pub async fn from_env() -> BraketResult<Self> {
        let s3_bucket = std::env::var("VERBATIM_BRAKET_S3_BUCKET")
            .map_err(|_| BraketError::MissingS3Bucket)?;
        let s3_prefix = std::env::var("VERBATIM_BRAKET_S3_PREFIX")
            .unwrap_or_else(|_| "verbatim-results".to_string());
        let region = std::env::var("AWS_REGION").unwrap_or_else(|_| "us-east-1".to_string());
        Self::new(region, s3_bucket, s3_prefix).await
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    /// Clients for `region`, or the home clients when it is unknown or ours.
    async fn clients_for(&self, region: Option<&str>) -> RegionClients {
        let Some(region) = foreign_region(&self.region, region) else {
            return self.home.clone();
        };
        if let Some(clients) = self.foreign.read().await.get(region) {
            return clients.clone();
        }
        debug!(region, client_region = %self.region, "creating clients for task region");
        let clients = RegionClients::load(region).await;
        self.foreign
            .write()
            .await
            .entry(region.to_string())
            .or_insert(clients)
            .clone()
    }

    async fn describe_task(
        clients: &RegionClients,
        task_arn: &str,
    ) -> BraketResult<GetQuantumTaskOutput> {
        clients
            .braket
            .get_quantum_task()
            .quantum_task_arn(task_arn)
            .send()
            .await
            .map_err(|e| {
                if e.to_string().contains("ResourceNotFoundException") {
                    BraketError::InvalidTaskArn(task_arn.to_string())
                } else {
                    BraketError::BraketApi(e.to_string())
                }
            })
    }

    /// Create a quantum task and return its ARN.
    pub async fn create_task(
        &self,
        device_arn: &str,
        qasm: &str,
        shots: usize,
    ) -> BraketResult<String> {
        let action = serde_json::json!({
            "braketSchemaHeader": {
                "name": "braket.ir.openqasm.program",
                "version": "1"
            },
            "source": qasm
        });
        let shots = i64::try_from(shots)
            .map_err(|_| BraketError::BraketApi(format!("shot count {shots} out of range")))?;

        let resp = self
            .home
            .braket
            .create_quantum_task()
            .device_arn(device_arn)
            .action(action.to_string())
            .shots(shots)
            .output_s3_bucket(&self.s3_bucket)
            .output_s3_key_prefix(&self.s3_prefix)
            .send()
            .await
            .map_err(|e| BraketError::BraketApi(e.to_string()))?;

        Ok(resp.quantum_task_arn().to_string())
    }

    /// Get quantum task state, querying the region named in the ARN.
    pub async fn get_task_state(&self, task_arn: &str) -> BraketResult<TaskState> {
        self.task_state_in(region_from_arn(task_arn), task_arn).await
    }

    async fn task_state_in(&self, region: Option<&str>, task_arn: &str) -> BraketResult<TaskState> {
        let clients = self.clients_for(region).await;
        let resp = Self::describe_task(&clients, task_arn).await?;

        let state = match resp.status() {
            aws_sdk_braket::types::QuantumTaskStatus::Created => TaskState::Created,
            aws_sdk_braket::types::QuantumTaskStatus::Queued => TaskState::Queued,
            aws_sdk_braket::types::QuantumTaskStatus::Running => TaskState::Running,
            aws_sdk_braket::types::QuantumTaskStatus::Completed => TaskState::Completed,
            aws_sdk_braket::types::QuantumTaskStatus::Failed => TaskState::Failed(
                resp.failure_reason()
                    .unwrap_or("Unknown failure")
                    .to_string(),
            ),
            aws_sdk_braket::types::QuantumTaskStatus::Cancelling => TaskState::Cancelling,
            aws_sdk_braket::types::QuantumTaskStatus::Cancelled => TaskState::Cancelled,
            other => TaskState::Failed(format!("Unknown status {other:?}")),
        };

        Ok(state)
    }

    /// Get task result from S3.
    ///
    /// Braket stores `results.json` in the output directory recorded on the
    /// task, which need not match this client's bucket or prefix.
    pub async fn get_task_result(&self, task_arn: &str) -> BraketResult<TaskResult> {
        self.task_result_in(region_from_arn(task_arn), task_arn).await
    }

    async fn task_result_in(&self, region: Option<&str>, task_arn: &str) -> BraketResult<TaskResult> {
        let clients = self.clients_for(region).await;
        let task = Self::describe_task(&clients, task_arn).await?;
        let (bucket, key) = results_location(task.output_s3_bucket(), task.output_s3_directory());
        debug!(task = task_arn, bucket = %bucket, key = %key, "fetching task result");

        let resp = clients
            .s3
            .get_object()
            .bucket(&bucket)
            .key(&key)
            .send()
            .await
            .map_err(|e| BraketError::S3Error(e.to_string()))?;

        let body = resp
            .body
            .collect()
            .await
            .map_err(|e| BraketError::S3Error(e.to_string()))?;

        let result: TaskResult = serde_json::from_slice(&body.into_bytes())?;
        Ok(result)
    }
}

/// `task_region` when it is known and differs from `home`.
fn foreign_region<'a>(home: &str, task_region: Option<&'a str>) -> Option<&'a str> {
    task_region.filter(|region| *region != home)
}

/// Bucket and key of `results.json` for a task output directory.
///
/// The directory is normally a key prefix inside `bucket`; a full
/// `s3://bucket/prefix` URI names its own bucket.
fn results_location(bucket: &str, directory: &str) -> (String, String) {
    let (bucket, directory) = match directory
        .strip_prefix("s3://")
        .and_then(|rest| rest.split_once('/'))
    {
        Some((uri_bucket, prefix)) => (uri_bucket, prefix),
        None => (bucket, directory),
    };
    let directory = directory.trim_end_matches('/');
    let key = if directory.ends_with("results.json") {
        directory.to_string()
    } else if directory.is_empty() {
        "results.json".to_string()
    } else {
        format!("{directory}/results.json")
    };
    (bucket.to_string(), key)
}

/// Region a handle's task lives in: the recorded one, else the ARN's.
fn task_region(handle: &TaskHandle) -> Option<&str> {
    handle
        .region
        .as_deref()
        .or_else(|| region_from_arn(handle.id.as_str()))
}

#[async_trait]
impl TaskService for BraketClient {
    fn name(&self) -> &str {
        "braket"
    }

    async fn submit(&self, request: &TaskRequest) -> HalResult<TaskHandle> {
        let arn = self
            .create_task(&request.device, &request.source, request.shots)
            .await?;
        let region = region_from_arn(&arn).unwrap_or(&self.region).to_string();
        Ok(TaskHandle::new(arn).with_region(region))
    }

    async fn state(&self, handle: &TaskHandle) -> HalResult<TaskState> {
        Ok(self
            .task_state_in(task_region(handle), handle.id.as_str())
            .await?)
    }

    async fn fetch_raw_samples(&self, handle: &TaskHandle) -> HalResult<RawSamples> {
        let result = self
            .task_result_in(task_region(handle), handle.id.as_str())
            .await?;
        debug!(task = %handle.id, "downloaded task result");
        Ok(result.into_raw_samples()?)
    }
}

/// Task result from Braket (stored in S3).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskResult {
    /// Measurement counts (bitstring -> count).
    #[serde(default)]
    pub measurement_counts: Option<HashMap<String, u64>>,
    /// Raw measurements (array of arrays of ints).
    #[serde(default)]
    pub measurements: Option<Vec<Vec<u8>>>,
    /// Qubits in column order.
    #[serde(default)]
    pub measured_qubits: Option<Vec<u32>>,
}

impl TaskResult {
    /// Per-shot rows: `measurements` as is, or rows expanded from
    /// `measurementCounts` in bitstring order.
    pub fn into_raw_samples(self) -> BraketResult<RawSamples> {
        if let Some(measurements) = self.measurements {
            return Ok(RawSamples(measurements));
        }
        if let Some(counts) = self.measurement_counts {
            let mut bitstrings: Vec<(String, u64)> = counts.into_iter().collect();
            bitstrings.sort();
            let mut rows = Vec::new();
            for (bitstring, count) in bitstrings {
                let row: Vec<u8> = bitstring.bytes().map(|b| u8::from(b == b'1')).collect();
                for _ in 0..count {
                    rows.push(row.clone());
                }
            }
            return Ok(RawSamples(rows));
        }
        Err(BraketError::ResultParseError(
            "result has neither measurements nor measurementCounts".to_string(),
        ))
    }
}
