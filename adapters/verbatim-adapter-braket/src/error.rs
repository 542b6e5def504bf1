//! Error types for the Braket adapter.

use std::fmt;

use thiserror::Error;
use verbatim_compile::CompileError;
use verbatim_hal::HalError;

use crate::config::ConfigError;

/// Result type for Braket operations.
pub type BraketResult<T> = Result<T, BraketError>;

/// Which hardware safety limit was exceeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitKind {
    /// Number of shots.
    Shots,
    /// Number of operations in the circuit.
    Length,
}

impl fmt::Display for LimitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LimitKind::Shots => f.write_str("shots"),
            LimitKind::Length => f.write_str("length"),
        }
    }
}

/// Errors that can occur when dispatching to AWS Braket.
#[derive(Debug, Error)]
pub enum BraketError {
    /// More than one shot-count declaration in a single circuit.
    #[error("Circuit declares the number of measurements {count} times; at most one is allowed")]
    AmbiguousMeasurement {
        /// Number of declarations found.
        count: usize,
    },

    /// An operation cannot be represented on the chosen target.
    #[error("Operation '{tag}' is not supported by {family}")]
    UnsupportedOperation {
        /// Tag of the offending operation.
        tag: String,
        /// Device family.
        family: String,
    },

    /// A hardware safety limit was exceeded.
    #[error("Requested {kind} {requested} exceeds the limit of {limit}")]
    LimitExceeded {
        kind: LimitKind,
        requested: usize,
        limit: usize,
    },

    /// The device is neither a simulator nor allowed hardware.
    #[error(
        "Device '{0}' is not a simulator; set allow_hardware to run on cost-incurring devices"
    )]
    DeviceNotAllowed(String),

    /// Batch members resolve to different shot counts.
    #[error("Batch circuits must share one shot count, found {shots:?}")]
    HeterogeneousShots {
        /// Shot count of each circuit, in order.
        shots: Vec<usize>,
    },

    /// The remote task ended in `FAILED`.
    #[error("Task {task} failed: {reason}")]
    RemoteJobFailed { task: String, reason: String },

    /// The remote task ended in `CANCELLED`.
    #[error("Task {0} was cancelled")]
    RemoteJobCancelled(String),

    /// The caller-side poll bound ran out.
    #[error("Result not available after {polls} polls")]
    PollTimeout { polls: usize },

    /// Verbatim mode is on but no translator matches the device.
    #[error("No verbatim translator matches device '{0}'")]
    NoVerbatimTranslator(String),

    /// A local simulator was selected but no local executor is attached.
    #[error("Local simulator '{0}' selected but no local executor is configured")]
    LocalSimulatorUnavailable(String),

    /// Missing S3 bucket configuration.
    #[error("S3 bucket not configured. Set VERBATIM_BRAKET_S3_BUCKET environment variable.")]
    MissingS3Bucket,

    /// Braket API error.
    #[error("Braket API error: {0}")]
    BraketApi(String),

    /// S3 error.
    #[error("S3 error: {0}")]
    S3Error(String),

    /// Result parsing error.
    #[error("Failed to parse task result: {0}")]
    ResultParseError(String),

    /// Invalid task ARN.
    #[error("Invalid task ARN: {0}")]
    InvalidTaskArn(String),

    /// A serialized queued run is inconsistent.
    #[error("Invalid queued-run snapshot: {0}")]
    InvalidSnapshot(String),

    /// Translation or text compilation failed.
    #[error("Compilation error: {0}")]
    Compile(CompileError),

    /// Error reported by the task service or measurement.
    #[error(transparent)]
    Hal(#[from] HalError),

    /// JSON error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Configuration error.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl From<CompileError> for BraketError {
    fn from(e: CompileError) -> Self {
        match e {
            CompileError::UnsupportedOperation { tag, family } => {
                BraketError::UnsupportedOperation {
                    tag,
                    family: family.to_string(),
                }
            }
            other => BraketError::Compile(other),
        }
    }
}

impl From<BraketError> for HalError {
    fn from(e: BraketError) -> Self {
        match e {
            BraketError::Hal(inner) => inner,
            BraketError::MissingS3Bucket | BraketError::Config(_) => {
                HalError::Configuration(e.to_string())
            }
            BraketError::RemoteJobFailed { reason, .. } => HalError::TaskFailed(reason),
            BraketError::RemoteJobCancelled(_) => HalError::TaskCancelled,
            BraketError::InvalidTaskArn(arn) => HalError::TaskNotFound(arn),
            BraketError::DeviceNotAllowed(_) | BraketError::LocalSimulatorUnavailable(_) => {
                HalError::BackendUnavailable(e.to_string())
            }
            BraketError::UnsupportedOperation { .. } => HalError::Unsupported(e.to_string()),
            BraketError::JsonError(inner) => HalError::Serialization(inner),
            _ => HalError::Backend(e.to_string()),
        }
    }
}
