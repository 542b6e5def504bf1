//! Error types for the HAL crate.

use thiserror::Error;

use crate::measurement::MeasurementKind;

/// Errors that can occur in HAL operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HalError {
    /// Backend is not available.
    #[error("Backend not available: {0}")]
    BackendUnavailable(String),

    /// Task submission failed.
    #[error("Task submission failed: {0}")]
    SubmissionFailed(String),

    /// Task execution failed.
    #[error("Task failed: {0}")]
    TaskFailed(String),

    /// Task was cancelled.
    #[error("Task cancelled")]
    TaskCancelled,

    /// Task not found.
    #[error("Task not found: {0}")]
    TaskNotFound(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Unsupported feature.
    #[error("Unsupported feature: {0}")]
    Unsupported(String),

    /// A stored measurement payload does not match the requested type.
    #[error("Measurement kind mismatch: expected {expected}, found {found}")]
    MeasurementKindMismatch {
        expected: MeasurementKind,
        found: MeasurementKind,
    },

    /// Generic backend error.
    #[error("Backend error: {0}")]
    Backend(String),
}

/// Result type for HAL operations.
pub type HalResult<T> = Result<T, HalError>;
