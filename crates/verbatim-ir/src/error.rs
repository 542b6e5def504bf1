//! Error types for the IR crate.

use thiserror::Error;

/// Errors that can occur while building or querying circuits.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IrError {
    /// A two-qubit operation names the same qubit twice.
    #[error("Operation '{tag}' acts on qubit {qubit} twice")]
    DuplicateQubit {
        /// Operation tag.
        tag: &'static str,
        /// The repeated qubit.
        qubit: usize,
    },

    /// A classical register index is outside the declared length.
    #[error("Index {index} is out of range for register '{register}' of length {length}")]
    RegisterIndexOutOfRange {
        /// Register name.
        register: String,
        /// Offending index.
        index: usize,
        /// Declared register length.
        length: usize,
    },

    /// A register was referenced but never declared.
    #[error("Register '{0}' is not defined in the circuit")]
    UndefinedRegister(String),

    /// An angle still contains a free symbol.
    #[error("Parameter '{0}' is unbound")]
    UnboundParameter(String),
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;
