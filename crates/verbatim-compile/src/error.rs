//! Error types for translation and text compilation.

use thiserror::Error;
use verbatim_ir::IrError;

use crate::family::DeviceFamily;

/// Errors raised while lowering a circuit.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CompileError {
    /// An operation is neither native, foldable, nor a pass-through for the family.
    #[error("Operation '{tag}' is not supported by the {family} verbatim translator")]
    UnsupportedOperation {
        /// Tag of the first offending operation.
        tag: String,
        /// Target device family.
        family: DeviceFamily,
    },

    /// A logical qubit has no physical counterpart on the device.
    #[error("Logical qubit {qubit} has no physical qubit on {family} devices")]
    UnmappedQubit {
        /// Target device family.
        family: DeviceFamily,
        /// Logical qubit index.
        qubit: usize,
    },

    /// A qubit index does not fit the unitary being built.
    #[error("Qubit {qubit} is out of range for a {num_qubits}-qubit unitary")]
    QubitOutOfRange {
        /// Offending qubit index.
        qubit: usize,
        /// Width of the unitary.
        num_qubits: usize,
    },

    /// IR error, most commonly an unbound angle at render time.
    #[error(transparent)]
    Ir(#[from] IrError),
}

/// Result type for compilation.
pub type CompileResult<T> = Result<T, CompileError>;
