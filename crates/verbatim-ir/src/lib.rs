//! Verbatim Circuit Intermediate Representation
//!
//! A flat, ordered circuit model: a [`Circuit`] is a sequence of
//! [`Operation`]s, each identified by a string tag. This is the surface the
//! dispatch planner and the device translators read; nothing downstream
//! mutates a circuit once built.
//!
//! # Example
//!
//! ```rust
//! use verbatim_ir::{Circuit, Operation, ParameterExpression};
//!
//! let mut circuit = Circuit::new();
//! circuit
//!     .add(Operation::DefinitionBit { name: "ro".into(), length: 2, is_output: true })
//!     .unwrap()
//!     .add(Operation::RotateZ { qubit: 0, theta: ParameterExpression::pi_over(4.0) })
//!     .unwrap()
//!     .add(Operation::ControlledPauliZ { control: 0, target: 1 })
//!     .unwrap();
//!
//! assert_eq!(circuit.number_of_qubits(), 2);
//! assert_eq!(circuit.filter_by_tag("RotateZ").count(), 1);
//! ```

pub mod circuit;
pub mod error;
pub mod operation;
pub mod parameter;

pub use circuit::Circuit;
pub use error::{IrError, IrResult};
pub use operation::Operation;
pub use parameter::{ANGLE_EPSILON, ParameterExpression};
