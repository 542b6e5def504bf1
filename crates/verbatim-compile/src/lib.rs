//! Verbatim compilation
//!
//! Two ways to turn a [`verbatim_ir::Circuit`] into something a Braket
//! device accepts:
//!
//! - [`qasm::emit`]: a plain OpenQASM 3 text compiler. The device compiles
//!   the program further on its side.
//! - [`DeviceFamily::translate`]: a phase-tracking translator producing a
//!   [`NativeBlock`] of device-native gates that runs exactly as written
//!   inside a `#pragma braket verbatim` box.
//!
//! # Phase tracking
//!
//! IonQ and IQM hardware have no physical Z rotation. Their translators
//! keep a per-qubit [`PhaseLedger`] and shift the phase of every following
//! equatorial gate on that qubit instead. Rigetti and OQC execute `rz`
//! natively and emit it as is.
//!
//! | Family | Native gates | Folds `rz` | Qubit numbering |
//! |--------|--------------|------------|-----------------|
//! | IonQ | `gpi`, `gpi2`, `ms` | yes | logical |
//! | Rigetti | `rx(±π/2, π)`, `rz`, `cz`, `cphaseshift`, `xy` | no | octagon table |
//! | OQC | `rz`, `v`, `x`, `ecr` | no | logical |
//! | IQM | `prx`, `cz` | yes | logical |
//!
//! # Example
//!
//! ```rust
//! use verbatim_compile::DeviceFamily;
//! use verbatim_ir::{Circuit, Operation};
//!
//! let circuit = Circuit::from_operations([
//!     Operation::RotateZ { qubit: 0, theta: 0.25_f64.into() },
//!     Operation::GPi2 { qubit: 0, theta: 0.0_f64.into() },
//! ])
//! .unwrap();
//!
//! let block = DeviceFamily::IonQ.translate(&circuit).unwrap();
//! let qasm = block.to_openqasm().unwrap();
//! assert!(qasm.contains("gpi2(-0.25) $0;"));
//! ```

pub mod error;
pub mod family;
pub mod ledger;
pub mod native;
pub mod qasm;
pub mod translate;
pub mod unitary;

pub use error::{CompileError, CompileResult};
pub use family::DeviceFamily;
pub use ledger::PhaseLedger;
pub use native::{NativeBlock, NativeGate, NativeInstruction};
pub use translate::Translator;
