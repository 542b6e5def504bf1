//! Circuit operations.
//!
//! Every operation carries a stable string tag (its variant name) which is
//! what translators and planners match on. Operations fall into four
//! classes: rotations and gates acting on qubits, classical register
//! definitions, measurement-shape declarations, and pragmas.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::parameter::ParameterExpression;

/// A single circuit operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Operation {
    /// Rotation about Z by `theta`.
    RotateZ { qubit: usize, theta: ParameterExpression },
    /// Rotation about X by `theta`.
    RotateX { qubit: usize, theta: ParameterExpression },
    /// Rotation about Y by `theta`.
    RotateY { qubit: usize, theta: ParameterExpression },
    /// Rotation by `theta` about the equatorial axis at azimuth `phi`.
    RotateXY {
        qubit: usize,
        theta: ParameterExpression,
        phi: ParameterExpression,
    },
    PauliX { qubit: usize },
    PauliY { qubit: usize },
    PauliZ { qubit: usize },
    /// `RotateX(π/2)`.
    SqrtPauliX { qubit: usize },
    /// `RotateX(-π/2)`.
    InvSqrtPauliX { qubit: usize },
    Hadamard { qubit: usize },
    /// Trapped-ion π rotation about the axis at azimuth `theta`.
    GPi { qubit: usize, theta: ParameterExpression },
    /// Trapped-ion π/2 rotation about the axis at azimuth `theta`.
    GPi2 { qubit: usize, theta: ParameterExpression },
    CNOT { control: usize, target: usize },
    ControlledPauliZ { control: usize, target: usize },
    ControlledPhaseShift {
        control: usize,
        target: usize,
        theta: ParameterExpression,
    },
    XY {
        control: usize,
        target: usize,
        theta: ParameterExpression,
    },
    /// Fully entangling Mølmer–Sørensen interaction, `exp(-iπ/4 XX)`.
    MolmerSorensenXX { control: usize, target: usize },
    /// Partially entangling Mølmer–Sørensen interaction, `exp(-iθ/2 XX)`.
    VariableMSXX {
        control: usize,
        target: usize,
        theta: ParameterExpression,
    },
    EchoCrossResonance { control: usize, target: usize },
    /// Declares a bit register.
    DefinitionBit {
        name: String,
        length: usize,
        is_output: bool,
    },
    /// Declares a float register.
    DefinitionFloat {
        name: String,
        length: usize,
        is_output: bool,
    },
    /// Declares a complex register.
    DefinitionComplex {
        name: String,
        length: usize,
        is_output: bool,
    },
    /// Statically sets one bit of a declared register.
    InputBit {
        name: String,
        index: usize,
        value: bool,
    },
    /// Measures `qubit` into `readout[readout_index]`.
    MeasureQubit {
        qubit: usize,
        readout: String,
        readout_index: usize,
    },
    /// Declares the shot count and the register the shots land in.
    PragmaSetNumberOfMeasurements {
        number_measurements: usize,
        readout: String,
    },
    /// Measures every qubit `number_measurements` times into `readout`.
    PragmaRepeatedMeasurement {
        readout: String,
        number_measurements: usize,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        qubit_mapping: Option<BTreeMap<usize, usize>>,
    },
    /// Records a global phase; has no physical effect.
    PragmaGlobalPhase { phase: ParameterExpression },
}

impl Operation {
    /// The operation's tag, identical to its variant name.
    pub fn tag(&self) -> &'static str {
        match self {
            Operation::RotateZ { .. } => "RotateZ",
            Operation::RotateX { .. } => "RotateX",
            Operation::RotateY { .. } => "RotateY",
            Operation::RotateXY { .. } => "RotateXY",
            Operation::PauliX { .. } => "PauliX",
            Operation::PauliY { .. } => "PauliY",
            Operation::PauliZ { .. } => "PauliZ",
            Operation::SqrtPauliX { .. } => "SqrtPauliX",
            Operation::InvSqrtPauliX { .. } => "InvSqrtPauliX",
            Operation::Hadamard { .. } => "Hadamard",
            Operation::GPi { .. } => "GPi",
            Operation::GPi2 { .. } => "GPi2",
            Operation::CNOT { .. } => "CNOT",
            Operation::ControlledPauliZ { .. } => "ControlledPauliZ",
            Operation::ControlledPhaseShift { .. } => "ControlledPhaseShift",
            Operation::XY { .. } => "XY",
            Operation::MolmerSorensenXX { .. } => "MolmerSorensenXX",
            Operation::VariableMSXX { .. } => "VariableMSXX",
            Operation::EchoCrossResonance { .. } => "EchoCrossResonance",
            Operation::DefinitionBit { .. } => "DefinitionBit",
            Operation::DefinitionFloat { .. } => "DefinitionFloat",
            Operation::DefinitionComplex { .. } => "DefinitionComplex",
            Operation::InputBit { .. } => "InputBit",
            Operation::MeasureQubit { .. } => "MeasureQubit",
            Operation::PragmaSetNumberOfMeasurements { .. } => "PragmaSetNumberOfMeasurements",
            Operation::PragmaRepeatedMeasurement { .. } => "PragmaRepeatedMeasurement",
            Operation::PragmaGlobalPhase { .. } => "PragmaGlobalPhase",
        }
    }

    /// Qubits acted on, control first for two-qubit gates.
    ///
    /// `MeasureQubit` reports its measured qubit; definitions and pragmas
    /// report none.
    pub fn qubits(&self) -> Vec<usize> {
        match self {
            Operation::RotateZ { qubit, .. }
            | Operation::RotateX { qubit, .. }
            | Operation::RotateY { qubit, .. }
            | Operation::RotateXY { qubit, .. }
            | Operation::PauliX { qubit }
            | Operation::PauliY { qubit }
            | Operation::PauliZ { qubit }
            | Operation::SqrtPauliX { qubit }
            | Operation::InvSqrtPauliX { qubit }
            | Operation::Hadamard { qubit }
            | Operation::GPi { qubit, .. }
            | Operation::GPi2 { qubit, .. }
            | Operation::MeasureQubit { qubit, .. } => vec![*qubit],
            Operation::CNOT { control, target }
            | Operation::ControlledPauliZ { control, target }
            | Operation::ControlledPhaseShift {
                control, target, ..
            }
            | Operation::XY {
                control, target, ..
            }
            | Operation::MolmerSorensenXX { control, target }
            | Operation::VariableMSXX {
                control, target, ..
            }
            | Operation::EchoCrossResonance { control, target } => vec![*control, *target],
            Operation::DefinitionBit { .. }
            | Operation::DefinitionFloat { .. }
            | Operation::DefinitionComplex { .. }
            | Operation::InputBit { .. }
            | Operation::PragmaSetNumberOfMeasurements { .. }
            | Operation::PragmaRepeatedMeasurement { .. }
            | Operation::PragmaGlobalPhase { .. } => Vec::new(),
        }
    }

    /// Whether this operation shapes measurement (shot count, readout or
    /// per-qubit readout mapping).
    pub fn involves_measurement(&self) -> bool {
        matches!(
            self,
            Operation::MeasureQubit { .. }
                | Operation::PragmaSetNumberOfMeasurements { .. }
                | Operation::PragmaRepeatedMeasurement { .. }
        )
    }

    /// Whether this is a gate (acts unitarily on at least one qubit).
    pub fn is_gate(&self) -> bool {
        !self.qubits().is_empty() && !matches!(self, Operation::MeasureQubit { .. })
    }

    /// Explicit `(shots, readout)` declaration, if this operation is one.
    pub fn shot_declaration(&self) -> Option<(usize, &str)> {
        match self {
            Operation::PragmaSetNumberOfMeasurements {
                number_measurements,
                readout,
            }
            | Operation::PragmaRepeatedMeasurement {
                number_measurements,
                readout,
                ..
            } => Some((*number_measurements, readout.as_str())),
            _ => None,
        }
    }

    /// Readout register this operation writes, if any.
    pub fn readout(&self) -> Option<&str> {
        match self {
            Operation::MeasureQubit { readout, .. }
            | Operation::PragmaSetNumberOfMeasurements { readout, .. }
            | Operation::PragmaRepeatedMeasurement { readout, .. } => Some(readout),
            _ => None,
        }
    }

    /// Angles carried by the operation, in declaration order.
    pub fn parameters(&self) -> Vec<&ParameterExpression> {
        match self {
            Operation::RotateZ { theta, .. }
            | Operation::RotateX { theta, .. }
            | Operation::RotateY { theta, .. }
            | Operation::GPi { theta, .. }
            | Operation::GPi2 { theta, .. }
            | Operation::ControlledPhaseShift { theta, .. }
            | Operation::XY { theta, .. }
            | Operation::VariableMSXX { theta, .. } => vec![theta],
            Operation::RotateXY { theta, phi, .. } => vec![theta, phi],
            Operation::PragmaGlobalPhase { phase } => vec![phase],
            _ => Vec::new(),
        }
    }

    /// Replace known symbols in every angle.
    pub fn substitute_parameters(&self, values: &HashMap<String, f64>) -> Self {
        let mut op = self.clone();
        match &mut op {
            Operation::RotateZ { theta, .. }
            | Operation::RotateX { theta, .. }
            | Operation::RotateY { theta, .. }
            | Operation::GPi { theta, .. }
            | Operation::GPi2 { theta, .. }
            | Operation::ControlledPhaseShift { theta, .. }
            | Operation::XY { theta, .. }
            | Operation::VariableMSXX { theta, .. } => *theta = theta.substitute(values),
            Operation::RotateXY { theta, phi, .. } => {
                *theta = theta.substitute(values);
                *phi = phi.substitute(values);
            }
            Operation::PragmaGlobalPhase { phase } => *phase = phase.substitute(values),
            _ => {}
        }
        op
    }

    /// Structural checks that do not need the surrounding circuit.
    pub fn validate(&self) -> IrResult<()> {
        let qubits = self.qubits();
        if let [a, b] = qubits.as_slice() {
            if a == b {
                return Err(IrError::DuplicateQubit {
                    tag: self.tag(),
                    qubit: *a,
                });
            }
        }
        Ok(())
    }
}
