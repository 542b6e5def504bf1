//! Device-native instructions and the verbatim block that wraps them.
//!
//! A [`NativeBlock`] keeps instructions on logical qubits together with the
//! logical→physical mapping chosen by the translator; the mapping is only
//! applied when the block is rendered.

use std::collections::BTreeMap;

use verbatim_ir::ParameterExpression;

use crate::error::CompileResult;
use crate::family::DeviceFamily;

/// A gate executable by some device without recompilation.
#[derive(Debug, Clone, PartialEq)]
pub enum NativeGate {
    /// IonQ π rotation about the axis at azimuth `phi`.
    Gpi { phi: ParameterExpression },
    /// IonQ π/2 rotation about the axis at azimuth `phi`.
    Gpi2 { phi: ParameterExpression },
    /// IonQ Mølmer–Sørensen gate with per-qubit phases.
    Ms {
        phi0: ParameterExpression,
        phi1: ParameterExpression,
        theta: ParameterExpression,
    },
    /// IQM phased X rotation.
    Prx {
        theta: ParameterExpression,
        phi: ParameterExpression,
    },
    Rx { theta: ParameterExpression },
    Rz { theta: ParameterExpression },
    /// `sqrt(X)`.
    V,
    X,
    Cz,
    CPhaseShift { theta: ParameterExpression },
    Xy { theta: ParameterExpression },
    Ecr,
}

impl NativeGate {
    /// OpenQASM gate name as understood by Braket.
    pub fn name(&self) -> &'static str {
        match self {
            NativeGate::Gpi { .. } => "gpi",
            NativeGate::Gpi2 { .. } => "gpi2",
            NativeGate::Ms { .. } => "ms",
            NativeGate::Prx { .. } => "prx",
            NativeGate::Rx { .. } => "rx",
            NativeGate::Rz { .. } => "rz",
            NativeGate::V => "v",
            NativeGate::X => "x",
            NativeGate::Cz => "cz",
            NativeGate::CPhaseShift { .. } => "cphaseshift",
            NativeGate::Xy { .. } => "xy",
            NativeGate::Ecr => "ecr",
        }
    }

    /// Number of qubits the gate acts on.
    pub fn num_qubits(&self) -> usize {
        match self {
            NativeGate::Ms { .. }
            | NativeGate::Cz
            | NativeGate::CPhaseShift { .. }
            | NativeGate::Xy { .. }
            | NativeGate::Ecr => 2,
            _ => 1,
        }
    }

    /// Angles in OpenQASM argument order.
    pub fn parameters(&self) -> Vec<&ParameterExpression> {
        match self {
            NativeGate::Gpi { phi } | NativeGate::Gpi2 { phi } => vec![phi],
            NativeGate::Ms { phi0, phi1, theta } => vec![phi0, phi1, theta],
            NativeGate::Prx { theta, phi } => vec![theta, phi],
            NativeGate::Rx { theta }
            | NativeGate::Rz { theta }
            | NativeGate::CPhaseShift { theta }
            | NativeGate::Xy { theta } => vec![theta],
            NativeGate::V | NativeGate::X | NativeGate::Cz | NativeGate::Ecr => Vec::new(),
        }
    }
}

/// A native gate applied to logical qubits.
#[derive(Debug, Clone, PartialEq)]
pub struct NativeInstruction {
    pub gate: NativeGate,
    pub qubits: Vec<usize>,
}

impl NativeInstruction {
    /// Single-qubit instruction.
    pub fn single(gate: NativeGate, qubit: usize) -> Self {
        Self {
            gate,
            qubits: vec![qubit],
        }
    }

    /// Two-qubit instruction, first qubit first.
    pub fn pair(gate: NativeGate, first: usize, second: usize) -> Self {
        Self {
            gate,
            qubits: vec![first, second],
        }
    }
}

/// Translated circuit ready to be wrapped in a Braket verbatim box.
#[derive(Debug, Clone, PartialEq)]
pub struct NativeBlock {
    /// Family the block was translated for.
    pub family: DeviceFamily,
    /// Instructions on logical qubits, in circuit order.
    pub instructions: Vec<NativeInstruction>,
    /// Logical→physical qubit mapping for every involved qubit.
    pub qubit_mapping: BTreeMap<usize, usize>,
    /// Logical qubits measured after the box, in column order of the results.
    pub measured_qubits: Vec<usize>,
    /// Phases still pending in the ledger after the last gate.
    pub residual_phases: BTreeMap<usize, ParameterExpression>,
}

impl NativeBlock {
    /// Number of native instructions.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Whether the block has no instructions.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Physical index of a logical qubit.
    pub fn physical(&self, logical: usize) -> usize {
        self.qubit_mapping.get(&logical).copied().unwrap_or(logical)
    }

    /// Render as a Braket OpenQASM 3 program.
    ///
    /// Fails if any angle still contains a free symbol.
    pub fn to_openqasm(&self) -> CompileResult<String> {
        let mut out = String::new();
        let measured = self.measured_qubits.len();

        push_line(&mut out, "OPENQASM 3.0;");
        if measured > 0 {
            push_line(&mut out, &format!("bit[{measured}] b;"));
        }
        push_line(&mut out, "#pragma braket verbatim");
        push_line(&mut out, "box {");
        for instruction in &self.instructions {
            let params = instruction
                .gate
                .parameters()
                .into_iter()
                .map(|p| p.value().map(|v| v.to_string()))
                .collect::<Result<Vec<_>, _>>()?;
            let qubits = instruction
                .qubits
                .iter()
                .map(|q| format!("${}", self.physical(*q)))
                .collect::<Vec<_>>()
                .join(", ");
            let name = instruction.gate.name();
            if params.is_empty() {
                push_line(&mut out, &format!("    {name} {qubits};"));
            } else {
                push_line(&mut out, &format!("    {name}({}) {qubits};", params.join(", ")));
            }
        }
        push_line(&mut out, "}");
        for (column, qubit) in self.measured_qubits.iter().enumerate() {
            push_line(
                &mut out,
                &format!("b[{column}] = measure ${};", self.physical(*qubit)),
            );
        }
        Ok(out)
    }
}

fn push_line(out: &mut String, line: &str) {
    out.push_str(line);
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block() -> NativeBlock {
        NativeBlock {
            family: DeviceFamily::Rigetti,
            instructions: vec![
                NativeInstruction::single(
                    NativeGate::Rx {
                        theta: ParameterExpression::constant(0.5),
                    },
                    8,
                ),
                NativeInstruction::pair(NativeGate::Cz, 0, 8),
            ],
            qubit_mapping: [(0, 0), (8, 10)].into_iter().collect(),
            measured_qubits: vec![0, 8],
            residual_phases: BTreeMap::new(),
        }
    }

    #[test]
    fn test_render_verbatim_box() {
        let qasm = block().to_openqasm().unwrap();
        let expected = "OPENQASM 3.0;\n\
                        bit[2] b;\n\
                        #pragma braket verbatim\n\
                        box {\n    rx(0.5) $10;\n    cz $0, $10;\n}\n\
                        b[0] = measure $0;\n\
                        b[1] = measure $10;\n";
        assert_eq!(qasm, expected);
    }

    #[test]
    fn test_render_rejects_free_symbol() {
        let mut b = block();
        b.instructions.push(NativeInstruction::single(
            NativeGate::Rz {
                theta: ParameterExpression::symbol("theta"),
            },
            0,
        ));
        assert!(b.to_openqasm().is_err());
    }

    #[test]
    fn test_gate_arity() {
        assert_eq!(NativeGate::Ecr.num_qubits(), 2);
        assert_eq!(NativeGate::V.num_qubits(), 1);
        let ms = NativeGate::Ms {
            phi0: 0.0_f64.into(),
            phi1: 0.0_f64.into(),
            theta: 0.5_f64.into(),
        };
        assert_eq!(ms.parameters().len(), 3);
    }
}
