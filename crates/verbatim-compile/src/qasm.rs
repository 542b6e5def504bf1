//! OpenQASM 3 text compiler for non-verbatim submission.
//!
//! Produces Braket-flavoured OpenQASM 3: logical qubits in a `q` register,
//! classical registers from `DefinitionBit`, and measurements either from
//! explicit `MeasureQubit` operations or, when only a shot-count pragma is
//! present, a measurement of every qubit into the pragma's readout.

use std::collections::BTreeMap;

use verbatim_ir::{Circuit, Operation, ParameterExpression};

use crate::error::CompileResult;

/// Emit a circuit as OpenQASM 3 source.
pub fn emit(circuit: &Circuit) -> CompileResult<String> {
    let mut emitter = Emitter::new();
    emitter.emit_circuit(circuit)?;
    Ok(emitter.output)
}

struct Emitter {
    output: String,
}

impl Emitter {
    fn new() -> Self {
        Self {
            output: String::new(),
        }
    }

    fn writeln(&mut self, line: &str) {
        self.output.push_str(line);
        self.output.push('\n');
    }

    fn emit_circuit(&mut self, circuit: &Circuit) -> CompileResult<()> {
        self.writeln("OPENQASM 3.0;");

        let num_qubits = circuit.number_of_qubits();
        if num_qubits > 0 {
            self.writeln(&format!("qubit[{num_qubits}] q;"));
        }

        // Register declarations come first so later statements can index them.
        let mut registers: BTreeMap<&str, usize> = BTreeMap::new();
        let mut order: Vec<&str> = Vec::new();
        for op in circuit {
            if let Operation::DefinitionBit { name, length, .. } = op {
                if registers.insert(name, *length).is_none() {
                    order.push(name);
                }
            }
        }
        let measures_explicitly = circuit.filter_by_tag("MeasureQubit").next().is_some();
        let measure_all_into = if measures_explicitly {
            None
        } else {
            circuit.iter().find_map(Operation::shot_declaration).map(|(_, readout)| readout)
        };
        if let Some(readout) = measure_all_into {
            let length = registers.entry(readout).or_insert(0);
            if *length == 0 {
                order.push(readout);
            }
            *length = (*length).max(num_qubits);
        }
        for name in order {
            self.writeln(&format!("bit[{}] {name};", registers[name]));
        }

        for op in circuit {
            self.emit_operation(op)?;
        }

        if let Some(readout) = measure_all_into {
            for qubit in 0..num_qubits {
                self.writeln(&format!("{readout}[{qubit}] = measure q[{qubit}];"));
            }
        }
        Ok(())
    }

    fn emit_operation(&mut self, op: &Operation) -> CompileResult<()> {
        let half_pi = ParameterExpression::pi_over(2.0);
        let zero = ParameterExpression::default();
        match op {
            Operation::RotateZ { qubit, theta } => self.gate("rz", &[theta], &[*qubit]),
            Operation::RotateX { qubit, theta } => self.gate("rx", &[theta], &[*qubit]),
            Operation::RotateY { qubit, theta } => self.gate("ry", &[theta], &[*qubit]),
            Operation::RotateXY { qubit, theta, phi } => self.gate("prx", &[theta, phi], &[*qubit]),
            Operation::PauliX { qubit } => self.gate("x", &[], &[*qubit]),
            Operation::PauliY { qubit } => self.gate("y", &[], &[*qubit]),
            Operation::PauliZ { qubit } => self.gate("z", &[], &[*qubit]),
            Operation::SqrtPauliX { qubit } => self.gate("v", &[], &[*qubit]),
            Operation::InvSqrtPauliX { qubit } => self.gate("vi", &[], &[*qubit]),
            Operation::Hadamard { qubit } => self.gate("h", &[], &[*qubit]),
            Operation::GPi { qubit, theta } => self.gate("gpi", &[theta], &[*qubit]),
            Operation::GPi2 { qubit, theta } => self.gate("gpi2", &[theta], &[*qubit]),
            Operation::CNOT { control, target } => self.gate("cnot", &[], &[*control, *target]),
            Operation::ControlledPauliZ { control, target } => {
                self.gate("cz", &[], &[*control, *target])
            }
            Operation::ControlledPhaseShift {
                control,
                target,
                theta,
            } => self.gate("cphaseshift", &[theta], &[*control, *target]),
            Operation::XY {
                control,
                target,
                theta,
            } => self.gate("xy", &[theta], &[*control, *target]),
            Operation::MolmerSorensenXX { control, target } => {
                self.gate("ms", &[&zero, &zero, &half_pi], &[*control, *target])
            }
            Operation::VariableMSXX {
                control,
                target,
                theta,
            } => self.gate("ms", &[&zero, &zero, theta], &[*control, *target]),
            Operation::EchoCrossResonance { control, target } => {
                self.gate("ecr", &[], &[*control, *target])
            }
            Operation::MeasureQubit {
                qubit,
                readout,
                readout_index,
            } => {
                self.writeln(&format!("{readout}[{readout_index}] = measure q[{qubit}];"));
                Ok(())
            }
            // Declared up front, or resolved during result assembly.
            Operation::DefinitionBit { .. }
            | Operation::DefinitionFloat { .. }
            | Operation::DefinitionComplex { .. }
            | Operation::InputBit { .. }
            | Operation::PragmaSetNumberOfMeasurements { .. }
            | Operation::PragmaRepeatedMeasurement { .. }
            | Operation::PragmaGlobalPhase { .. } => Ok(()),
        }
    }

    fn gate(
        &mut self,
        name: &str,
        params: &[&ParameterExpression],
        qubits: &[usize],
    ) -> CompileResult<()> {
        let qubits = qubits
            .iter()
            .map(|q| format!("q[{q}]"))
            .collect::<Vec<_>>()
            .join(", ");
        if params.is_empty() {
            self.writeln(&format!("{name} {qubits};"));
        } else {
            let values = params
                .iter()
                .map(|p| p.value().map(|v| v.to_string()))
                .collect::<Result<Vec<_>, _>>()?;
            self.writeln(&format!("{name}({}) {qubits};", values.join(", ")));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CompileError;

    #[test]
    fn test_emit_with_measure_qubit() {
        let circuit = Circuit::from_operations([
            Operation::DefinitionBit {
                name: "ro".into(),
                length: 2,
                is_output: true,
            },
            Operation::PauliX { qubit: 0 },
            Operation::CNOT {
                control: 0,
                target: 1,
            },
            Operation::MeasureQubit {
                qubit: 0,
                readout: "ro".into(),
                readout_index: 0,
            },
            Operation::MeasureQubit {
                qubit: 1,
                readout: "ro".into(),
                readout_index: 1,
            },
        ])
        .unwrap();
        let qasm = emit(&circuit).unwrap();
        assert_eq!(
            qasm,
            "OPENQASM 3.0;\nqubit[2] q;\nbit[2] ro;\nx q[0];\ncnot q[0], q[1];\n\
             ro[0] = measure q[0];\nro[1] = measure q[1];\n"
        );
    }

    #[test]
    fn test_emit_measure_all_from_pragma() {
        let circuit = Circuit::from_operations([
            Operation::RotateZ {
                qubit: 1,
                theta: 0.5_f64.into(),
            },
            Operation::PragmaSetNumberOfMeasurements {
                number_measurements: 20,
                readout: "out".into(),
            },
        ])
        .unwrap();
        let qasm = emit(&circuit).unwrap();
        assert!(qasm.contains("bit[2] out;\n"));
        assert!(qasm.contains("rz(0.5) q[1];\n"));
        assert!(qasm.ends_with("out[0] = measure q[0];\nout[1] = measure q[1];\n"));
    }

    #[test]
    fn test_float_and_complex_registers_are_not_rendered() {
        let circuit = Circuit::from_operations([
            Operation::DefinitionFloat {
                name: "f".into(),
                length: 1,
                is_output: true,
            },
            Operation::DefinitionComplex {
                name: "c".into(),
                length: 2,
                is_output: true,
            },
            Operation::PauliX { qubit: 0 },
        ])
        .unwrap();
        assert_eq!(emit(&circuit).unwrap(), "OPENQASM 3.0;\nqubit[1] q;\nx q[0];\n");
    }

    #[test]
    fn test_unbound_symbol_fails() {
        let circuit = Circuit::from_operations([Operation::RotateX {
            qubit: 0,
            theta: ParameterExpression::symbol("t"),
        }])
        .unwrap();
        assert!(matches!(emit(&circuit), Err(CompileError::Ir(_))));
    }
}
