//! Rigetti rules: restricted `rx`, native `rz`, and the two-qubit family.
//!
//! Rigetti lattices number qubits by octagon, so logical qubits are placed
//! on physical indices through a fixed table: eight qubits per octagon,
//! octagons 0–4 at `10·k`, octagons 5–9 at `100 + 10·(k - 5)`.

use verbatim_ir::{Operation, ParameterExpression};

use super::Translator;
use crate::error::{CompileError, CompileResult};
use crate::family::DeviceFamily;
use crate::ledger::PhaseLedger;
use crate::native::{NativeGate, NativeInstruction};

const QUBITS_PER_OCTAGON: usize = 8;
const OCTAGONS: usize = 10;

/// Physical index for a logical qubit on a Rigetti lattice.
pub fn rigetti_physical_qubit(logical: usize) -> Option<usize> {
    let octagon = logical / QUBITS_PER_OCTAGON;
    let offset = logical % QUBITS_PER_OCTAGON;
    match octagon {
        0..5 => Some(octagon * 10 + offset),
        5..OCTAGONS => Some(100 + (octagon - 5) * 10 + offset),
        _ => None,
    }
}

/// Translator for Rigetti superconducting devices.
#[derive(Debug, Clone, Copy, Default)]
pub struct RigettiTranslator;

impl Translator for RigettiTranslator {
    fn family(&self) -> DeviceFamily {
        DeviceFamily::Rigetti
    }

    fn lower(&self, op: &Operation, _ledger: &mut PhaseLedger) -> Option<Vec<NativeInstruction>> {
        let rx = |qubit: usize, theta: ParameterExpression| {
            NativeInstruction::single(NativeGate::Rx { theta }, qubit)
        };
        let instruction = match op {
            Operation::PauliX { qubit } => rx(*qubit, ParameterExpression::pi()),
            Operation::SqrtPauliX { qubit } => rx(*qubit, ParameterExpression::pi_over(2.0)),
            Operation::InvSqrtPauliX { qubit } => rx(*qubit, -ParameterExpression::pi_over(2.0)),
            Operation::RotateZ { qubit, theta } => {
                NativeInstruction::single(NativeGate::Rz { theta: theta.clone() }, *qubit)
            }
            Operation::ControlledPauliZ { control, target } => {
                NativeInstruction::pair(NativeGate::Cz, *control, *target)
            }
            Operation::ControlledPhaseShift {
                control,
                target,
                theta,
            } => NativeInstruction::pair(
                NativeGate::CPhaseShift {
                    theta: theta.clone(),
                },
                *control,
                *target,
            ),
            Operation::XY {
                control,
                target,
                theta,
            } => NativeInstruction::pair(
                NativeGate::Xy {
                    theta: theta.clone(),
                },
                *control,
                *target,
            ),
            _ => return None,
        };
        Some(vec![instruction])
    }

    fn physical_qubit(&self, logical: usize) -> CompileResult<usize> {
        rigetti_physical_qubit(logical).ok_or(CompileError::UnmappedQubit {
            family: DeviceFamily::Rigetti,
            qubit: logical,
        })
    }
}
