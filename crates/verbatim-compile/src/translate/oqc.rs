//! OQC rules: `rz`, `v`, `x`, `ecr`. No folding.

use verbatim_ir::Operation;

use super::Translator;
use crate::family::DeviceFamily;
use crate::ledger::PhaseLedger;
use crate::native::{NativeGate, NativeInstruction};

/// Translator for OQC devices.
#[derive(Debug, Clone, Copy, Default)]
pub struct OqcTranslator;

impl Translator for OqcTranslator {
    fn family(&self) -> DeviceFamily {
        DeviceFamily::Oqc
    }

    fn lower(&self, op: &Operation, _ledger: &mut PhaseLedger) -> Option<Vec<NativeInstruction>> {
        let instruction = match op {
            Operation::RotateZ { qubit, theta } => {
                NativeInstruction::single(NativeGate::Rz { theta: theta.clone() }, *qubit)
            }
            Operation::SqrtPauliX { qubit } => NativeInstruction::single(NativeGate::V, *qubit),
            Operation::PauliX { qubit } => NativeInstruction::single(NativeGate::X, *qubit),
            Operation::EchoCrossResonance { control, target } => {
                NativeInstruction::pair(NativeGate::Ecr, *control, *target)
            }
            _ => return None,
        };
        Some(vec![instruction])
    }
}
