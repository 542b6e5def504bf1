//! IQM rules: `prx` and `cz`, with `rz` folded into the `prx` phase.
//!
//! `cz` is diagonal and commutes with Z rotations, so pending phases pass
//! through it untouched.

use verbatim_ir::Operation;

use super::{Translator, is_common_pass_through};
use crate::family::DeviceFamily;
use crate::ledger::PhaseLedger;
use crate::native::{NativeGate, NativeInstruction};

/// Translator for IQM devices.
#[derive(Debug, Clone, Copy, Default)]
pub struct IqmTranslator;

impl Translator for IqmTranslator {
    fn family(&self) -> DeviceFamily {
        DeviceFamily::Iqm
    }

    fn lower(&self, op: &Operation, ledger: &mut PhaseLedger) -> Option<Vec<NativeInstruction>> {
        let lowered = match op {
            Operation::RotateZ { qubit, theta } => {
                ledger.accumulate(*qubit, theta);
                Vec::new()
            }
            Operation::RotateXY { qubit, theta, phi } => vec![NativeInstruction::single(
                NativeGate::Prx {
                    theta: theta.clone(),
                    phi: ledger.shifted(*qubit, phi),
                },
                *qubit,
            )],
            Operation::ControlledPauliZ { control, target } => {
                vec![NativeInstruction::pair(NativeGate::Cz, *control, *target)]
            }
            _ => return None,
        };
        Some(lowered)
    }

    fn is_pass_through(&self, op: &Operation) -> bool {
        is_common_pass_through(op) || matches!(op, Operation::PragmaGlobalPhase { .. })
    }
}
