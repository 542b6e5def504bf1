//! IonQ rules: `gpi`, `gpi2`, `ms` with `rz` folded into their phases.

use verbatim_ir::{Operation, ParameterExpression};

use super::Translator;
use crate::family::DeviceFamily;
use crate::ledger::PhaseLedger;
use crate::native::{NativeGate, NativeInstruction};

/// Translator for IonQ trapped-ion devices.
#[derive(Debug, Clone, Copy, Default)]
pub struct IonQTranslator;

impl IonQTranslator {
    fn ms(
        ledger: &PhaseLedger,
        control: usize,
        target: usize,
        theta: ParameterExpression,
    ) -> NativeInstruction {
        let zero = ParameterExpression::default();
        NativeInstruction::pair(
            NativeGate::Ms {
                phi0: ledger.shifted(control, &zero),
                phi1: ledger.shifted(target, &zero),
                theta,
            },
            control,
            target,
        )
    }
}

impl Translator for IonQTranslator {
    fn family(&self) -> DeviceFamily {
        DeviceFamily::IonQ
    }

    fn lower(&self, op: &Operation, ledger: &mut PhaseLedger) -> Option<Vec<NativeInstruction>> {
        let lowered = match op {
            Operation::RotateZ { qubit, theta } => {
                ledger.accumulate(*qubit, theta);
                Vec::new()
            }
            Operation::GPi { qubit, theta } => vec![NativeInstruction::single(
                NativeGate::Gpi {
                    phi: ledger.shifted(*qubit, theta),
                },
                *qubit,
            )],
            Operation::GPi2 { qubit, theta } => vec![NativeInstruction::single(
                NativeGate::Gpi2 {
                    phi: ledger.shifted(*qubit, theta),
                },
                *qubit,
            )],
            Operation::MolmerSorensenXX { control, target } => vec![Self::ms(
                ledger,
                *control,
                *target,
                ParameterExpression::pi_over(2.0),
            )],
            Operation::VariableMSXX {
                control,
                target,
                theta,
            } => vec![Self::ms(ledger, *control, *target, theta.clone())],
            _ => return None,
        };
        Some(lowered)
    }
}
