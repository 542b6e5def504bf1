//! Phase-tracking verbatim translators.
//!
//! Each device family implements [`Translator`]: a single in-order walk of
//! the circuit that either lowers an operation to native instructions
//! (possibly folding it into the [`PhaseLedger`]), skips it as classical
//! bookkeeping, or fails on it. The walk itself lives in the provided
//! [`Translator::translate`] method so every family shares it.

mod ionq;
mod iqm;
mod oqc;
mod rigetti;

pub use ionq::IonQTranslator;
pub use iqm::IqmTranslator;
pub use oqc::OqcTranslator;
pub use rigetti::{RigettiTranslator, rigetti_physical_qubit};

use std::collections::BTreeMap;

use tracing::debug;
use verbatim_ir::{Circuit, Operation};

use crate::error::{CompileError, CompileResult};
use crate::family::DeviceFamily;
use crate::ledger::PhaseLedger;
use crate::native::{NativeBlock, NativeInstruction};

/// Classical bookkeeping every family accepts without emitting anything.
pub fn is_common_pass_through(op: &Operation) -> bool {
    matches!(
        op,
        Operation::PragmaRepeatedMeasurement { .. }
            | Operation::PragmaSetNumberOfMeasurements { .. }
            | Operation::MeasureQubit { .. }
            | Operation::DefinitionBit { .. }
            | Operation::DefinitionFloat { .. }
            | Operation::DefinitionComplex { .. }
            | Operation::InputBit { .. }
    )
}

/// Lowering rules for one device family.
pub trait Translator: Send + Sync {
    /// Family these rules target.
    fn family(&self) -> DeviceFamily;

    /// Lower one operation.
    ///
    /// Returns `None` when the operation is not handled by this family's
    /// rules. Phase operations that are folded return an empty vector.
    fn lower(&self, op: &Operation, ledger: &mut PhaseLedger) -> Option<Vec<NativeInstruction>>;

    /// Whether `op` is skipped silently.
    fn is_pass_through(&self, op: &Operation) -> bool {
        is_common_pass_through(op)
    }

    /// Physical index of a logical qubit.
    fn physical_qubit(&self, logical: usize) -> CompileResult<usize> {
        Ok(logical)
    }

    /// Translate a whole circuit into a verbatim block.
    fn translate(&self, circuit: &Circuit) -> CompileResult<NativeBlock> {
        let family = self.family();
        let mut ledger = PhaseLedger::new();
        let mut instructions = Vec::new();

        for op in circuit {
            if let Some(native) = self.lower(op, &mut ledger) {
                instructions.extend(native);
            } else if !self.is_pass_through(op) {
                return Err(CompileError::UnsupportedOperation {
                    tag: op.tag().to_string(),
                    family,
                });
            }
        }

        let measured_qubits: Vec<usize> = circuit.involved_qubits().into_iter().collect();
        let mut qubit_mapping = BTreeMap::new();
        for &qubit in &measured_qubits {
            qubit_mapping.insert(qubit, self.physical_qubit(qubit)?);
        }

        let residual_phases = ledger.into_residuals();
        if !residual_phases.is_empty() {
            debug!(
                %family,
                qubits = ?residual_phases.keys().collect::<Vec<_>>(),
                "dropping trailing virtual-Z phases"
            );
        }
        debug!(
            %family,
            operations = circuit.len(),
            instructions = instructions.len(),
            "translated circuit to verbatim block"
        );

        Ok(NativeBlock {
            family,
            instructions,
            qubit_mapping,
            measured_qubits,
            residual_phases,
        })
    }
}
