//! Per-qubit virtual-Z phase ledger.
//!
//! A `RotateZ(θ)` preceding a gate `G(φ)` on the same qubit satisfies
//! `G(φ)·RZ(θ) = RZ(θ)·G(φ - θ)` for every equatorial-axis gate, so the
//! rotation can be pushed past `G` by shifting its phase. The ledger holds
//! the accumulated rotation still waiting to be pushed through each qubit.
//! Reading a phase never resets it: after being pushed past `G` the
//! rotation is still there, now acting on whatever follows.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;
use verbatim_ir::ParameterExpression;

/// Accumulated virtual-Z phase per qubit. Absent entries are zero.
#[derive(Debug, Clone, Default)]
pub struct PhaseLedger {
    phases: FxHashMap<usize, ParameterExpression>,
}

impl PhaseLedger {
    /// An empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a Z rotation by `theta` on `qubit`.
    pub fn accumulate(&mut self, qubit: usize, theta: &ParameterExpression) {
        let entry = self.phases.entry(qubit).or_default();
        *entry = (entry.clone() + theta.clone()).simplify();
    }

    /// Accumulated phase on `qubit`.
    pub fn phase(&self, qubit: usize) -> ParameterExpression {
        self.phases.get(&qubit).cloned().unwrap_or_default()
    }

    /// `angle` shifted by the pending rotation on `qubit`: `angle - ledger[qubit]`.
    pub fn shifted(&self, qubit: usize, angle: &ParameterExpression) -> ParameterExpression {
        match self.phases.get(&qubit) {
            Some(phase) => (angle.clone() - phase.clone()).simplify(),
            None => angle.clone(),
        }
    }

    /// Non-zero phases left after the last gate, sorted by qubit.
    ///
    /// These rotations act after every emitted gate and commute with
    /// computational-basis measurement, so they are dropped.
    pub fn into_residuals(self) -> BTreeMap<usize, ParameterExpression> {
        self.phases
            .into_iter()
            .filter(|(_, phase)| !phase.is_zero())
            .collect()
    }
}
