//! Measurement programs and their evaluation contract.
//!
//! A measurement owns the circuits that must run to produce its registers
//! (an optional constant prefix plus one circuit per basis) and knows how to
//! reduce the merged registers to named expectation values.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use verbatim_ir::Circuit;

use crate::error::{HalError, HalResult};
use crate::registers::{BitRegisters, ComplexRegisters, FloatRegisters};

/// Kind tag stored alongside a serialized measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MeasurementKind {
    /// Registers are returned as is, without evaluation.
    ClassicalRegister,
    PauliZProduct,
    CheatedPauliZProduct,
    Cheated,
}

impl MeasurementKind {
    /// Whether program runs of this kind yield registers rather than values.
    pub fn is_register_only(self) -> bool {
        matches!(self, MeasurementKind::ClassicalRegister)
    }
}

impl fmt::Display for MeasurementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MeasurementKind::ClassicalRegister => "ClassicalRegister",
            MeasurementKind::PauliZProduct => "PauliZProduct",
            MeasurementKind::CheatedPauliZProduct => "CheatedPauliZProduct",
            MeasurementKind::Cheated => "Cheated",
        };
        f.write_str(name)
    }
}

/// A measurement program evaluated on the registers of its circuits.
pub trait Measurement: Send + Sync {
    fn kind(&self) -> MeasurementKind;

    /// Prefix prepended to every circuit before submission.
    fn constant_circuit(&self) -> Option<&Circuit>;

    /// Circuits to run, in submission order.
    fn circuits(&self) -> &[Circuit];

    /// Reduce merged registers to named values.
    fn evaluate(
        &self,
        bit: &BitRegisters,
        float: &FloatRegisters,
        complex: &ComplexRegisters,
    ) -> HalResult<HashMap<String, f64>>;

    /// Opaque payload from which [`Measurement::from_payload`] restores an
    /// equivalent measurement.
    fn to_payload(&self) -> HalResult<String>;

    fn from_payload(kind: MeasurementKind, payload: &str) -> HalResult<Self>
    where
        Self: Sized;
}

/// Measurement that only collects classical registers.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ClassicalRegister {
    #[serde(default)]
    pub constant_circuit: Option<Circuit>,
    pub circuits: Vec<Circuit>,
}

impl ClassicalRegister {
    pub fn new(constant_circuit: Option<Circuit>, circuits: Vec<Circuit>) -> Self {
        Self {
            constant_circuit,
            circuits,
        }
    }
}

impl Measurement for ClassicalRegister {
    fn kind(&self) -> MeasurementKind {
        MeasurementKind::ClassicalRegister
    }

    fn constant_circuit(&self) -> Option<&Circuit> {
        self.constant_circuit.as_ref()
    }

    fn circuits(&self) -> &[Circuit] {
        &self.circuits
    }

    fn evaluate(
        &self,
        _bit: &BitRegisters,
        _float: &FloatRegisters,
        _complex: &ComplexRegisters,
    ) -> HalResult<HashMap<String, f64>> {
        Err(HalError::Unsupported(
            "ClassicalRegister measurements have no expectation values".into(),
        ))
    }

    fn to_payload(&self) -> HalResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    fn from_payload(kind: MeasurementKind, payload: &str) -> HalResult<Self> {
        if kind != MeasurementKind::ClassicalRegister {
            return Err(HalError::MeasurementKindMismatch {
                expected: MeasurementKind::ClassicalRegister,
                found: kind,
            });
        }
        Ok(serde_json::from_str(payload)?)
    }
}
