//! Typed result registers.
//!
//! Every register is a list of rows, one per shot, keyed by readout name.

use std::collections::HashMap;

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

/// Bit registers by readout name.
pub type BitRegisters = HashMap<String, Vec<Vec<bool>>>;
/// Float registers by readout name.
pub type FloatRegisters = HashMap<String, Vec<Vec<f64>>>;
/// Complex registers by readout name.
pub type ComplexRegisters = HashMap<String, Vec<Vec<Complex64>>>;

/// The bit/float/complex register triple produced by one or more circuits.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Registers {
    #[serde(default)]
    pub bit: BitRegisters,
    #[serde(default)]
    pub float: FloatRegisters,
    #[serde(default)]
    pub complex: ComplexRegisters,
}

impl Registers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether no register of any type is present.
    pub fn is_empty(&self) -> bool {
        self.bit.is_empty() && self.float.is_empty() && self.complex.is_empty()
    }

    /// Union by readout name; entries of `other` replace entries of `self`
    /// sharing a name.
    pub fn merge(&mut self, other: Registers) {
        self.bit.extend(other.bit);
        self.float.extend(other.float);
        self.complex.extend(other.complex);
    }
}
