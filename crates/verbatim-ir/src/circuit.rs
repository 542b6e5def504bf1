//! Ordered circuit container.

use std::collections::{BTreeSet, HashMap};
use std::ops::{Add, AddAssign};

use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::operation::Operation;

/// An ordered sequence of operations.
///
/// Order is semantically significant and is never changed by any consumer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Circuit {
    operations: Vec<Operation>,
}

impl Circuit {
    /// Create an empty circuit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a circuit from operations, validating each one.
    pub fn from_operations(operations: impl IntoIterator<Item = Operation>) -> IrResult<Self> {
        let mut circuit = Self::new();
        for op in operations {
            Circuit::add(&mut circuit, op)?;
        }
        Ok(circuit)
    }

    /// Append an operation.
    pub fn add(&mut self, op: Operation) -> IrResult<&mut Self> {
        op.validate()?;
        if let Operation::InputBit { name, index, .. } = &op {
            if let Some(length) = self.bit_register_length(name) {
                if *index >= length {
                    return Err(IrError::RegisterIndexOutOfRange {
                        register: name.clone(),
                        index: *index,
                        length,
                    });
                }
            }
        }
        self.operations.push(op);
        Ok(self)
    }

    /// Number of operations, definitions and pragmas included.
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Whether the circuit has no operations.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Operations in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Operation> {
        self.operations.iter()
    }

    /// Operations as a slice.
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Operations whose tag equals `tag`, in order.
    pub fn filter_by_tag<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Operation> + 'a {
        self.operations.iter().filter(move |op| op.tag() == tag)
    }

    /// Every qubit touched by a gate or a `MeasureQubit`.
    pub fn involved_qubits(&self) -> BTreeSet<usize> {
        self.operations.iter().flat_map(Operation::qubits).collect()
    }

    /// One past the highest involved qubit index.
    pub fn number_of_qubits(&self) -> usize {
        self.involved_qubits()
            .last()
            .map_or(0, |highest| highest + 1)
    }

    /// Declared length of the bit register `name`.
    pub fn bit_register_length(&self, name: &str) -> Option<usize> {
        self.operations.iter().find_map(|op| match op {
            Operation::DefinitionBit {
                name: defined,
                length,
                ..
            } if defined == name => Some(*length),
            _ => None,
        })
    }

    /// Statically set bits of register `name`, as `(index, value)` in order.
    pub fn input_bits<'a>(&'a self, name: &'a str) -> impl Iterator<Item = (usize, bool)> + 'a {
        self.operations.iter().filter_map(move |op| match op {
            Operation::InputBit {
                name: register,
                index,
                value,
            } if register == name => Some((*index, *value)),
            _ => None,
        })
    }

    /// A copy with known symbols replaced in every angle.
    pub fn substitute_parameters(&self, values: &HashMap<String, f64>) -> Self {
        Self {
            operations: self
                .operations
                .iter()
                .map(|op| op.substitute_parameters(values))
                .collect(),
        }
    }

    /// Whether any angle in the circuit still has a free symbol.
    pub fn is_parametrized(&self) -> bool {
        self.operations
            .iter()
            .any(|op| op.parameters().iter().any(|p| p.is_symbolic()))
    }
}

impl<'a> IntoIterator for &'a Circuit {
    type Item = &'a Operation;
    type IntoIter = std::slice::Iter<'a, Operation>;

    fn into_iter(self) -> Self::IntoIter {
        self.operations.iter()
    }
}

impl AddAssign<&Circuit> for Circuit {
    fn add_assign(&mut self, rhs: &Circuit) {
        self.operations.extend(rhs.operations.iter().cloned());
    }
}

impl Add<&Circuit> for &Circuit {
    type Output = Circuit;

    /// Concatenation: `self` runs first.
    fn add(self, rhs: &Circuit) -> Circuit {
        let mut out = self.clone();
        out += rhs;
        out
    }
}
