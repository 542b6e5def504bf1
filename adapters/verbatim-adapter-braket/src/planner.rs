//! Dispatch planning: shot count, readout, safety limits and translation path.
//!
//! ```text
//!   circuit ──→ measurement declarations ──→ limits ──→ translate
//!                 (shots, readout)          (hardware)   (verbatim | OpenQASM)
//! ```
//!
//! Planning never talks to the network; every error here is raised before
//! anything is submitted.

use serde::{Deserialize, Serialize};
use tracing::debug;
use verbatim_compile::{NativeBlock, qasm};
use verbatim_hal::{ComplexRegisters, FloatRegisters};
use verbatim_ir::{Circuit, Operation};

use crate::config::{BraketConfig, TranslationMode};
use crate::device::family_for_device;
use crate::error::{BraketError, BraketResult, LimitKind};

/// Shots used when a circuit declares none.
pub const DEFAULT_SHOTS: usize = 100;

/// Readout used when a circuit names none.
pub const DEFAULT_READOUT: &str = "ro";

/// A program ready for submission.
#[derive(Debug, Clone, PartialEq)]
pub enum Program {
    /// Native instructions to run inside a verbatim box.
    Verbatim(NativeBlock),
    /// OpenQASM 3 text the device compiles further.
    OpenQasm(String),
}

impl Program {
    /// OpenQASM 3 source to hand to the task service.
    pub fn source(&self) -> BraketResult<String> {
        match self {
            Program::Verbatim(block) => Ok(block.to_openqasm()?),
            Program::OpenQasm(text) => Ok(text.clone()),
        }
    }

    pub fn is_verbatim(&self) -> bool {
        matches!(self, Program::Verbatim(_))
    }
}

/// Statically declared bits of the readout register.
///
/// Measured rows cover a prefix of the register; the remaining positions
/// are taken from `values`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticBits {
    pub register_length: usize,
    /// Value of every register position; undeclared positions are `false`.
    pub values: Vec<bool>,
}

/// What result assembly needs to know about a submitted circuit.
///
/// Created at planning time and never changed afterwards.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CircuitMetadata {
    pub readout_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub static_bits: Option<StaticBits>,
    /// Declared output float registers, passed through to the results.
    #[serde(default)]
    pub float_registers: FloatRegisters,
    /// Declared output complex registers, passed through to the results.
    #[serde(default)]
    pub complex_registers: ComplexRegisters,
}

impl CircuitMetadata {
    pub fn new(readout_name: impl Into<String>) -> Self {
        Self {
            readout_name: readout_name.into(),
            ..Self::default()
        }
    }

    pub fn with_static_bits(mut self, static_bits: StaticBits) -> Self {
        self.static_bits = Some(static_bits);
        self
    }
}

/// A planned circuit.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedCircuit {
    pub program: Program,
    pub shots: usize,
    pub metadata: CircuitMetadata,
}

/// Shot count and readout declared by `circuit`.
///
/// Fails with [`BraketError::AmbiguousMeasurement`] when more than one
/// shot-count declaration is present.
pub fn measurement_declaration(circuit: &Circuit) -> BraketResult<(usize, String)> {
    let set_number = circuit.filter_by_tag("PragmaSetNumberOfMeasurements");
    let repeated = circuit.filter_by_tag("PragmaRepeatedMeasurement");
    let declarations: Vec<(usize, &str)> = set_number
        .chain(repeated)
        .filter_map(Operation::shot_declaration)
        .collect();

    if declarations.len() > 1 {
        return Err(BraketError::AmbiguousMeasurement {
            count: declarations.len(),
        });
    }

    if let Some(&(shots, readout)) = declarations.first() {
        return Ok((shots, readout.to_string()));
    }

    let readout = circuit
        .filter_by_tag("MeasureQubit")
        .find_map(Operation::readout)
        .unwrap_or(DEFAULT_READOUT);
    Ok((DEFAULT_SHOTS, readout.to_string()))
}

/// Check shot and length limits when `config` targets hardware.
pub fn check_limits(circuit: &Circuit, shots: usize, config: &BraketConfig) -> BraketResult<()> {
    if !config.enforces_limits() {
        return Ok(());
    }
    if shots > config.max_shots {
        return Err(BraketError::LimitExceeded {
            kind: LimitKind::Shots,
            requested: shots,
            limit: config.max_shots,
        });
    }
    if circuit.len() > config.max_circuit_length {
        return Err(BraketError::LimitExceeded {
            kind: LimitKind::Length,
            requested: circuit.len(),
            limit: config.max_circuit_length,
        });
    }
    Ok(())
}

/// Result-assembly metadata for `circuit` writing into `readout`.
pub fn circuit_metadata(circuit: &Circuit, readout: &str) -> CircuitMetadata {
    let mut metadata = CircuitMetadata::new(readout);

    let inputs: Vec<(usize, bool)> = circuit.input_bits(readout).collect();
    if !inputs.is_empty() {
        let highest = inputs.iter().map(|(index, _)| index + 1).max().unwrap_or(0);
        let register_length = circuit
            .bit_register_length(readout)
            .unwrap_or(highest)
            .max(highest);
        let mut values = vec![false; register_length];
        for (index, value) in inputs {
            values[index] = value;
        }
        metadata.static_bits = Some(StaticBits {
            register_length,
            values,
        });
    }

    for op in circuit {
        match op {
            Operation::DefinitionFloat {
                name,
                is_output: true,
                ..
            } => {
                metadata.float_registers.insert(name.clone(), Vec::new());
            }
            Operation::DefinitionComplex {
                name,
                is_output: true,
                ..
            } => {
                metadata.complex_registers.insert(name.clone(), Vec::new());
            }
            _ => {}
        }
    }
    metadata
}

/// Plan `circuit` for submission under `config`.
pub fn plan(circuit: &Circuit, config: &BraketConfig) -> BraketResult<PlannedCircuit> {
    let (shots, readout) = measurement_declaration(circuit)?;
    check_limits(circuit, shots, config)?;

    let family = match config.translation {
        TranslationMode::Force(family) => Some(family),
        TranslationMode::Auto if config.verbatim_mode => Some(
            family_for_device(&config.device)
                .ok_or_else(|| BraketError::NoVerbatimTranslator(config.device.clone()))?,
        ),
        TranslationMode::Auto => None,
    };

    let program = match family {
        Some(family) => {
            debug!(device = %config.device, %family, shots, "planning verbatim submission");
            Program::Verbatim(family.translate(circuit)?)
        }
        None => {
            debug!(device = %config.device, shots, "planning OpenQASM submission");
            Program::OpenQasm(qasm::emit(circuit)?)
        }
    };

    Ok(PlannedCircuit {
        program,
        shots,
        metadata: circuit_metadata(circuit, &readout),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use verbatim_compile::DeviceFamily;

    fn pragma(shots: usize, readout: &str) -> Operation {
        Operation::PragmaSetNumberOfMeasurements {
            number_measurements: shots,
            readout: readout.into(),
        }
    }

    #[test]
    fn test_defaults_without_declaration() {
        let circuit = Circuit::from_operations([Operation::PauliX { qubit: 0 }]).unwrap();
        let (shots, readout) = measurement_declaration(&circuit).unwrap();
        assert_eq!(shots, DEFAULT_SHOTS);
        assert_eq!(readout, DEFAULT_READOUT);
    }

    #[test]
    fn test_readout_from_measure_qubit() {
        let circuit = Circuit::from_operations([
            Operation::DefinitionBit {
                name: "m".into(),
                length: 1,
                is_output: true,
            },
            Operation::MeasureQubit {
                qubit: 0,
                readout: "m".into(),
                readout_index: 0,
            },
        ])
        .unwrap();
        assert_eq!(measurement_declaration(&circuit).unwrap().1, "m");
    }

    #[test]
    fn test_two_declarations_are_ambiguous() {
        let circuit = Circuit::from_operations([
            pragma(10, "ro"),
            Operation::PragmaRepeatedMeasurement {
                readout: "ro".into(),
                number_measurements: 20,
                qubit_mapping: None,
            },
        ])
        .unwrap();
        assert!(matches!(
            measurement_declaration(&circuit),
            Err(BraketError::AmbiguousMeasurement { count: 2 })
        ));
    }

    #[test]
    fn test_shot_limit_checked_before_length() {
        let circuit = Circuit::from_operations([
            Operation::PauliX { qubit: 0 },
            Operation::PauliX { qubit: 1 },
            pragma(500, "ro"),
        ])
        .unwrap();
        let config = BraketConfig::default()
            .with_allow_hardware(true)
            .with_max_circuit_length(2);
        assert!(matches!(
            plan(&circuit, &config),
            Err(BraketError::LimitExceeded {
                kind: LimitKind::Shots,
                requested: 500,
                limit: 100
            })
        ));
    }

    #[test]
    fn test_limits_ignored_for_simulators() {
        let circuit = Circuit::from_operations([pragma(5000, "ro")]).unwrap();
        let planned = plan(&circuit, &BraketConfig::default()).unwrap();
        assert_eq!(planned.shots, 5000);
        assert!(!planned.program.is_verbatim());
    }

    #[test]
    fn test_forced_family_translates() {
        let circuit = Circuit::from_operations([
            Operation::RotateZ {
                qubit: 0,
                theta: 0.5_f64.into(),
            },
            Operation::RotateXY {
                qubit: 0,
                theta: 1.0_f64.into(),
                phi: 0.0_f64.into(),
            },
            pragma(10, "ro"),
        ])
        .unwrap();
        let config = BraketConfig::default().with_forced_family(DeviceFamily::Iqm);
        let planned = plan(&circuit, &config).unwrap();
        let Program::Verbatim(block) = &planned.program else {
            panic!("expected verbatim program");
        };
        assert_eq!(block.family, DeviceFamily::Iqm);
        assert_eq!(block.len(), 1);
        assert!(planned.program.source().unwrap().contains("#pragma braket verbatim"));
    }

    #[test]
    fn test_verbatim_without_family_fails() {
        let circuit = Circuit::from_operations([Operation::PauliX { qubit: 0 }]).unwrap();
        let config = BraketConfig::for_device("sv1").with_verbatim_mode(true);
        assert!(matches!(
            plan(&circuit, &config),
            Err(BraketError::NoVerbatimTranslator(_))
        ));
    }

    #[test]
    fn test_metadata_collects_static_bits_and_registers() {
        let circuit = Circuit::from_operations([
            Operation::DefinitionBit {
                name: "ro".into(),
                length: 3,
                is_output: true,
            },
            Operation::DefinitionFloat {
                name: "f".into(),
                length: 1,
                is_output: true,
            },
            Operation::DefinitionComplex {
                name: "scratch".into(),
                length: 1,
                is_output: false,
            },
            Operation::InputBit {
                name: "ro".into(),
                index: 1,
                value: true,
            },
        ])
        .unwrap();
        let metadata = circuit_metadata(&circuit, "ro");
        assert_eq!(
            metadata.static_bits,
            Some(StaticBits {
                register_length: 3,
                values: vec![false, true, false],
            })
        );
        assert!(metadata.float_registers.contains_key("f"));
        assert!(metadata.complex_registers.is_empty());
    }
}
