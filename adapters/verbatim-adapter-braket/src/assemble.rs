//! Raw samples to typed registers.

use verbatim_hal::{RawSamples, Registers};

use crate::planner::CircuitMetadata;

/// Build the register triple for one completed circuit.
///
/// Samples are thresholded (`> 0` is a one). When the readout register has
/// static bits, every row covers only a prefix of the register and is
/// extended with the static values of the positions it does not reach.
/// Float and complex registers come from the metadata unchanged.
pub fn assemble(raw: &RawSamples, metadata: &CircuitMetadata) -> Registers {
    let mut rows = raw.to_bool_rows();

    if let Some(static_bits) = &metadata.static_bits {
        for row in &mut rows {
            let missing = row.len()..static_bits.register_length;
            if let Some(suffix) = static_bits.values.get(missing) {
                row.extend_from_slice(suffix);
            }
        }
    }

    let mut registers = Registers::new();
    registers.bit.insert(metadata.readout_name.clone(), rows);
    registers.float = metadata.float_registers.clone();
    registers.complex = metadata.complex_registers.clone();
    registers
}
