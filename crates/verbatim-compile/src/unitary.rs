//! Dense unitary construction for checking translations.
//!
//! Builds the full `2^n × 2^n` matrix of an IR circuit or a native block so
//! the two can be compared up to global phase. Qubit 0 is the most
//! significant bit of a basis index. Intended for the small circuits used
//! in verification; cost is `O(4^n)` per gate.

use std::f64::consts::{FRAC_1_SQRT_2, PI};

use num_complex::Complex64;
use verbatim_ir::{Circuit, Operation};

use crate::error::{CompileError, CompileResult};
use crate::native::{NativeBlock, NativeGate};

/// Default tolerance for matrix comparisons.
pub const EPSILON: f64 = 1e-9;

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);
const I: Complex64 = Complex64::new(0.0, 1.0);

/// A 2x2 unitary matrix in row-major order.
#[derive(Debug, Clone, Copy)]
pub struct Unitary2x2 {
    /// The matrix elements in row-major order: [[a, b], [c, d]].
    pub data: [Complex64; 4],
}

impl Unitary2x2 {
    /// Create a new 2x2 unitary matrix.
    pub fn new(a: Complex64, b: Complex64, c: Complex64, d: Complex64) -> Self {
        Self { data: [a, b, c, d] }
    }

    pub fn x() -> Self {
        Self::new(ZERO, ONE, ONE, ZERO)
    }

    pub fn y() -> Self {
        Self::new(ZERO, -I, I, ZERO)
    }

    pub fn z() -> Self {
        Self::new(ONE, ZERO, ZERO, -ONE)
    }

    pub fn h() -> Self {
        let s = Complex64::new(FRAC_1_SQRT_2, 0.0);
        Self::new(s, s, s, -s)
    }

    /// `sqrt(X)` as Braket defines `v`.
    pub fn v() -> Self {
        let p = Complex64::new(0.5, 0.5);
        let m = Complex64::new(0.5, -0.5);
        Self::new(p, m, m, p)
    }

    pub fn rx(theta: f64) -> Self {
        Self::prx(theta, 0.0)
    }

    pub fn ry(theta: f64) -> Self {
        let c = Complex64::new((theta / 2.0).cos(), 0.0);
        let s = Complex64::new((theta / 2.0).sin(), 0.0);
        Self::new(c, -s, s, c)
    }

    pub fn rz(theta: f64) -> Self {
        Self::new(
            Complex64::from_polar(1.0, -theta / 2.0),
            ZERO,
            ZERO,
            Complex64::from_polar(1.0, theta / 2.0),
        )
    }

    /// Rotation by `theta` about the equatorial axis at azimuth `phi`.
    pub fn prx(theta: f64, phi: f64) -> Self {
        let c = Complex64::new((theta / 2.0).cos(), 0.0);
        let s = (theta / 2.0).sin();
        Self::new(
            c,
            -I * Complex64::from_polar(s, -phi),
            -I * Complex64::from_polar(s, phi),
            c,
        )
    }

    pub fn gpi(phi: f64) -> Self {
        Self::new(
            ZERO,
            Complex64::from_polar(1.0, -phi),
            Complex64::from_polar(1.0, phi),
            ZERO,
        )
    }

    pub fn gpi2(phi: f64) -> Self {
        let s = Complex64::new(FRAC_1_SQRT_2, 0.0);
        Self::new(
            s,
            -I * s * Complex64::from_polar(1.0, -phi),
            -I * s * Complex64::from_polar(1.0, phi),
            s,
        )
    }
}

/// A 4x4 two-qubit matrix in row-major order; the first qubit is the high bit.
#[derive(Debug, Clone, Copy)]
pub struct Unitary4x4 {
    pub data: [Complex64; 16],
}

impl Unitary4x4 {
    fn diagonal(d: [Complex64; 4]) -> Self {
        let mut data = [ZERO; 16];
        for (i, value) in d.into_iter().enumerate() {
            data[i * 5] = value;
        }
        Self { data }
    }

    pub fn cnot() -> Self {
        let mut data = [ZERO; 16];
        data[0] = ONE;
        data[5] = ONE;
        data[11] = ONE;
        data[14] = ONE;
        Self { data }
    }

    pub fn cz() -> Self {
        Self::diagonal([ONE, ONE, ONE, -ONE])
    }

    pub fn cphaseshift(theta: f64) -> Self {
        Self::diagonal([ONE, ONE, ONE, Complex64::from_polar(1.0, theta)])
    }

    pub fn xy(theta: f64) -> Self {
        let c = Complex64::new((theta / 2.0).cos(), 0.0);
        let s = I * (theta / 2.0).sin();
        let mut data = [ZERO; 16];
        data[0] = ONE;
        data[5] = c;
        data[6] = s;
        data[9] = s;
        data[10] = c;
        data[15] = ONE;
        Self { data }
    }

    /// Mølmer–Sørensen gate `MS(φ0, φ1, θ)` as Braket defines `ms`.
    pub fn ms(phi0: f64, phi1: f64, theta: f64) -> Self {
        let c = Complex64::new((theta / 2.0).cos(), 0.0);
        let s = (theta / 2.0).sin();
        let off = |angle: f64| -I * Complex64::from_polar(s, angle);
        let mut data = [ZERO; 16];
        data[0] = c;
        data[3] = off(-(phi0 + phi1));
        data[5] = c;
        data[6] = off(-(phi0 - phi1));
        data[9] = off(phi0 - phi1);
        data[10] = c;
        data[12] = off(phi0 + phi1);
        data[15] = c;
        Self { data }
    }

    /// Echoed cross-resonance as Braket defines `ecr`.
    pub fn ecr() -> Self {
        let s = Complex64::new(FRAC_1_SQRT_2, 0.0);
        let si = I * s;
        let data = [
            ZERO, s, ZERO, si, //
            s, ZERO, -si, ZERO, //
            ZERO, si, ZERO, s, //
            -si, ZERO, s, ZERO,
        ];
        Self { data }
    }
}

/// Dense `2^n × 2^n` matrix, row-major.
#[derive(Debug, Clone)]
pub struct UnitaryMatrix {
    num_qubits: usize,
    data: Vec<Complex64>,
}

impl UnitaryMatrix {
    /// Identity on `num_qubits` qubits.
    pub fn identity(num_qubits: usize) -> Self {
        let dim = 1 << num_qubits;
        let mut data = vec![ZERO; dim * dim];
        for i in 0..dim {
            data[i * dim + i] = ONE;
        }
        Self { num_qubits, data }
    }

    /// Matrix dimension.
    pub fn dim(&self) -> usize {
        1 << self.num_qubits
    }

    /// Element at `(row, col)`.
    pub fn get(&self, row: usize, col: usize) -> Complex64 {
        self.data[row * self.dim() + col]
    }

    fn mask(&self, qubit: usize) -> CompileResult<usize> {
        if qubit >= self.num_qubits {
            return Err(CompileError::QubitOutOfRange {
                qubit,
                num_qubits: self.num_qubits,
            });
        }
        Ok(1 << (self.num_qubits - 1 - qubit))
    }

    /// Left-multiply by `gate` acting on `qubit`.
    pub fn apply_single(&mut self, gate: &Unitary2x2, qubit: usize) -> CompileResult<()> {
        let dim = self.dim();
        let mask = self.mask(qubit)?;
        let [a, b, c, d] = gate.data;
        for col in 0..dim {
            for row in (0..dim).filter(|r| r & mask == 0) {
                let lo = self.data[row * dim + col];
                let hi = self.data[(row | mask) * dim + col];
                self.data[row * dim + col] = a * lo + b * hi;
                self.data[(row | mask) * dim + col] = c * lo + d * hi;
            }
        }
        Ok(())
    }

    /// Left-multiply by `gate` acting on `(first, second)`.
    pub fn apply_pair(
        &mut self,
        gate: &Unitary4x4,
        first: usize,
        second: usize,
    ) -> CompileResult<()> {
        let dim = self.dim();
        let m0 = self.mask(first)?;
        let m1 = self.mask(second)?;
        for col in 0..dim {
            for base in (0..dim).filter(|r| r & (m0 | m1) == 0) {
                let rows = [base, base | m1, base | m0, base | m0 | m1];
                let old = rows.map(|r| self.data[r * dim + col]);
                for (k, &row) in rows.iter().enumerate() {
                    self.data[row * dim + col] =
                        (0..4).map(|j| gate.data[k * 4 + j] * old[j]).sum();
                }
            }
        }
        Ok(())
    }

    /// Whether `other == e^{iα}·self` for some α, within `tolerance`.
    pub fn equivalent_up_to_phase(&self, other: &Self, tolerance: f64) -> bool {
        if self.num_qubits != other.num_qubits {
            return false;
        }
        let Some((pivot, _)) = self
            .data
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.norm().total_cmp(&b.norm()))
        else {
            return true;
        };
        if self.data[pivot].norm() < tolerance {
            return false;
        }
        let phase = other.data[pivot] / self.data[pivot];
        if (phase.norm() - 1.0).abs() > tolerance {
            return false;
        }
        self.data
            .iter()
            .zip(&other.data)
            .all(|(a, b)| (a * phase - b).norm() < tolerance)
    }
}

fn angle(expr: &verbatim_ir::ParameterExpression) -> CompileResult<f64> {
    Ok(expr.value()?)
}

/// Unitary of the gates in an IR circuit on `num_qubits` qubits.
///
/// Definitions, measurements and pragmas are ignored.
pub fn circuit_unitary(circuit: &Circuit, num_qubits: usize) -> CompileResult<UnitaryMatrix> {
    let mut u = UnitaryMatrix::identity(num_qubits);
    for op in circuit {
        match op {
            Operation::RotateZ { qubit, theta } => u.apply_single(&Unitary2x2::rz(angle(theta)?), *qubit)?,
            Operation::RotateX { qubit, theta } => u.apply_single(&Unitary2x2::rx(angle(theta)?), *qubit)?,
            Operation::RotateY { qubit, theta } => u.apply_single(&Unitary2x2::ry(angle(theta)?), *qubit)?,
            Operation::RotateXY { qubit, theta, phi } => {
                u.apply_single(&Unitary2x2::prx(angle(theta)?, angle(phi)?), *qubit)?;
            }
            Operation::PauliX { qubit } => u.apply_single(&Unitary2x2::x(), *qubit)?,
            Operation::PauliY { qubit } => u.apply_single(&Unitary2x2::y(), *qubit)?,
            Operation::PauliZ { qubit } => u.apply_single(&Unitary2x2::z(), *qubit)?,
            Operation::SqrtPauliX { qubit } => u.apply_single(&Unitary2x2::rx(PI / 2.0), *qubit)?,
            Operation::InvSqrtPauliX { qubit } => u.apply_single(&Unitary2x2::rx(-PI / 2.0), *qubit)?,
            Operation::Hadamard { qubit } => u.apply_single(&Unitary2x2::h(), *qubit)?,
            Operation::GPi { qubit, theta } => u.apply_single(&Unitary2x2::gpi(angle(theta)?), *qubit)?,
            Operation::GPi2 { qubit, theta } => u.apply_single(&Unitary2x2::gpi2(angle(theta)?), *qubit)?,
            Operation::CNOT { control, target } => u.apply_pair(&Unitary4x4::cnot(), *control, *target)?,
            Operation::ControlledPauliZ { control, target } => {
                u.apply_pair(&Unitary4x4::cz(), *control, *target)?;
            }
            Operation::ControlledPhaseShift { control, target, theta } => {
                u.apply_pair(&Unitary4x4::cphaseshift(angle(theta)?), *control, *target)?;
            }
            Operation::XY { control, target, theta } => {
                u.apply_pair(&Unitary4x4::xy(angle(theta)?), *control, *target)?;
            }
            Operation::MolmerSorensenXX { control, target } => {
                u.apply_pair(&Unitary4x4::ms(0.0, 0.0, PI / 2.0), *control, *target)?;
            }
            Operation::VariableMSXX { control, target, theta } => {
                u.apply_pair(&Unitary4x4::ms(0.0, 0.0, angle(theta)?), *control, *target)?;
            }
            Operation::EchoCrossResonance { control, target } => {
                u.apply_pair(&Unitary4x4::ecr(), *control, *target)?;
            }
            _ => {}
        }
    }
    Ok(u)
}

/// Unitary of a native block on logical qubits, residual phases excluded.
pub fn block_unitary(block: &NativeBlock, num_qubits: usize) -> CompileResult<UnitaryMatrix> {
    let mut u = UnitaryMatrix::identity(num_qubits);
    for instruction in &block.instructions {
        let q = &instruction.qubits;
        match &instruction.gate {
            NativeGate::Gpi { phi } => u.apply_single(&Unitary2x2::gpi(angle(phi)?), q[0])?,
            NativeGate::Gpi2 { phi } => u.apply_single(&Unitary2x2::gpi2(angle(phi)?), q[0])?,
            NativeGate::Prx { theta, phi } => {
                u.apply_single(&Unitary2x2::prx(angle(theta)?, angle(phi)?), q[0])?;
            }
            NativeGate::Rx { theta } => u.apply_single(&Unitary2x2::rx(angle(theta)?), q[0])?,
            NativeGate::Rz { theta } => u.apply_single(&Unitary2x2::rz(angle(theta)?), q[0])?,
            NativeGate::V => u.apply_single(&Unitary2x2::v(), q[0])?,
            NativeGate::X => u.apply_single(&Unitary2x2::x(), q[0])?,
            NativeGate::Ms { phi0, phi1, theta } => u.apply_pair(
                &Unitary4x4::ms(angle(phi0)?, angle(phi1)?, angle(theta)?),
                q[0],
                q[1],
            )?,
            NativeGate::Cz => u.apply_pair(&Unitary4x4::cz(), q[0], q[1])?,
            NativeGate::CPhaseShift { theta } => {
                u.apply_pair(&Unitary4x4::cphaseshift(angle(theta)?), q[0], q[1])?;
            }
            NativeGate::Xy { theta } => u.apply_pair(&Unitary4x4::xy(angle(theta)?), q[0], q[1])?,
            NativeGate::Ecr => u.apply_pair(&Unitary4x4::ecr(), q[0], q[1])?,
        }
    }
    Ok(u)
}

/// Block unitary followed by its residual Z rotations.
///
/// Equals the source circuit's unitary up to global phase when the
/// translation is correct.
pub fn block_unitary_with_residuals(
    block: &NativeBlock,
    num_qubits: usize,
) -> CompileResult<UnitaryMatrix> {
    let mut u = block_unitary(block, num_qubits)?;
    for (qubit, phase) in &block.residual_phases {
        u.apply_single(&Unitary2x2::rz(angle(phase)?), *qubit)?;
    }
    Ok(u)
}
