//! Standard gates for state-preparation programs

use crate::gate::Gate;
use crate::{QuantumError, Result};
use nalgebra::DMatrix;
use num_complex::Complex64;

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);
const I: Complex64 = Complex64::new(0.0, 1.0);
const NEG_I: Complex64 = Complex64::new(0.0, -1.0);
const NEG_ONE: Complex64 = Complex64::new(-1.0, 0.0);

const INV_SQRT2: f64 = std::f64::consts::FRAC_1_SQRT_2;

/// Identity gate
#[derive(Debug, Clone, Copy)]
pub struct Identity;

impl Gate for Identity {
    fn name(&self) -> &str {
        "I"
    }

    fn num_qubits(&self) -> usize {
        1
    }

    fn matrix(&self) -> Option<Vec<Complex64>> {
        Some(vec![ONE, ZERO, ZERO, ONE])
    }
}

/// Hadamard gate, H = 1/√2 [[1, 1], [1, -1]]
#[derive(Debug, Clone, Copy)]
pub struct Hadamard;

impl Gate for Hadamard {
    fn name(&self) -> &str {
        "H"
    }

    fn num_qubits(&self) -> usize {
        1
    }

    fn matrix(&self) -> Option<Vec<Complex64>> {
        let h = Complex64::new(INV_SQRT2, 0.0);
        Some(vec![h, h, h, -h])
    }
}

/// Pauli-X gate
#[derive(Debug, Clone, Copy)]
pub struct PauliX;

impl Gate for PauliX {
    fn name(&self) -> &str {
        "X"
    }

    fn num_qubits(&self) -> usize {
        1
    }

    fn matrix(&self) -> Option<Vec<Complex64>> {
        Some(vec![ZERO, ONE, ONE, ZERO])
    }
}

/// Pauli-Y gate
#[derive(Debug, Clone, Copy)]
pub struct PauliY;

impl Gate for PauliY {
    fn name(&self) -> &str {
        "Y"
    }

    fn num_qubits(&self) -> usize {
        1
    }

    fn matrix(&self) -> Option<Vec<Complex64>> {
        Some(vec![ZERO, NEG_I, I, ZERO])
    }
}

/// Pauli-Z gate
#[derive(Debug, Clone, Copy)]
pub struct PauliZ;

impl Gate for PauliZ {
    fn name(&self) -> &str {
        "Z"
    }

    fn num_qubits(&self) -> usize {
        1
    }

    fn matrix(&self) -> Option<Vec<Complex64>> {
        Some(vec![ONE, ZERO, ZERO, NEG_ONE])
    }
}

/// Phase gate, S = diag(1, i)
#[derive(Debug, Clone, Copy)]
pub struct SGate;

impl Gate for SGate {
    fn name(&self) -> &str {
        "S"
    }

    fn num_qubits(&self) -> usize {
        1
    }

    fn matrix(&self) -> Option<Vec<Complex64>> {
        Some(vec![ONE, ZERO, ZERO, I])
    }
}

/// Rotation about the X axis, RX(θ) = exp(-iθX/2)
#[derive(Debug, Clone, Copy)]
pub struct RotationX(pub f64);

impl Gate for RotationX {
    fn name(&self) -> &str {
        "RX"
    }

    fn num_qubits(&self) -> usize {
        1
    }

    fn matrix(&self) -> Option<Vec<Complex64>> {
        let (s, c) = (self.0 / 2.0).sin_cos();
        let c = Complex64::new(c, 0.0);
        let s = Complex64::new(0.0, -s);
        Some(vec![c, s, s, c])
    }
}

/// Rotation about the Y axis, RY(θ) = exp(-iθY/2)
#[derive(Debug, Clone, Copy)]
pub struct RotationY(pub f64);

impl Gate for RotationY {
    fn name(&self) -> &str {
        "RY"
    }

    fn num_qubits(&self) -> usize {
        1
    }

    fn matrix(&self) -> Option<Vec<Complex64>> {
        let (s, c) = (self.0 / 2.0).sin_cos();
        Some(vec![
            Complex64::new(c, 0.0),
            Complex64::new(-s, 0.0),
            Complex64::new(s, 0.0),
            Complex64::new(c, 0.0),
        ])
    }
}

/// Rotation about the Z axis, RZ(θ) = exp(-iθZ/2)
#[derive(Debug, Clone, Copy)]
pub struct RotationZ(pub f64);

impl Gate for RotationZ {
    fn name(&self) -> &str {
        "RZ"
    }

    fn num_qubits(&self) -> usize {
        1
    }

    fn matrix(&self) -> Option<Vec<Complex64>> {
        let half = self.0 / 2.0;
        Some(vec![
            Complex64::from_polar(1.0, -half),
            ZERO,
            ZERO,
            Complex64::from_polar(1.0, half),
        ])
    }
}

/// Controlled-Z gate
#[derive(Debug, Clone, Copy)]
pub struct CZ;

impl Gate for CZ {
    fn name(&self) -> &str {
        "CZ"
    }

    fn num_qubits(&self) -> usize {
        2
    }

    fn matrix(&self) -> Option<Vec<Complex64>> {
        let mut m = vec![ZERO; 16];
        m[0] = ONE;
        m[5] = ONE;
        m[10] = ONE;
        m[15] = NEG_ONE;
        Some(m)
    }
}

/// Controlled-NOT gate, control is the first qubit of the operation
#[derive(Debug, Clone, Copy)]
pub struct CNOT;

impl Gate for CNOT {
    fn name(&self) -> &str {
        "CNOT"
    }

    fn num_qubits(&self) -> usize {
        2
    }

    fn matrix(&self) -> Option<Vec<Complex64>> {
        let mut m = vec![ZERO; 16];
        m[0] = ONE;
        m[5] = ONE;
        m[11] = ONE;
        m[14] = ONE;
        Some(m)
    }
}

/// User-defined gate given by an explicit unitary matrix
#[derive(Debug, Clone)]
pub struct Unitary {
    name: String,
    num_qubits: usize,
    matrix: Vec<Complex64>,
}

impl Unitary {
    /// Define a gate from a flattened row-major matrix
    ///
    /// # Errors
    /// Returns error if the matrix length is not a power-of-two square.
    pub fn new(name: impl Into<String>, matrix: Vec<Complex64>) -> Result<Self> {
        let name = name.into();
        let dim = (matrix.len() as f64).sqrt().round() as usize;
        if dim < 2 || dim * dim != matrix.len() || !dim.is_power_of_two() {
            return Err(QuantumError::invalid_qubit_count(name, dim, matrix.len()));
        }

        Ok(Self {
            name,
            num_qubits: dim.trailing_zeros() as usize,
            matrix,
        })
    }

    /// Define a gate from a square `nalgebra` matrix
    pub fn from_matrix(name: impl Into<String>, matrix: &DMatrix<Complex64>) -> Result<Self> {
        let flat = matrix.transpose().iter().copied().collect();
        Self::new(name, flat)
    }
}

impl Gate for Unitary {
    fn name(&self) -> &str {
        &self.name
    }

    fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    fn matrix(&self) -> Option<Vec<Complex64>> {
        Some(self.matrix.clone())
    }
}
