//! Density matrix representation for tomography estimates
//!
//! A density matrix ρ is a positive semi-definite, Hermitian matrix with
//! Tr(ρ) = 1. Estimators construct these from measurement data; only the
//! iterative estimators and the projector guarantee physicality; linear
//! inversion may produce small negative eigenvalues.
//!
//! Basis states are indexed with the first qubit of the tomography qubit
//! list as the most significant bit.
//!
//! # Example
//!
//! ```
//! use qtomo_state::DensityMatrix;
//!
//! let mixed = DensityMatrix::maximally_mixed(1).unwrap();
//! assert!((mixed.purity() - 0.5).abs() < 1e-10);
//! ```

use crate::error::{Result, StateError};
use crate::hermitian::{hermitian_deviation, HermitianEigen};
use nalgebra::DMatrix;
use num_complex::Complex64;
use std::fmt;

/// Density matrix of an n-qubit state
#[derive(Clone, PartialEq)]
pub struct DensityMatrix {
    num_qubits: usize,
    matrix: DMatrix<Complex64>,
}

impl DensityMatrix {
    /// |0...0⟩⟨0...0|
    pub fn new(num_qubits: usize) -> Result<Self> {
        let dimension = checked_dimension(num_qubits)?;
        let mut matrix = DMatrix::zeros(dimension, dimension);
        matrix[(0, 0)] = Complex64::new(1.0, 0.0);
        Ok(Self { num_qubits, matrix })
    }

    /// Maximally mixed state I/2^n
    pub fn maximally_mixed(num_qubits: usize) -> Result<Self> {
        let dimension = checked_dimension(num_qubits)?;
        let value = Complex64::new(1.0 / dimension as f64, 0.0);
        let matrix = DMatrix::from_diagonal_element(dimension, dimension, value);
        Ok(Self { num_qubits, matrix })
    }

    /// ρ = |ψ⟩⟨ψ| from amplitudes (length 2^num_qubits)
    pub fn from_state_vector(num_qubits: usize, amplitudes: &[Complex64]) -> Result<Self> {
        let dimension = checked_dimension(num_qubits)?;
        if amplitudes.len() != dimension {
            return Err(StateError::DimensionMismatch {
                expected: dimension,
                actual: amplitudes.len(),
            });
        }

        let matrix = DMatrix::from_fn(dimension, dimension, |i, j| {
            amplitudes[i] * amplitudes[j].conj()
        });
        Ok(Self { num_qubits, matrix })
    }

    /// Wrap an arbitrary square matrix of dimension 2^n
    ///
    /// No physicality is checked; use [`DensityMatrix::is_valid`] or the
    /// projector when that matters.
    pub fn from_matrix(matrix: DMatrix<Complex64>) -> Result<Self> {
        if !matrix.is_square() {
            return Err(StateError::DimensionMismatch {
                expected: matrix.nrows(),
                actual: matrix.ncols(),
            });
        }
        let dimension = matrix.nrows();
        if dimension == 0 || !dimension.is_power_of_two() {
            return Err(StateError::InvalidDimension { dimension });
        }

        Ok(Self {
            num_qubits: dimension.trailing_zeros() as usize,
            matrix,
        })
    }

    /// Get number of qubits
    #[inline]
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Get matrix dimension (2^num_qubits)
    #[inline]
    pub fn dimension(&self) -> usize {
        self.matrix.nrows()
    }

    /// Get a matrix element ρᵢⱼ
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Complex64 {
        self.matrix[(row, col)]
    }

    /// Borrow the underlying matrix
    #[inline]
    pub fn matrix(&self) -> &DMatrix<Complex64> {
        &self.matrix
    }

    /// Tr(ρ), complex-valued
    pub fn trace_complex(&self) -> Complex64 {
        self.matrix.trace()
    }

    /// Real part of Tr(ρ)
    pub fn trace(&self) -> f64 {
        self.trace_complex().re
    }

    /// Tr(ρ²), real part
    ///
    /// Returns 1 for pure states; the minimum is 1/d for d = 2^n.
    pub fn purity(&self) -> f64 {
        crate::measures::purity(self)
    }

    /// Eigenvalues of the Hermitian part, ascending
    pub fn eigenvalues(&self) -> Result<Vec<f64>> {
        let mut values = HermitianEigen::new(&self.matrix)?.eigenvalues;
        values.sort_by(f64::total_cmp);
        Ok(values)
    }

    /// Largest element-wise distance |ρᵢⱼ - σᵢⱼ| to another matrix
    pub fn max_abs_diff(&self, other: &DensityMatrix) -> f64 {
        if self.dimension() != other.dimension() {
            return f64::INFINITY;
        }
        self.matrix
            .iter()
            .zip(other.matrix.iter())
            .map(|(a, b)| (a - b).norm())
            .fold(0.0, f64::max)
    }

    /// Check Hermiticity, unit trace and non-negative spectrum within `tolerance`
    pub fn is_valid(&self, tolerance: f64) -> bool {
        if (self.trace_complex() - Complex64::new(1.0, 0.0)).norm() > tolerance {
            return false;
        }

        if hermitian_deviation(&self.matrix) > tolerance {
            return false;
        }

        match self.eigenvalues() {
            Ok(values) => values.iter().all(|&v| v >= -tolerance),
            Err(_) => false,
        }
    }
}

fn checked_dimension(num_qubits: usize) -> Result<usize> {
    u32::try_from(num_qubits)
        .ok()
        .and_then(|n| 1usize.checked_shl(n))
        .ok_or(StateError::InvalidDimension { dimension: 0 })
}

impl fmt::Debug for DensityMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DensityMatrix {{ qubits: {}, dim: {}, purity: {:.4} }}",
            self.num_qubits,
            self.dimension(),
            self.purity()
        )
    }
}

impl fmt::Display for DensityMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.matrix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-10;

    #[test]
    fn test_new_density_matrix() {
        let dm = DensityMatrix::new(2).unwrap();
        assert_eq!(dm.num_qubits(), 2);
        assert_eq!(dm.dimension(), 4);
        assert!((dm.trace() - 1.0).abs() < TOL);
        assert!((dm.purity() - 1.0).abs() < TOL);
    }

    #[test]
    fn test_from_state_vector() {
        // Bell state: (|00⟩ + |11⟩)/√2
        let h = 1.0 / 2.0_f64.sqrt();
        let amplitudes = vec![
            Complex64::new(h, 0.0),
            Complex64::new(0.0, 0.0),
            Complex64::new(0.0, 0.0),
            Complex64::new(h, 0.0),
        ];

        let dm = DensityMatrix::from_state_vector(2, &amplitudes).unwrap();
        assert!((dm.purity() - 1.0).abs() < TOL);
        assert!((dm.get(0, 3).re - 0.5).abs() < TOL);
        assert!(dm.is_valid(TOL));

        assert!(DensityMatrix::from_state_vector(3, &amplitudes).is_err());
    }

    #[test]
    fn test_maximally_mixed() {
        let dm = DensityMatrix::maximally_mixed(2).unwrap();
        assert!((dm.trace() - 1.0).abs() < TOL);
        assert!((dm.purity() - 0.25).abs() < TOL);
    }

    #[test]
    fn test_from_matrix_dimension_checks() {
        assert!(matches!(
            DensityMatrix::from_matrix(DMatrix::zeros(3, 3)),
            Err(StateError::InvalidDimension { dimension: 3 })
        ));
        assert!(DensityMatrix::from_matrix(DMatrix::zeros(2, 4)).is_err());
        let dm = DensityMatrix::from_matrix(DMatrix::identity(8, 8)).unwrap();
        assert_eq!(dm.num_qubits(), 3);
    }

    #[test]
    fn test_is_valid_rejects_negative_spectrum() {
        // Unit trace and Hermitian, but eigenvalues 1.2 and -0.2
        let m = DMatrix::from_diagonal(&nalgebra::DVector::from_vec(vec![
            Complex64::new(1.2, 0.0),
            Complex64::new(-0.2, 0.0),
        ]));
        let dm = DensityMatrix::from_matrix(m).unwrap();
        assert!(!dm.is_valid(TOL));
        assert_eq!(dm.eigenvalues().unwrap().len(), 2);
    }

    #[test]
    fn test_max_abs_diff() {
        let a = DensityMatrix::new(1).unwrap();
        let b = DensityMatrix::maximally_mixed(1).unwrap();
        assert!((a.max_abs_diff(&b) - 0.5).abs() < TOL);
        assert!(a.max_abs_diff(&DensityMatrix::new(2).unwrap()).is_infinite());
    }
}
