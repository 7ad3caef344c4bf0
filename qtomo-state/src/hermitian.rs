//! Hermitian eigen-decomposition and matrix functions

use crate::error::{Result, StateError};
use nalgebra::linalg::SymmetricEigen;
use nalgebra::DMatrix;
use num_complex::Complex64;

/// Maximum number of QR sweeps before the eigen-solver gives up
const MAX_SWEEPS: usize = 100_000;

/// Largest element-wise deviation |mᵢⱼ - mⱼᵢ*|
pub fn hermitian_deviation(m: &DMatrix<Complex64>) -> f64 {
    let n = m.nrows();
    let mut max = 0.0f64;
    for i in 0..n {
        for j in i..n {
            max = max.max((m[(i, j)] - m[(j, i)].conj()).norm());
        }
    }
    max
}

/// (m + m†) / 2
pub fn hermitian_part(m: &DMatrix<Complex64>) -> DMatrix<Complex64> {
    (m + m.adjoint()) * Complex64::new(0.5, 0.0)
}

/// Eigenvalues and eigenvectors of a Hermitian matrix
///
/// Column `j` of `eigenvectors` belongs to `eigenvalues[j]`. Eigenvalues are
/// in solver order, not sorted.
#[derive(Debug, Clone)]
pub struct HermitianEigen {
    pub eigenvalues: Vec<f64>,
    pub eigenvectors: DMatrix<Complex64>,
}

impl HermitianEigen {
    /// Decompose the Hermitian part of `m`
    ///
    /// # Errors
    /// Returns error if `m` is not square or the solver does not converge.
    pub fn new(m: &DMatrix<Complex64>) -> Result<Self> {
        if !m.is_square() {
            return Err(StateError::DimensionMismatch {
                expected: m.nrows(),
                actual: m.ncols(),
            });
        }

        let eigen = SymmetricEigen::try_new(hermitian_part(m), f64::EPSILON, MAX_SWEEPS)
            .ok_or(StateError::Decomposition { dimension: m.nrows() })?;

        Ok(Self {
            eigenvalues: eigen.eigenvalues.iter().copied().collect(),
            eigenvectors: eigen.eigenvectors,
        })
    }

    /// V · diag(values) · V†
    pub fn recompose_with(&self, values: &[f64]) -> DMatrix<Complex64> {
        let mut scaled = self.eigenvectors.clone();
        for (j, &value) in values.iter().enumerate() {
            let mut column = scaled.column_mut(j);
            column *= Complex64::new(value, 0.0);
        }
        &scaled * self.eigenvectors.adjoint()
    }

    /// Apply a scalar function to the spectrum, V · diag(f(λ)) · V†
    pub fn map(&self, f: impl Fn(f64) -> f64) -> DMatrix<Complex64> {
        let values: Vec<f64> = self.eigenvalues.iter().map(|&v| f(v)).collect();
        self.recompose_with(&values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample_hermitian() -> DMatrix<Complex64> {
        DMatrix::from_row_slice(
            2,
            2,
            &[
                Complex64::new(0.7, 0.0),
                Complex64::new(0.1, -0.2),
                Complex64::new(0.1, 0.2),
                Complex64::new(0.3, 0.0),
            ],
        )
    }

    #[test]
    fn test_recompose_round_trip() {
        let m = sample_hermitian();
        let eigen = HermitianEigen::new(&m).unwrap();
        let rebuilt = eigen.recompose_with(&eigen.eigenvalues);
        assert_relative_eq!((rebuilt - m).norm(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_spectrum_sums_to_trace() {
        let eigen = HermitianEigen::new(&sample_hermitian()).unwrap();
        assert_relative_eq!(eigen.eigenvalues.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_map_square_root() {
        let m = sample_hermitian();
        let root = HermitianEigen::new(&m).unwrap().map(f64::sqrt);
        assert_relative_eq!((&root * &root - m).norm(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_deviation() {
        let mut m = sample_hermitian();
        assert_relative_eq!(hermitian_deviation(&m), 0.0);
        m[(0, 1)] = Complex64::new(0.5, 0.0);
        assert!(hermitian_deviation(&m) > 0.1);
        assert_relative_eq!(hermitian_deviation(&hermitian_part(&m)), 0.0);
    }

    #[test]
    fn test_non_square_rejected() {
        let m = DMatrix::<Complex64>::zeros(2, 3);
        assert!(HermitianEigen::new(&m).is_err());
    }
}
