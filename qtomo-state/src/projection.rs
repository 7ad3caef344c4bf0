//! Projection onto the set of physical density matrices
//!
//! The closest density matrix (in Frobenius norm) to a Hermitian matrix H
//! shares H's eigenvectors; its spectrum is the Euclidean projection of H's
//! spectrum onto the probability simplex. That projection is computed by
//! water-filling: sort descending, find the largest k such that shifting the
//! leading k eigenvalues by a common amount to restore unit sum keeps them
//! all non-negative, and clip the rest to zero.
//!
//! See Smolin, Gambetta and Smith, PRL 108, 070502 (2012).

use crate::density_matrix::DensityMatrix;
use crate::error::{Result, StateError};
use crate::hermitian::{hermitian_deviation, HermitianEigen};
use nalgebra::DMatrix;
use num_complex::Complex64;
use tracing::trace;

/// Maximum |Hᵢⱼ - Hⱼᵢ*| accepted as numerical noise
pub const HERMITIAN_TOLERANCE: f64 = 1e-8;

/// Project eigenvalues onto the probability simplex
///
/// The output is position-aligned with the input: the value at index `i`
/// is the adjusted value of `eigenvalues[i]`.
///
/// # Example
/// ```
/// use qtomo_state::project_eigenvalues;
///
/// let out = project_eigenvalues(&[3.0 / 5.0, 1.0 / 2.0, 7.0 / 20.0, 1.0 / 10.0, -11.0 / 20.0]);
/// let expected = [9.0 / 20.0, 7.0 / 20.0, 1.0 / 5.0, 0.0, 0.0];
/// for (a, b) in out.iter().zip(expected.iter()) {
///     assert!((a - b).abs() < 1e-12);
/// }
/// ```
pub fn project_eigenvalues(eigenvalues: &[f64]) -> Vec<f64> {
    if eigenvalues.is_empty() {
        return Vec::new();
    }

    let mut order: Vec<usize> = (0..eigenvalues.len()).collect();
    order.sort_by(|&a, &b| eigenvalues[b].total_cmp(&eigenvalues[a]));

    // Largest prefix of the descending spectrum that stays non-negative
    // after the common shift.
    let mut prefix_sum = 0.0;
    let mut shift = 0.0;
    for (k, &idx) in order.iter().enumerate() {
        prefix_sum += eigenvalues[idx];
        let candidate = (1.0 - prefix_sum) / (k + 1) as f64;
        if eigenvalues[idx] + candidate > 0.0 {
            shift = candidate;
        } else {
            break;
        }
    }

    let projected: Vec<f64> = eigenvalues.iter().map(|&v| (v + shift).max(0.0)).collect();
    trace!(shift, "projected spectrum onto simplex");
    projected
}

/// Closest positive semi-definite, unit-trace matrix to a Hermitian matrix
///
/// Any square dimension is accepted; wrap the output with
/// [`DensityMatrix::from_matrix`] or use
/// [`DensityMatrix::project_to_physical`] for qubit registers.
///
/// # Errors
/// Returns error if the matrix is not square, is not Hermitian within
/// [`HERMITIAN_TOLERANCE`], or cannot be diagonalised.
pub fn project_density_matrix(matrix: &DMatrix<Complex64>) -> Result<DMatrix<Complex64>> {
    if !matrix.is_square() {
        return Err(StateError::DimensionMismatch {
            expected: matrix.nrows(),
            actual: matrix.ncols(),
        });
    }

    let deviation = hermitian_deviation(matrix);
    if deviation > HERMITIAN_TOLERANCE {
        return Err(StateError::NotHermitian { deviation });
    }

    let eigen = HermitianEigen::new(matrix)?;
    let projected = project_eigenvalues(&eigen.eigenvalues);
    Ok(eigen.recompose_with(&projected))
}

impl DensityMatrix {
    /// Closest physical density matrix to this (possibly unphysical) estimate
    pub fn project_to_physical(&self) -> Result<DensityMatrix> {
        DensityMatrix::from_matrix(project_density_matrix(self.matrix())?)
    }
}
