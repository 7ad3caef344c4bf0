//! Scalar functionals and distances between density matrices

use crate::density_matrix::DensityMatrix;
use crate::error::{Result, StateError};
use crate::hermitian::HermitianEigen;
use num_complex::Complex64;

/// Eigenvalues below this are treated as zero in entropy and square roots
const SPECTRUM_FLOOR: f64 = 1e-15;

fn floored_sqrt(p: f64) -> f64 {
    if p > SPECTRUM_FLOOR {
        p.sqrt()
    } else {
        0.0
    }
}

fn check_dimensions(rho: &DensityMatrix, sigma: &DensityMatrix) -> Result<()> {
    if rho.dimension() != sigma.dimension() {
        return Err(StateError::DimensionMismatch {
            expected: rho.dimension(),
            actual: sigma.dimension(),
        });
    }
    Ok(())
}

/// Tr(ρσ) without forming the product
pub fn trace_product(rho: &DensityMatrix, sigma: &DensityMatrix) -> Complex64 {
    let (a, b) = (rho.matrix(), sigma.matrix());
    let n = a.nrows();
    let mut trace = Complex64::new(0.0, 0.0);
    for i in 0..n {
        for j in 0..n {
            trace += a[(i, j)] * b[(j, i)];
        }
    }
    trace
}

/// Purity Tr(ρ²)
///
/// The imaginary part of Tr(ρ²) vanishes for Hermitian ρ and is dropped.
pub fn purity(rho: &DensityMatrix) -> f64 {
    trace_product(rho, rho).re
}

/// Von Neumann entropy S(ρ) = -Tr(ρ log₂ ρ)
pub fn von_neumann_entropy(rho: &DensityMatrix) -> Result<f64> {
    Ok(HermitianEigen::new(rho.matrix())?
        .eigenvalues
        .iter()
        .filter(|&&p| p > SPECTRUM_FLOOR)
        .map(|&p| -p * p.log2())
        .sum())
}

/// Uhlmann fidelity F(ρ, σ) = (Tr √(√ρ σ √ρ))²
pub fn fidelity(rho: &DensityMatrix, sigma: &DensityMatrix) -> Result<f64> {
    check_dimensions(rho, sigma)?;

    let sqrt_rho = HermitianEigen::new(rho.matrix())?.map(floored_sqrt);
    let inner = &sqrt_rho * sigma.matrix() * &sqrt_rho;
    let root_trace: f64 = HermitianEigen::new(&inner)?
        .eigenvalues
        .iter()
        .map(|&p| floored_sqrt(p))
        .sum();

    Ok(root_trace * root_trace)
}

/// Trace distance ½‖ρ - σ‖₁
pub fn trace_distance(rho: &DensityMatrix, sigma: &DensityMatrix) -> Result<f64> {
    check_dimensions(rho, sigma)?;

    let difference = rho.matrix() - sigma.matrix();
    let norm: f64 = HermitianEigen::new(&difference)?
        .eigenvalues
        .iter()
        .map(|p| p.abs())
        .sum();
    Ok(0.5 * norm)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn plus_state() -> DensityMatrix {
        let h = Complex64::new(1.0 / 2.0_f64.sqrt(), 0.0);
        DensityMatrix::from_state_vector(1, &[h, h]).unwrap()
    }

    #[test]
    fn test_purity_bounds() {
        assert_relative_eq!(purity(&plus_state()), 1.0, epsilon = 1e-12);
        let mixed = DensityMatrix::maximally_mixed(3).unwrap();
        assert_relative_eq!(purity(&mixed), 0.125, epsilon = 1e-12);
    }

    #[test]
    fn test_entropy() {
        assert_relative_eq!(von_neumann_entropy(&plus_state()).unwrap(), 0.0, epsilon = 1e-10);
        let mixed = DensityMatrix::maximally_mixed(2).unwrap();
        assert_relative_eq!(von_neumann_entropy(&mixed).unwrap(), 2.0, epsilon = 1e-10);
    }

    #[test]
    fn test_fidelity() {
        let zero = DensityMatrix::new(1).unwrap();
        let plus = plus_state();
        assert_relative_eq!(fidelity(&plus, &plus).unwrap(), 1.0, epsilon = 1e-10);
        assert_relative_eq!(fidelity(&zero, &plus).unwrap(), 0.5, epsilon = 1e-10);

        let mixed = DensityMatrix::maximally_mixed(1).unwrap();
        assert_relative_eq!(fidelity(&mixed, &zero).unwrap(), 0.5, epsilon = 1e-10);
    }

    #[test]
    fn test_trace_distance() {
        let zero = DensityMatrix::new(1).unwrap();
        let one = DensityMatrix::from_state_vector(
            1,
            &[Complex64::new(0.0, 0.0), Complex64::new(1.0, 0.0)],
        )
        .unwrap();
        assert_relative_eq!(trace_distance(&zero, &one).unwrap(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(trace_distance(&zero, &zero).unwrap(), 0.0, epsilon = 1e-12);
        assert!(trace_distance(&zero, &DensityMatrix::new(2).unwrap()).is_err());
    }
}
