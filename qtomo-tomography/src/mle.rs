//! Iterative maximum-likelihood state estimation
//!
//! Each step applies the diluted "RρR" update
//!
//! ```text
//! ρ ← (I + εG) ρ (I + εG) / Tr(·)
//! ```
//!
//! where G is the R-operator, optionally with a penalty gradient:
//!
//! - plain MLE: G = R(ρ)
//! - maximum entropy: G = R(ρ) − λ (log ρ − Tr(ρ log ρ) I)
//! - hedged: G = R(ρ) + (β/N)(ρ⁻¹ − d I)
//!
//! Starting from I/d, every iterate is positive definite with unit trace.
//!
//! References: Řeháček, Hradil, Knill and Lvovsky, PRA 75, 042108 (2007);
//! Teo et al., PRA 84, 062125 (2011); Blume-Kohout, PRL 105, 200504 (2010).

use crate::config::IterativeMleConfig;
use crate::error::{Result, TomographyError};
use crate::observations::Observations;
use nalgebra::DMatrix;
use num_complex::Complex64;
use qtomo_core::{ExperimentResult, QubitId};
use qtomo_state::hermitian::{hermitian_part, HermitianEigen};
use qtomo_state::DensityMatrix;
use tracing::{debug, trace, warn};

/// Eigenvalues are floored here before inversion in the hedged gradient
const INVERSE_FLOOR: f64 = 1e-12;

/// Outcome of [`iterative_mle_state_estimate`]
#[derive(Debug, Clone)]
pub struct IterativeEstimate {
    /// Final iterate; unit trace even when not converged
    pub rho: DensityMatrix,
    /// Number of updates performed
    pub iterations: usize,
    /// Whether the scaled update fell below the tolerance
    pub converged: bool,
    /// ‖ρₖ₊₁ − ρₖ‖_F / ε of the last update, the quantity compared with `tol`
    pub final_change: f64,
    /// Σ N₊ ln p₊ + N₋ ln p₋ at `rho`
    pub log_likelihood: f64,
}

/// The R-operator of `results` at the state `rho`
///
/// For each result with N₊ and N₋ outcomes and projectors Π± = (I ± P)/2,
///
/// ```text
/// R = Σ [N₊/Tr(ρΠ₊) Π₊ + N₋/Tr(ρΠ₋) Π₋] / Σ N
/// ```
///
/// A state reproducing the observed frequencies is a fixed point of
/// ρ ↦ RρR.
pub fn r_operator(
    results: &[ExperimentResult],
    rho: &DensityMatrix,
    qubits: &[QubitId],
) -> Result<DMatrix<Complex64>> {
    let observations = Observations::new(results, qubits)?;
    check_dimension(rho, observations.dimension)?;
    Ok(observations.r_operator(rho.matrix()))
}

fn check_dimension(rho: &DensityMatrix, dimension: usize) -> Result<()> {
    if rho.dimension() != dimension {
        return Err(TomographyError::DimensionMismatch {
            expected: dimension,
            actual: rho.dimension(),
        });
    }
    Ok(())
}

/// Update direction G at `rho`
fn gradient(
    observations: &Observations,
    rho: &DMatrix<Complex64>,
    config: &IterativeMleConfig,
) -> Result<DMatrix<Complex64>> {
    let r = observations.r_operator(rho);
    let d = observations.dimension;
    let identity = DMatrix::<Complex64>::identity(d, d);

    if config.entropy_penalty > 0.0 {
        let eigen = HermitianEigen::new(rho)?;
        let log_rho = eigen.map(|p| p.max(f64::MIN_POSITIVE).ln());
        let rho_log_rho: f64 = eigen
            .eigenvalues
            .iter()
            .map(|&p| {
                let p = p.max(f64::MIN_POSITIVE);
                p * p.ln()
            })
            .sum();
        let penalty = log_rho - identity * Complex64::new(rho_log_rho, 0.0);
        Ok(r - penalty * Complex64::new(config.entropy_penalty, 0.0))
    } else if config.beta > 0.0 {
        let eigen = HermitianEigen::new(rho)?;
        let inverse = eigen.map(|p| 1.0 / p.max(INVERSE_FLOOR));
        let hedge = inverse - identity * Complex64::new(d as f64, 0.0);
        let weight = config.beta / observations.total_counts;
        Ok(r + hedge * Complex64::new(weight, 0.0))
    } else {
        Ok(r)
    }
}

/// Estimate ρ by diluted iterative maximum likelihood
///
/// `config` selects plain, maximum-entropy or hedged estimation. The loop
/// stops once ‖ρₖ₊₁ − ρₖ‖_F / ε drops below `tol`; each step moves ρ by
/// O(ε), so the raw change alone would stop a small-ε run at I/d. Hitting
/// `max_iterations` is not an error: the last iterate is returned with
/// `converged = false`.
///
/// # Errors
/// - [`TomographyError::InvalidConfiguration`] for a configuration rejected
///   by [`IterativeMleConfig::validate`] or results without shots
/// - [`TomographyError::EmptyResults`]
/// - [`TomographyError::Core`] if a result acts outside `qubits`
pub fn iterative_mle_state_estimate(
    results: &[ExperimentResult],
    qubits: &[QubitId],
    config: &IterativeMleConfig,
) -> Result<IterativeEstimate> {
    config.validate()?;
    let observations = Observations::new(results, qubits)?;

    let d = observations.dimension;
    let identity = DMatrix::<Complex64>::identity(d, d);
    let mut rho = &identity / Complex64::new(d as f64, 0.0);
    let mut iterations = 0;
    let mut final_change = f64::INFINITY;
    let mut converged = false;

    while iterations < config.max_iterations {
        let g = gradient(&observations, &rho, config)?;
        let step = &identity + g * Complex64::new(config.epsilon, 0.0);
        let updated = &step * &rho * &step;
        let trace = updated.trace().re;
        let next = hermitian_part(&(updated / Complex64::new(trace, 0.0)));

        final_change = (&next - &rho).norm() / config.epsilon;
        rho = next;
        iterations += 1;
        trace!(iteration = iterations, change = final_change, "mle update");

        if final_change < config.tol {
            converged = true;
            break;
        }
    }

    let log_likelihood = observations.log_likelihood(&rho);
    if converged {
        debug!(iterations, final_change, log_likelihood, "iterative estimate converged");
    } else {
        warn!(
            iterations,
            final_change,
            tol = config.tol,
            "iterative estimate did not converge, returning last iterate"
        );
    }

    Ok(IterativeEstimate {
        rho: DensityMatrix::from_matrix(rho)?,
        iterations,
        converged,
        final_change,
        log_likelihood,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use qtomo_core::{zeros_state, ExperimentSetting, PauliTerm};

    fn result(label: &str, expectation: f64, shots: u64, qubits: &[QubitId]) -> ExperimentResult {
        let setting = ExperimentSetting::new(
            zeros_state(qubits),
            PauliTerm::from_label(label, qubits).unwrap(),
        );
        ExperimentResult::new(setting, expectation, shots)
    }

    #[test]
    fn test_r_operator_hand_example() {
        // ρ = I/2, Z measured 10 times with 3 '+' and 7 '-' outcomes
        let q = QubitId::list(&[0]);
        let rho = DensityMatrix::maximally_mixed(1).unwrap();
        let r = r_operator(&[result("Z", -0.4, 10, &q)], &rho, &q).unwrap();
        assert_relative_eq!(r[(0, 0)].re, 0.6, epsilon = 1e-12);
        assert_relative_eq!(r[(1, 1)].re, 1.4, epsilon = 1e-12);
        assert_relative_eq!(r[(0, 1)].norm(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_r_operator_dimension_mismatch() {
        let q = QubitId::list(&[0]);
        let rho = DensityMatrix::maximally_mixed(2).unwrap();
        assert_eq!(
            r_operator(&[result("Z", 0.0, 10, &q)], &rho, &q).unwrap_err(),
            TomographyError::DimensionMismatch {
                expected: 2,
                actual: 4
            }
        );
    }

    #[test]
    fn test_mixed_data_converges_immediately() {
        let q = QubitId::list(&[0]);
        let results = vec![
            result("X", 0.0, 100, &q),
            result("Y", 0.0, 100, &q),
            result("Z", 0.0, 100, &q),
        ];
        let estimate =
            iterative_mle_state_estimate(&results, &q, &IterativeMleConfig::new()).unwrap();
        assert!(estimate.converged);
        assert_eq!(estimate.iterations, 1);
        assert_relative_eq!(estimate.rho.get(0, 0).re, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_mixed_z_state() {
        // <Z> = 0.6 is inside the Bloch ball, so MLE matches inversion
        let q = QubitId::list(&[0]);
        let results = vec![
            result("X", 0.0, 1000, &q),
            result("Y", 0.0, 1000, &q),
            result("Z", 0.6, 1000, &q),
        ];
        let config = IterativeMleConfig::new().with_tol(1e-11);
        let estimate = iterative_mle_state_estimate(&results, &q, &config).unwrap();
        assert!(estimate.converged);
        assert_relative_eq!(estimate.rho.get(0, 0).re, 0.8, epsilon = 1e-8);
        assert_relative_eq!(estimate.rho.get(1, 1).re, 0.2, epsilon = 1e-8);
        assert_relative_eq!(estimate.rho.trace(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_small_step_walks_to_the_estimate() {
        // Each ε = 1e-3 step moves ρ by about 1e-4, far below tol; the scaled
        // change keeps the loop running until ρ reaches the fixed point
        let q = QubitId::list(&[0]);
        let results = vec![
            result("X", 0.0, 1000, &q),
            result("Y", 0.0, 1000, &q),
            result("Z", 0.6, 1000, &q),
        ];
        let config = IterativeMleConfig::new().with_epsilon(1e-3).with_tol(1e-3);
        let estimate = iterative_mle_state_estimate(&results, &q, &config).unwrap();
        assert!(estimate.converged);
        assert!(estimate.iterations > 1000);
        assert!(estimate.final_change < 1e-3);
        assert_relative_eq!(estimate.rho.get(0, 0).re, 0.8, epsilon = 2e-3);

        let capped =
            iterative_mle_state_estimate(&results, &q, &config.with_max_iterations(1000)).unwrap();
        assert!(!capped.converged);
        assert_eq!(capped.iterations, 1000);
        assert!(capped.final_change >= 1e-3);
        let p0 = capped.rho.get(0, 0).re;
        assert!(p0 > 0.55 && p0 < 0.8);
    }

    #[test]
    fn test_expectation_outside_unit_interval() {
        // <Z> = 1.02 from a miscalibrated readout is read as all '+' outcomes
        let q = QubitId::list(&[0]);
        let results = vec![
            result("X", 0.0, 1000, &q),
            result("Y", 0.0, 1000, &q),
            result("Z", 1.02, 1000, &q),
        ];
        let estimate =
            iterative_mle_state_estimate(&results, &q, &IterativeMleConfig::new()).unwrap();
        assert!(estimate.converged);
        assert!(estimate.log_likelihood.is_finite());
        assert_relative_eq!(estimate.rho.get(0, 0).re, 1.0, epsilon = 1e-6);
        assert!(estimate.rho.is_valid(1e-10));
    }

    #[test]
    fn test_iteration_cap_is_not_an_error() {
        let q = QubitId::list(&[0]);
        let results = vec![
            result("X", 0.0, 100, &q),
            result("Y", 0.0, 100, &q),
            result("Z", 1.0, 100, &q),
        ];
        let config = IterativeMleConfig::new().with_max_iterations(3);
        let estimate = iterative_mle_state_estimate(&results, &q, &config).unwrap();
        assert!(!estimate.converged);
        assert_eq!(estimate.iterations, 3);
        assert_relative_eq!(estimate.rho.trace(), 1.0, epsilon = 1e-12);
        assert!(estimate.rho.get(0, 0).re > 0.5);
    }

    #[test]
    fn test_rejects_conflicting_penalties() {
        let q = QubitId::list(&[0]);
        let config = IterativeMleConfig::hedged(0.5).with_entropy_penalty(0.1);
        assert!(matches!(
            iterative_mle_state_estimate(&[result("Z", 1.0, 10, &q)], &q, &config),
            Err(TomographyError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_empty_results() {
        let q = QubitId::list(&[0]);
        assert_eq!(
            iterative_mle_state_estimate(&[], &q, &IterativeMleConfig::new()).unwrap_err(),
            TomographyError::EmptyResults
        );
    }
}
