//! Linear-inversion state estimation
//!
//! The Pauli strings on k qubits form an orthogonal operator basis with
//! Tr(PQ) = 2^k δ_PQ, so a state is recovered from its expectations as
//!
//! ```text
//! ρ = (1/2^k) Σ_P ⟨P⟩ P
//! ```
//!
//! The estimate is unbiased but need not be positive semi-definite; project
//! it with [`DensityMatrix::project_to_physical`] when a physical state is
//! required.

use crate::error::{Result, TomographyError};
use crate::observations::{check_results, pauli_matrix, OperatorKey};
use nalgebra::DMatrix;
use num_complex::Complex64;
use qtomo_core::{pauli_basis, ExperimentResult, QubitId};
use qtomo_state::DensityMatrix;
use std::collections::BTreeMap;
use tracing::debug;

/// Shot-weighted mean expectation per measured operator
fn average_by_operator(results: &[ExperimentResult]) -> BTreeMap<OperatorKey, f64> {
    // (Σ n·e, Σ n, Σ e, count)
    let mut sums: BTreeMap<OperatorKey, (f64, f64, f64, usize)> = BTreeMap::new();
    for result in results {
        let entry = sums
            .entry(result.setting.out_operator.operator_key())
            .or_insert((0.0, 0.0, 0.0, 0));
        let shots = result.total_counts as f64;
        entry.0 += shots * result.expectation;
        entry.1 += shots;
        entry.2 += result.expectation;
        entry.3 += 1;
    }

    sums.into_iter()
        .map(|(key, (weighted, shots, plain, count))| {
            let mean = if shots > 0.0 {
                weighted / shots
            } else {
                plain / count as f64
            };
            (key, mean)
        })
        .collect()
}

/// Estimate ρ by linear inversion of Pauli expectation values
///
/// Every non-identity Pauli string on `qubits` must have at least one
/// result; repeated results for one operator are averaged with their shot
/// counts as weights. The identity coefficient is fixed at 1, so a
/// measured identity result is accepted but not needed.
///
/// # Errors
/// - [`TomographyError::EmptyResults`] for an empty result set
/// - [`TomographyError::MissingSettingData`] if a basis operator was not measured
/// - [`TomographyError::Core`] if a result acts outside `qubits` or the
///   qubit list is empty or repeated
pub fn linear_inv_state_estimate(
    results: &[ExperimentResult],
    qubits: &[QubitId],
) -> Result<DensityMatrix> {
    check_results(results, qubits)?;

    let expectations = average_by_operator(results);
    let dimension = 1usize << qubits.len();
    let mut rho = DMatrix::<Complex64>::identity(dimension, dimension);

    for operator in pauli_basis(qubits)? {
        if operator.is_identity() {
            continue;
        }
        let expectation = expectations
            .get(&operator.operator_key())
            .copied()
            .ok_or_else(|| TomographyError::MissingSettingData {
                operator: operator.to_string(),
            })?;
        rho += pauli_matrix(&operator, qubits)? * Complex64::new(expectation, 0.0);
    }

    debug!(
        num_qubits = qubits.len(),
        results = results.len(),
        operators = expectations.len(),
        "linear inversion estimate"
    );
    Ok(DensityMatrix::from_matrix(
        rho / Complex64::new(dimension as f64, 0.0),
    )?)
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
    fn test_single_qubit_plus_state() {
        let q = QubitId::list(&[0]);
        let results = vec![
            result("X", 1.0, 100, &q),
            result("Y", 0.0, 100, &q),
            result("Z", 0.0, 100, &q),
        ];
        let rho = linear_inv_state_estimate(&results, &q).unwrap();
        for i in 0..2 {
            for j in 0..2 {
                assert_relative_eq!(rho.get(i, j).re, 0.5, epsilon = 1e-12);
            }
        }
        assert_relative_eq!(rho.trace(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_repeated_results_are_shot_weighted() {
        let q = QubitId::list(&[0]);
        let results = vec![
            result("I", 1.0, 10, &q),
            result("X", 0.0, 10, &q),
            result("Y", 0.0, 10, &q),
            result("Z", 1.0, 300, &q),
            result("Z", 0.2, 100, &q),
        ];
        let rho = linear_inv_state_estimate(&results, &q).unwrap();
        // <Z> = (300 + 20)/400 = 0.8
        assert_relative_eq!(rho.get(0, 0).re, 0.9, epsilon = 1e-12);
        assert_relative_eq!(rho.get(1, 1).re, 0.1, epsilon = 1e-12);
    }

    #[test]
    fn test_missing_operator() {
        let q = QubitId::list(&[0]);
        let results = vec![result("X", 1.0, 10, &q), result("Z", 0.0, 10, &q)];
        let err = linear_inv_state_estimate(&results, &q).unwrap_err();
        assert_eq!(
            err,
            TomographyError::MissingSettingData {
                operator: "(1+0j)*Y0".to_string()
            }
        );
    }

    #[test]
    fn test_can_be_unphysical() {
        let q = QubitId::list(&[0]);
        // Bloch vector of length √3: outside the ball
        let results = vec![
            result("X", 1.0, 10, &q),
            result("Y", 1.0, 10, &q),
            result("Z", 1.0, 10, &q),
        ];
        let rho = linear_inv_state_estimate(&results, &q).unwrap();
        let eigs = rho.eigenvalues().unwrap();
        assert!(eigs[0] < 0.0);
        assert!(rho.project_to_physical().unwrap().is_valid(1e-10));
    }
}
