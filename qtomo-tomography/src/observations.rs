//! Shared preparation of experiment results for the estimators

use crate::error::{Result, TomographyError};
use nalgebra::DMatrix;
use num_complex::Complex64;
use qtomo_core::{validate_qubits, ExperimentResult, Pauli, PauliTerm, QubitId};
use std::collections::BTreeMap;

/// Operator identity of a result, independent of coefficient
pub type OperatorKey = BTreeMap<QubitId, Pauli>;

/// Reject empty result sets and results acting outside `qubits`
pub(crate) fn check_results(results: &[ExperimentResult], qubits: &[QubitId]) -> Result<()> {
    validate_qubits(qubits)?;
    if results.is_empty() {
        return Err(TomographyError::EmptyResults);
    }
    for result in results {
        result.setting.out_operator.check_support(qubits)?;
    }
    Ok(())
}

/// Results sorted by measured operator
///
/// The sort is stable, so repeated measurements of one operator keep their
/// relative order.
pub fn canonical_order(results: &[ExperimentResult]) -> Vec<ExperimentResult> {
    let mut ordered = results.to_vec();
    ordered.sort_by_cached_key(|r| r.setting.out_operator.operator_key());
    ordered
}

/// Unit-coefficient matrix of a result's Pauli string on `qubits`
pub(crate) fn pauli_matrix(term: &PauliTerm, qubits: &[QubitId]) -> Result<DMatrix<Complex64>> {
    Ok(term
        .clone()
        .with_coeff(Complex64::new(1.0, 0.0))
        .matrix(qubits)?)
}

/// One measured Pauli with its outcome projectors
pub(crate) struct Observation {
    /// Π₊ = (I + P)/2
    pub plus: DMatrix<Complex64>,
    /// Π₋ = (I − P)/2
    pub minus: DMatrix<Complex64>,
    pub n_plus: f64,
    pub n_minus: f64,
}

/// Results lifted to projectors on a fixed register
pub(crate) struct Observations {
    pub observations: Vec<Observation>,
    pub total_counts: f64,
    pub dimension: usize,
}

impl Observations {
    pub fn new(results: &[ExperimentResult], qubits: &[QubitId]) -> Result<Self> {
        check_results(results, qubits)?;

        let dimension = 1usize << qubits.len();
        let identity = DMatrix::<Complex64>::identity(dimension, dimension);
        let half = Complex64::new(0.5, 0.0);

        let mut observations = Vec::with_capacity(results.len());
        let mut total_counts = 0.0;
        for result in results {
            let pauli = pauli_matrix(&result.setting.out_operator, qubits)?;
            let (n_plus, n_minus) = result.outcome_counts();
            total_counts += result.total_counts as f64;
            observations.push(Observation {
                plus: (&identity + &pauli) * half,
                minus: (&identity - &pauli) * half,
                n_plus,
                n_minus,
            });
        }

        if total_counts <= 0.0 {
            return Err(TomographyError::InvalidConfiguration(
                "results carry no shots".to_string(),
            ));
        }

        Ok(Self {
            observations,
            total_counts,
            dimension,
        })
    }

    /// Σ N₊/(p₊ + tiny) Π₊ + N₋/(p₋ + tiny) Π₋, divided by the total shot count
    pub fn r_operator(&self, rho: &DMatrix<Complex64>) -> DMatrix<Complex64> {
        let mut r = DMatrix::<Complex64>::zeros(self.dimension, self.dimension);
        for obs in &self.observations {
            let p_plus = trace_product(rho, &obs.plus);
            let p_minus = trace_product(rho, &obs.minus);
            r += &obs.plus * Complex64::new(obs.n_plus / (p_plus + f64::MIN_POSITIVE), 0.0);
            r += &obs.minus * Complex64::new(obs.n_minus / (p_minus + f64::MIN_POSITIVE), 0.0);
        }
        r / Complex64::new(self.total_counts, 0.0)
    }

    /// Σ N₊ ln p₊ + N₋ ln p₋
    pub fn log_likelihood(&self, rho: &DMatrix<Complex64>) -> f64 {
        let term = |n: f64, p: f64| {
            if n > 0.0 {
                n * (p + f64::MIN_POSITIVE).ln()
            } else {
                0.0
            }
        };
        self.observations
            .iter()
            .map(|obs| {
                term(obs.n_plus, trace_product(rho, &obs.plus))
                    + term(obs.n_minus, trace_product(rho, &obs.minus))
            })
            .sum()
    }
}

/// Re Tr(AB)
fn trace_product(a: &DMatrix<Complex64>, b: &DMatrix<Complex64>) -> f64 {
    let n = a.nrows();
    let mut trace = 0.0;
    for i in 0..n {
        for j in 0..n {
            trace += (a[(i, j)] * b[(j, i)]).re;
        }
    }
    trace
}

#[cfg(test)]
mod tests {
    use super::*;
    use qtomo_core::{zeros_state, ExperimentSetting};

    fn result(label: &str, expectation: f64, qubits: &[QubitId]) -> ExperimentResult {
        let setting = ExperimentSetting::new(
            zeros_state(qubits),
            PauliTerm::from_label(label, qubits).unwrap(),
        );
        ExperimentResult::new(setting, expectation, 100)
    }

    #[test]
    fn test_canonical_order_is_input_independent() {
        let q = QubitId::list(&[0, 1]);
        let a = vec![result("ZZ", 1.0, &q), result("XI", 0.0, &q), result("IY", 0.5, &q)];
        let b = vec![a[2].clone(), a[0].clone(), a[1].clone()];
        assert_eq!(canonical_order(&a), canonical_order(&b));
    }

    #[test]
    fn test_check_results() {
        let q = QubitId::list(&[0]);
        assert_eq!(check_results(&[], &q), Err(TomographyError::EmptyResults));

        let wide = QubitId::list(&[0, 1]);
        let outside = result("XZ", 0.0, &wide);
        assert!(matches!(
            check_results(&[outside], &q),
            Err(TomographyError::Core(_))
        ));
    }

    #[test]
    fn test_zero_shots_rejected() {
        let q = QubitId::list(&[0]);
        let mut r = result("Z", 1.0, &q);
        r.total_counts = 0;
        assert!(matches!(
            Observations::new(&[r], &q),
            Err(TomographyError::InvalidConfiguration(_))
        ));
    }
}
