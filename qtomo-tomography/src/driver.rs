//! End-to-end tomography run

use crate::error::Result;
use crate::estimator::StateEstimator;
use qtomo_core::{generate_state_tomography_experiment, ExperimentResult, Program, QubitId};
use qtomo_state::{DensityMatrix, MeasurementBackend};
use tracing::info;

/// Estimated state together with the data it came from
#[derive(Debug, Clone)]
pub struct TomographyRun {
    pub rho: DensityMatrix,
    pub results: Vec<ExperimentResult>,
}

/// Build the tomography plan for `program`, measure it and estimate the state
pub fn do_tomography<B, E>(
    backend: &mut B,
    program: &Program,
    qubits: &[QubitId],
    shots: u64,
    estimator: &E,
) -> Result<TomographyRun>
where
    B: MeasurementBackend + ?Sized,
    E: StateEstimator + ?Sized,
{
    let experiment = generate_state_tomography_experiment(program, qubits)?;
    let results = backend.measure_observables(&experiment, shots)?;
    let rho = estimator.estimate(&results, qubits)?;

    info!(
        num_qubits = qubits.len(),
        settings = experiment.len(),
        shots,
        "state tomography finished"
    );
    Ok(TomographyRun { rho, results })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{IterativeMle, IterativeMleConfig, LinearInversion};
    use approx::assert_relative_eq;
    use qtomo_state::measures::fidelity;
    use qtomo_state::{StateVector, StateVectorBackend};

    #[test]
    fn test_bell_state_exact() {
        let q = QubitId::list(&[0, 1]);
        let mut program = Program::new();
        program.h(q[0]).unwrap().cnot(q[0], q[1]).unwrap();

        let mut backend = StateVectorBackend::exact();
        let run = do_tomography(&mut backend, &program, &q, 1000, &LinearInversion).unwrap();
        assert_eq!(run.results.len(), 16);

        let mut psi = StateVector::zeros(&q).unwrap();
        psi.apply_program(&program).unwrap();
        let truth = psi.density_matrix(&q).unwrap();
        assert!(run.rho.max_abs_diff(&truth) < 1e-12);
    }

    #[test]
    fn test_sampled_mle_is_physical() {
        let q = QubitId::list(&[3]);
        let mut program = Program::new();
        program.ry(1.1, q[0]).unwrap();

        let mut backend = StateVectorBackend::sampled(Some(52));
        let estimator = IterativeMle::new(IterativeMleConfig::new().with_tol(1e-6));
        let run = do_tomography(&mut backend, &program, &q, 20_000, &estimator).unwrap();
        assert!(run.rho.is_valid(1e-8));

        let mut psi = StateVector::zeros(&q).unwrap();
        psi.apply_program(&program).unwrap();
        let truth = psi.density_matrix(&q).unwrap();
        assert_relative_eq!(fidelity(&run.rho, &truth).unwrap(), 1.0, epsilon = 2e-2);
    }
}
