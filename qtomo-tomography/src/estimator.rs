//! Common interface over the state estimators

use crate::config::IterativeMleConfig;
use crate::error::Result;
use crate::linear_inversion::linear_inv_state_estimate;
use crate::mle::iterative_mle_state_estimate;
use qtomo_core::{ExperimentResult, QubitId};
use qtomo_state::DensityMatrix;

/// Anything that turns experiment results into a density matrix
///
/// Estimators are shared across threads by the bootstrap, hence `Sync`.
/// Plain functions and closures with the right signature implement the
/// trait directly.
pub trait StateEstimator: Sync {
    fn estimate(&self, results: &[ExperimentResult], qubits: &[QubitId]) -> Result<DensityMatrix>;
}

/// [`linear_inv_state_estimate`] as a [`StateEstimator`]
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearInversion;

impl StateEstimator for LinearInversion {
    fn estimate(&self, results: &[ExperimentResult], qubits: &[QubitId]) -> Result<DensityMatrix> {
        linear_inv_state_estimate(results, qubits)
    }
}

/// [`iterative_mle_state_estimate`] as a [`StateEstimator`]
///
/// Only the state is kept; call the function directly for convergence
/// details.
#[derive(Debug, Clone, Default)]
pub struct IterativeMle {
    pub config: IterativeMleConfig,
}

impl IterativeMle {
    pub fn new(config: IterativeMleConfig) -> Self {
        Self { config }
    }
}

impl StateEstimator for IterativeMle {
    fn estimate(&self, results: &[ExperimentResult], qubits: &[QubitId]) -> Result<DensityMatrix> {
        Ok(iterative_mle_state_estimate(results, qubits, &self.config)?.rho)
    }
}

impl<F> StateEstimator for F
where
    F: Fn(&[ExperimentResult], &[QubitId]) -> Result<DensityMatrix> + Sync,
{
    fn estimate(&self, results: &[ExperimentResult], qubits: &[QubitId]) -> Result<DensityMatrix> {
        self(results, qubits)
    }
}
