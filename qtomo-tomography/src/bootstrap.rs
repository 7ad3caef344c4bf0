//! Parametric bootstrap for uncertainties of state functionals
//!
//! Each resample redraws every result's outcome counts from
//! Binomial(n, (1 + e)/2), reruns the estimator and evaluates a scalar
//! functional of the estimate (purity, fidelity to a target, ...). The
//! spread of those values estimates the functional's statistical error.
//!
//! Resamples are independent and run on the rayon pool. Their seeds are
//! drawn up front from the caller's generator, so a fixed seed gives the
//! same answer whatever the thread count.

use crate::error::{Result, TomographyError};
use crate::estimator::StateEstimator;
use crate::observations::{canonical_order, check_results};
use qtomo_core::{ExperimentResult, QubitId};
use qtomo_state::DensityMatrix;
use rand::Rng;
use rand::SeedableRng;
use rand_distr::{Binomial, Distribution};
use rand_pcg::Pcg64Mcg;
use rayon::prelude::*;
use tracing::{debug, warn};

/// Mean and spread of a functional over bootstrap resamples
#[derive(Debug, Clone, PartialEq)]
pub struct BootstrapEstimate {
    /// Mean of the functional over resamples
    pub mean: f64,
    /// Unbiased sample variance (n − 1 denominator)
    pub variance: f64,
    /// Functional value of every resample, in resample order
    pub samples: Vec<f64>,
}

impl BootstrapEstimate {
    fn from_samples(samples: Vec<f64>) -> Self {
        let n = samples.len() as f64;
        let (sum, sum_sq) = samples
            .iter()
            .fold((0.0, 0.0), |(s, sq), &x| (s + x, sq + x * x));
        let mean = sum / n;
        let variance = ((sum_sq - n * mean * mean) / (n - 1.0)).max(0.0);
        Self {
            mean,
            variance,
            samples,
        }
    }

    /// Standard deviation of the functional
    pub fn std_dev(&self) -> f64 {
        self.variance.sqrt()
    }
}

/// Redraw one result's expectation from its binomial outcome distribution
fn resample_result<R: Rng>(result: &ExperimentResult, rng: &mut R) -> Result<ExperimentResult> {
    let shots = result.total_counts;
    if shots == 0 {
        return Ok(result.clone());
    }
    let p_plus = ((1.0 + result.expectation) / 2.0).clamp(0.0, 1.0);
    let binomial = Binomial::new(shots, p_plus)
        .map_err(|e| TomographyError::InvalidConfiguration(e.to_string()))?;
    let plus = binomial.sample(rng);
    Ok(result.with_expectation(2.0 * plus as f64 / shots as f64 - 1.0))
}

/// Bootstrap mean and variance of `functional` applied to `estimator`'s output
///
/// With `project_to_physical` set, each resampled estimate is projected onto
/// the nearest density matrix before the functional is evaluated.
///
/// # Errors
/// - [`TomographyError::InvalidConfiguration`] if `n_resamples < 2`
/// - [`TomographyError::EmptyResults`] for an empty result set
/// - any error of the estimator on a resampled data set
///
/// # Example
/// ```
/// use qtomo_core::{zeros_state, ExperimentResult, ExperimentSetting, PauliTerm, QubitId};
/// use qtomo_tomography::{estimate_variance, LinearInversion};
/// use rand::SeedableRng;
///
/// let q = QubitId::list(&[0]);
/// let results: Vec<ExperimentResult> = ["X", "Y", "Z"]
///     .iter()
///     .map(|label| {
///         let op = PauliTerm::from_label(label, &q).unwrap();
///         ExperimentResult::new(ExperimentSetting::new(zeros_state(&q), op), 0.0, 1000)
///     })
///     .collect();
///
/// let mut rng = rand::rngs::StdRng::seed_from_u64(7);
/// let estimate = estimate_variance(
///     &results, &q, &LinearInversion, |rho| rho.purity(), 20, true, &mut rng,
/// )
/// .unwrap();
/// assert!(estimate.variance >= 0.0);
/// assert_eq!(estimate.samples.len(), 20);
/// ```
pub fn estimate_variance<E, F, R>(
    results: &[ExperimentResult],
    qubits: &[QubitId],
    estimator: &E,
    functional: F,
    n_resamples: usize,
    project_to_physical: bool,
    rng: &mut R,
) -> Result<BootstrapEstimate>
where
    E: StateEstimator + ?Sized,
    F: Fn(&DensityMatrix) -> f64 + Sync,
    R: Rng,
{
    if n_resamples < 2 {
        return Err(TomographyError::InvalidConfiguration(format!(
            "bootstrap needs at least 2 resamples, got {}",
            n_resamples
        )));
    }
    check_results(results, qubits)?;
    if results.iter().all(|r| r.total_counts == 0) {
        warn!("no result carries shots, every resample equals the input");
    }

    let ordered = canonical_order(results);
    let seeds: Vec<u64> = (0..n_resamples).map(|_| rng.gen()).collect();

    let samples = seeds
        .into_par_iter()
        .map(|seed| -> Result<f64> {
            let mut trial_rng = Pcg64Mcg::seed_from_u64(seed);
            let resampled = ordered
                .iter()
                .map(|r| resample_result(r, &mut trial_rng))
                .collect::<Result<Vec<_>>>()?;
            let mut rho = estimator.estimate(&resampled, qubits)?;
            if project_to_physical {
                rho = rho.project_to_physical()?;
            }
            Ok(functional(&rho))
        })
        .collect::<Result<Vec<f64>>>()?;

    let estimate = BootstrapEstimate::from_samples(samples);
    debug!(
        n_resamples,
        mean = estimate.mean,
        variance = estimate.variance,
        "bootstrap finished"
    );
    Ok(estimate)
}
