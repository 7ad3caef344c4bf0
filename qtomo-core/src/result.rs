//! Measured expectation values

use crate::ExperimentSetting;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of measuring one [`ExperimentSetting`]
///
/// `expectation` is the sample mean of the ±1 outcomes of the setting's
/// Pauli string over `total_counts` shots. The operator's coefficient is
/// not folded in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentResult {
    pub setting: ExperimentSetting,
    pub expectation: f64,
    pub total_counts: u64,
}

impl ExperimentResult {
    pub fn new(setting: ExperimentSetting, expectation: f64, total_counts: u64) -> Self {
        Self {
            setting,
            expectation,
            total_counts,
        }
    }

    /// Number of +1 and -1 outcomes implied by the expectation
    ///
    /// The expectation is clamped to [-1, 1] first, so a noisy estimate
    /// such as 1.02 never yields a negative count.
    ///
    /// ```
    /// use qtomo_core::{zeros_state, ExperimentResult, ExperimentSetting, PauliTerm, QubitId};
    ///
    /// let q = [QubitId::new(0)];
    /// let setting = ExperimentSetting::new(zeros_state(&q), PauliTerm::identity());
    /// let result = ExperimentResult::new(setting, -0.4, 10);
    /// let (plus, minus) = result.outcome_counts();
    /// assert!((plus - 3.0).abs() < 1e-12 && (minus - 7.0).abs() < 1e-12);
    /// ```
    pub fn outcome_counts(&self) -> (f64, f64) {
        let total = self.total_counts as f64;
        let plus = (1.0 + self.expectation.clamp(-1.0, 1.0)) / 2.0 * total;
        (plus, total - plus)
    }

    /// Standard error of the expectation, sqrt((1 - e²)/n)
    pub fn std_err(&self) -> f64 {
        if self.total_counts == 0 {
            return f64::INFINITY;
        }
        ((1.0 - self.expectation * self.expectation).max(0.0) / self.total_counts as f64).sqrt()
    }

    /// Copy of this result with a different expectation value
    pub fn with_expectation(&self, expectation: f64) -> Self {
        Self {
            setting: self.setting.clone(),
            expectation,
            total_counts: self.total_counts,
        }
    }
}

impl fmt::Display for ExperimentResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} +- {} ({} shots)",
            self.setting,
            self.expectation,
            self.std_err(),
            self.total_counts
        )
    }
}
