//! Iterative estimator configuration

use crate::error::{Result, TomographyError};
use serde::{Deserialize, Serialize};

/// Configuration for [`iterative_mle_state_estimate`](crate::iterative_mle_state_estimate)
///
/// The same iteration serves three estimators: plain diluted MLE (both
/// penalties zero), maximum-entropy penalised MLE (`entropy_penalty > 0`)
/// and hedged MLE (`beta > 0`). At most one penalty may be set.
///
/// Missing fields take their defaults when deserialised, so
/// `{"beta": 0.5}` is a complete hedged configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IterativeMleConfig {
    /// Dilution step ε in ρ ← (I + εG) ρ (I + εG)
    ///
    /// Default: 0.1
    pub epsilon: f64,

    /// Weight λ of the entropy penalty
    ///
    /// Default: 0.0 (off)
    pub entropy_penalty: f64,

    /// Hedging parameter β
    ///
    /// Default: 0.0 (off)
    pub beta: f64,

    /// Stop once ‖ρₖ₊₁ − ρₖ‖_F / ε falls below this
    ///
    /// Default: 1e-9
    pub tol: f64,

    /// Iteration cap; the last iterate is returned if it is reached
    ///
    /// Default: 100 000
    pub max_iterations: usize,
}

impl Default for IterativeMleConfig {
    fn default() -> Self {
        Self {
            epsilon: 0.1,
            entropy_penalty: 0.0,
            beta: 0.0,
            tol: 1e-9,
            max_iterations: 100_000,
        }
    }
}

impl IterativeMleConfig {
    /// Plain diluted MLE with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Maximum-entropy penalised MLE with weight `lambda`
    pub fn max_entropy(lambda: f64) -> Self {
        Self {
            entropy_penalty: lambda,
            ..Default::default()
        }
    }

    /// Hedged MLE with parameter `beta`
    pub fn hedged(beta: f64) -> Self {
        Self {
            beta,
            ..Default::default()
        }
    }

    /// Set the dilution step
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Set the entropy penalty weight
    pub fn with_entropy_penalty(mut self, lambda: f64) -> Self {
        self.entropy_penalty = lambda;
        self
    }

    /// Set the hedging parameter
    pub fn with_beta(mut self, beta: f64) -> Self {
        self.beta = beta;
        self
    }

    /// Set the convergence tolerance
    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    /// Set the iteration cap
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(TomographyError::InvalidConfiguration(msg));

        if !self.epsilon.is_finite() || self.epsilon <= 0.0 {
            return invalid(format!("epsilon must be positive, got {}", self.epsilon));
        }
        if !self.tol.is_finite() || self.tol <= 0.0 {
            return invalid(format!("tol must be positive, got {}", self.tol));
        }
        if self.max_iterations == 0 {
            return invalid("max_iterations must be > 0".to_string());
        }
        if !self.entropy_penalty.is_finite() || self.entropy_penalty < 0.0 {
            return invalid(format!(
                "entropy_penalty must be non-negative, got {}",
                self.entropy_penalty
            ));
        }
        if !self.beta.is_finite() || self.beta < 0.0 {
            return invalid(format!("beta must be non-negative, got {}", self.beta));
        }
        if self.entropy_penalty > 0.0 && self.beta > 0.0 {
            return invalid("entropy_penalty and beta cannot both be set".to_string());
        }

        Ok(())
    }
}
