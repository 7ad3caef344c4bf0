//! Error types for state estimation

use qtomo_core::QuantumError;
use qtomo_state::StateError;
use thiserror::Error;

/// Errors that can occur while estimating a state
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TomographyError {
    /// A basis operator needed for reconstruction was never measured
    #[error("No result for measurement setting {operator}")]
    MissingSettingData { operator: String },

    /// Matrix dimensions do not agree with the qubit list
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Estimator called without any results
    #[error("No experiment results to estimate from")]
    EmptyResults,

    /// Estimator or resampling parameters out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Error from operator or experiment construction
    #[error(transparent)]
    Core(#[from] QuantumError),

    /// Error from density matrix or measurement operations
    #[error(transparent)]
    State(#[from] StateError),
}

/// Result type for tomography operations
pub type Result<T> = std::result::Result<T, TomographyError>;

#[cfg(test)]
mod tests {
    use super::*;
    use qtomo_core::QubitId;

    #[test]
    fn test_display() {
        let err = TomographyError::MissingSettingData {
            operator: "(1+0j)*X0".to_string(),
        };
        assert_eq!(err.to_string(), "No result for measurement setting (1+0j)*X0");

        let err = TomographyError::InvalidConfiguration("epsilon must be positive".into());
        assert!(err.to_string().contains("epsilon"));
    }

    #[test]
    fn test_conversions_are_transparent() {
        let core = QuantumError::DuplicateQubit(QubitId::new(1));
        let err: TomographyError = core.clone().into();
        assert_eq!(err.to_string(), core.to_string());

        let state: TomographyError = StateError::InvalidShotCount.into();
        assert!(matches!(state, TomographyError::State(StateError::InvalidShotCount)));
    }
}
