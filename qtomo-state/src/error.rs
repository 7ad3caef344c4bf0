//! Error types for density matrix and state vector operations

use qtomo_core::QuantumError;
use thiserror::Error;

/// Errors that can occur during state operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StateError {
    /// Invalid state dimension
    #[error("Invalid state dimension {dimension}, expected power of 2")]
    InvalidDimension { dimension: usize },

    /// Dimension mismatch
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Matrix is not Hermitian within tolerance
    #[error("Matrix is not Hermitian, max deviation = {deviation}")]
    NotHermitian { deviation: f64 },

    /// Eigen-decomposition did not converge
    #[error("Hermitian eigen-decomposition failed for a {dimension}x{dimension} matrix")]
    Decomposition { dimension: usize },

    /// Measurements need at least one shot
    #[error("Shot count must be positive")]
    InvalidShotCount,

    /// Error from operator or program construction
    #[error(transparent)]
    Core(#[from] QuantumError),
}

/// Result type for state operations
pub type Result<T> = std::result::Result<T, StateError>;
