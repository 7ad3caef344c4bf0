//! Quantum state representations for tomography
//!
//! This crate provides the linear-algebra side of state tomography:
//!
//! - [`DensityMatrix`]: Dense 2^n × 2^n density matrix backed by `nalgebra`
//! - [`StateVector`]: Pure states over an ordered qubit register, used to
//!   compute reference states directly from a unitary
//! - [`projection`]: Nearest physical density matrix (PSD, unit trace)
//! - [`measures`]: Purity, entropy, fidelity and trace distance
//! - [`MeasurementBackend`]: The boundary to whatever produces
//!   [`ExperimentResult`](qtomo_core::ExperimentResult)s, with a
//!   state-vector implementation for simulation
//!
//! # Example
//!
//! ```
//! use qtomo_state::projection::project_eigenvalues;
//!
//! let projected = project_eigenvalues(&[0.6, 0.5, 0.35, 0.1, -0.55]);
//! assert!((projected.iter().sum::<f64>() - 1.0).abs() < 1e-12);
//! assert!(projected.iter().all(|&p| p >= 0.0));
//! ```

pub mod backend;
pub mod density_matrix;
pub mod error;
pub mod hermitian;
pub mod measures;
pub mod projection;
pub mod random;
pub mod state_vector;

pub use backend::{MeasurementBackend, ShotMode, StateVectorBackend};
pub use density_matrix::DensityMatrix;
pub use error::{Result, StateError};
pub use hermitian::HermitianEigen;
pub use projection::{project_density_matrix, project_eigenvalues};
pub use state_vector::StateVector;
