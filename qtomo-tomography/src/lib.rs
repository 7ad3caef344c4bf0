//! Quantum state tomography estimators
//!
//! Turns measured Pauli expectation values into density matrix estimates:
//!
//! - [`linear_inv_state_estimate`]: Unconstrained linear inversion
//! - [`iterative_mle_state_estimate`]: Diluted iterative maximum likelihood,
//!   with optional maximum-entropy or hedging penalties selected by
//!   [`IterativeMleConfig`]
//! - [`estimate_variance`]: Parametric bootstrap of any scalar functional
//!   of the estimate
//! - [`do_tomography`]: Plan, measure and estimate in one call
//!
//! # Example
//!
//! ```
//! use qtomo_core::{Program, QubitId};
//! use qtomo_state::StateVectorBackend;
//! use qtomo_tomography::{do_tomography, LinearInversion};
//!
//! let q = QubitId::list(&[0]);
//! let mut program = Program::new();
//! program.h(q[0]).unwrap();
//!
//! let mut backend = StateVectorBackend::exact();
//! let run = do_tomography(&mut backend, &program, &q, 1000, &LinearInversion).unwrap();
//! assert!((run.rho.get(0, 1).re - 0.5).abs() < 1e-12);
//! ```

pub mod bootstrap;
pub mod config;
pub mod driver;
pub mod error;
pub mod estimator;
pub mod linear_inversion;
pub mod mle;
pub mod observations;

pub use bootstrap::{estimate_variance, BootstrapEstimate};
pub use config::IterativeMleConfig;
pub use driver::{do_tomography, TomographyRun};
pub use error::{Result, TomographyError};
pub use estimator::{IterativeMle, LinearInversion, StateEstimator};
pub use linear_inversion::linear_inv_state_estimate;
pub use mle::{iterative_mle_state_estimate, r_operator, IterativeEstimate};
pub use observations::canonical_order;
