//! Core types for qtomo quantum state tomography
//!
//! This crate provides the building blocks shared by the estimation crates:
//! - [`QubitId`]: Type-safe qubit addressing
//! - [`Pauli`] and [`PauliTerm`]: Tagged Pauli algebra with explicit product rules
//! - [`Program`]: State-preparation program built from [`Gate`] operations
//! - [`ExperimentSetting`] and [`Experiment`]: The tomography measurement plan
//! - [`ExperimentResult`]: Measured expectation values fed to the estimators
//!
//! # Example
//! ```
//! use qtomo_core::{generate_state_tomography_experiment, Program, QubitId};
//!
//! let mut program = Program::new();
//! program.h(QubitId::new(0)).unwrap();
//!
//! let experiment = generate_state_tomography_experiment(&program, &[QubitId::new(0)]).unwrap();
//! assert_eq!(experiment.len(), 4);
//! ```

pub mod error;
pub mod experiment;
pub mod gate;
pub mod gates;
pub mod pauli;
pub mod program;
pub mod qubit;
pub mod result;

// Re-exports for convenience
pub use error::QuantumError;
pub use experiment::{
    generate_state_tomography_experiment, pauli_basis, zeros_state, Experiment,
    ExperimentSetting, TensorProductState,
};
pub use gate::{Gate, GateOp};
pub use num_complex::Complex64;
pub use pauli::{Pauli, PauliTerm};
pub use program::Program;
pub use qubit::{validate_qubits, QubitId};
pub use result::ExperimentResult;

/// Type alias for results in qtomo-core
pub type Result<T> = std::result::Result<T, QuantumError>;
