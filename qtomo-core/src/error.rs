//! Error types for qtomo-core

use crate::QubitId;
use thiserror::Error;

/// Errors raised while building Pauli operators, programs and experiments
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QuantumError {
    /// A tomography run needs at least one qubit
    #[error("Qubit list must contain at least one qubit")]
    EmptyQubitList,

    /// Duplicate qubit in a qubit list or gate operation
    #[error("Duplicate qubit {0}")]
    DuplicateQubit(QubitId),

    /// An operator acts on a qubit that is not part of the qubit list
    #[error("Operator acts on {qubit}, which is not in the qubit list {qubits:?}")]
    QubitOutOfRange { qubit: QubitId, qubits: Vec<QubitId> },

    /// Gate applied to wrong number of qubits
    #[error("Gate '{gate}' requires {expected} qubits, but {actual} were provided")]
    InvalidQubitCount {
        gate: String,
        expected: usize,
        actual: usize,
    },

    /// Unknown Pauli symbol
    #[error("Invalid Pauli symbol '{0}'")]
    InvalidPauli(char),

    /// Gate has no matrix representation
    #[error("Gate '{0}' has no matrix representation")]
    MissingMatrix(String),
}

impl QuantumError {
    /// Create an out-of-range error for `qubit` against the list `qubits`
    pub fn qubit_out_of_range(qubit: QubitId, qubits: &[QubitId]) -> Self {
        Self::QubitOutOfRange {
            qubit,
            qubits: qubits.to_vec(),
        }
    }

    /// Create an invalid qubit count error
    pub fn invalid_qubit_count(gate: impl Into<String>, expected: usize, actual: usize) -> Self {
        Self::InvalidQubitCount {
            gate: gate.into(),
            expected,
            actual,
        }
    }
}
