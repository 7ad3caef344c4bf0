//! Gate trait and gate operations used by preparation programs

use crate::{QuantumError, QubitId, Result};
use num_complex::Complex64;
use smallvec::SmallVec;
use std::fmt;
use std::sync::Arc;

/// Trait for quantum gate operations
///
/// Gates are stateless and reusable across programs. Preparation programs
/// are only simulated through [`Gate::matrix`], so gates without a matrix
/// can be recorded but not executed by a state-vector backend.
pub trait Gate: Send + Sync + fmt::Debug {
    /// The name of the gate (e.g., "H", "CZ", "RX")
    fn name(&self) -> &str;

    /// Number of qubits this gate acts on
    fn num_qubits(&self) -> usize;

    /// Unitary matrix of the gate, flattened row-major
    ///
    /// For an n-qubit gate the matrix has dimension 2^n × 2^n. The first
    /// qubit of the operation is the most significant bit of the row index.
    fn matrix(&self) -> Option<Vec<Complex64>> {
        None
    }
}

/// A gate applied to specific qubits
#[derive(Clone)]
pub struct GateOp {
    gate: Arc<dyn Gate>,
    qubits: SmallVec<[QubitId; 2]>,
}

impl GateOp {
    /// Create a new gate operation
    ///
    /// # Errors
    /// Returns error if the qubit count doesn't match the gate or a qubit
    /// is repeated.
    pub fn new(gate: Arc<dyn Gate>, qubits: &[QubitId]) -> Result<Self> {
        if qubits.len() != gate.num_qubits() {
            return Err(QuantumError::invalid_qubit_count(
                gate.name(),
                gate.num_qubits(),
                qubits.len(),
            ));
        }

        for i in 0..qubits.len() {
            for j in (i + 1)..qubits.len() {
                if qubits[i] == qubits[j] {
                    return Err(QuantumError::DuplicateQubit(qubits[i]));
                }
            }
        }

        Ok(Self {
            gate,
            qubits: SmallVec::from_slice(qubits),
        })
    }

    /// Get the gate
    #[inline]
    pub fn gate(&self) -> &Arc<dyn Gate> {
        &self.gate
    }

    /// Get the qubits this operation acts on
    #[inline]
    pub fn qubits(&self) -> &[QubitId] {
        &self.qubits
    }

    /// Matrix of the underlying gate
    pub fn matrix(&self) -> Result<Vec<Complex64>> {
        self.gate
            .matrix()
            .ok_or_else(|| QuantumError::MissingMatrix(self.gate.name().to_string()))
    }
}

impl fmt::Debug for GateOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.gate.name())?;
        for (i, q) in self.qubits.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", q)?;
        }
        write!(f, ")")
    }
}

impl fmt::Display for GateOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}
