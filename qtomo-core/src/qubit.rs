//! Qubit addressing and identification

use crate::{QuantumError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Type-safe identifier for a qubit
///
/// # Example
/// ```
/// use qtomo_core::QubitId;
///
/// let q0 = QubitId::new(0);
/// let q1 = QubitId::new(1);
/// assert!(q0 < q1);
/// ```
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QubitId(usize);

impl QubitId {
    /// Create a new qubit identifier
    #[inline]
    pub const fn new(id: usize) -> Self {
        Self(id)
    }

    /// Get the underlying index
    #[inline]
    pub const fn index(&self) -> usize {
        self.0
    }

    /// Build a qubit list from raw indices
    ///
    /// ```
    /// use qtomo_core::QubitId;
    /// let qubits = QubitId::list(&[0, 1]);
    /// assert_eq!(qubits[1].index(), 1);
    /// ```
    pub fn list(indices: &[usize]) -> Vec<QubitId> {
        indices.iter().copied().map(QubitId::new).collect()
    }
}

impl fmt::Display for QubitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

impl From<usize> for QubitId {
    #[inline]
    fn from(id: usize) -> Self {
        Self::new(id)
    }
}

impl From<QubitId> for usize {
    #[inline]
    fn from(qid: QubitId) -> Self {
        qid.index()
    }
}

/// Check that a tomography qubit list is non-empty and duplicate-free
pub fn validate_qubits(qubits: &[QubitId]) -> Result<()> {
    if qubits.is_empty() {
        return Err(QuantumError::EmptyQubitList);
    }

    for i in 0..qubits.len() {
        for j in (i + 1)..qubits.len() {
            if qubits[i] == qubits[j] {
                return Err(QuantumError::DuplicateQubit(qubits[i]));
            }
        }
    }

    Ok(())
}
