//! State-preparation programs
//!
//! A [`Program`] is an ordered list of gate operations applied to the
//! all-zeros state. Tomography treats it as opaque: it is carried inside the
//! [`Experiment`](crate::Experiment) and handed to the measurement backend.

use crate::gate::{Gate, GateOp};
use crate::gates::{
    Hadamard, PauliX, PauliY, PauliZ, RotationX, RotationY, RotationZ, SGate, CNOT, CZ,
};
use crate::{QubitId, Result};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// Ordered sequence of gate operations
#[derive(Clone, Default)]
pub struct Program {
    operations: Vec<GateOp>,
}

impl Program {
    /// Create an empty program
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of operations
    #[inline]
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Check if the program has no operations
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Append a gate acting on `qubits`
    pub fn add_gate(&mut self, gate: Arc<dyn Gate>, qubits: &[QubitId]) -> Result<&mut Self> {
        self.operations.push(GateOp::new(gate, qubits)?);
        Ok(self)
    }

    /// Iterate over the operations in order
    pub fn operations(&self) -> impl Iterator<Item = &GateOp> {
        self.operations.iter()
    }

    /// All qubits touched by the program, ascending
    pub fn qubits(&self) -> Vec<QubitId> {
        self.operations
            .iter()
            .flat_map(|op| op.qubits().iter().copied())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn h(&mut self, qubit: QubitId) -> Result<&mut Self> {
        self.add_gate(Arc::new(Hadamard), &[qubit])
    }

    pub fn x(&mut self, qubit: QubitId) -> Result<&mut Self> {
        self.add_gate(Arc::new(PauliX), &[qubit])
    }

    pub fn y(&mut self, qubit: QubitId) -> Result<&mut Self> {
        self.add_gate(Arc::new(PauliY), &[qubit])
    }

    pub fn z(&mut self, qubit: QubitId) -> Result<&mut Self> {
        self.add_gate(Arc::new(PauliZ), &[qubit])
    }

    pub fn s(&mut self, qubit: QubitId) -> Result<&mut Self> {
        self.add_gate(Arc::new(SGate), &[qubit])
    }

    pub fn rx(&mut self, theta: f64, qubit: QubitId) -> Result<&mut Self> {
        self.add_gate(Arc::new(RotationX(theta)), &[qubit])
    }

    pub fn ry(&mut self, theta: f64, qubit: QubitId) -> Result<&mut Self> {
        self.add_gate(Arc::new(RotationY(theta)), &[qubit])
    }

    pub fn rz(&mut self, theta: f64, qubit: QubitId) -> Result<&mut Self> {
        self.add_gate(Arc::new(RotationZ(theta)), &[qubit])
    }

    pub fn cz(&mut self, control: QubitId, target: QubitId) -> Result<&mut Self> {
        self.add_gate(Arc::new(CZ), &[control, target])
    }

    pub fn cnot(&mut self, control: QubitId, target: QubitId) -> Result<&mut Self> {
        self.add_gate(Arc::new(CNOT), &[control, target])
    }
}

impl fmt::Debug for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.operations.iter()).finish()
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for op in &self.operations {
            writeln!(f, "{}", op)?;
        }
        Ok(())
    }
}
