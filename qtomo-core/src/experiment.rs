//! Tomography measurement plans
//!
//! State tomography of k qubits measures every operator of the k-qubit Pauli
//! basis {I, X, Y, Z}^k on the prepared state. Settings are enumerated in
//! qubit-major order: the first listed qubit varies slowest and `I` precedes
//! `X`, `Y`, `Z` in every slot. Estimators and tests rely on this order.

use crate::{validate_qubits, Pauli, PauliTerm, Program, QubitId, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Index;

/// Eigenstate of a single-qubit Pauli on one qubit
///
/// `index` 0 selects the +1 eigenstate, 1 the -1 eigenstate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OneQubitState {
    pub label: Pauli,
    pub index: u8,
    pub qubit: QubitId,
}

impl fmt::Display for OneQubitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.index == 0 { '+' } else { '-' };
        write!(f, "{}{}_{}", self.label, sign, self.qubit.index())
    }
}

/// Product of single-qubit eigenstates used as an input state
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TensorProductState {
    states: Vec<OneQubitState>,
}

impl TensorProductState {
    pub fn new(states: Vec<OneQubitState>) -> Self {
        Self { states }
    }

    /// Per-qubit factors in the order they were given
    pub fn states(&self) -> &[OneQubitState] {
        &self.states
    }
}

impl fmt::Display for TensorProductState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, state) in self.states.iter().enumerate() {
            if i > 0 {
                write!(f, " * ")?;
            }
            write!(f, "{}", state)?;
        }
        Ok(())
    }
}

/// The all-|0⟩ state on `qubits`
pub fn zeros_state(qubits: &[QubitId]) -> TensorProductState {
    TensorProductState::new(
        qubits
            .iter()
            .map(|&qubit| OneQubitState {
                label: Pauli::Z,
                index: 0,
                qubit,
            })
            .collect(),
    )
}

/// What state to prepare and which observable to measure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentSetting {
    pub in_state: TensorProductState,
    pub out_operator: PauliTerm,
}

impl ExperimentSetting {
    pub fn new(in_state: TensorProductState, out_operator: PauliTerm) -> Self {
        Self {
            in_state,
            out_operator,
        }
    }
}

impl fmt::Display for ExperimentSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}→{}", self.in_state, self.out_operator)
    }
}

/// Enumerate the full Pauli basis on `qubits` in qubit-major order
///
/// # Example
/// ```
/// use qtomo_core::{pauli_basis, QubitId};
///
/// let basis = pauli_basis(&QubitId::list(&[0, 1])).unwrap();
/// assert_eq!(basis.len(), 16);
/// assert_eq!(basis[1].to_string(), "(1+0j)*X1");
/// assert_eq!(basis[4].to_string(), "(1+0j)*X0");
/// ```
pub fn pauli_basis(qubits: &[QubitId]) -> Result<Vec<PauliTerm>> {
    validate_qubits(qubits)?;

    // The last qubit is the innermost loop, so it is folded in last.
    let mut basis = vec![PauliTerm::identity()];
    for &qubit in qubits {
        basis = basis
            .iter()
            .flat_map(|prefix| {
                Pauli::ALL
                    .into_iter()
                    .map(move |pauli| prefix.compose(&PauliTerm::single(qubit, pauli)))
            })
            .collect();
    }
    Ok(basis)
}

/// A tomography plan: preparation program, qubits, and ordered settings
#[derive(Debug, Clone)]
pub struct Experiment {
    settings: Vec<ExperimentSetting>,
    program: Program,
    qubits: Vec<QubitId>,
}

impl Experiment {
    /// Wrap explicit settings, e.g. a subset of a full plan
    pub fn new(settings: Vec<ExperimentSetting>, program: Program, qubits: Vec<QubitId>) -> Self {
        Self {
            settings,
            program,
            qubits,
        }
    }

    pub fn settings(&self) -> &[ExperimentSetting] {
        &self.settings
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn qubits(&self) -> &[QubitId] {
        &self.qubits
    }

    pub fn len(&self) -> usize {
        self.settings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.settings.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ExperimentSetting> {
        self.settings.iter()
    }
}

impl Index<usize> for Experiment {
    type Output = ExperimentSetting;

    fn index(&self, index: usize) -> &Self::Output {
        &self.settings[index]
    }
}

impl<'a> IntoIterator for &'a Experiment {
    type Item = &'a ExperimentSetting;
    type IntoIter = std::slice::Iter<'a, ExperimentSetting>;

    fn into_iter(self) -> Self::IntoIter {
        self.settings.iter()
    }
}

/// Build the state tomography plan for `program` on `qubits`
///
/// Produces 4^k settings, each pairing the all-zeros input state with one
/// operator of [`pauli_basis`].
///
/// # Errors
/// Returns error if `qubits` is empty or contains duplicates.
pub fn generate_state_tomography_experiment(
    program: &Program,
    qubits: &[QubitId],
) -> Result<Experiment> {
    let in_state = zeros_state(qubits);
    let settings = pauli_basis(qubits)?
        .into_iter()
        .map(|op| ExperimentSetting::new(in_state.clone(), op))
        .collect();

    Ok(Experiment::new(settings, program.clone(), qubits.to_vec()))
}
