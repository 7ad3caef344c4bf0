//! Measurement boundary
//!
//! Tomography never inspects how results are produced. A
//! [`MeasurementBackend`] takes an [`Experiment`] and returns one
//! [`ExperimentResult`] per setting, in setting order. [`StateVectorBackend`]
//! is the in-process implementation: it prepares each input state, runs the
//! program on a state vector and either reports the exact expectation or
//! samples shots from a seeded generator.

use crate::error::{Result, StateError};
use crate::state_vector::StateVector;
use num_complex::Complex64;
use qtomo_core::experiment::OneQubitState;
use qtomo_core::gate::Gate;
use qtomo_core::gates::{Hadamard, PauliX, SGate};
use qtomo_core::{Experiment, ExperimentResult, Pauli, QuantumError, QubitId, TensorProductState};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Binomial, Distribution};
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

/// Anything that can execute a tomography plan
pub trait MeasurementBackend {
    /// Measure every setting of `experiment` with `shots` repetitions
    fn measure_observables(
        &mut self,
        experiment: &Experiment,
        shots: u64,
    ) -> Result<Vec<ExperimentResult>>;
}

/// How a [`StateVectorBackend`] turns exact expectations into results
#[derive(Debug, Clone)]
pub enum ShotMode {
    /// Report ⟨P⟩ exactly, as if infinitely many shots were taken
    Exact,
    /// Draw the number of +1 outcomes from Binomial(shots, (1 + ⟨P⟩)/2)
    Sampled(StdRng),
}

/// State-vector simulation of the measurement boundary
#[derive(Debug, Clone)]
pub struct StateVectorBackend {
    mode: ShotMode,
}

impl StateVectorBackend {
    /// Backend reporting exact expectation values
    pub fn exact() -> Self {
        Self {
            mode: ShotMode::Exact,
        }
    }

    /// Backend sampling shot noise, seeded for reproducibility when `seed` is set
    pub fn sampled(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            mode: ShotMode::Sampled(rng),
        }
    }

    pub fn mode(&self) -> &ShotMode {
        &self.mode
    }

    fn prepare(
        register: &[QubitId],
        in_state: &TensorProductState,
        experiment: &Experiment,
    ) -> Result<StateVector> {
        let mut psi = StateVector::zeros(register)?;
        for one_q in in_state.states() {
            for gate in preparation_gates(one_q) {
                let matrix = gate
                    .matrix()
                    .ok_or_else(|| QuantumError::MissingMatrix(gate.name().to_string()))?;
                psi.apply_unitary(&matrix, &[one_q.qubit])?;
            }
        }
        psi.apply_program(experiment.program())?;
        Ok(psi)
    }

    fn report(&mut self, exact: f64, shots: u64) -> Result<f64> {
        let exact = exact.clamp(-1.0, 1.0);
        match &mut self.mode {
            ShotMode::Exact => Ok(exact),
            ShotMode::Sampled(rng) => {
                let p_plus = ((1.0 + exact) / 2.0).clamp(0.0, 1.0);
                let binomial = Binomial::new(shots, p_plus)
                    .map_err(|_| StateError::InvalidShotCount)?;
                let plus = binomial.sample(rng);
                Ok(2.0 * plus as f64 / shots as f64 - 1.0)
            }
        }
    }
}

/// Gates taking |0⟩ to the requested single-qubit eigenstate, in order
fn preparation_gates(state: &OneQubitState) -> Vec<Box<dyn Gate>> {
    let flip = state.index != 0;
    let mut gates: Vec<Box<dyn Gate>> = Vec::new();
    if flip {
        gates.push(Box::new(PauliX));
    }
    match state.label {
        Pauli::I | Pauli::Z => {}
        Pauli::X => gates.push(Box::new(Hadamard)),
        Pauli::Y => {
            gates.push(Box::new(Hadamard));
            gates.push(Box::new(SGate));
        }
    }
    gates
}

impl MeasurementBackend for StateVectorBackend {
    fn measure_observables(
        &mut self,
        experiment: &Experiment,
        shots: u64,
    ) -> Result<Vec<ExperimentResult>> {
        if shots == 0 {
            return Err(StateError::InvalidShotCount);
        }

        let mut register: BTreeSet<QubitId> = experiment.qubits().iter().copied().collect();
        register.extend(experiment.program().qubits());
        for setting in experiment.settings() {
            register.extend(setting.in_state.states().iter().map(|s| s.qubit));
            register.extend(setting.out_operator.factors().map(|(q, _)| q));
        }
        let register: Vec<QubitId> = register.into_iter().collect();

        let mut prepared: HashMap<TensorProductState, StateVector> = HashMap::new();
        let mut results = Vec::with_capacity(experiment.len());
        for setting in experiment.settings() {
            if !prepared.contains_key(&setting.in_state) {
                let psi = Self::prepare(&register, &setting.in_state, experiment)?;
                prepared.insert(setting.in_state.clone(), psi);
            }
            let psi = &prepared[&setting.in_state];

            // Results describe the Pauli string; its coefficient is not applied
            let operator = setting.out_operator.clone().with_coeff(Complex64::new(1.0, 0.0));
            let exact = psi.expectation(&operator)?.re;
            let expectation = self.report(exact, shots)?;

            results.push(ExperimentResult::new(setting.clone(), expectation, shots));
        }

        debug!(
            settings = results.len(),
            register = register.len(),
            shots,
            "measured tomography experiment"
        );
        Ok(results)
    }
}
