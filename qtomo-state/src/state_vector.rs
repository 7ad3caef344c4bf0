//! Pure states over an ordered qubit register
//!
//! Reference states for tomography are computed directly by applying gate
//! unitaries to amplitudes. The register order fixes the bit layout: the
//! first qubit is the most significant bit of the basis index, matching the
//! lifted Pauli matrices of [`PauliTerm::matrix`](qtomo_core::PauliTerm::matrix).

use crate::density_matrix::DensityMatrix;
use crate::error::{Result, StateError};
use num_complex::Complex64;
use qtomo_core::{Pauli, PauliTerm, Program, QuantumError, QubitId};

/// State vector on an explicit qubit register
#[derive(Debug, Clone, PartialEq)]
pub struct StateVector {
    qubits: Vec<QubitId>,
    amplitudes: Vec<Complex64>,
}

impl StateVector {
    /// |0...0⟩ on `qubits`
    pub fn zeros(qubits: &[QubitId]) -> Result<Self> {
        qtomo_core::validate_qubits(qubits)?;
        let dimension = 1usize << qubits.len();
        let mut amplitudes = vec![Complex64::new(0.0, 0.0); dimension];
        amplitudes[0] = Complex64::new(1.0, 0.0);
        Ok(Self {
            qubits: qubits.to_vec(),
            amplitudes,
        })
    }

    pub fn qubits(&self) -> &[QubitId] {
        &self.qubits
    }

    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    /// Bit position of `qubit` in the basis index
    fn bit_of(&self, qubit: QubitId) -> Result<usize> {
        self.qubits
            .iter()
            .position(|&q| q == qubit)
            .map(|pos| self.qubits.len() - 1 - pos)
            .ok_or_else(|| QuantumError::qubit_out_of_range(qubit, &self.qubits).into())
    }

    /// Apply a k-qubit unitary (flattened row-major, 2^k × 2^k) to `targets`
    ///
    /// `targets[0]` is the most significant bit of the gate's row index.
    pub fn apply_unitary(&mut self, unitary: &[Complex64], targets: &[QubitId]) -> Result<()> {
        let k = targets.len();
        let block = 1usize << k;
        if unitary.len() != block * block {
            return Err(StateError::DimensionMismatch {
                expected: block * block,
                actual: unitary.len(),
            });
        }

        let bits: Vec<usize> = targets
            .iter()
            .map(|&q| self.bit_of(q))
            .collect::<Result<_>>()?;
        let target_mask: usize = bits.iter().map(|&b| 1usize << b).sum();

        // Offset of each sub-index s within a block, s's MSB is targets[0]
        let offsets: Vec<usize> = (0..block)
            .map(|s| {
                bits.iter()
                    .enumerate()
                    .filter(|&(i, _)| (s >> (k - 1 - i)) & 1 == 1)
                    .map(|(_, &b)| 1usize << b)
                    .sum::<usize>()
            })
            .collect();

        let mut gathered = vec![Complex64::new(0.0, 0.0); block];
        for base in 0..self.amplitudes.len() {
            if base & target_mask != 0 {
                continue;
            }
            for (s, &offset) in offsets.iter().enumerate() {
                gathered[s] = self.amplitudes[base | offset];
            }
            for (row, &offset) in offsets.iter().enumerate() {
                self.amplitudes[base | offset] = (0..block)
                    .map(|col| unitary[row * block + col] * gathered[col])
                    .sum();
            }
        }

        Ok(())
    }

    /// Run every operation of `program`
    pub fn apply_program(&mut self, program: &Program) -> Result<()> {
        for op in program.operations() {
            let matrix = op.matrix()?;
            self.apply_unitary(&matrix, op.qubits())?;
        }
        Ok(())
    }

    /// ⟨ψ|P|ψ⟩ for a Pauli term acting inside the register
    pub fn expectation(&self, term: &PauliTerm) -> Result<Complex64> {
        let factors: Vec<(usize, Pauli)> = term
            .factors()
            .map(|(q, p)| self.bit_of(q).map(|bit| (bit, p)))
            .collect::<Result<_>>()?;

        let mut total = Complex64::new(0.0, 0.0);
        for (basis, amplitude) in self.amplitudes.iter().enumerate() {
            if amplitude.norm_sqr() == 0.0 {
                continue;
            }
            let mut image = basis;
            let mut phase = Complex64::new(1.0, 0.0);
            for &(bit, pauli) in &factors {
                let (new_bit, factor) = pauli.apply_to_bit((basis >> bit) & 1);
                image = (image & !(1 << bit)) | (new_bit << bit);
                phase *= factor;
            }
            // P|basis⟩ = phase |image⟩
            total += self.amplitudes[image].conj() * phase * amplitude;
        }

        Ok(total * term.coeff())
    }

    /// Reduced density matrix on `qubits`, in the given order
    pub fn density_matrix(&self, qubits: &[QubitId]) -> Result<DensityMatrix> {
        qtomo_core::validate_qubits(qubits)?;
        let bits: Vec<usize> = qubits
            .iter()
            .map(|&q| self.bit_of(q))
            .collect::<Result<_>>()?;
        let kept_mask: usize = bits.iter().map(|&b| 1usize << b).sum();
        let k = bits.len();

        let reduced_index = |full: usize| -> usize {
            bits.iter()
                .fold(0, |acc, &b| (acc << 1) | ((full >> b) & 1))
        };

        let dimension = 1usize << k;
        let mut matrix = nalgebra::DMatrix::zeros(dimension, dimension);
        for i in 0..self.amplitudes.len() {
            for j in 0..self.amplitudes.len() {
                // Traced-out bits must agree
                if (i ^ j) & !kept_mask != 0 {
                    continue;
                }
                matrix[(reduced_index(i), reduced_index(j))] +=
                    self.amplitudes[i] * self.amplitudes[j].conj();
            }
        }

        DensityMatrix::from_matrix(matrix)
    }
}
