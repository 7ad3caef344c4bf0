//! Tagged Pauli operator algebra
//!
//! Operators are stored explicitly as a map from qubit to a non-identity
//! single-qubit Pauli plus one complex coefficient. Products use the
//! single-qubit rule σa·σb = δab I + i εabc σc qubit by qubit.
//!
//! # Pauli Operators
//!
//! - I: Identity [[1,0],[0,1]]
//! - X: Bit flip [[0,1],[1,0]]
//! - Y: [[0,-i],[i,0]]
//! - Z: Phase flip [[1,0],[0,-1]]

use crate::{QuantumError, QubitId, Result};
use nalgebra::DMatrix;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);
const I: Complex64 = Complex64::new(0.0, 1.0);
const NEG_I: Complex64 = Complex64::new(0.0, -1.0);
const NEG_ONE: Complex64 = Complex64::new(-1.0, 0.0);

/// Single-qubit Pauli operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Pauli {
    /// Identity operator
    I,
    /// Pauli X (bit flip)
    X,
    /// Pauli Y
    Y,
    /// Pauli Z (phase flip)
    Z,
}

impl Pauli {
    /// The four operators in tomography order
    pub const ALL: [Pauli; 4] = [Pauli::I, Pauli::X, Pauli::Y, Pauli::Z];

    /// Parse a Pauli operator from a character
    pub fn from_char(c: char) -> Result<Self> {
        match c.to_ascii_uppercase() {
            'I' => Ok(Pauli::I),
            'X' => Ok(Pauli::X),
            'Y' => Ok(Pauli::Y),
            'Z' => Ok(Pauli::Z),
            _ => Err(QuantumError::InvalidPauli(c)),
        }
    }

    /// Convert to character representation
    pub fn to_char(self) -> char {
        match self {
            Pauli::I => 'I',
            Pauli::X => 'X',
            Pauli::Y => 'Y',
            Pauli::Z => 'Z',
        }
    }

    /// Product of two single-qubit Paulis as `(phase, operator)`
    ///
    /// ```
    /// use qtomo_core::Pauli;
    /// use num_complex::Complex64;
    ///
    /// let (phase, op) = Pauli::X.mul(Pauli::Y);
    /// assert_eq!(op, Pauli::Z);
    /// assert_eq!(phase, Complex64::new(0.0, 1.0));
    /// ```
    pub fn mul(self, other: Pauli) -> (Complex64, Pauli) {
        match (self, other) {
            (Pauli::I, p) | (p, Pauli::I) => (ONE, p),
            (a, b) if a == b => (ONE, Pauli::I),
            (Pauli::X, Pauli::Y) => (I, Pauli::Z),
            (Pauli::Y, Pauli::Z) => (I, Pauli::X),
            (Pauli::Z, Pauli::X) => (I, Pauli::Y),
            (Pauli::Y, Pauli::X) => (NEG_I, Pauli::Z),
            (Pauli::Z, Pauli::Y) => (NEG_I, Pauli::X),
            (Pauli::X, Pauli::Z) => (NEG_I, Pauli::Y),
            _ => unreachable!("all Pauli pairs are covered"),
        }
    }

    /// 2×2 matrix of this operator, row-major
    pub fn matrix(self) -> [[Complex64; 2]; 2] {
        match self {
            Pauli::I => [[ONE, ZERO], [ZERO, ONE]],
            Pauli::X => [[ZERO, ONE], [ONE, ZERO]],
            Pauli::Y => [[ZERO, NEG_I], [I, ZERO]],
            Pauli::Z => [[ONE, ZERO], [ZERO, NEG_ONE]],
        }
    }

    /// Apply to computational basis state `bit`, returning `(new_bit, phase)`
    #[inline]
    pub fn apply_to_bit(self, bit: usize) -> (usize, Complex64) {
        match self {
            Pauli::I => (bit, ONE),
            Pauli::X => (bit ^ 1, ONE),
            // Y|0⟩ = i|1⟩, Y|1⟩ = -i|0⟩
            Pauli::Y => (bit ^ 1, if bit == 0 { I } else { NEG_I }),
            Pauli::Z => (bit, if bit == 0 { ONE } else { NEG_ONE }),
        }
    }
}

impl fmt::Display for Pauli {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// A coefficient times a tensor product of single-qubit Paulis
///
/// Only non-identity factors are stored, keyed by qubit; a term with no
/// factors is a multiple of the identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PauliTerm {
    ops: BTreeMap<QubitId, Pauli>,
    coeff: Complex64,
}

impl PauliTerm {
    /// The identity operator with unit coefficient
    pub fn identity() -> Self {
        Self {
            ops: BTreeMap::new(),
            coeff: ONE,
        }
    }

    /// A single-qubit Pauli on `qubit`
    pub fn single(qubit: QubitId, pauli: Pauli) -> Self {
        let mut term = Self::identity();
        if pauli != Pauli::I {
            term.ops.insert(qubit, pauli);
        }
        term
    }

    /// Build a term from `(qubit, pauli)` factors
    ///
    /// Factors on the same qubit are multiplied left to right.
    pub fn from_factors(factors: &[(QubitId, Pauli)]) -> Self {
        factors.iter().fold(Self::identity(), |term, &(qubit, pauli)| {
            term.compose(&Self::single(qubit, pauli))
        })
    }

    /// Parse a compact label such as `"XIZ"` where character `i` acts on `qubits[i]`
    pub fn from_label(label: &str, qubits: &[QubitId]) -> Result<Self> {
        let symbols: Vec<char> = label.chars().collect();
        if symbols.len() != qubits.len() {
            return Err(QuantumError::invalid_qubit_count(
                label,
                symbols.len(),
                qubits.len(),
            ));
        }

        let mut term = Self::identity();
        for (&qubit, &symbol) in qubits.iter().zip(symbols.iter()) {
            let pauli = Pauli::from_char(symbol)?;
            term = term.compose(&Self::single(qubit, pauli));
        }
        Ok(term)
    }

    /// Set the coefficient
    pub fn with_coeff(mut self, coeff: Complex64) -> Self {
        self.coeff = coeff;
        self
    }

    /// Overall coefficient
    #[inline]
    pub fn coeff(&self) -> Complex64 {
        self.coeff
    }

    /// Pauli acting on `qubit` (identity when the term does not touch it)
    pub fn get(&self, qubit: QubitId) -> Pauli {
        self.ops.get(&qubit).copied().unwrap_or(Pauli::I)
    }

    /// Non-identity factors in ascending qubit order
    pub fn factors(&self) -> impl Iterator<Item = (QubitId, Pauli)> + '_ {
        self.ops.iter().map(|(&q, &p)| (q, p))
    }

    /// The operator part of the term, ignoring the coefficient
    ///
    /// Two terms that differ only in coefficient share the same key.
    pub fn operator_key(&self) -> BTreeMap<QubitId, Pauli> {
        self.ops.clone()
    }

    /// Number of non-identity factors
    #[inline]
    pub fn weight(&self) -> usize {
        self.ops.len()
    }

    /// Check whether the operator part is the identity
    #[inline]
    pub fn is_identity(&self) -> bool {
        self.ops.is_empty()
    }

    /// Operator product `self · other`
    ///
    /// ```
    /// use qtomo_core::{Pauli, PauliTerm, QubitId};
    ///
    /// let q0 = QubitId::new(0);
    /// let q1 = QubitId::new(1);
    /// let xx = PauliTerm::single(q0, Pauli::X).compose(&PauliTerm::single(q1, Pauli::X));
    /// assert_eq!(xx.to_string(), "(1+0j)*X0*X1");
    ///
    /// let yz = PauliTerm::single(q0, Pauli::Y).compose(&PauliTerm::single(q0, Pauli::Z));
    /// assert_eq!(yz.to_string(), "(0+1j)*X0");
    /// ```
    pub fn compose(&self, other: &PauliTerm) -> PauliTerm {
        let mut ops = self.ops.clone();
        let mut coeff = self.coeff * other.coeff;

        for (&qubit, &rhs) in &other.ops {
            let lhs = ops.remove(&qubit).unwrap_or(Pauli::I);
            let (phase, product) = lhs.mul(rhs);
            coeff *= phase;
            if product != Pauli::I {
                ops.insert(qubit, product);
            }
        }

        PauliTerm { ops, coeff }
    }

    /// Check that every factor acts inside `qubits`
    pub fn check_support(&self, qubits: &[QubitId]) -> Result<()> {
        match self.ops.keys().find(|q| !qubits.contains(q)) {
            Some(&qubit) => Err(QuantumError::qubit_out_of_range(qubit, qubits)),
            None => Ok(()),
        }
    }

    /// Dense matrix of the term on `qubits`
    ///
    /// `qubits[0]` is the most significant tensor factor, so the result is
    /// `coeff · P(qubits[0]) ⊗ P(qubits[1]) ⊗ …`.
    ///
    /// # Errors
    /// Returns [`QuantumError::QubitOutOfRange`] if the term acts on a qubit
    /// that is not in `qubits`.
    pub fn matrix(&self, qubits: &[QubitId]) -> Result<DMatrix<Complex64>> {
        self.check_support(qubits)?;

        let mut lifted = DMatrix::from_element(1, 1, self.coeff);
        for &qubit in qubits {
            let m = self.get(qubit).matrix();
            let factor = DMatrix::from_fn(2, 2, |r, c| m[r][c]);
            lifted = lifted.kronecker(&factor);
        }
        Ok(lifted)
    }
}

impl std::ops::Mul for &PauliTerm {
    type Output = PauliTerm;

    fn mul(self, rhs: &PauliTerm) -> PauliTerm {
        self.compose(rhs)
    }
}

impl Default for PauliTerm {
    fn default() -> Self {
        Self::identity()
    }
}

/// Python-style complex literal, e.g. `(1+0j)`
fn format_coeff(coeff: Complex64) -> String {
    let sign = if coeff.im.is_sign_negative() { '-' } else { '+' };
    format!("({}{}{}j)", coeff.re, sign, coeff.im.abs())
}

impl fmt::Display for PauliTerm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", format_coeff(self.coeff))?;
        if self.ops.is_empty() {
            return write!(f, "*I");
        }
        for (qubit, pauli) in &self.ops {
            write!(f, "*{}{}", pauli, qubit.index())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn q(i: usize) -> QubitId {
        QubitId::new(i)
    }

    #[test]
    fn test_pauli_from_char() {
        assert_eq!(Pauli::from_char('I').unwrap(), Pauli::I);
        assert_eq!(Pauli::from_char('x').unwrap(), Pauli::X);
        assert_eq!(Pauli::from_char('Q'), Err(QuantumError::InvalidPauli('Q')));
    }

    #[test]
    fn test_single_qubit_products_match_matrices() {
        for a in Pauli::ALL {
            for b in Pauli::ALL {
                let (phase, c) = a.mul(b);
                let (ma, mb, mc) = (a.matrix(), b.matrix(), c.matrix());
                for r in 0..2 {
                    for col in 0..2 {
                        let lhs = ma[r][0] * mb[0][col] + ma[r][1] * mb[1][col];
                        let rhs = phase * mc[r][col];
                        assert_relative_eq!(lhs.re, rhs.re, epsilon = 1e-15);
                        assert_relative_eq!(lhs.im, rhs.im, epsilon = 1e-15);
                    }
                }
            }
        }
    }

    #[test]
    fn test_compose_cancels_to_identity() {
        let zz = PauliTerm::single(q(2), Pauli::Z).compose(&PauliTerm::single(q(2), Pauli::Z));
        assert!(zz.is_identity());
        assert_eq!(zz.coeff(), ONE);
    }

    #[test]
    fn test_mul_operator() {
        let x = PauliTerm::single(q(0), Pauli::X);
        let y = PauliTerm::single(q(0), Pauli::Y);
        let xy = &x * &y;
        assert_eq!(xy.get(q(0)), Pauli::Z);
        assert_eq!(xy.coeff(), I);
        assert_eq!(&y * &x, xy.with_coeff(NEG_I));
    }

    #[test]
    fn test_display() {
        assert_eq!(PauliTerm::identity().to_string(), "(1+0j)*I");
        let term = PauliTerm::from_factors(&[(q(1), Pauli::Y), (q(0), Pauli::Z)]);
        assert_eq!(term.to_string(), "(1+0j)*Z0*Y1");
        let neg = PauliTerm::single(q(0), Pauli::X).with_coeff(Complex64::new(-0.5, 0.0));
        assert_eq!(neg.to_string(), "(-0.5+0j)*X0");
    }

    #[test]
    fn test_get_defaults_to_identity() {
        let term = PauliTerm::single(q(3), Pauli::X);
        assert_eq!(term.get(q(3)), Pauli::X);
        assert_eq!(term.get(q(0)), Pauli::I);
    }

    #[test]
    fn test_from_label() {
        let qubits = [q(4), q(7)];
        let term = PauliTerm::from_label("XI", &qubits).unwrap();
        assert_eq!(term.get(q(4)), Pauli::X);
        assert_eq!(term.weight(), 1);
        assert!(PauliTerm::from_label("X", &qubits).is_err());
        assert!(PauliTerm::from_label("XW", &qubits).is_err());
    }

    #[test]
    fn test_matrix_ordering() {
        // Z on the first listed qubit is the most significant factor: diag(1, 1, -1, -1)
        let qubits = [q(0), q(1)];
        let zi = PauliTerm::single(q(0), Pauli::Z).matrix(&qubits).unwrap();
        let diag: Vec<f64> = (0..4).map(|i| zi[(i, i)].re).collect();
        assert_eq!(diag, vec![1.0, 1.0, -1.0, -1.0]);

        let iz = PauliTerm::single(q(1), Pauli::Z).matrix(&qubits).unwrap();
        let diag: Vec<f64> = (0..4).map(|i| iz[(i, i)].re).collect();
        assert_eq!(diag, vec![1.0, -1.0, 1.0, -1.0]);
    }

    #[test]
    fn test_matrix_rejects_foreign_qubit() {
        let term = PauliTerm::single(q(5), Pauli::X);
        let err = term.matrix(&[q(0), q(1)]).unwrap_err();
        assert!(matches!(err, QuantumError::QubitOutOfRange { .. }));
    }

    #[test]
    fn test_matrix_includes_coefficient() {
        let term = PauliTerm::single(q(0), Pauli::Y).with_coeff(Complex64::new(0.0, 2.0));
        let m = term.matrix(&[q(0)]).unwrap();
        // 2i · Y = [[0, 2], [-2, 0]]
        assert_relative_eq!(m[(0, 1)].re, 2.0);
        assert_relative_eq!(m[(1, 0)].re, -2.0);
    }
}
