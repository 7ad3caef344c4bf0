//! Haar-random unitaries

use nalgebra::linalg::QR;
use nalgebra::DMatrix;
use num_complex::Complex64;
use rand::Rng;
use rand_distr::StandardNormal;

fn complex_gaussian<R: Rng>(rng: &mut R) -> Complex64 {
    let re: f64 = rng.sample(StandardNormal);
    let im: f64 = rng.sample(StandardNormal);
    Complex64::new(re, im) / 2.0_f64.sqrt()
}

/// Haar-random unitary of dimension `dim`
///
/// QR-decomposes a complex Ginibre matrix and fixes the phases of R's
/// diagonal so the distribution is exactly Haar (Mezzadri, 2007).
pub fn haar_rand_unitary<R: Rng>(dim: usize, rng: &mut R) -> DMatrix<Complex64> {
    let ginibre = DMatrix::from_fn(dim, dim, |_, _| complex_gaussian(rng));
    let qr = QR::new(ginibre);
    let (q, r) = (qr.q(), qr.r());

    let mut unitary = q;
    for j in 0..dim {
        let d = r[(j, j)];
        let phase = if d.norm() > 0.0 { d / d.norm() } else { Complex64::new(1.0, 0.0) };
        let mut column = unitary.column_mut(j);
        column *= phase;
    }
    unitary
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_haar_unitary_is_unitary() {
        let mut rng = StdRng::seed_from_u64(52);
        for dim in [2, 4, 8] {
            let u = haar_rand_unitary(dim, &mut rng);
            let product = u.adjoint() * &u;
            let identity = DMatrix::<Complex64>::identity(dim, dim);
            assert_relative_eq!((product - identity).norm(), 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_seeded_draws_repeat() {
        let a = haar_rand_unitary(2, &mut StdRng::seed_from_u64(7));
        let b = haar_rand_unitary(2, &mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
    }
}
