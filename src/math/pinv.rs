//! Least-squares solve of normal equations through an SVD pseudo-inverse.
//!
//! Normal systems built from interaction terms are often singular or nearly so
//! (a term and its own square, or two identical columns). Instead of failing we
//! return the minimum-norm least-squares solution:
//!
//! ```text
//! a = M⁺ · V
//! ```
//!
//! Singular values below `rcond · σ_max` are treated as zero.

use nalgebra::{DMatrix, DVector};

/// Relative cutoffs tried in order until the solution is finite.
const RCOND_STEPS: [f64; 3] = [1e-12, 1e-10, 1e-8];

/// Solve `m · a ≈ v` in the least-squares sense.
///
/// Returns `None` if no cutoff yields finite coefficients.
pub fn solve_pseudo_inverse(m: &DMatrix<f64>, v: &DVector<f64>) -> Option<DVector<f64>> {
    if m.nrows() != v.len() || m.iter().any(|x| !x.is_finite()) {
        return None;
    }

    let svd = m.clone().svd(true, true);
    let sigma_max = svd.singular_values.max();

    for &rcond in &RCOND_STEPS {
        let cutoff = (rcond * sigma_max).max(f64::MIN_POSITIVE);
        if let Ok(a) = svd.solve(v, cutoff) {
            if a.iter().all(|x| x.is_finite()) {
                return Some(a);
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn solves_well_conditioned_system() {
        // 2a + b = 5, a + 3b = 10  ->  a = 1, b = 3
        let m = DMatrix::from_row_slice(2, 2, &[2.0, 1.0, 1.0, 3.0]);
        let v = DVector::from_row_slice(&[5.0, 10.0]);

        let a = solve_pseudo_inverse(&m, &v).unwrap();
        assert_relative_eq!(a[0], 1.0, epsilon = 1e-10);
        assert_relative_eq!(a[1], 3.0, epsilon = 1e-10);
    }

    #[test]
    fn singular_system_gets_minimum_norm_solution() {
        // Two identical columns: any a + b = 2 fits, the pseudo-inverse splits evenly.
        let m = DMatrix::from_row_slice(2, 2, &[14.0, 14.0, 14.0, 14.0]);
        let v = DVector::from_row_slice(&[28.0, 28.0]);

        let a = solve_pseudo_inverse(&m, &v).unwrap();
        assert_relative_eq!(a[0], 1.0, epsilon = 1e-9);
        assert_relative_eq!(a[1], 1.0, epsilon = 1e-9);
    }

    #[test]
    fn zero_matrix_gives_zero_solution() {
        let m = DMatrix::<f64>::zeros(2, 2);
        let v = DVector::from_row_slice(&[0.0, 0.0]);
        let a = solve_pseudo_inverse(&m, &v).unwrap();
        assert!(a.iter().all(|x| *x == 0.0));
    }

    #[test]
    fn non_finite_input_is_rejected() {
        let m = DMatrix::from_row_slice(1, 1, &[f64::INFINITY]);
        let v = DVector::from_row_slice(&[1.0]);
        assert!(solve_pseudo_inverse(&m, &v).is_none());
    }
}
