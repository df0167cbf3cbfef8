//! Small dense linear-algebra kernels used by the homography solver.
//!
//! Everything here is a pure function over `nalgebra` values. Singular or
//! shape-incompatible inputs produce `None` instead of panicking.

use nalgebra::{DMatrix, DVector, Matrix3};

/// Pivot / determinant magnitude below which a system is treated as singular.
pub const SINGULAR_TOLERANCE: f64 = 1e-10;

/// Transpose of `a`.
#[inline]
pub fn transpose(a: &DMatrix<f64>) -> DMatrix<f64> {
    a.transpose()
}

/// Matrix product `a * b`, or `None` when the inner dimensions differ.
pub fn multiply(a: &DMatrix<f64>, b: &DMatrix<f64>) -> Option<DMatrix<f64>> {
    if a.ncols() != b.nrows() {
        return None;
    }
    Some(a * b)
}

/// Matrix-vector product `a * v`, or `None` when the shapes are incompatible.
pub fn multiply_vec(a: &DMatrix<f64>, v: &DVector<f64>) -> Option<DVector<f64>> {
    if a.ncols() != v.len() {
        return None;
    }
    Some(a * v)
}

/// Solve `a * x = b` by Gaussian elimination with partial pivoting.
///
/// Returns `None` if `a` is not square, `b` has the wrong length, or a pivot
/// falls below [`SINGULAR_TOLERANCE`] after row exchange.
pub fn gaussian_solve(a: &DMatrix<f64>, b: &DVector<f64>) -> Option<DVector<f64>> {
    let n = a.nrows();
    if n == 0 || a.ncols() != n || b.len() != n {
        return None;
    }

    let mut m = a.clone();
    let mut rhs = b.clone();

    for col in 0..n {
        let mut pivot_row = col;
        let mut pivot_abs = m[(col, col)].abs();
        for row in (col + 1)..n {
            let v = m[(row, col)].abs();
            if v > pivot_abs {
                pivot_abs = v;
                pivot_row = row;
            }
        }
        if pivot_abs.is_nan() || pivot_abs < SINGULAR_TOLERANCE {
            return None;
        }
        if pivot_row != col {
            m.swap_rows(col, pivot_row);
            rhs.swap_rows(col, pivot_row);
        }

        let pivot = m[(col, col)];
        for row in (col + 1)..n {
            let factor = m[(row, col)] / pivot;
            if factor == 0.0 {
                continue;
            }
            for k in col..n {
                let upper = m[(col, k)];
                m[(row, k)] -= factor * upper;
            }
            let upper = rhs[col];
            rhs[row] -= factor * upper;
        }
    }

    let mut x = DVector::<f64>::zeros(n);
    for row in (0..n).rev() {
        let mut acc = rhs[row];
        for k in (row + 1)..n {
            acc -= m[(row, k)] * x[k];
        }
        x[row] = acc / m[(row, row)];
    }
    Some(x)
}

/// Determinant of a 3×3 matrix by cofactor expansion along the first row.
pub fn determinant3x3(m: &Matrix3<f64>) -> f64 {
    m[(0, 0)] * (m[(1, 1)] * m[(2, 2)] - m[(1, 2)] * m[(2, 1)])
        - m[(0, 1)] * (m[(1, 0)] * m[(2, 2)] - m[(1, 2)] * m[(2, 0)])
        + m[(0, 2)] * (m[(1, 0)] * m[(2, 1)] - m[(1, 1)] * m[(2, 0)])
}

/// Inverse of a 3×3 matrix via the adjugate, `None` if `|det| < 1e-10`.
pub fn invert3x3(m: &Matrix3<f64>) -> Option<Matrix3<f64>> {
    let det = determinant3x3(m);
    if det.is_nan() || det.abs() < SINGULAR_TOLERANCE {
        return None;
    }

    // 2×2 minor over rows (r0, r1) and columns (c0, c1).
    let minor = |r0: usize, r1: usize, c0: usize, c1: usize| {
        m[(r0, c0)] * m[(r1, c1)] - m[(r0, c1)] * m[(r1, c0)]
    };

    let adj = Matrix3::new(
        minor(1, 2, 1, 2),
        -minor(0, 2, 1, 2),
        minor(0, 1, 1, 2),
        -minor(1, 2, 0, 2),
        minor(0, 2, 0, 2),
        -minor(0, 1, 0, 2),
        minor(1, 2, 0, 1),
        -minor(0, 2, 0, 1),
        minor(0, 1, 0, 1),
    );
    Some(adj / det)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn solves_system_that_needs_a_row_swap() {
        // Leading zero forces a pivot exchange.
        let a = DMatrix::from_row_slice(3, 3, &[0.0, 2.0, 1.0, 1.0, 1.0, 1.0, 2.0, 1.0, 3.0]);
        let expected = DVector::from_vec(vec![1.0, -2.0, 3.0]);
        let b = &a * &expected;

        let x = gaussian_solve(&a, &b).expect("solvable");
        for i in 0..3 {
            assert_relative_eq!(x[i], expected[i], epsilon = 1e-12);
        }
    }

    #[test]
    fn singular_system_has_no_solution() {
        let a = DMatrix::from_row_slice(3, 3, &[1.0, 2.0, 3.0, 2.0, 4.0, 6.0, 0.0, 1.0, 1.0]);
        let b = DVector::from_vec(vec![1.0, 2.0, 3.0]);
        assert!(gaussian_solve(&a, &b).is_none());
    }

    #[test]
    fn shape_mismatch_is_rejected() {
        let a = DMatrix::<f64>::identity(3, 2);
        let b = DMatrix::<f64>::identity(3, 3);
        assert!(multiply(&a, &b).is_none());
        assert!(multiply(&b, &a).is_some());
        assert!(multiply_vec(&a, &DVector::from_vec(vec![1.0, 2.0, 3.0])).is_none());
        assert!(gaussian_solve(&a, &DVector::from_vec(vec![1.0, 2.0, 3.0])).is_none());
    }

    #[test]
    fn transpose_then_multiply_gives_gram_matrix() {
        let a = DMatrix::from_row_slice(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let at = transpose(&a);
        assert_eq!(at.nrows(), 3);
        let gram = multiply(&at, &a).expect("compatible");
        assert_relative_eq!(gram[(0, 0)], 17.0);
        assert_relative_eq!(gram[(1, 2)], 36.0);
        assert_relative_eq!(gram[(2, 1)], 36.0);
    }

    #[test]
    fn adjugate_inverse_matches_identity() {
        let m = Matrix3::new(
            2.0, 0.5, -1.0, //
            0.3, 1.5, 4.0, //
            0.01, -0.02, 1.0,
        );
        let inv = invert3x3(&m).expect("invertible");
        let id = m * inv;
        assert_relative_eq!(id, Matrix3::identity(), epsilon = 1e-12);
        assert_relative_eq!(determinant3x3(&m), m.determinant(), epsilon = 1e-12);
    }

    #[test]
    fn near_singular_matrix_is_not_inverted() {
        let m = Matrix3::new(
            1.0, 2.0, 3.0, //
            2.0, 4.0, 6.0 + 1e-12, //
            1.0, 1.0, 1.0,
        );
        assert!(invert3x3(&m).is_none());
    }
}
