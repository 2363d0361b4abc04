//! Dense solves shared by the regression solvers.
//!
//! Small p×p systems only (p is the model parameter count), so the
//! decompositions are written directly over `faer` storage: Householder QR
//! for the symmetric normal-equation systems of the least-squares path, LU
//! with partial pivoting for the square systems of the elemental fits.

use faer::{Col, Mat};

use crate::solvers::RegressionError;

/// Pivot magnitudes at or below this, relative to the largest entry of the
/// system, are treated as a singular system.
pub(crate) const SINGULARITY_TOL: f64 = 1e-14;

/// Singularity threshold scaled to the magnitude of the system.
fn singularity_threshold(a: &Mat<f64>) -> f64 {
    let mut max_abs: f64 = 1.0;
    for i in 0..a.nrows() {
        for j in 0..a.ncols() {
            max_abs = max_abs.max(a[(i, j)].abs());
        }
    }
    SINGULARITY_TOL * max_abs
}

/// Solve `A x = b` via Householder QR, for square `A`.
///
/// Used on the normal-equation matrix `DᵀD`, where the orthogonal
/// factorization is considerably more stable than direct elimination.
/// Returns an error when a Householder column norm collapses, which is how
/// rank deficiency of the design shows up here.
pub(crate) fn qr_solve(a: &Mat<f64>, b: &Col<f64>) -> Result<Col<f64>, RegressionError> {
    let n = a.nrows();
    debug_assert_eq!(a.ncols(), n);
    debug_assert_eq!(b.nrows(), n);

    let mut r = a.clone();
    let mut rhs = b.clone();
    let tol = singularity_threshold(a);

    // Householder reflections, applied in place to R and the rhs.
    for k in 0..n {
        let mut norm2 = 0.0;
        for i in k..n {
            norm2 += r[(i, k)] * r[(i, k)];
        }
        let norm = norm2.sqrt();
        if norm <= tol {
            return Err(RegressionError::NumericalError(format!(
                "rank-deficient system: column {k} collapsed during QR"
            )));
        }
        let alpha = if r[(k, k)] > 0.0 { -norm } else { norm };

        // Householder vector v, normalized so v[k] = 1.
        let mut v = vec![0.0; n];
        v[k] = r[(k, k)] - alpha;
        for i in (k + 1)..n {
            v[i] = r[(i, k)];
        }
        let vtv: f64 = v[k..].iter().map(|x| x * x).sum();
        if vtv <= tol * tol {
            // Column already lower-triangularized.
            r[(k, k)] = alpha;
            continue;
        }
        let beta = 2.0 / vtv;

        // Apply H = I - beta v vᵀ to the trailing columns of R.
        for j in k..n {
            let mut dot = 0.0;
            for i in k..n {
                dot += v[i] * r[(i, j)];
            }
            let scale = beta * dot;
            for i in k..n {
                r[(i, j)] -= scale * v[i];
            }
        }
        // And to the right-hand side.
        let mut dot = 0.0;
        for i in k..n {
            dot += v[i] * rhs[i];
        }
        let scale = beta * dot;
        for i in k..n {
            rhs[i] -= scale * v[i];
        }
    }

    // Back substitution on the triangularized system.
    let mut x = Col::zeros(n);
    for i in (0..n).rev() {
        let mut sum = rhs[i];
        for j in (i + 1)..n {
            sum -= r[(i, j)] * x[j];
        }
        if r[(i, i)].abs() <= tol {
            return Err(RegressionError::NumericalError(format!(
                "rank-deficient system: zero diagonal at row {i} after QR"
            )));
        }
        x[i] = sum / r[(i, i)];
    }
    Ok(x)
}

/// Solve the square system `A x = b` by LU decomposition with partial
/// pivoting. Returns `None` for a (numerically) singular system; callers in
/// the randomized search treat that as a degenerate elemental subset and
/// move on.
pub(crate) fn lu_solve(a: &Mat<f64>, b: &Col<f64>) -> Option<Col<f64>> {
    let n = a.nrows();
    debug_assert_eq!(a.ncols(), n);
    debug_assert_eq!(b.nrows(), n);

    let mut lu = a.clone();
    let mut x = b.clone();
    let tol = singularity_threshold(a);

    for k in 0..n {
        // Partial pivoting.
        let mut pivot_row = k;
        let mut pivot_mag = lu[(k, k)].abs();
        for i in (k + 1)..n {
            let mag = lu[(i, k)].abs();
            if mag > pivot_mag {
                pivot_mag = mag;
                pivot_row = i;
            }
        }
        if pivot_mag <= tol || !pivot_mag.is_finite() {
            return None;
        }
        if pivot_row != k {
            for j in 0..n {
                let tmp = lu[(k, j)];
                lu[(k, j)] = lu[(pivot_row, j)];
                lu[(pivot_row, j)] = tmp;
            }
            let tmp = x[k];
            x[k] = x[pivot_row];
            x[pivot_row] = tmp;
        }

        // Eliminate below the pivot, folding the elimination into the rhs.
        for i in (k + 1)..n {
            let factor = lu[(i, k)] / lu[(k, k)];
            lu[(i, k)] = 0.0;
            for j in (k + 1)..n {
                lu[(i, j)] -= factor * lu[(k, j)];
            }
            x[i] -= factor * x[k];
        }
    }

    // Back substitution.
    for i in (0..n).rev() {
        let mut sum = x[i];
        for j in (i + 1)..n {
            sum -= lu[(i, j)] * x[j];
        }
        x[i] = sum / lu[(i, i)];
    }
    if (0..n).any(|i| !x[i].is_finite()) {
        return None;
    }
    Some(x)
}
