//! Matrix utility functions.

use faer::{Col, Mat};

/// Detect columns that are constant (zero variance).
pub fn detect_constant_columns(x: &Mat<f64>, tolerance: f64) -> Vec<bool> {
    let n_cols = x.ncols();
    let n_rows = x.nrows();

    if n_rows == 0 {
        return vec![true; n_cols];
    }

    (0..n_cols)
        .map(|j| {
            let first = x[(0, j)];
            (1..n_rows).all(|i| (x[(i, j)] - first).abs() < tolerance)
        })
        .collect()
}

/// Sum of squared entries.
pub fn sum_of_squares(v: &Col<f64>) -> f64 {
    v.iter().map(|&e| e * e).sum()
}

/// Copy column `j` of `x` into its own vector.
pub fn column(x: &Mat<f64>, j: usize) -> Col<f64> {
    Col::from_fn(x.nrows(), |i| x[(i, j)])
}

/// Build a matrix from a subset of columns, in the order given.
pub fn select_columns(x: &Mat<f64>, columns: &[usize]) -> Mat<f64> {
    Mat::from_fn(x.nrows(), columns.len(), |i, k| x[(i, columns[k])])
}

/// Numerical rank of `x` from the diagonal of its column-pivoted QR factor.
///
/// A diagonal entry counts when |r_ii| > tolerance * max |r_jj|.
pub fn numerical_rank(x: &Mat<f64>, tolerance: f64) -> usize {
    let k = x.nrows().min(x.ncols());
    if k == 0 {
        return 0;
    }

    let qr = x.col_piv_qr();
    let r = qr.R();
    let scale = (0..k)
        .map(|i| r[(i, i)].abs())
        .fold(f64::MIN_POSITIVE, f64::max);

    (0..k)
        .filter(|&i| r[(i, i)].abs() > tolerance * scale)
        .count()
}

/// Least-squares solution of `x b = y` by Householder QR.
///
/// Returns the solution together with the p × p upper-triangular factor R.
/// `None` when `x` has fewer rows than columns or R has a diagonal entry at
/// or below `tolerance` relative to the largest one.
pub fn qr_least_squares(
    x: &Mat<f64>,
    y: &Col<f64>,
    tolerance: f64,
) -> Option<(Col<f64>, Mat<f64>)> {
    let p = x.ncols();
    if x.nrows() < p || x.nrows() != y.nrows() {
        return None;
    }

    let qr = x.qr();
    let q = qr.compute_Q();
    let r_ref = qr.R();
    let r = Mat::from_fn(p, p, |i, j| if i <= j { r_ref[(i, j)] } else { 0.0 });

    let scale = (0..p)
        .map(|i| r[(i, i)].abs())
        .fold(f64::MIN_POSITIVE, f64::max);
    if (0..p).any(|i| !(r[(i, i)].abs() > tolerance * scale)) {
        return None;
    }

    let qty = q.transpose() * y;

    // Back-substitution for R b = Q'y
    let mut beta = Col::zeros(p);
    for i in (0..p).rev() {
        let mut sum = qty[i];
        for j in (i + 1)..p {
            sum -= r[(i, j)] * beta[j];
        }
        beta[i] = sum / r[(i, i)];
    }

    Some((beta, r))
}
