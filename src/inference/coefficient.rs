//! Coefficient inference calculations.

use crate::solvers::RegressionError;
use faer::{Col, Mat};
use statrs::distribution::{ContinuousCDF, StudentsT};

/// Computes inference statistics for regression coefficients.
pub struct CoefficientInference;

impl CoefficientInference {
    /// Invert an upper-triangular matrix by back-substitution.
    pub fn upper_triangular_inverse(r: &Mat<f64>) -> Result<Mat<f64>, RegressionError> {
        let p = r.ncols();
        for i in 0..p {
            if r[(i, i)] == 0.0 || !r[(i, i)].is_finite() {
                return Err(RegressionError::SingularMatrix);
            }
        }

        // Solve R * Z = I column by column
        let mut inv = Mat::zeros(p, p);
        for col in 0..p {
            for i in (0..=col).rev() {
                let mut sum = if i == col { 1.0 } else { 0.0 };
                for j in (i + 1)..=col {
                    sum -= r[(i, j)] * inv[(j, col)];
                }
                inv[(i, col)] = sum / r[(i, i)];
            }
        }

        Ok(inv)
    }

    /// Compute (X'X)⁻¹ from the R factor of X = QR.
    ///
    /// (X'X)⁻¹ = R⁻¹R⁻ᵀ
    pub fn xtx_inverse_from_r(r: &Mat<f64>) -> Result<Mat<f64>, RegressionError> {
        let r_inv = Self::upper_triangular_inverse(r)?;
        let p = r_inv.ncols();

        Ok(Mat::from_fn(p, p, |i, j| {
            // R⁻¹ is upper triangular, so only k >= max(i, j) contributes
            (i.max(j)..p).map(|k| r_inv[(i, k)] * r_inv[(j, k)]).sum()
        }))
    }

    /// Standard errors from the diagonal of a covariance matrix.
    ///
    /// SE(β_j) = sqrt(Cov_jj)
    pub fn standard_errors(cov: &Mat<f64>) -> Col<f64> {
        Col::from_fn(cov.nrows(), |j| {
            let var = cov[(j, j)];
            if var >= 0.0 {
                var.sqrt()
            } else {
                f64::NAN
            }
        })
    }

    /// Compute t-statistics for coefficients.
    ///
    /// t_j = β_j / SE(β_j)
    pub fn t_statistics(coefficients: &Col<f64>, std_errors: &Col<f64>) -> Col<f64> {
        Col::from_fn(coefficients.nrows(), |j| {
            if std_errors[j].is_nan() || std_errors[j] == 0.0 {
                f64::NAN
            } else {
                coefficients[j] / std_errors[j]
            }
        })
    }

    /// Compute two-sided p-values from t-statistics.
    ///
    /// p_j = 2 * P(T > |t_j|) where T ~ t(df)
    pub fn p_values(t_statistics: &Col<f64>, df: f64) -> Col<f64> {
        let n = t_statistics.nrows();
        match Self::t_distribution(df) {
            Some(t_dist) => Col::from_fn(n, |j| {
                let t = t_statistics[j];
                if t.is_nan() {
                    f64::NAN
                } else {
                    2.0 * t_dist.sf(t.abs())
                }
            }),
            None => Col::from_fn(n, |_| f64::NAN),
        }
    }

    /// Two-sided critical value t_{1 - (1 - level)/2, df}.
    pub fn t_critical(df: f64, confidence_level: f64) -> f64 {
        Self::t_distribution(df).map_or(f64::NAN, |d| {
            d.inverse_cdf(1.0 - (1.0 - confidence_level) / 2.0)
        })
    }

    /// Compute confidence intervals for coefficients.
    ///
    /// CI_j = β_j ± t_{α/2, df} * SE(β_j)
    pub fn confidence_intervals(
        coefficients: &Col<f64>,
        std_errors: &Col<f64>,
        df: f64,
        confidence_level: f64,
    ) -> (Col<f64>, Col<f64>) {
        let n = coefficients.nrows();
        let t_crit = Self::t_critical(df, confidence_level);

        let lower = Col::from_fn(n, |j| coefficients[j] - t_crit * std_errors[j]);
        let upper = Col::from_fn(n, |j| coefficients[j] + t_crit * std_errors[j]);

        (lower, upper)
    }

    fn t_distribution(df: f64) -> Option<StudentsT> {
        if df > 0.0 {
            StudentsT::new(0.0, 1.0, df).ok()
        } else {
            None
        }
    }
}
