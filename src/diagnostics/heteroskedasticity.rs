//! Breusch-Pagan test for heteroskedasticity (studentised form).

use super::DiagnosticError;
use crate::core::Decision;
use crate::design::DesignMatrix;
use crate::solvers::{FittedRegressor, OlsRegressor, Regressor};
use faer::Col;
use log::debug;
use statrs::distribution::{ChiSquared, ContinuousCDF};

/// Result of the Breusch-Pagan test.
#[derive(Debug, Clone, PartialEq)]
pub struct BreuschPagan {
    /// LM = n · R² of the auxiliary regression.
    pub lm_statistic: f64,
    /// P-value of LM from χ²(df).
    pub lm_p_value: f64,
    /// Overall F-statistic of the auxiliary regression.
    pub f_statistic: f64,
    pub f_p_value: f64,
    /// Number of non-constant regressors in the auxiliary regression.
    pub df: usize,
    pub alpha: f64,
    /// Decided on the LM p-value; `FailToReject` means homoskedastic.
    pub decision: Decision,
}

/// Regress squared residuals on `design` and test whether the fit explains
/// anything.
///
/// `design` should be the matrix the residuals came from, including `const`.
pub fn breusch_pagan(
    residuals: &Col<f64>,
    design: &DesignMatrix,
    alpha: f64,
) -> Result<BreuschPagan, DiagnosticError> {
    let n = residuals.nrows();
    let squared = Col::from_fn(n, |i| residuals[i] * residuals[i]);

    let auxiliary = OlsRegressor::builder()
        .compute_inference(false)
        .build()
        .fit(design, &squared)?;
    let aux = auxiliary.result();

    let df = aux.model_df();
    let lm_statistic = n as f64 * aux.r_squared;
    let lm_p_value = if df > 0 && lm_statistic.is_finite() {
        ChiSquared::new(df as f64).map_or(f64::NAN, |d| d.sf(lm_statistic))
    } else {
        f64::NAN
    };

    debug!(
        "Breusch-Pagan auxiliary regression: R² = {:.6}, df = {}",
        aux.r_squared, df
    );

    Ok(BreuschPagan {
        lm_statistic,
        lm_p_value,
        f_statistic: aux.f_statistic,
        f_p_value: aux.f_pvalue,
        df,
        alpha,
        decision: Decision::for_assumption(lm_p_value, alpha),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use faer::Mat;

    fn design(n: usize) -> DesignMatrix {
        DesignMatrix::with_intercept(vec!["x".into()], Mat::from_fn(n, 1, |i, _| i as f64))
            .unwrap()
    }

    #[test]
    fn test_growing_spread_is_detected() {
        let n = 40;
        // |e| grows with x, sign alternates
        let e = Col::from_fn(n, |i| {
            let s = if i % 2 == 0 { 1.0 } else { -1.0 };
            s * (1.0 + i as f64)
        });
        let bp = breusch_pagan(&e, &design(n), 0.05).unwrap();

        assert_eq!(bp.df, 1);
        assert!(bp.lm_statistic > 10.0);
        assert_eq!(bp.decision, Decision::Reject);
    }

    #[test]
    fn test_lm_matches_n_r_squared() {
        let n = 12;
        let e = Col::from_fn(n, |i| ((i * 7) % 5) as f64 - 2.0);
        let bp = breusch_pagan(&e, &design(n), 0.05).unwrap();

        let squared = Col::from_fn(n, |i| e[i] * e[i]);
        let aux = OlsRegressor::default().fit(&design(n), &squared).unwrap();
        assert_relative_eq!(bp.lm_statistic, n as f64 * aux.r_squared(), epsilon = 1e-10);
        assert_relative_eq!(bp.f_statistic, aux.result().f_statistic, epsilon = 1e-10);
    }
}
