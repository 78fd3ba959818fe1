//! Ordinary Least Squares regression solver.

use crate::core::{RegressionOptions, RegressionOptionsBuilder, RegressionResult};
use crate::design::{CategoricalEncoding, DesignMatrix};
use crate::inference::{
    f_test, overall_f_test, t_test, CoefficientInference, FTestResult, HypothesisError,
    HypothesisOutcome, LinearHypothesis, OverallFTest, TTestResult,
};
use crate::solvers::traits::{FittedRegressor, RegressionError, Regressor};
use crate::utils::{
    detect_constant_columns, numerical_rank, qr_least_squares, select_columns, sum_of_squares,
};
use faer::{Col, Mat};
use log::debug;
use statrs::distribution::{ContinuousCDF, FisherSnedecor};

/// Ordinary Least Squares regression estimator.
///
/// Solves by Householder QR of the full design matrix (the `const` column is
/// an ordinary column). A design that is not of full column rank is refused
/// with [`RegressionError::RankDeficient`], naming the dependent columns.
///
/// # Example
///
/// ```rust,ignore
/// use dummy_regress::solvers::{OlsRegressor, Regressor, FittedRegressor};
///
/// let fitted = OlsRegressor::builder()
///     .confidence_level(0.95)
///     .build()
///     .fit(&design, &y)?;
///
/// println!("R² = {}", fitted.r_squared());
/// println!("gender_P = {:?}", fitted.result().coefficient("gender_P"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct OlsRegressor {
    options: RegressionOptions,
}

impl OlsRegressor {
    /// Create a new OLS regressor with the given options.
    pub fn new(options: RegressionOptions) -> Self {
        Self { options }
    }

    /// Create a builder for configuring the regressor.
    pub fn builder() -> OlsRegressorBuilder {
        OlsRegressorBuilder::default()
    }

    /// The options this regressor fits with.
    pub fn options(&self) -> &RegressionOptions {
        &self.options
    }

    /// Names of columns that are linear combinations of earlier columns.
    ///
    /// Columns are added left to right; a column that does not raise the
    /// numerical rank of the columns kept so far is reported.
    pub fn aliased_columns(design: &DesignMatrix, tolerance: f64) -> Vec<String> {
        let x = design.matrix();
        let mut kept: Vec<usize> = Vec::with_capacity(x.ncols());
        let mut rank = 0;
        let mut aliased = Vec::new();

        for j in 0..x.ncols() {
            kept.push(j);
            let new_rank = numerical_rank(&select_columns(x, &kept), tolerance);
            if new_rank > rank {
                rank = new_rank;
            } else {
                kept.pop();
                aliased.push(design.names()[j].clone());
            }
        }

        aliased
    }
}

impl Regressor for OlsRegressor {
    type Fitted = FittedOls;

    fn fit(&self, design: &DesignMatrix, y: &Col<f64>) -> Result<Self::Fitted, RegressionError> {
        self.options.validate()?;

        let x = design.matrix();
        let n_samples = x.nrows();
        let n_params = x.ncols();

        // Validate dimensions
        if n_samples != y.nrows() {
            return Err(RegressionError::DimensionMismatch {
                x_rows: n_samples,
                y_len: y.nrows(),
            });
        }

        // Need at least one residual degree of freedom
        if n_params == 0 || n_samples <= n_params {
            return Err(RegressionError::InsufficientObservations {
                needed: n_params + 1,
                got: n_samples,
            });
        }

        let tol = self.options.rank_tolerance;
        let rank = numerical_rank(x, tol);
        if rank < n_params {
            return Err(RegressionError::RankDeficient {
                rank,
                columns: n_params,
                aliased: Self::aliased_columns(design, tol),
            });
        }

        let (coefficients, r) =
            qr_least_squares(x, y, tol).ok_or(RegressionError::SingularMatrix)?;

        let fitted_values = x * &coefficients;
        let residuals = Col::from_fn(n_samples, |i| y[i] - fitted_values[i]);

        if coefficients.iter().any(|b| !b.is_finite()) {
            return Err(RegressionError::NumericalError(
                "non-finite coefficient estimate".to_string(),
            ));
        }

        let has_constant = detect_constant_columns(x, tol)
            .iter()
            .enumerate()
            .any(|(j, &c)| c && x[(0, j)] != 0.0);

        let mut result = RegressionResult::empty(design.names().to_vec(), n_samples);
        result.coefficients = coefficients;
        result.residuals = residuals;
        result.fitted_values = fitted_values;
        result.rank = rank;
        result.n_parameters = n_params;
        result.has_constant = has_constant;
        result.confidence_level = self.options.confidence_level;

        self.compute_statistics(y, &mut result);

        if self.options.compute_inference {
            self.compute_inference(&r, &mut result)?;
        }

        debug!(
            "OLS fit: n = {}, p = {}, R² = {:.4}, F = {:.4}",
            n_samples, n_params, result.r_squared, result.f_statistic
        );

        Ok(FittedOls {
            options: self.options.clone(),
            result,
            encodings: design.encodings().to_vec(),
        })
    }
}

impl OlsRegressor {
    /// Compute fit statistics (R², F, information criteria).
    fn compute_statistics(&self, y: &Col<f64>, result: &mut RegressionResult) {
        let n = result.n_observations as f64;
        let k = result.n_parameters as f64;

        let center = if result.has_constant {
            y.iter().sum::<f64>() / n
        } else {
            0.0
        };
        let tss: f64 = y.iter().map(|&yi| (yi - center).powi(2)).sum();
        let rss = sum_of_squares(&result.residuals);

        // R-squared
        let r_squared = if tss > 0.0 { 1.0 - rss / tss } else { f64::NAN };

        // Adjusted R-squared
        let df_resid = result.residual_df() as f64;
        let k_constant = if result.has_constant { 1.0 } else { 0.0 };
        let adj_r_squared = 1.0 - (n - k_constant) / df_resid * (1.0 - r_squared);

        // MSE and RMSE
        let mse = rss / df_resid;
        let rmse = mse.sqrt();

        // F-statistic
        let df_model = result.model_df() as f64;
        let f_statistic = if df_model > 0.0 && mse > 0.0 {
            ((tss - rss) / df_model) / mse
        } else {
            f64::NAN
        };

        let f_pvalue = if f_statistic.is_finite() {
            FisherSnedecor::new(df_model, df_resid)
                .map_or(f64::NAN, |d| d.sf(f_statistic))
        } else {
            f64::NAN
        };

        // Gaussian log-likelihood with σ² = RSS / n
        let log_likelihood =
            -0.5 * n * ((2.0 * std::f64::consts::PI).ln() + (rss / n).ln() + 1.0);

        result.r_squared = r_squared;
        result.adj_r_squared = adj_r_squared;
        result.mse = mse;
        result.rmse = rmse;
        result.f_statistic = f_statistic;
        result.f_pvalue = f_pvalue;
        result.log_likelihood = log_likelihood;
        result.aic = -2.0 * log_likelihood + 2.0 * k;
        result.bic = -2.0 * log_likelihood + k * n.ln();
    }

    /// Compute inference statistics (standard errors, t-stats, p-values, CIs).
    fn compute_inference(
        &self,
        r: &Mat<f64>,
        result: &mut RegressionResult,
    ) -> Result<(), RegressionError> {
        let df = result.residual_df() as f64;

        let xtx_inv = CoefficientInference::xtx_inverse_from_r(r)?;
        let mse = result.mse;
        let cov = Mat::from_fn(xtx_inv.nrows(), xtx_inv.ncols(), |i, j| mse * xtx_inv[(i, j)]);

        let se = CoefficientInference::standard_errors(&cov);
        let t_stats = CoefficientInference::t_statistics(&result.coefficients, &se);
        let p_vals = CoefficientInference::p_values(&t_stats, df);
        let (ci_lower, ci_upper) = CoefficientInference::confidence_intervals(
            &result.coefficients,
            &se,
            df,
            self.options.confidence_level,
        );

        result.std_errors = Some(se);
        result.t_statistics = Some(t_stats);
        result.p_values = Some(p_vals);
        result.conf_interval_lower = Some(ci_lower);
        result.conf_interval_upper = Some(ci_upper);
        result.cov_params = Some(cov);

        Ok(())
    }
}

/// A fitted OLS regression model.
///
/// Immutable once created; the hypothesis tests below all read from the same
/// stored result.
#[derive(Debug, Clone)]
pub struct FittedOls {
    options: RegressionOptions,
    result: RegressionResult,
    encodings: Vec<CategoricalEncoding>,
}

impl FittedOls {
    /// Get the options used to fit this model.
    pub fn options(&self) -> &RegressionOptions {
        &self.options
    }

    /// Categorical encodings of the design matrix the model was fit on.
    pub fn encodings(&self) -> &[CategoricalEncoding] {
        &self.encodings
    }

    /// Overall F-test that every non-intercept coefficient is zero.
    pub fn overall_f_test(&self, alpha: f64) -> OverallFTest {
        overall_f_test(&self.result, alpha)
    }

    /// t-test of a single linear restriction.
    pub fn t_test(
        &self,
        hypothesis: &LinearHypothesis,
        alpha: f64,
    ) -> Result<TTestResult, HypothesisError> {
        t_test(&self.result, hypothesis, alpha)
    }

    /// Wald F-test of one or more linear restrictions.
    pub fn f_test(
        &self,
        hypothesis: &LinearHypothesis,
        alpha: f64,
    ) -> Result<FTestResult, HypothesisError> {
        f_test(&self.result, hypothesis, alpha)
    }

    /// t-test that the named coefficient is zero.
    ///
    /// Skipped when the coefficient is not part of the model.
    pub fn t_test_coefficient(
        &self,
        name: &str,
        alpha: f64,
    ) -> Result<HypothesisOutcome<TTestResult>, HypothesisError> {
        if self.result.coefficient_index(name).is_none() {
            return Ok(HypothesisOutcome::skipped(format!(
                "coefficient '{name}' is not in the model"
            )));
        }
        self.t_test(&LinearHypothesis::all_zero(&[name]), alpha)
            .map(HypothesisOutcome::Tested)
    }

    /// Joint F-test that every named coefficient is zero.
    ///
    /// Skipped when the list is empty or names a coefficient the model lacks.
    pub fn f_test_coefficients(
        &self,
        names: &[&str],
        alpha: f64,
    ) -> Result<HypothesisOutcome<FTestResult>, HypothesisError> {
        if names.is_empty() {
            return Ok(HypothesisOutcome::skipped("no coefficients to test"));
        }
        let missing: Vec<&str> = names
            .iter()
            .copied()
            .filter(|n| self.result.coefficient_index(n).is_none())
            .collect();
        if !missing.is_empty() {
            return Ok(HypothesisOutcome::skipped(format!(
                "coefficients not in the model: {}",
                missing.join(", ")
            )));
        }
        self.f_test(&LinearHypothesis::all_zero(names), alpha)
            .map(HypothesisOutcome::Tested)
    }

    /// Joint F-test over every coefficient whose name starts with `prefix`.
    pub fn f_test_prefix(
        &self,
        prefix: &str,
        alpha: f64,
    ) -> Result<HypothesisOutcome<FTestResult>, HypothesisError> {
        let names: Vec<&str> = self
            .result
            .names
            .iter()
            .filter(|n| n.starts_with(prefix))
            .map(String::as_str)
            .collect();
        if names.is_empty() {
            return Ok(HypothesisOutcome::skipped(format!(
                "no coefficients start with '{prefix}'"
            )));
        }
        self.f_test_coefficients(&names, alpha)
    }

    /// Joint F-test over all indicators of the categorical variable read from `column`.
    pub fn f_test_variable(
        &self,
        column: &str,
        alpha: f64,
    ) -> Result<HypothesisOutcome<FTestResult>, HypothesisError> {
        let Some(encoding) = self.encodings.iter().find(|e| e.column == column) else {
            return Ok(HypothesisOutcome::skipped(format!(
                "'{column}' is not a categorical predictor of the model"
            )));
        };
        if encoding.indicators.is_empty() {
            return Ok(HypothesisOutcome::skipped(format!(
                "'{column}' has a single level and no indicator columns"
            )));
        }
        let names: Vec<&str> = encoding.indicators.iter().map(String::as_str).collect();
        self.f_test_coefficients(&names, alpha)
    }
}

impl FittedRegressor for FittedOls {
    fn result(&self) -> &RegressionResult {
        &self.result
    }
}

/// Builder for `OlsRegressor`.
#[derive(Debug, Clone, Default)]
pub struct OlsRegressorBuilder {
    builder: RegressionOptionsBuilder,
}

impl OlsRegressorBuilder {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether to compute inference statistics.
    pub fn compute_inference(mut self, compute: bool) -> Self {
        self.builder = self.builder.compute_inference(compute);
        self
    }

    /// Set the confidence level for confidence intervals.
    pub fn confidence_level(mut self, level: f64) -> Self {
        self.builder = self.builder.confidence_level(level);
        self
    }

    /// Set the rank tolerance for QR decomposition.
    pub fn rank_tolerance(mut self, tol: f64) -> Self {
        self.builder = self.builder.rank_tolerance(tol);
        self
    }

    /// Build the OLS regressor.
    ///
    /// Options are validated when the model is fit.
    pub fn build(self) -> OlsRegressor {
        OlsRegressor::new(self.builder.build_unchecked())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_design(n: usize) -> DesignMatrix {
        let x = Mat::from_fn(n, 1, |i, _| i as f64);
        DesignMatrix::with_intercept(vec!["x".into()], x).unwrap()
    }

    #[test]
    fn test_simple_fit() {
        let design = line_design(5);
        let y = Col::from_fn(5, |i| 2.0 + 3.0 * i as f64 + if i % 2 == 0 { 0.1 } else { -0.1 });

        let fitted = OlsRegressor::default().fit(&design, &y).expect("model should fit");

        assert!((fitted.result().coefficient("x").unwrap() - 3.0).abs() < 0.1);
        assert!((fitted.result().coefficient("const").unwrap() - 2.0).abs() < 0.2);
        assert!(fitted.result().has_constant);
        assert_eq!(fitted.result().residual_df(), 3);
    }

    #[test]
    fn test_predict() {
        let design = line_design(5);
        let y = Col::from_fn(5, |i| 2.0 + 3.0 * i as f64 + if i == 2 { 0.5 } else { 0.0 });

        let fitted = OlsRegressor::default().fit(&design, &y).expect("model should fit");

        let x_new = Mat::from_fn(2, 2, |i, j| if j == 0 { 1.0 } else { (i + 10) as f64 });
        let preds = fitted.predict(&x_new);
        let b = fitted.coefficients();

        assert!((preds[0] - (b[0] + 10.0 * b[1])).abs() < 1e-10);
        assert!((preds[1] - (b[0] + 11.0 * b[1])).abs() < 1e-10);
    }

    #[test]
    fn test_dimension_mismatch() {
        let result = OlsRegressor::default().fit(&line_design(5), &Col::zeros(4));
        assert!(matches!(
            result,
            Err(RegressionError::DimensionMismatch { x_rows: 5, y_len: 4 })
        ));
    }

    #[test]
    fn test_no_residual_degrees_of_freedom() {
        let result = OlsRegressor::default().fit(&line_design(2), &Col::zeros(2));
        assert!(matches!(
            result,
            Err(RegressionError::InsufficientObservations { needed: 3, got: 2 })
        ));
    }

    #[test]
    fn test_rank_deficient_names_aliased_column() {
        let x = Mat::from_fn(6, 3, |i, j| match j {
            0 => (i % 2) as f64,
            1 => 1.0 - (i % 2) as f64,
            _ => i as f64,
        });
        let design =
            DesignMatrix::with_intercept(vec!["g_A".into(), "g_B".into(), "x".into()], x).unwrap();
        let y = Col::from_fn(6, |i| i as f64);

        match OlsRegressor::default().fit(&design, &y) {
            Err(RegressionError::RankDeficient {
                rank,
                columns,
                aliased,
            }) => {
                assert_eq!(rank, 3);
                assert_eq!(columns, 4);
                assert_eq!(aliased, vec!["g_B".to_string()]);
            }
            other => panic!("expected RankDeficient, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_options_rejected_at_fit() {
        let model = OlsRegressor::builder().confidence_level(1.5).build();
        let y = Col::from_fn(5, |i| i as f64);
        assert!(matches!(
            model.fit(&line_design(5), &y),
            Err(RegressionError::InvalidOptions(_))
        ));
    }

    #[test]
    fn test_without_inference() {
        let y = Col::from_fn(6, |i| (i * i) as f64);
        let fitted = OlsRegressor::builder()
            .compute_inference(false)
            .build()
            .fit(&line_design(6), &y)
            .unwrap();
        assert!(fitted.result().std_errors.is_none());
        assert!(fitted.result().cov_params.is_none());
        assert!(fitted.result().f_statistic.is_finite());
    }
}
