//! Regression result structures.

use faer::{Col, Mat};

/// Complete result from an OLS fit.
///
/// Holds one coefficient per design-matrix column (the intercept is the
/// `const` column, not a separate field), the fit statistics, and, when
/// inference was requested, standard errors, t-statistics, p-values,
/// confidence intervals and the coefficient covariance matrix.
#[derive(Debug, Clone)]
pub struct RegressionResult {
    // ========== Core Results ==========
    /// Design-matrix column names, one per coefficient.
    pub names: Vec<String>,

    /// Estimated coefficients, aligned with `names`.
    pub coefficients: Col<f64>,

    /// Residuals (y - fitted_values), in observation order.
    pub residuals: Col<f64>,

    /// Fitted values (predictions on training data).
    pub fitted_values: Col<f64>,

    // ========== Rank Information ==========
    /// Numerical rank of the design matrix.
    pub rank: usize,

    /// Number of parameters (design-matrix columns, including `const`).
    pub n_parameters: usize,

    /// Number of observations.
    pub n_observations: usize,

    /// Whether the design matrix contains a constant column.
    pub has_constant: bool,

    // ========== Fit Statistics ==========
    /// Coefficient of determination (R²), centred when `has_constant`.
    pub r_squared: f64,

    /// Adjusted R².
    pub adj_r_squared: f64,

    /// Root mean squared error.
    pub rmse: f64,

    /// Residual variance estimate RSS / (n - p).
    pub mse: f64,

    /// F-statistic for overall model significance.
    pub f_statistic: f64,

    /// P-value for F-statistic.
    pub f_pvalue: f64,

    // ========== Information Criteria ==========
    /// Akaike Information Criterion.
    pub aic: f64,

    /// Bayesian Information Criterion.
    pub bic: f64,

    /// Gaussian log-likelihood at the estimate.
    pub log_likelihood: f64,

    // ========== Inference Statistics (Optional) ==========
    /// Standard errors of coefficients.
    pub std_errors: Option<Col<f64>>,

    /// t-statistics for coefficients.
    pub t_statistics: Option<Col<f64>>,

    /// P-values for coefficient significance tests.
    pub p_values: Option<Col<f64>>,

    /// Lower bounds of confidence intervals.
    pub conf_interval_lower: Option<Col<f64>>,

    /// Upper bounds of confidence intervals.
    pub conf_interval_upper: Option<Col<f64>>,

    /// Coefficient covariance matrix σ²(X'X)⁻¹.
    pub cov_params: Option<Mat<f64>>,

    /// Confidence level used for intervals.
    pub confidence_level: f64,
}

/// One row of the coefficient table.
#[derive(Debug, Clone, PartialEq)]
pub struct CoefficientSummary {
    pub name: String,
    pub estimate: f64,
    pub std_error: f64,
    pub t_statistic: f64,
    pub p_value: f64,
    pub ci_lower: f64,
    pub ci_upper: f64,
}

impl RegressionResult {
    /// Create a new empty result (used internally by the solver).
    pub(crate) fn empty(names: Vec<String>, n_observations: usize) -> Self {
        let n_features = names.len();
        Self {
            names,
            coefficients: Col::zeros(n_features),
            residuals: Col::zeros(n_observations),
            fitted_values: Col::zeros(n_observations),
            rank: 0,
            n_parameters: n_features,
            n_observations,
            has_constant: false,
            r_squared: 0.0,
            adj_r_squared: 0.0,
            rmse: 0.0,
            mse: 0.0,
            f_statistic: 0.0,
            f_pvalue: 1.0,
            aic: 0.0,
            bic: 0.0,
            log_likelihood: 0.0,
            std_errors: None,
            t_statistics: None,
            p_values: None,
            conf_interval_lower: None,
            conf_interval_upper: None,
            cov_params: None,
            confidence_level: 0.95,
        }
    }

    /// Residual degrees of freedom (n - p).
    pub fn residual_df(&self) -> usize {
        self.n_observations.saturating_sub(self.n_parameters)
    }

    /// Model degrees of freedom (p - 1 with a constant column, else p).
    pub fn model_df(&self) -> usize {
        if self.has_constant {
            self.n_parameters.saturating_sub(1)
        } else {
            self.n_parameters
        }
    }

    /// Position of a named coefficient.
    pub fn coefficient_index(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Estimate of a named coefficient.
    pub fn coefficient(&self, name: &str) -> Option<f64> {
        self.coefficient_index(name).map(|j| self.coefficients[j])
    }

    /// Full row of the coefficient table for a named coefficient.
    ///
    /// Inference columns are NaN when inference was not computed.
    pub fn summary_row(&self, name: &str) -> Option<CoefficientSummary> {
        self.coefficient_index(name).map(|j| self.row(j))
    }

    /// The coefficient table in design-matrix order.
    pub fn coefficient_table(&self) -> Vec<CoefficientSummary> {
        (0..self.names.len()).map(|j| self.row(j)).collect()
    }

    fn row(&self, j: usize) -> CoefficientSummary {
        let pick = |v: &Option<Col<f64>>| v.as_ref().map_or(f64::NAN, |c| c[j]);
        CoefficientSummary {
            name: self.names[j].clone(),
            estimate: self.coefficients[j],
            std_error: pick(&self.std_errors),
            t_statistic: pick(&self.t_statistics),
            p_value: pick(&self.p_values),
            ci_lower: pick(&self.conf_interval_lower),
            ci_upper: pick(&self.conf_interval_upper),
        }
    }

    /// Total sum of squares, centred when the model has a constant.
    pub fn tss(&self) -> f64 {
        let n = self.n_observations as f64;
        let y: Vec<f64> = self
            .residuals
            .iter()
            .zip(self.fitted_values.iter())
            .map(|(&r, &f)| f + r)
            .collect();

        let center = if self.has_constant {
            y.iter().sum::<f64>() / n
        } else {
            0.0
        };
        y.iter().map(|&yi| (yi - center).powi(2)).sum()
    }

    /// Residual sum of squares (RSS).
    pub fn rss(&self) -> f64 {
        self.residuals.iter().map(|&r| r.powi(2)).sum()
    }

    /// Explained sum of squares (ESS = TSS - RSS).
    pub fn ess(&self) -> f64 {
        self.tss() - self.rss()
    }
}
