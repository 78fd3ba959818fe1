//! Core traits for regression estimators.

use crate::core::{OptionsError, RegressionResult};
use crate::design::DesignMatrix;
use faer::{Col, Mat};
use thiserror::Error;

/// Errors that can occur during regression fitting.
#[derive(Debug, Error)]
pub enum RegressionError {
    #[error("dimension mismatch: X has {x_rows} rows but y has {y_len} elements")]
    DimensionMismatch { x_rows: usize, y_len: usize },

    #[error("insufficient observations: need at least {needed}, got {got}")]
    InsufficientObservations { needed: usize, got: usize },

    #[error(
        "design matrix is rank deficient (rank {rank} of {columns} columns); \
         linearly dependent columns: {aliased:?}"
    )]
    RankDeficient {
        rank: usize,
        columns: usize,
        aliased: Vec<String>,
    },

    #[error("matrix is singular or nearly singular")]
    SingularMatrix,

    #[error("invalid options: {0}")]
    InvalidOptions(#[from] OptionsError),

    #[error("numerical error: {0}")]
    NumericalError(String),
}

/// A regression estimator that can be fit to a named design matrix.
///
/// Fitting returns a separate, immutable fitted model.
pub trait Regressor {
    /// The type of the fitted model.
    type Fitted: FittedRegressor;

    /// Fit the model to the data.
    ///
    /// # Arguments
    /// * `design` - Design matrix of shape (n_samples, n_columns), intercept included
    /// * `y` - Target vector of length n_samples
    fn fit(&self, design: &DesignMatrix, y: &Col<f64>) -> Result<Self::Fitted, RegressionError>;
}

/// A fitted regression model.
pub trait FittedRegressor {
    /// Access the regression results (coefficients, statistics, etc.).
    fn result(&self) -> &RegressionResult;

    /// Make predictions for rows laid out like the training design matrix.
    fn predict(&self, x: &Mat<f64>) -> Col<f64> {
        let coefficients = &self.result().coefficients;
        let n_features = coefficients.nrows().min(x.ncols());
        Col::from_fn(x.nrows(), |i| {
            (0..n_features).map(|j| x[(i, j)] * coefficients[j]).sum()
        })
    }

    /// Get the coefficients (convenience method).
    fn coefficients(&self) -> &Col<f64> {
        &self.result().coefficients
    }

    /// Coefficient names (convenience method).
    fn names(&self) -> &[String] {
        &self.result().names
    }

    /// Get R² (convenience method).
    fn r_squared(&self) -> f64 {
        self.result().r_squared
    }
}
