//! OLS regression with dummy-coded categorical predictors.
//!
//! This library fits ordinary least squares models whose design matrix mixes
//! numeric predictors with indicator columns for categorical ones, and reports
//! full statistical inference (standard errors, t-statistics, p-values,
//! confidence intervals), classical-assumption diagnostics and linear
//! hypothesis tests.
//!
//! # Example
//!
//! ```rust,ignore
//! use dummy_regress::prelude::*;
//!
//! let model = PreparedModel::from_path("data/gaji_dummy.csv", AnalysisSchema::salary())?;
//! let result = model.fitted.result();
//! println!("R² = {}", result.r_squared);
//!
//! // Joint test of the education indicators
//! let edu = model.fitted.f_test_prefix("edu_", 0.05)?;
//!
//! // Assumption checks
//! let checks = model.assumptions()?;
//! println!("Durbin-Watson = {:.3}", checks.autocorrelation.statistic);
//! ```

pub mod analysis;
pub mod core;
pub mod data;
pub mod design;
pub mod diagnostics;
pub mod error;
pub mod inference;
pub mod report;
pub mod solvers;
pub mod utils;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::analysis::PreparedModel;
    pub use crate::core::{
        AnalysisSchema, Decision, RegressionOptions, RegressionOptionsBuilder, RegressionResult,
        DEFAULT_ALPHA,
    };
    pub use crate::data::{clean, clean_for_schema, load_csv, CleaningReport, ObservationTable};
    pub use crate::design::{CategoricalSpec, DesignBuilder, DesignMatrix, ReferenceLevel};
    pub use crate::diagnostics::{
        breusch_pagan, durbin_watson, jarque_bera, variance_inflation_factor, AssumptionReport,
    };
    pub use crate::inference::{HypothesisOutcome, LinearHypothesis};
    pub use crate::report::{AssumptionsReport, BasicReport, HypothesisReport};
    pub use crate::solvers::{FittedOls, FittedRegressor, OlsRegressor, Regressor};
}

pub use crate::analysis::PreparedModel;
pub use crate::core::{AnalysisSchema, RegressionOptions, RegressionResult};
pub use crate::error::{Error, Result};
pub use crate::solvers::{FittedOls, FittedRegressor, OlsRegressor, Regressor};
