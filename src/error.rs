//! Crate-level error type.

use crate::core::OptionsError;
use crate::data::DataError;
use crate::design::DesignError;
use crate::diagnostics::DiagnosticError;
use crate::inference::HypothesisError;
use crate::solvers::RegressionError;
use thiserror::Error;

/// Any failure of the analysis pipeline.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Design(#[from] DesignError),

    #[error("model fitting failed: {0}")]
    Regression(#[from] RegressionError),

    #[error("invalid configuration: {0}")]
    Options(#[from] OptionsError),

    #[error("hypothesis test failed: {0}")]
    Hypothesis(#[from] HypothesisError),

    #[error("diagnostic failed: {0}")]
    Diagnostic(#[from] DiagnosticError),
}

pub type Result<T> = std::result::Result<T, Error>;
