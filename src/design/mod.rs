//! Design-matrix construction with dummy-coded categorical predictors.
//!
//! Levels of each categorical variable are sorted lexicographically; the
//! first one is the reference level unless another is named explicitly. The
//! resulting columns are `const`, the numeric predictors, then
//! `<prefix>_<level>` indicators for every non-reference level.

mod builder;
mod matrix;

pub use builder::{encode_levels, CategoricalSpec, DesignBuilder, ReferenceLevel};
pub use matrix::{indicator_name, CategoricalEncoding, DesignMatrix, INTERCEPT};

use crate::data::DataError;
use thiserror::Error;

/// Errors raised while building a design matrix.
#[derive(Debug, Error)]
pub enum DesignError {
    #[error(transparent)]
    Data(#[from] DataError),

    #[error("reference level '{level}' does not occur in column '{column}' (levels: {levels:?})")]
    UnknownLevel {
        column: String,
        level: String,
        levels: Vec<String>,
    },

    #[error("design column '{0}' would appear twice")]
    DuplicateColumn(String),

    #[error("{names} column names given for {columns} matrix columns")]
    DimensionMismatch { names: usize, columns: usize },

    #[error("column '{0}' still contains missing values; clean the table first")]
    MissingValues(String),

    #[error("cannot build a design matrix from an empty table")]
    NoRows,
}
