//! Core types for regression analysis.

mod decision;
mod options;
mod result;
mod schema;

pub use decision::{Decision, DEFAULT_ALPHA};
pub use options::{OptionsError, RegressionOptions, RegressionOptionsBuilder};
pub use result::{CoefficientSummary, RegressionResult};
pub use schema::{AnalysisSchema, AnalysisSchemaBuilder};
