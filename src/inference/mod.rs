//! Statistical inference (standard errors, p-values, confidence intervals,
//! hypothesis tests).

mod coefficient;
mod hypothesis;

pub use coefficient::CoefficientInference;
pub use hypothesis::{
    f_test, overall_f_test, t_test, FTestResult, HypothesisError, HypothesisOutcome,
    LinearHypothesis, OverallFTest, Restriction, TTestResult,
};
