//! Accept/reject decisions for hypothesis tests.

use std::fmt;

/// Default significance level used throughout the reports.
pub const DEFAULT_ALPHA: f64 = 0.05;

/// Outcome of comparing a p-value against a significance level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// The null hypothesis is rejected.
    Reject,
    /// The data do not contradict the null hypothesis.
    FailToReject,
    /// The p-value is not a number, so no decision can be made.
    Undetermined,
}

impl Decision {
    /// Decision rule for assumption checks (normality, homoskedasticity).
    ///
    /// The assumption is retained only when `p_value > alpha`.
    pub fn for_assumption(p_value: f64, alpha: f64) -> Self {
        if p_value.is_nan() {
            Decision::Undetermined
        } else if p_value > alpha {
            Decision::FailToReject
        } else {
            Decision::Reject
        }
    }

    /// Decision rule for significance tests (F-tests, t-tests).
    ///
    /// The null is rejected only when `p_value < alpha`.
    pub fn for_significance(p_value: f64, alpha: f64) -> Self {
        if p_value.is_nan() {
            Decision::Undetermined
        } else if p_value < alpha {
            Decision::Reject
        } else {
            Decision::FailToReject
        }
    }

    /// Whether the null hypothesis was rejected.
    pub fn is_reject(self) -> bool {
        self == Decision::Reject
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Reject => f.write_str("reject H0"),
            Decision::FailToReject => f.write_str("fail to reject H0"),
            Decision::Undetermined => f.write_str("undetermined (p-value unavailable)"),
        }
    }
}
