//! Regression options and configuration.

use thiserror::Error;

/// Configuration options for the OLS fitter.
#[derive(Debug, Clone)]
pub struct RegressionOptions {
    /// Whether to compute standard errors and inference statistics (default: true).
    pub compute_inference: bool,
    /// Confidence level for confidence intervals (default: 0.95).
    pub confidence_level: f64,
    /// Relative tolerance on the QR diagonal used for rank determination.
    pub rank_tolerance: f64,
}

impl Default for RegressionOptions {
    fn default() -> Self {
        Self {
            compute_inference: true,
            confidence_level: 0.95,
            rank_tolerance: 1e-10,
        }
    }
}

/// Errors that can occur when validating options or an analysis schema.
#[derive(Debug, Error)]
pub enum OptionsError {
    #[error("confidence_level must be in (0, 1), got {0}")]
    InvalidConfidenceLevel(f64),
    #[error("rank_tolerance must be positive, got {0}")]
    InvalidTolerance(f64),
    #[error("significance level must be in (0, 1), got {0}")]
    InvalidSignificanceLevel(f64),
    #[error("column '{0}' is declared more than once in the schema")]
    DuplicateColumn(String),
    #[error("schema has no predictors")]
    NoPredictors,
}

impl RegressionOptions {
    /// Create a new builder for regression options.
    pub fn builder() -> RegressionOptionsBuilder {
        RegressionOptionsBuilder::default()
    }

    /// Validate the options and return an error if invalid.
    pub fn validate(&self) -> Result<(), OptionsError> {
        if self.confidence_level <= 0.0 || self.confidence_level >= 1.0 {
            return Err(OptionsError::InvalidConfidenceLevel(self.confidence_level));
        }
        if self.rank_tolerance <= 0.0 || !self.rank_tolerance.is_finite() {
            return Err(OptionsError::InvalidTolerance(self.rank_tolerance));
        }
        Ok(())
    }
}

/// Builder for `RegressionOptions`.
#[derive(Debug, Clone, Default)]
pub struct RegressionOptionsBuilder {
    options: RegressionOptions,
}

impl RegressionOptionsBuilder {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether to compute inference statistics.
    pub fn compute_inference(mut self, compute: bool) -> Self {
        self.options.compute_inference = compute;
        self
    }

    /// Set the confidence level for confidence intervals.
    pub fn confidence_level(mut self, level: f64) -> Self {
        self.options.confidence_level = level;
        self
    }

    /// Set the rank tolerance for QR decomposition.
    pub fn rank_tolerance(mut self, tol: f64) -> Self {
        self.options.rank_tolerance = tol;
        self
    }

    /// Build and validate the options.
    pub fn build(self) -> Result<RegressionOptions, OptionsError> {
        self.options.validate()?;
        Ok(self.options)
    }

    /// Build the options without validation.
    pub fn build_unchecked(self) -> RegressionOptions {
        self.options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let opts = RegressionOptions::default();
        assert!(opts.compute_inference);
        assert!((opts.confidence_level - 0.95).abs() < 1e-10);
        assert!(opts.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let opts = RegressionOptions::builder()
            .compute_inference(false)
            .confidence_level(0.9)
            .build()
            .unwrap();

        assert!(!opts.compute_inference);
        assert!((opts.confidence_level - 0.9).abs() < 1e-10);
    }

    #[test]
    fn test_validation_invalid_confidence_level() {
        let zero = RegressionOptions::builder().confidence_level(0.0).build();
        let one = RegressionOptions::builder().confidence_level(1.0).build();
        assert!(matches!(zero, Err(OptionsError::InvalidConfidenceLevel(_))));
        assert!(matches!(one, Err(OptionsError::InvalidConfidenceLevel(_))));
    }

    #[test]
    fn test_validation_invalid_tolerance() {
        let result = RegressionOptions::builder().rank_tolerance(0.0).build();
        assert!(matches!(result, Err(OptionsError::InvalidTolerance(_))));
    }

    #[test]
    fn test_build_unchecked_skips_validation() {
        let opts = RegressionOptions::builder()
            .confidence_level(2.0)
            .build_unchecked();
        assert!((opts.confidence_level - 2.0).abs() < 1e-14);
    }
}
