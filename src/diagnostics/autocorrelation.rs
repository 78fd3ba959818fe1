//! Durbin-Watson statistic for first-order residual autocorrelation.

use super::DiagnosticError;
use faer::Col;
use std::fmt;

/// Rule-of-thumb reading of a Durbin-Watson statistic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutocorrelationReading {
    /// DW below 1.5.
    Positive,
    /// DW within [1.5, 2.5].
    None,
    /// DW above 2.5.
    Negative,
}

impl AutocorrelationReading {
    pub fn from_statistic(dw: f64) -> Self {
        if dw < 1.5 {
            AutocorrelationReading::Positive
        } else if dw > 2.5 {
            AutocorrelationReading::Negative
        } else {
            AutocorrelationReading::None
        }
    }
}

impl fmt::Display for AutocorrelationReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AutocorrelationReading::Positive => f.write_str("positive autocorrelation"),
            AutocorrelationReading::None => f.write_str("no autocorrelation"),
            AutocorrelationReading::Negative => f.write_str("negative autocorrelation"),
        }
    }
}

/// Durbin-Watson result.
#[derive(Debug, Clone, PartialEq)]
pub struct DurbinWatson {
    /// Σ(e_t − e_{t−1})² / Σe_t², in [0, 4].
    pub statistic: f64,
    /// Implied first-order autocorrelation 1 − DW/2.
    pub autocorrelation: f64,
    pub reading: AutocorrelationReading,
}

/// Durbin-Watson statistic over residuals in observation order.
pub fn durbin_watson(residuals: &Col<f64>) -> Result<DurbinWatson, DiagnosticError> {
    let n = residuals.nrows();
    if n < 2 {
        return Err(DiagnosticError::TooFewObservations { needed: 2, got: n });
    }

    let ss: f64 = residuals.iter().map(|e| e * e).sum();
    if ss <= 0.0 {
        return Err(DiagnosticError::ZeroVariance);
    }

    let diff_ss: f64 = (1..n)
        .map(|t| (residuals[t] - residuals[t - 1]).powi(2))
        .sum();
    let statistic = diff_ss / ss;

    Ok(DurbinWatson {
        statistic,
        autocorrelation: 1.0 - statistic / 2.0,
        reading: AutocorrelationReading::from_statistic(statistic),
    })
}
