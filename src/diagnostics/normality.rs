//! Jarque-Bera test of residual normality.

use super::DiagnosticError;
use crate::core::Decision;
use faer::Col;
use statrs::distribution::{ChiSquared, ContinuousCDF};

/// Result of the Jarque-Bera test.
#[derive(Debug, Clone, PartialEq)]
pub struct JarqueBera {
    pub n_observations: usize,
    /// JB = n/6 · (S² + (K − 3)²/4).
    pub statistic: f64,
    /// P-value from χ²(2).
    pub p_value: f64,
    /// Sample skewness S = m3 / m2^{3/2}.
    pub skewness: f64,
    /// Sample kurtosis K = m4 / m2² (3 for a normal distribution).
    pub kurtosis: f64,
    pub alpha: f64,
    /// `FailToReject` means the residuals are consistent with normality.
    pub decision: Decision,
}

impl JarqueBera {
    /// Excess kurtosis K − 3.
    pub fn excess_kurtosis(&self) -> f64 {
        self.kurtosis - 3.0
    }
}

/// Central moments m2, m3, m4 (divided by n).
fn central_moments(values: &Col<f64>) -> (f64, f64, f64) {
    let n = values.nrows() as f64;
    let mean = values.iter().sum::<f64>() / n;

    let (m2, m3, m4) = values.iter().fold((0.0, 0.0, 0.0), |(a, b, c), &v| {
        let d = v - mean;
        let d2 = d * d;
        (a + d2, b + d2 * d, c + d2 * d2)
    });

    (m2 / n, m3 / n, m4 / n)
}

/// Jarque-Bera test on a residual vector.
///
/// Needs at least 3 values with nonzero variance.
pub fn jarque_bera(residuals: &Col<f64>, alpha: f64) -> Result<JarqueBera, DiagnosticError> {
    let n = residuals.nrows();
    if n < 3 {
        return Err(DiagnosticError::TooFewObservations { needed: 3, got: n });
    }

    let (m2, m3, m4) = central_moments(residuals);
    if m2 <= 0.0 {
        return Err(DiagnosticError::ZeroVariance);
    }

    let skewness = m3 / m2.powf(1.5);
    let kurtosis = m4 / (m2 * m2);
    let statistic =
        n as f64 / 6.0 * (skewness * skewness + (kurtosis - 3.0).powi(2) / 4.0);

    let p_value = ChiSquared::new(2.0).map_or(f64::NAN, |d| d.sf(statistic));

    Ok(JarqueBera {
        n_observations: n,
        statistic,
        p_value,
        skewness,
        kurtosis,
        alpha,
        decision: Decision::for_assumption(p_value, alpha),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_symmetric_sample_has_zero_skew() {
        let e = Col::from_fn(5, |i| [-2.0, -1.0, 0.0, 1.0, 2.0][i]);
        let jb = jarque_bera(&e, 0.05).unwrap();

        assert_relative_eq!(jb.skewness, 0.0, epsilon = 1e-12);
        // m2 = 2, m4 = 6.8 -> K = 1.7
        assert_relative_eq!(jb.kurtosis, 1.7, epsilon = 1e-12);
        assert_relative_eq!(jb.statistic, 5.0 / 6.0 * (1.3f64.powi(2) / 4.0), epsilon = 1e-12);
        assert_eq!(jb.decision, Decision::FailToReject);
    }

    #[test]
    fn test_chi_squared_two_tail() {
        // χ²(2) survival is exp(-x/2)
        let e = Col::from_fn(6, |i| [0.0, 0.0, 0.0, 0.0, 0.0, 10.0][i]);
        let jb = jarque_bera(&e, 0.05).unwrap();
        assert_relative_eq!(jb.p_value, (-jb.statistic / 2.0).exp(), epsilon = 1e-10);
        assert!(jb.skewness > 0.0);
    }

    #[test]
    fn test_degenerate_inputs() {
        assert!(matches!(
            jarque_bera(&Col::zeros(2), 0.05),
            Err(DiagnosticError::TooFewObservations { needed: 3, got: 2 })
        ));
        assert!(matches!(
            jarque_bera(&Col::from_fn(4, |_| 1.5), 0.05),
            Err(DiagnosticError::ZeroVariance)
        ));
    }
}
