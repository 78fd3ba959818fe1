//! Variance Inflation Factor (VIF) for multicollinearity detection.

use super::DiagnosticError;
use crate::design::DesignMatrix;
use crate::solvers::{FittedRegressor, OlsRegressor, RegressionError, Regressor};
use crate::utils::{column, select_columns, sum_of_squares};
use std::fmt;

/// Interpretation band of a VIF value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum VifBand {
    /// Below 1.5: essentially uncorrelated with the other predictors.
    None,
    /// 1.5 to 5.
    Acceptable,
    /// Above 5 up to 10.
    Moderate,
    /// Above 10, or infinite.
    Severe,
}

impl VifBand {
    pub fn from_vif(vif: f64) -> Self {
        if vif < 1.5 {
            VifBand::None
        } else if vif <= 5.0 {
            VifBand::Acceptable
        } else if vif <= 10.0 {
            VifBand::Moderate
        } else {
            VifBand::Severe
        }
    }
}

impl fmt::Display for VifBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VifBand::None => f.write_str("no multicollinearity"),
            VifBand::Acceptable => f.write_str("acceptable"),
            VifBand::Moderate => f.write_str("moderate multicollinearity"),
            VifBand::Severe => f.write_str("severe multicollinearity"),
        }
    }
}

/// VIF of one design column.
#[derive(Debug, Clone, PartialEq)]
pub struct VifEntry {
    pub name: String,
    pub vif: f64,
    pub band: VifBand,
}

/// How the auxiliary regression behind each VIF is set up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VifMethod {
    /// Regress x_j on the other predictors with no constant and use the
    /// uncentred R², so VIF_j = Σx_j² / RSS_j. This is the convention of
    /// the common statistics packages and the one the reports print.
    #[default]
    Uncentered,
    /// Add an intercept to the auxiliary regression and use the centred R².
    Centered,
}

/// Compute the Variance Inflation Factor for each non-intercept column.
///
/// For column j:
///
/// VIF_j = 1 / (1 - R²_j)
///
/// where R²_j comes from regressing x_j on all other non-intercept columns
/// with no constant. See [`variance_inflation_factor_with`] for the centred
/// variant.
///
/// # Interpretation
/// - VIF = 1: No correlation with other predictors
/// - VIF > 5: Moderate multicollinearity
/// - VIF > 10: Severe multicollinearity
///
/// A lone predictor gets 1. A column that is an exact linear combination of
/// the others gets `f64::INFINITY`.
pub fn variance_inflation_factor(design: &DesignMatrix) -> Result<Vec<VifEntry>, DiagnosticError> {
    variance_inflation_factor_with(design, VifMethod::Uncentered)
}

/// [`variance_inflation_factor`] with an explicit auxiliary regression setup.
pub fn variance_inflation_factor_with(
    design: &DesignMatrix,
    method: VifMethod,
) -> Result<Vec<VifEntry>, DiagnosticError> {
    let predictors: Vec<usize> = (0..design.ncols())
        .filter(|&j| Some(j) != design.intercept_index())
        .collect();

    let entry = |j: usize, vif: f64| VifEntry {
        name: design.names()[j].clone(),
        vif,
        band: VifBand::from_vif(vif),
    };

    if predictors.len() < 2 {
        return Ok(predictors.iter().map(|&j| entry(j, 1.0)).collect());
    }

    let x = design.matrix();
    let model = OlsRegressor::builder().compute_inference(false).build();
    let mut vif = Vec::with_capacity(predictors.len());

    for &j in &predictors {
        // Build design matrix with all predictors except j
        let others: Vec<usize> = predictors.iter().copied().filter(|&k| k != j).collect();
        let other_names = others.iter().map(|&k| design.names()[k].clone()).collect();
        let other_columns = select_columns(x, &others);
        let aux_design = match method {
            VifMethod::Uncentered => DesignMatrix::new(other_names, other_columns)?,
            VifMethod::Centered => DesignMatrix::with_intercept(other_names, other_columns)?,
        };

        // Response is predictor j
        let y_j = column(x, j);

        let vif_j = match model.fit(&aux_design, &y_j) {
            Ok(fitted) => {
                // 1 - R², uncentred or centred
                let unexplained = match method {
                    VifMethod::Uncentered => {
                        let total = sum_of_squares(&y_j);
                        if total > 0.0 {
                            sum_of_squares(&fitted.result().residuals) / total
                        } else {
                            0.0
                        }
                    }
                    VifMethod::Centered => 1.0 - fitted.r_squared(),
                };
                if unexplained > 1e-14 {
                    (1.0 / unexplained).max(1.0)
                } else {
                    f64::INFINITY
                }
            }
            // The other columns are themselves collinear
            Err(RegressionError::RankDeficient { .. }) => f64::INFINITY,
            Err(e) => return Err(e.into()),
        };
        vif.push(entry(j, vif_j));
    }

    Ok(vif)
}

/// Identify predictors with VIF above `threshold` (commonly 5 or 10).
pub fn high_vif_predictors(vif: &[VifEntry], threshold: f64) -> Vec<&str> {
    vif.iter()
        .filter(|e| e.vif > threshold)
        .map(|e| e.name.as_str())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use faer::Mat;

    fn design(names: &[&str], x: Mat<f64>) -> DesignMatrix {
        DesignMatrix::with_intercept(names.iter().map(|s| s.to_string()).collect(), x).unwrap()
    }

    #[test]
    fn test_vif_orthogonal_predictors() {
        // Balanced 2x2 layout: centred columns are exactly orthogonal
        let x = Mat::from_fn(8, 2, |i, j| if j == 0 { (i % 2) as f64 } else { ((i / 2) % 2) as f64 });
        let vif =
            variance_inflation_factor_with(&design(&["a", "b"], x), VifMethod::Centered).unwrap();

        assert_eq!(vif.len(), 2);
        for e in &vif {
            assert!((e.vif - 1.0).abs() < 1e-10, "{} = {}", e.name, e.vif);
            assert_eq!(e.band, VifBand::None);
        }
    }

    #[test]
    fn test_uncentered_vif_sees_shared_mean() {
        // Same layout: Σab = 2, Σb² = 4, so RSS(a | b) = 4 - 2²/4 = 3 and VIF = 4/3
        let x = Mat::from_fn(8, 2, |i, j| if j == 0 { (i % 2) as f64 } else { ((i / 2) % 2) as f64 });
        let vif = variance_inflation_factor(&design(&["a", "b"], x)).unwrap();

        for e in &vif {
            assert!((e.vif - 4.0 / 3.0).abs() < 1e-10, "{} = {}", e.name, e.vif);
        }
    }

    #[test]
    fn test_vif_collinear_predictors() {
        // Highly collinear predictors should have high VIF
        let x = Mat::from_fn(100, 2, |i, j| {
            if j == 0 {
                i as f64
            } else {
                i as f64 + 0.01 * (i as f64).sin()
            }
        });
        let vif = variance_inflation_factor(&design(&["x0", "x1"], x)).unwrap();

        assert!(vif[0].vif > 10.0, "VIF[0] = {} should be > 10", vif[0].vif);
        assert_eq!(vif[1].band, VifBand::Severe);
    }

    #[test]
    fn test_exact_combination_is_infinite() {
        let x = Mat::from_fn(10, 3, |i, j| match j {
            0 => i as f64,
            1 => ((i * 3) % 4) as f64,
            _ => i as f64 + ((i * 3) % 4) as f64,
        });
        let vif = variance_inflation_factor(&design(&["a", "b", "c"], x)).unwrap();
        assert!(vif.iter().all(|e| e.vif.is_infinite()));
    }

    #[test]
    fn test_single_predictor_is_one() {
        let x = Mat::from_fn(5, 1, |i, _| i as f64);
        let vif = variance_inflation_factor(&design(&["x"], x)).unwrap();
        assert_eq!(vif, vec![VifEntry { name: "x".into(), vif: 1.0, band: VifBand::None }]);
    }

    #[test]
    fn test_vif_minimum_is_one() {
        let x = Mat::from_fn(50, 3, |i, j| ((i + j * 17) as f64).sin());
        let vif = variance_inflation_factor(&design(&["a", "b", "c"], x)).unwrap();

        for e in &vif {
            assert!(e.vif >= 1.0, "VIF[{}] = {} should be >= 1", e.name, e.vif);
        }
    }

    #[test]
    fn test_high_vif_detection() {
        let x = Mat::from_fn(50, 3, |i, j| match j {
            0 => i as f64,
            1 => (i as f64).sin(),
            _ => i as f64 * 1.01 + 0.5 + 0.1 * ((i * 7) % 3) as f64,
        });
        let vif = variance_inflation_factor(&design(&["x0", "x1", "x2"], x)).unwrap();
        let high = high_vif_predictors(&vif, 5.0);

        assert!(high.contains(&"x0") && high.contains(&"x2"));
        assert!(!high.contains(&"x1"));
    }

    #[test]
    fn test_bands() {
        assert_eq!(VifBand::from_vif(1.2), VifBand::None);
        assert_eq!(VifBand::from_vif(5.0), VifBand::Acceptable);
        assert_eq!(VifBand::from_vif(7.0), VifBand::Moderate);
        assert_eq!(VifBand::from_vif(f64::INFINITY), VifBand::Severe);
    }
}
