//! Tests for the assumption diagnostics.

mod common;

use approx::assert_relative_eq;
use dummy_regress::core::Decision;
use dummy_regress::design::DesignMatrix;
use dummy_regress::diagnostics::{
    breusch_pagan, durbin_watson, high_vif_predictors, jarque_bera, qq_points,
    variance_inflation_factor, variance_inflation_factor_with, AutocorrelationReading,
    DiagnosticError, Histogram, VifBand, VifMethod, HISTOGRAM_BINS,
};
use dummy_regress::solvers::{FittedRegressor, OlsRegressor, Regressor};
use dummy_regress::{AnalysisSchema, PreparedModel};
use faer::{Col, Mat};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

// ============================================================================
// Variance Inflation Factor
// ============================================================================

#[test]
fn test_vif_orthogonal_predictors_is_one() {
    // Centred, mutually orthogonal ±1 columns
    let x = Mat::from_fn(8, 2, |i, j| match j {
        0 => if i % 2 == 0 { 1.0 } else { -1.0 },
        _ => if (i / 2) % 2 == 0 { 1.0 } else { -1.0 },
    });
    let design = DesignMatrix::with_intercept(vec!["a".into(), "b".into()], x).unwrap();

    let vif = variance_inflation_factor(&design).unwrap();
    assert_eq!(vif.len(), 2);
    for entry in &vif {
        assert_relative_eq!(entry.vif, 1.0, epsilon = 1e-10);
        assert_eq!(entry.band, VifBand::None);
    }
}

#[test]
fn test_vif_exact_combination_is_infinite() {
    let design = common::generate_collinear_design(15);
    let vif = variance_inflation_factor(&design).unwrap();

    assert_eq!(vif.len(), 3);
    assert!(vif.iter().all(|e| e.vif.is_infinite()));
    assert!(vif.iter().all(|e| e.band == VifBand::Severe));
    assert_eq!(high_vif_predictors(&vif, 10.0), vec!["x1", "x2", "x3"]);
}

#[test]
fn test_vif_correlated_predictors() {
    let noise = common::normal_sample(50, 4);
    let x = Mat::from_fn(50, 2, |i, j| {
        let base = i as f64 / 10.0;
        if j == 0 {
            base
        } else {
            base + 0.3 * noise[i]
        }
    });
    let design = DesignMatrix::with_intercept(vec!["a".into(), "b".into()], x).unwrap();
    let vif = variance_inflation_factor(&design).unwrap();

    // Two predictors share one auxiliary R²
    assert_relative_eq!(vif[0].vif, vif[1].vif, max_relative = 1e-8);
    assert!(vif[0].vif > 1.5);
}

#[test]
fn test_vif_single_predictor() {
    let (design, _) = common::generate_linear_data(20, 1, 1.0, 2);
    let vif = variance_inflation_factor(&design).unwrap();
    assert_eq!(vif.len(), 1);
    assert_eq!(vif[0].name, "x1");
    assert_eq!(vif[0].vif, 1.0);
}

#[test]
fn test_vif_bands() {
    assert_eq!(VifBand::from_vif(1.2), VifBand::None);
    assert_eq!(VifBand::from_vif(1.5), VifBand::Acceptable);
    assert_eq!(VifBand::from_vif(5.0), VifBand::Acceptable);
    assert_eq!(VifBand::from_vif(7.5), VifBand::Moderate);
    assert_eq!(VifBand::from_vif(10.0), VifBand::Moderate);
    assert_eq!(VifBand::from_vif(10.5), VifBand::Severe);
    assert_eq!(VifBand::from_vif(f64::INFINITY), VifBand::Severe);
}

#[test]
fn test_vif_on_dummy_design_excludes_intercept() {
    let model = common::salary_model(30, 0.5, 8);
    let vif = variance_inflation_factor(&model.design).unwrap();

    let names: Vec<&str> = vif.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["experience_years", "gender_P", "edu_S2", "edu_SMA"]);
    assert!(vif.iter().all(|e| e.vif.is_finite() && e.vif >= 1.0));
}

#[test]
fn test_vif_on_shipped_dataset() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("data/gaji_dummy.csv");
    let model = PreparedModel::from_path(&path, AnalysisSchema::salary()).unwrap();
    let vif = model.assumptions().unwrap().vif;

    // Auxiliary regressions without a constant, uncentred R²
    let expected = [
        ("experience_years", 2.0860, VifBand::Acceptable),
        ("gender_P", 1.4848, VifBand::None),
        ("edu_S2", 1.5893, VifBand::Acceptable),
        ("edu_SMA", 1.5051, VifBand::Acceptable),
    ];
    assert_eq!(vif.len(), expected.len());
    for (entry, (name, value, band)) in vif.iter().zip(expected) {
        assert_eq!(entry.name, name);
        assert_relative_eq!(entry.vif, value, epsilon = 1e-3);
        assert_eq!(entry.band, band);
    }
}

#[test]
fn test_centered_vif_matches_auxiliary_fit_with_intercept() {
    let model = common::salary_model(30, 0.5, 9);
    let design = &model.design;
    let vif = variance_inflation_factor_with(design, VifMethod::Centered).unwrap();

    // experience_years on the three indicators, with a constant
    let x = design.matrix();
    let others = Mat::from_fn(x.nrows(), 3, |i, j| x[(i, j + 2)]);
    let names = vec!["gender_P".into(), "edu_S2".into(), "edu_SMA".into()];
    let aux = DesignMatrix::with_intercept(names, others).unwrap();
    let y = design.column("experience_years").unwrap();
    let r_squared = OlsRegressor::default().fit(&aux, &y).unwrap().r_squared();

    assert_eq!(vif[0].name, "experience_years");
    assert_relative_eq!(vif[0].vif, 1.0 / (1.0 - r_squared), max_relative = 1e-10);
}

// ============================================================================
// Durbin-Watson
// ============================================================================

#[test]
fn test_durbin_watson_near_two_for_independent_residuals() {
    let mut rng = StdRng::seed_from_u64(2024);
    let normal = Normal::new(0.0, 1.0).unwrap();
    let n = 100;
    let resamples = 200;

    let mean_dw: f64 = (0..resamples)
        .map(|_| {
            let draws: Vec<f64> = (0..n).map(|_| normal.sample(&mut rng)).collect();
            durbin_watson(&Col::from_fn(n, |i| draws[i])).unwrap().statistic
        })
        .sum::<f64>()
        / resamples as f64;

    assert!((mean_dw - 2.0).abs() < 0.1, "mean DW = {mean_dw}");
}

#[test]
fn test_durbin_watson_detects_positive_autocorrelation() {
    // AR(1) with rho = 0.9
    let noise = common::normal_sample(200, 31);
    let mut e = vec![0.0; 200];
    for t in 1..200 {
        e[t] = 0.9 * e[t - 1] + noise[t];
    }
    let dw = durbin_watson(&Col::from_fn(200, |i| e[i])).unwrap();

    assert!(dw.statistic < 1.5);
    assert_eq!(dw.reading, AutocorrelationReading::Positive);
    assert!(dw.autocorrelation > 0.25);
}

#[test]
fn test_durbin_watson_bounds_and_errors() {
    let alternating = Col::from_fn(50, |i| if i % 2 == 0 { 1.0 } else { -1.0 });
    let dw = durbin_watson(&alternating).unwrap();
    assert!(dw.statistic > 2.5 && dw.statistic <= 4.0);
    assert_eq!(dw.reading, AutocorrelationReading::Negative);

    assert!(matches!(
        durbin_watson(&Col::zeros(10)),
        Err(DiagnosticError::ZeroVariance)
    ));
    assert!(matches!(
        durbin_watson(&Col::zeros(1)),
        Err(DiagnosticError::TooFewObservations { needed: 2, got: 1 })
    ));
}

// ============================================================================
// Jarque-Bera
// ============================================================================

#[test]
fn test_jarque_bera_statistic_formula() {
    let e = common::normal_sample(80, 6);
    let jb = jarque_bera(&e, 0.05).unwrap();

    let expected =
        80.0 / 6.0 * (jb.skewness.powi(2) + (jb.kurtosis - 3.0).powi(2) / 4.0);
    assert_relative_eq!(jb.statistic, expected, epsilon = 1e-12);
    assert_relative_eq!(jb.excess_kurtosis(), jb.kurtosis - 3.0, epsilon = 1e-12);
    assert!((0.0..=1.0).contains(&jb.p_value));
}

#[test]
fn test_jarque_bera_symmetric_sample() {
    let values = [-4.0, -2.5, -1.0, -0.5, 0.0, 0.5, 1.0, 2.5, 4.0];
    let jb = jarque_bera(&Col::from_fn(values.len(), |i| values[i]), 0.05).unwrap();
    assert_relative_eq!(jb.skewness, 0.0, epsilon = 1e-12);
}

#[test]
fn test_jarque_bera_rejects_outlier() {
    let mut e = common::normal_sample(60, 12);
    e[59] = 25.0;
    let jb = jarque_bera(&e, 0.05).unwrap();

    assert!(jb.skewness > 2.0);
    assert_eq!(jb.decision, Decision::Reject);
}

// ============================================================================
// Breusch-Pagan
// ============================================================================

#[test]
fn test_breusch_pagan_matches_auxiliary_regression() {
    let (design, y) = common::generate_linear_data(60, 2, 1.0, 19);
    let fitted = OlsRegressor::default().fit(&design, &y).unwrap();
    let e = &fitted.result().residuals;

    let bp = breusch_pagan(e, &design, 0.05).unwrap();

    let squared = Col::from_fn(e.nrows(), |i| e[i] * e[i]);
    let aux = OlsRegressor::default().fit(&design, &squared).unwrap();

    assert_eq!(bp.df, 2);
    assert_relative_eq!(bp.lm_statistic, 60.0 * aux.r_squared(), epsilon = 1e-10);
    assert_relative_eq!(bp.f_statistic, aux.result().f_statistic, epsilon = 1e-10);
    assert_relative_eq!(bp.f_p_value, aux.result().f_pvalue, epsilon = 1e-12);
}

#[test]
fn test_breusch_pagan_detects_fanning_residuals() {
    let n = 80;
    let noise = common::normal_sample(n, 27);
    let x = Mat::from_fn(n, 1, |i, _| (i + 1) as f64);
    let y = Col::from_fn(n, |i| 2.0 + 0.5 * (i + 1) as f64 + 0.2 * (i + 1) as f64 * noise[i]);
    let design = DesignMatrix::with_intercept(vec!["x".into()], x).unwrap();

    let fitted = OlsRegressor::default().fit(&design, &y).unwrap();
    let bp = breusch_pagan(&fitted.result().residuals, &design, 0.05).unwrap();

    assert!(bp.lm_p_value < 0.05, "p = {}", bp.lm_p_value);
    assert_eq!(bp.decision, Decision::Reject);
}

// ============================================================================
// Plots and the combined report
// ============================================================================

#[test]
fn test_qq_points_sorted_and_symmetric_quantiles() {
    let e = common::normal_sample(21, 40);
    let points = qq_points(&e).unwrap();

    assert_eq!(points.len(), 21);
    assert!(points.windows(2).all(|w| w[0].sample <= w[1].sample));
    assert!(points.windows(2).all(|w| w[0].theoretical < w[1].theoretical));
    assert_relative_eq!(points[10].theoretical, 0.0, epsilon = 1e-9);
    assert_relative_eq!(points[0].theoretical, -points[20].theoretical, epsilon = 1e-9);
}

#[test]
fn test_histogram_counts_every_residual() {
    let e = common::normal_sample(57, 3);
    let hist = Histogram::new(&e, HISTOGRAM_BINS).unwrap();

    assert_eq!(hist.counts.len(), HISTOGRAM_BINS);
    assert_eq!(hist.edges.len(), HISTOGRAM_BINS + 1);
    assert_eq!(hist.counts.iter().sum::<usize>(), 57);
    assert_eq!(hist.render(20).lines().count(), HISTOGRAM_BINS);
}

#[test]
fn test_assumption_report_on_salary_model() {
    let model = common::salary_model(40, 0.8, 15);
    let report = model.assumptions().unwrap();

    assert_eq!(report.normality.n_observations, 40);
    assert_eq!(report.heteroskedasticity.df, 4);
    assert_eq!(report.vif.len(), 4);
    assert!(report.autocorrelation.statistic >= 0.0 && report.autocorrelation.statistic <= 4.0);
}
