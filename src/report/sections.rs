//! Renderers for the individual report sections.

use crate::core::{Decision, RegressionResult};
use crate::data::{CleaningReport, LevelCount, NumericSummary, ObservationTable};
use crate::design::DesignMatrix;
use crate::diagnostics::{
    durbin_watson, jarque_bera, render_scatter, residuals_vs_fitted, BreuschPagan, DurbinWatson,
    Histogram, JarqueBera, QqPoint, ReferenceLine, VifBand, VifEntry,
};
use crate::inference::{FTestResult, HypothesisOutcome, OverallFTest, TTestResult};
use std::fmt::{self, Formatter};

const PLOT_WIDTH: usize = 56;
const PLOT_HEIGHT: usize = 14;

/// `=== title ===` header.
pub fn header(f: &mut Formatter<'_>, title: &str) -> fmt::Result {
    writeln!(f, "=== {title} ===")
}

/// Left-aligned first column, right-aligned others, padded to the widest cell.
pub fn render_table(
    f: &mut Formatter<'_>,
    headers: &[String],
    rows: &[Vec<String>],
) -> fmt::Result {
    let widths: Vec<usize> = (0..headers.len())
        .map(|j| {
            rows.iter()
                .filter_map(|r| r.get(j))
                .chain(std::iter::once(&headers[j]))
                .map(|c| c.chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    let line = |f: &mut Formatter<'_>, cells: &[String]| -> fmt::Result {
        for (j, cell) in cells.iter().enumerate() {
            let w = widths.get(j).copied().unwrap_or(0);
            if j == 0 {
                write!(f, "{cell:<w$}")?;
            } else {
                write!(f, "  {cell:>w$}")?;
            }
        }
        writeln!(f)
    };

    line(f, headers)?;
    for row in rows {
        line(f, row)?;
    }
    Ok(())
}

/// Inferred kind of each raw column.
pub fn column_types(f: &mut Formatter<'_>, raw: &ObservationTable) -> fmt::Result {
    header(f, "Initial column types")?;
    let width = raw
        .column_names()
        .iter()
        .map(|n| n.len())
        .max()
        .unwrap_or(0);
    for column in raw.columns() {
        writeln!(f, "{:<width$}  {}", column.name, column.kind)?;
    }
    writeln!(f)
}

/// Warning block listing missing values per column, when any were dropped.
pub fn cleaning_warning(f: &mut Formatter<'_>, report: &CleaningReport) -> fmt::Result {
    if report.has_missing() {
        writeln!(f, "{report}")?;
        writeln!(f)?;
    }
    Ok(())
}

/// First `n` rows of the table.
pub fn head(f: &mut Formatter<'_>, table: &ObservationTable, n: usize) -> fmt::Result {
    header(f, &format!("First {n} rows"))?;
    let head = table.head(n);

    let mut headers = vec![String::new()];
    headers.extend(head.column_names().iter().map(|s| s.to_string()));
    let rows: Vec<Vec<String>> = (0..head.n_rows())
        .map(|i| {
            std::iter::once(i.to_string())
                .chain(head.columns().iter().map(|c| c.display_cell(i)))
                .collect()
        })
        .collect();

    render_table(f, &headers, &rows)?;
    writeln!(f)
}

/// Counts of each combination of categorical levels.
pub fn category_distribution(
    f: &mut Formatter<'_>,
    columns: &[&str],
    counts: &[LevelCount],
) -> fmt::Result {
    header(f, "Category distribution")?;
    let mut headers: Vec<String> = columns.iter().map(|s| s.to_string()).collect();
    headers.push("count".to_string());
    let rows: Vec<Vec<String>> = counts
        .iter()
        .map(|c| {
            let mut row = c.levels.clone();
            row.push(c.count.to_string());
            row
        })
        .collect();

    render_table(f, &headers, &rows)?;
    writeln!(f)
}

/// Count, mean, standard deviation and range of the numeric columns.
pub fn numeric_summaries(
    f: &mut Formatter<'_>,
    summaries: &[(String, NumericSummary)],
) -> fmt::Result {
    header(f, "Numeric columns")?;
    let headers: Vec<String> = ["", "count", "mean", "std", "min", "max"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let rows: Vec<Vec<String>> = summaries
        .iter()
        .map(|(name, s)| {
            vec![
                name.clone(),
                s.count.to_string(),
                format!("{:.3}", s.mean),
                format!("{:.3}", s.std),
                format!("{:.3}", s.min),
                format!("{:.3}", s.max),
            ]
        })
        .collect();

    render_table(f, &headers, &rows)?;
    writeln!(f)
}

/// Design-matrix column names.
pub fn design_columns(f: &mut Formatter<'_>, design: &DesignMatrix) -> fmt::Result {
    header(f, "Design matrix columns")?;
    for name in design.names() {
        writeln!(f, "{name:<20} float")?;
    }
    writeln!(f)?;
    for encoding in design.encodings() {
        writeln!(
            f,
            "{}: levels {:?}, reference '{}'",
            encoding.column, encoding.levels, encoding.reference
        )?;
    }
    writeln!(f)
}

fn num(v: f64) -> String {
    if v.is_nan() {
        "nan".to_string()
    } else {
        format!("{v:.4}")
    }
}

/// Regression summary: fit statistics, coefficient table and residual tests.
pub fn model_summary(
    f: &mut Formatter<'_>,
    title: &str,
    response: &str,
    result: &RegressionResult,
) -> fmt::Result {
    header(f, title)?;

    let left = [
        ("Dep. Variable:", response.to_string()),
        ("Model:", "OLS".to_string()),
        ("Method:", "Least Squares".to_string()),
        ("No. Observations:", result.n_observations.to_string()),
        ("Df Residuals:", result.residual_df().to_string()),
        ("Df Model:", result.model_df().to_string()),
    ];
    let right = [
        ("R-squared:", num(result.r_squared)),
        ("Adj. R-squared:", num(result.adj_r_squared)),
        ("F-statistic:", num(result.f_statistic)),
        ("Prob (F-statistic):", format!("{:.4e}", result.f_pvalue)),
        ("Log-Likelihood:", num(result.log_likelihood)),
        ("AIC / BIC:", format!("{:.2} / {:.2}", result.aic, result.bic)),
    ];
    for ((lk, lv), (rk, rv)) in left.iter().zip(right.iter()) {
        writeln!(f, "{lk:<20}{lv:>14}    {rk:<20}{rv:>16}")?;
    }
    writeln!(f)?;

    let lo = (1.0 - result.confidence_level) / 2.0;
    let headers: Vec<String> = [
        "",
        "coef",
        "std err",
        "t",
        "P>|t|",
        &format!("[{lo:.3}"),
        &format!("{:.3}]", 1.0 - lo),
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    let rows: Vec<Vec<String>> = result
        .coefficient_table()
        .into_iter()
        .map(|c| {
            vec![
                c.name,
                num(c.estimate),
                num(c.std_error),
                format!("{:.3}", c.t_statistic),
                format!("{:.3}", c.p_value),
                num(c.ci_lower),
                num(c.ci_upper),
            ]
        })
        .collect();
    render_table(f, &headers, &rows)?;
    writeln!(f)?;

    let dw = durbin_watson(&result.residuals).map_or(f64::NAN, |d| d.statistic);
    let pair = |f: &mut Formatter<'_>, lk: &str, lv: f64, rk: &str, rv: f64| {
        writeln!(f, "{lk:<20}{:>14}    {rk:<20}{:>16}", num(lv), num(rv))
    };
    match jarque_bera(&result.residuals, crate::core::DEFAULT_ALPHA) {
        Ok(jb) => {
            pair(f, "Durbin-Watson:", dw, "Jarque-Bera (JB):", jb.statistic)?;
            pair(f, "Skew:", jb.skewness, "Prob(JB):", jb.p_value)?;
            writeln!(f, "{:<20}{:>14}", "Kurtosis:", num(jb.kurtosis))?;
        }
        Err(_) => writeln!(f, "{:<20}{:>14}", "Durbin-Watson:", num(dw))?,
    }
    writeln!(f)
}

/// Reading guide for the coefficients of a dummy-coded model.
pub fn interpretation_notes(f: &mut Formatter<'_>, design: &DesignMatrix) -> fmt::Result {
    writeln!(f, "Notes:")?;

    let baseline: Vec<String> = design
        .encodings()
        .iter()
        .map(|e| format!("{} = {}", e.column, e.reference))
        .collect();
    let numeric: Vec<&str> = design
        .names()
        .iter()
        .filter(|n| {
            n.as_str() != crate::design::INTERCEPT
                && !design.encodings().iter().any(|e| e.indicators.contains(*n))
        })
        .map(String::as_str)
        .collect();

    writeln!(
        f,
        "- const: expected response for the baseline group ({}) with {} = 0",
        baseline.join(", "),
        if numeric.is_empty() {
            "no numeric predictors".to_string()
        } else {
            numeric.join(", ")
        }
    )?;
    for name in &numeric {
        writeln!(f, "- {name}: change in the response per one-unit increase")?;
    }
    for encoding in design.encodings() {
        for level in encoding.levels.iter().filter(|l| **l != encoding.reference) {
            if let Some(indicator) = encoding.indicator_for(level) {
                writeln!(
                    f,
                    "- {indicator}: difference between {} = {level} and the baseline {}",
                    encoding.column, encoding.reference
                )?;
            }
        }
    }
    writeln!(f)
}

fn conclusion(
    f: &mut Formatter<'_>,
    decision: Decision,
    alpha: f64,
    reject: &str,
    retain: &str,
) -> fmt::Result {
    let text = match decision {
        Decision::Reject => format!("reject H0 -> {reject}"),
        Decision::FailToReject => format!("fail to reject H0 -> {retain}"),
        Decision::Undetermined => decision.to_string(),
    };
    writeln!(f, "Conclusion    : {text} (alpha = {:.0}%)", alpha * 100.0)
}

pub fn normality(f: &mut Formatter<'_>, jb: &JarqueBera) -> fmt::Result {
    header(f, "Normality test (Jarque-Bera)")?;
    writeln!(f, "JB statistic  : {:.4}", jb.statistic)?;
    writeln!(f, "p-value       : {:.4}", jb.p_value)?;
    writeln!(f, "Skewness      : {:.4}", jb.skewness)?;
    writeln!(f, "Kurtosis      : {:.4}", jb.kurtosis)?;
    conclusion(f, jb.decision, jb.alpha, "residuals are not normal", "residuals ~ normal")?;
    writeln!(f)
}

pub fn heteroskedasticity(f: &mut Formatter<'_>, bp: &BreuschPagan) -> fmt::Result {
    header(f, "Heteroskedasticity test (Breusch-Pagan)")?;
    writeln!(f, "LM statistic  : {:.4}", bp.lm_statistic)?;
    writeln!(f, "LM p-value    : {:.4}", bp.lm_p_value)?;
    writeln!(f, "F statistic   : {:.4}", bp.f_statistic)?;
    writeln!(f, "F p-value     : {:.4}", bp.f_p_value)?;
    conclusion(
        f,
        bp.decision,
        bp.alpha,
        "heteroskedasticity is indicated",
        "no indication of heteroskedasticity",
    )?;
    writeln!(f)
}

pub fn vif(f: &mut Formatter<'_>, entries: &[VifEntry]) -> fmt::Result {
    header(f, "Multicollinearity (VIF)")?;
    for e in entries {
        writeln!(f, "{:<20} : VIF = {:.4}  ({})", e.name, e.vif, e.band)?;
    }
    writeln!(f)?;
    writeln!(f, "Reading:")?;
    writeln!(f, "- VIF below 1.5  : {}", VifBand::None)?;
    writeln!(f, "- VIF 1.5 to 5   : {}", VifBand::Acceptable)?;
    writeln!(f, "- VIF 5 to 10    : {}", VifBand::Moderate)?;
    writeln!(f, "- VIF above 10   : {}", VifBand::Severe)?;
    writeln!(f)
}

pub fn autocorrelation(f: &mut Formatter<'_>, dw: &DurbinWatson) -> fmt::Result {
    header(f, "Autocorrelation test (Durbin-Watson)")?;
    writeln!(f, "DW statistic  : {:.4}", dw.statistic)?;
    writeln!(f, "Implied rho   : {:.4}", dw.autocorrelation)?;
    writeln!(f, "Reading       : {}", dw.reading)?;
    writeln!(f, "Rule of thumb : values near 2 mean no strong autocorrelation.")?;
    writeln!(f)
}

/// Residual histogram, QQ plot and residual-vs-fitted scatter.
pub fn plots(
    f: &mut Formatter<'_>,
    histogram: &Histogram,
    qq: &[QqPoint],
    result: &RegressionResult,
) -> fmt::Result {
    header(f, "Residual histogram")?;
    write!(f, "{}", histogram.render(40))?;
    writeln!(f)?;

    header(f, "QQ plot of residuals (45-degree line)")?;
    let qq_xy: Vec<(f64, f64)> = qq.iter().map(|p| (p.theoretical, p.sample)).collect();
    let qq_plot = render_scatter(&qq_xy, PLOT_WIDTH, PLOT_HEIGHT, ReferenceLine::Diagonal);
    write!(f, "{qq_plot}")?;
    writeln!(f)?;

    header(f, "Residuals vs fitted")?;
    let points = residuals_vs_fitted(&result.fitted_values, &result.residuals);
    let scatter = render_scatter(&points, PLOT_WIDTH, PLOT_HEIGHT, ReferenceLine::Zero);
    write!(f, "{scatter}")?;
    writeln!(f)
}

pub fn overall_f(f: &mut Formatter<'_>, test: &OverallFTest) -> fmt::Result {
    header(f, "F-test (overall)")?;
    writeln!(f, "F-statistic    : {:.4}", test.f_statistic)?;
    writeln!(f, "Prob(F-stat)   : {:.4}", test.p_value)?;
    writeln!(f, "df             : ({}, {})", test.df_model, test.df_resid)?;
    writeln!(f, "H0 : every coefficient except the intercept is 0")?;
    writeln!(f, "H1 : at least one coefficient is not 0")?;
    conclusion(
        f,
        test.decision,
        test.alpha,
        "the model is jointly significant",
        "the model is not significant",
    )?;
    writeln!(f)
}

/// One t-test, or the reason it was skipped.
pub fn t_test(
    f: &mut Formatter<'_>,
    name: &str,
    outcome: &HypothesisOutcome<TTestResult>,
    h0: &str,
    h1: &str,
) -> fmt::Result {
    let t = match outcome {
        HypothesisOutcome::Tested(t) => t,
        HypothesisOutcome::Skipped { reason } => {
            writeln!(f, "[INFO] t-test on '{name}' skipped: {reason}")?;
            return writeln!(f);
        }
    };

    writeln!(f, "Coefficient: {name}")?;
    writeln!(f, "Test        : {}", t.restriction)?;
    let lo = (1.0 - t.confidence_level) / 2.0;
    let headers: Vec<String> = [
        "",
        "coef",
        "std err",
        "t",
        "P>|t|",
        &format!("[{lo:.3}"),
        &format!("{:.3}]", 1.0 - lo),
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    let row = vec![
        "c0".to_string(),
        num(t.estimate),
        num(t.std_error),
        format!("{:.3}", t.t_statistic),
        format!("{:.3}", t.p_value),
        num(t.ci_lower),
        num(t.ci_upper),
    ];
    render_table(f, &headers, &[row])?;
    writeln!(f, "H0 : {h0}")?;
    writeln!(f, "H1 : {h1}")?;
    conclusion(f, t.decision, t.alpha, "significant", "not significant")?;
    writeln!(f)
}

/// A joint F-test, or the reason it was skipped.
pub fn f_test(
    f: &mut Formatter<'_>,
    title: &str,
    outcome: &HypothesisOutcome<FTestResult>,
    h0: &str,
    h1: &str,
) -> fmt::Result {
    let t = match outcome {
        HypothesisOutcome::Tested(t) => t,
        HypothesisOutcome::Skipped { reason } => {
            writeln!(f, "[INFO] {title} skipped: {reason}")?;
            return writeln!(f);
        }
    };

    header(f, title)?;
    writeln!(f, "Hypothesis H0 : {}", t.restrictions.join(", "))?;
    writeln!(
        f,
        "F = {:.4}, p = {:.4}, df_denom = {}, df_num = {}",
        t.f_statistic, t.p_value, t.df_denom, t.df_num
    )?;
    writeln!(f, "H0 : {h0}")?;
    writeln!(f, "H1 : {h1}")?;
    conclusion(f, t.decision, t.alpha, "jointly significant", "not jointly significant")?;
    writeln!(f)
}

/// General reading of p-values.
pub fn significance_notes(f: &mut Formatter<'_>, alpha: f64) -> fmt::Result {
    writeln!(f, "General notes:")?;
    writeln!(
        f,
        "- p-value < {alpha} -> reject H0 (significant effect at alpha = {:.0}%)",
        alpha * 100.0
    )?;
    writeln!(f, "- p-value >= {alpha} -> fail to reject H0 (not significant)")
}
