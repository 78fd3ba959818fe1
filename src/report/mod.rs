//! Console reports.
//!
//! Each report borrows a [`PreparedModel`], runs whatever tests it needs up
//! front, and renders as text through `Display`:
//!
//! - [`BasicReport`]: first rows, category distribution, numeric summaries,
//!   model summary, notes
//! - [`AssumptionsReport`]: column types, cleaning warnings, plots and the four
//!   assumption checks
//! - [`HypothesisReport`]: overall F-test, t-tests and the joint F-test over
//!   the education indicators

pub mod sections;

use crate::analysis::PreparedModel;
use crate::data::{numeric_summary, value_counts, LevelCount, NumericSummary};
use crate::diagnostics::{qq_points, AssumptionReport, Histogram, QqPoint, HISTOGRAM_BINS};
use crate::error::Result;
use crate::inference::{FTestResult, HypothesisOutcome, OverallFTest, TTestResult};
use crate::solvers::FittedRegressor;
use std::fmt;

/// Rows shown in the "first rows" section.
pub const HEAD_ROWS: usize = 5;

/// Fitted model with a short data overview.
pub struct BasicReport<'a> {
    model: &'a PreparedModel,
    distribution: Vec<LevelCount>,
    summaries: Vec<(String, NumericSummary)>,
}

impl<'a> BasicReport<'a> {
    pub fn new(model: &'a PreparedModel) -> Result<Self> {
        let columns = model.schema.categorical_columns();
        let distribution = value_counts(&model.table, &columns)?;
        let summaries = model
            .schema
            .numeric_columns()
            .into_iter()
            .map(|c| Ok((c.to_string(), numeric_summary(&model.table, c)?)))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            model,
            distribution,
            summaries,
        })
    }
}

impl fmt::Display for BasicReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = self.model;
        sections::cleaning_warning(f, &m.cleaning)?;
        sections::head(f, &m.table, HEAD_ROWS)?;
        let columns = m.schema.categorical_columns();
        sections::category_distribution(f, &columns, &self.distribution)?;
        sections::numeric_summaries(f, &self.summaries)?;
        sections::model_summary(
            f,
            "Dummy regression summary (basic)",
            &m.schema.response,
            m.fitted.result(),
        )?;
        sections::interpretation_notes(f, &m.design)
    }
}

/// Classical assumption checks with text plots.
pub struct AssumptionsReport<'a> {
    model: &'a PreparedModel,
    checks: AssumptionReport,
    histogram: Histogram,
    qq: Vec<QqPoint>,
}

impl<'a> AssumptionsReport<'a> {
    pub fn new(model: &'a PreparedModel) -> Result<Self> {
        let residuals = &model.fitted.result().residuals;
        Ok(Self {
            model,
            checks: model.assumptions()?,
            histogram: Histogram::new(residuals, HISTOGRAM_BINS)?,
            qq: qq_points(residuals)?,
        })
    }

    /// The computed checks.
    pub fn checks(&self) -> &AssumptionReport {
        &self.checks
    }
}

impl fmt::Display for AssumptionsReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = self.model;
        sections::column_types(f, &m.raw)?;
        sections::cleaning_warning(f, &m.cleaning)?;
        sections::design_columns(f, &m.design)?;
        sections::head(f, &m.table, HEAD_ROWS)?;
        sections::plots(f, &self.histogram, &self.qq, m.fitted.result())?;
        sections::normality(f, &self.checks.normality)?;
        sections::heteroskedasticity(f, &self.checks.heteroskedasticity)?;
        sections::vif(f, &self.checks.vif)?;
        sections::autocorrelation(f, &self.checks.autocorrelation)
    }
}

/// A t-test together with the wording of its hypotheses.
struct ExampleTTest {
    name: String,
    outcome: HypothesisOutcome<TTestResult>,
    h0: String,
    h1: String,
}

/// Overall F-test, example t-tests and the joint education test.
pub struct HypothesisReport<'a> {
    model: &'a PreparedModel,
    overall: OverallFTest,
    t_tests: Vec<ExampleTTest>,
    education: HypothesisOutcome<FTestResult>,
}

impl<'a> HypothesisReport<'a> {
    /// Tests `experience_years`, `gender_L` and every `edu_*` indicator jointly.
    ///
    /// Coefficients the design does not contain are skipped, not errors.
    pub fn new(model: &'a PreparedModel) -> Result<Self> {
        let alpha = model.alpha();
        let fitted = &model.fitted;

        let examples = [
            (
                "experience_years",
                "experience has no effect on salary",
                "experience affects salary",
            ),
            (
                "gender_L",
                "no salary difference between L and P",
                "salary differs between L and P",
            ),
        ];
        let t_tests = examples
            .iter()
            .map(|&(name, h0, h1)| {
                Ok(ExampleTTest {
                    name: name.to_string(),
                    outcome: fitted.t_test_coefficient(name, alpha)?,
                    h0: h0.to_string(),
                    h1: h1.to_string(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            model,
            overall: fitted.overall_f_test(alpha),
            t_tests,
            education: fitted.f_test_prefix("edu_", alpha)?,
        })
    }

    pub fn overall(&self) -> &OverallFTest {
        &self.overall
    }

    /// Outcomes of the example t-tests, by coefficient name.
    pub fn t_tests(&self) -> impl Iterator<Item = (&str, &HypothesisOutcome<TTestResult>)> {
        self.t_tests.iter().map(|t| (t.name.as_str(), &t.outcome))
    }

    pub fn education(&self) -> &HypothesisOutcome<FTestResult> {
        &self.education
    }
}

impl fmt::Display for HypothesisReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = self.model;
        sections::column_types(f, &m.raw)?;
        sections::cleaning_warning(f, &m.cleaning)?;
        sections::design_columns(f, &m.design)?;
        sections::model_summary(f, "Model summary", &m.schema.response, m.fitted.result())?;
        sections::overall_f(f, &self.overall)?;

        sections::header(f, "t-tests for individual coefficients (examples)")?;
        for t in &self.t_tests {
            sections::t_test(f, &t.name, &t.outcome, &t.h0, &t.h1)?;
        }

        sections::f_test(
            f,
            "Partial F-test: education indicators (edu_*) jointly",
            &self.education,
            "every education coefficient is 0 (no effect)",
            "at least one education coefficient is not 0",
        )?;
        sections::significance_notes(f, m.alpha())
    }
}
