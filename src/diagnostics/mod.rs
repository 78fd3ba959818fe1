//! Classical-assumption diagnostics for a fitted OLS model.
//!
//! - **Normality**: Jarque-Bera on the residuals
//! - **Heteroskedasticity**: Breusch-Pagan (studentised) against the design matrix
//! - **Multicollinearity**: Variance Inflation Factor per non-intercept column
//! - **Autocorrelation**: Durbin-Watson over residuals in observation order
//! - **Plots**: residual histogram, normal QQ and residual-vs-fitted, rendered as text
//!
//! # Example
//!
//! ```rust,ignore
//! use dummy_regress::diagnostics::AssumptionReport;
//!
//! let report = AssumptionReport::compute(&fitted, &design, 0.05)?;
//! println!("JB p = {:.4}", report.normality.p_value);
//! for e in &report.vif {
//!     println!("{}: {:.2} ({})", e.name, e.vif, e.band);
//! }
//! ```

mod autocorrelation;
mod heteroskedasticity;
mod normality;
mod plots;
mod vif;

pub use autocorrelation::{durbin_watson, AutocorrelationReading, DurbinWatson};
pub use heteroskedasticity::{breusch_pagan, BreuschPagan};
pub use normality::{jarque_bera, JarqueBera};
pub use plots::{
    qq_points, render_scatter, residuals_vs_fitted, Histogram, QqPoint, ReferenceLine,
    HISTOGRAM_BINS,
};
pub use vif::{
    high_vif_predictors, variance_inflation_factor, variance_inflation_factor_with, VifBand,
    VifEntry, VifMethod,
};

use crate::design::{DesignError, DesignMatrix};
use crate::solvers::{FittedOls, FittedRegressor, RegressionError};
use thiserror::Error;

/// Errors raised by the diagnostic statistics.
#[derive(Debug, Error)]
pub enum DiagnosticError {
    #[error("need at least {needed} residuals, got {got}")]
    TooFewObservations { needed: usize, got: usize },

    #[error("residuals have zero variance")]
    ZeroVariance,

    #[error("auxiliary regression failed: {0}")]
    Regression(#[from] RegressionError),

    #[error(transparent)]
    Design(#[from] DesignError),

    #[error("distribution error: {0}")]
    Distribution(String),
}

/// All four assumption checks for one fitted model.
#[derive(Debug, Clone, PartialEq)]
pub struct AssumptionReport {
    pub normality: JarqueBera,
    pub heteroskedasticity: BreuschPagan,
    pub vif: Vec<VifEntry>,
    pub autocorrelation: DurbinWatson,
}

impl AssumptionReport {
    /// Run every check against `fitted`, which must have been fit on `design`.
    pub fn compute(
        fitted: &FittedOls,
        design: &DesignMatrix,
        alpha: f64,
    ) -> Result<Self, DiagnosticError> {
        let residuals = &fitted.result().residuals;
        Ok(Self {
            normality: jarque_bera(residuals, alpha)?,
            heteroskedasticity: breusch_pagan(residuals, design, alpha)?,
            vif: variance_inflation_factor(design)?,
            autocorrelation: durbin_watson(residuals)?,
        })
    }
}
