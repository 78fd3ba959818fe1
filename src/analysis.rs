//! Load → clean → design → fit, for one analysis schema.

use crate::core::{AnalysisSchema, RegressionOptions};
use crate::data::{clean_for_schema, load_csv, CleaningReport, ObservationTable};
use crate::design::{DesignBuilder, DesignMatrix};
use crate::diagnostics::{AssumptionReport, DiagnosticError};
use crate::error::Result;
use crate::solvers::{FittedOls, OlsRegressor, Regressor};
use faer::Col;
use log::{debug, info};
use std::path::Path;

/// Everything the reports need: the raw and cleaned tables, the cleaning
/// report, the design matrix, the response and the fitted model.
#[derive(Debug, Clone)]
pub struct PreparedModel {
    pub schema: AnalysisSchema,
    /// The table as read, before coercion.
    pub raw: ObservationTable,
    /// The table after coercion and dropping incomplete rows.
    pub table: ObservationTable,
    pub cleaning: CleaningReport,
    pub design: DesignMatrix,
    pub response: Col<f64>,
    pub fitted: FittedOls,
}

impl PreparedModel {
    /// Read a CSV file and fit the schema's model with default options.
    pub fn from_path(path: impl AsRef<Path>, schema: AnalysisSchema) -> Result<Self> {
        let path = path.as_ref();
        info!("loading {}", path.display());
        let raw = load_csv(path)?;
        Self::from_table(raw, schema, RegressionOptions::default())
    }

    /// Fit the schema's model on an already loaded table.
    pub fn from_table(
        raw: ObservationTable,
        schema: AnalysisSchema,
        options: RegressionOptions,
    ) -> Result<Self> {
        schema.validate()?;
        options.validate()?;

        let (table, cleaning) = clean_for_schema(&raw, &schema)?;
        let design = DesignBuilder::from_schema(&schema).build(&table)?;
        let response = DesignBuilder::response(&table, &schema.response)?;
        debug!(
            "design matrix {} x {}: {:?}",
            design.nrows(),
            design.ncols(),
            design.names()
        );

        let fitted = OlsRegressor::new(options).fit(&design, &response)?;

        Ok(Self {
            schema,
            raw,
            table,
            cleaning,
            design,
            response,
            fitted,
        })
    }

    /// Significance level of the schema.
    pub fn alpha(&self) -> f64 {
        self.schema.alpha
    }

    /// Run the assumption checks on the fitted model.
    pub fn assumptions(&self) -> std::result::Result<AssumptionReport, DiagnosticError> {
        AssumptionReport::compute(&self.fitted, &self.design, self.alpha())
    }
}
