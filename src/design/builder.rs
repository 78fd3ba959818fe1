//! Dummy coding of categorical columns and design-matrix assembly.

use super::matrix::{indicator_name, CategoricalEncoding, DesignMatrix, INTERCEPT};
use super::DesignError;
use crate::core::AnalysisSchema;
use crate::data::ObservationTable;
use faer::{Col, Mat};
use log::debug;
use std::collections::BTreeSet;

/// Which level of a categorical variable is absorbed into the intercept.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ReferenceLevel {
    /// The lexicographically first level.
    #[default]
    First,
    /// An explicitly named level.
    Named(String),
}

/// A categorical predictor: source column, indicator prefix, reference policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoricalSpec {
    pub column: String,
    pub prefix: String,
    pub reference: ReferenceLevel,
}

impl CategoricalSpec {
    /// Use the column name as prefix and the first level as reference.
    pub fn new(column: impl Into<String>) -> Self {
        let column = column.into();
        Self {
            prefix: column.clone(),
            column,
            reference: ReferenceLevel::First,
        }
    }

    /// Set the indicator prefix.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Use `level` as the reference level.
    pub fn with_reference(mut self, level: impl Into<String>) -> Self {
        self.reference = ReferenceLevel::Named(level.into());
        self
    }
}

/// Enumerate levels and pick the reference for one categorical column.
pub fn encode_levels(
    cells: &[String],
    spec: &CategoricalSpec,
) -> Result<CategoricalEncoding, DesignError> {
    let levels: Vec<String> = cells
        .iter()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .cloned()
        .collect();

    let reference = match &spec.reference {
        ReferenceLevel::First => levels.first().cloned().ok_or(DesignError::NoRows)?,
        ReferenceLevel::Named(level) => {
            if !levels.contains(level) {
                return Err(DesignError::UnknownLevel {
                    column: spec.column.clone(),
                    level: level.clone(),
                    levels,
                });
            }
            level.clone()
        }
    };

    let indicators = levels
        .iter()
        .filter(|l| **l != reference)
        .map(|l| indicator_name(&spec.prefix, l))
        .collect();

    Ok(CategoricalEncoding {
        column: spec.column.clone(),
        prefix: spec.prefix.clone(),
        levels,
        reference,
        indicators,
    })
}

/// Assembles `[const | numeric predictors | indicators]` from a cleaned table.
///
/// # Example
///
/// ```rust,ignore
/// let design = DesignBuilder::new()
///     .numeric("experience_years")
///     .categorical(CategoricalSpec::new("gender"))
///     .categorical(CategoricalSpec::new("education_level").with_prefix("edu"))
///     .build(&table)?;
/// assert_eq!(design.names()[0], "const");
/// ```
#[derive(Debug, Clone, Default)]
pub struct DesignBuilder {
    numeric: Vec<String>,
    categorical: Vec<CategoricalSpec>,
}

impl DesignBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder for the predictors named by `schema`.
    pub fn from_schema(schema: &AnalysisSchema) -> Self {
        Self {
            numeric: schema.numeric_predictors.clone(),
            categorical: schema.categorical.clone(),
        }
    }

    /// Add a numeric predictor.
    pub fn numeric(mut self, column: impl Into<String>) -> Self {
        self.numeric.push(column.into());
        self
    }

    /// Add a categorical predictor.
    pub fn categorical(mut self, spec: CategoricalSpec) -> Self {
        self.categorical.push(spec);
        self
    }

    /// Override the reference level of a categorical predictor already added.
    pub fn reference(mut self, column: &str, level: impl Into<String>) -> Self {
        let level = level.into();
        if let Some(spec) = self.categorical.iter_mut().find(|s| s.column == column) {
            spec.reference = ReferenceLevel::Named(level);
        }
        self
    }

    /// Build the design matrix.
    pub fn build(&self, table: &ObservationTable) -> Result<DesignMatrix, DesignError> {
        let n = table.n_rows();
        if n == 0 {
            return Err(DesignError::NoRows);
        }

        let mut names = vec![INTERCEPT.to_string()];
        let mut columns: Vec<Vec<f64>> = vec![vec![1.0; n]];

        for name in &self.numeric {
            let values = table.numeric(name)?;
            if values.iter().any(|v| v.is_nan()) {
                return Err(DesignError::MissingValues(name.clone()));
            }
            names.push(name.clone());
            columns.push(values.to_vec());
        }

        let mut encodings = Vec::with_capacity(self.categorical.len());
        for spec in &self.categorical {
            let cells = table.text(&spec.column)?;
            let encoding = encode_levels(cells, spec)?;

            for level in encoding.levels.iter().filter(|l| **l != encoding.reference) {
                names.push(indicator_name(&spec.prefix, level));
                columns.push(
                    cells
                        .iter()
                        .map(|c| if c == level { 1.0 } else { 0.0 })
                        .collect(),
                );
            }

            debug!(
                "{}: levels {:?}, reference '{}'",
                spec.column, encoding.levels, encoding.reference
            );
            encodings.push(encoding);
        }

        let x = Mat::from_fn(n, columns.len(), |i, j| columns[j][i]);
        Ok(DesignMatrix::new(names, x)?.with_encodings(encodings))
    }

    /// Response vector from a numeric column.
    pub fn response(table: &ObservationTable, column: &str) -> Result<Col<f64>, DesignError> {
        let values = table.numeric(column)?;
        if values.iter().any(|v| v.is_nan()) {
            return Err(DesignError::MissingValues(column.to_string()));
        }
        Ok(Col::from_fn(values.len(), |i| values[i]))
    }
}
