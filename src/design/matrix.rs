//! Named design matrix.

use super::DesignError;
use crate::utils::column;
use faer::{Col, Mat};
use std::collections::HashSet;

/// Name of the intercept column.
pub const INTERCEPT: &str = "const";

/// How one categorical variable was dummy-coded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoricalEncoding {
    /// Source column in the observation table.
    pub column: String,
    /// Prefix of the indicator column names.
    pub prefix: String,
    /// Distinct levels in lexicographic order.
    pub levels: Vec<String>,
    /// Level absorbed into the intercept.
    pub reference: String,
    /// Indicator column names, one per non-reference level, in level order.
    pub indicators: Vec<String>,
}

impl CategoricalEncoding {
    /// Name of the indicator column for `level`, `None` for the reference.
    pub fn indicator_for(&self, level: &str) -> Option<String> {
        if level == self.reference || !self.levels.iter().any(|l| l == level) {
            None
        } else {
            Some(indicator_name(&self.prefix, level))
        }
    }
}

/// Indicator column name for `level` under `prefix`.
pub fn indicator_name(prefix: &str, level: &str) -> String {
    format!("{prefix}_{level}")
}

/// An n × p matrix of `f64` with one unique name per column.
#[derive(Debug, Clone)]
pub struct DesignMatrix {
    names: Vec<String>,
    x: Mat<f64>,
    encodings: Vec<CategoricalEncoding>,
}

impl DesignMatrix {
    /// Wrap a matrix with column names.
    pub fn new(names: Vec<String>, x: Mat<f64>) -> Result<Self, DesignError> {
        if names.len() != x.ncols() {
            return Err(DesignError::DimensionMismatch {
                names: names.len(),
                columns: x.ncols(),
            });
        }

        let mut seen = HashSet::new();
        for name in &names {
            if !seen.insert(name.as_str()) {
                return Err(DesignError::DuplicateColumn(name.clone()));
            }
        }

        Ok(Self {
            names,
            x,
            encodings: Vec::new(),
        })
    }

    /// Wrap a matrix and prepend a `const` column of ones.
    pub fn with_intercept(names: Vec<String>, x: Mat<f64>) -> Result<Self, DesignError> {
        let n = x.nrows();
        let p = x.ncols();
        let augmented = Mat::from_fn(n, p + 1, |i, j| if j == 0 { 1.0 } else { x[(i, j - 1)] });

        let mut all_names = Vec::with_capacity(p + 1);
        all_names.push(INTERCEPT.to_string());
        all_names.extend(names);
        Self::new(all_names, augmented)
    }

    pub(crate) fn with_encodings(mut self, encodings: Vec<CategoricalEncoding>) -> Self {
        self.encodings = encodings;
        self
    }

    /// Column names in order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// The numeric matrix.
    pub fn matrix(&self) -> &Mat<f64> {
        &self.x
    }

    /// Number of observations.
    pub fn nrows(&self) -> usize {
        self.x.nrows()
    }

    /// Number of columns, including `const`.
    pub fn ncols(&self) -> usize {
        self.x.ncols()
    }

    /// Position of a named column.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Copy of a named column.
    pub fn column(&self, name: &str) -> Option<Col<f64>> {
        self.column_index(name).map(|j| column(&self.x, j))
    }

    /// Position of the `const` column, if present.
    pub fn intercept_index(&self) -> Option<usize> {
        self.column_index(INTERCEPT)
    }

    /// Categorical encodings, in the order the variables were added.
    pub fn encodings(&self) -> &[CategoricalEncoding] {
        &self.encodings
    }

    /// Encoding of the categorical variable read from `column`.
    pub fn encoding(&self, column: &str) -> Option<&CategoricalEncoding> {
        self.encodings.iter().find(|e| e.column == column)
    }

    /// Names of columns starting with `prefix`, in column order.
    pub fn names_with_prefix(&self, prefix: &str) -> Vec<&str> {
        self.names
            .iter()
            .filter(|n| n.starts_with(prefix))
            .map(String::as_str)
            .collect()
    }
}
