//! Analysis schema: which columns play which role.

use super::decision::DEFAULT_ALPHA;
use super::options::OptionsError;
use crate::design::{CategoricalSpec, ReferenceLevel};
use std::collections::HashSet;

/// Describes the roles of the dataset's columns and the significance level.
///
/// The loader coerces `numeric_columns()` to numbers, the design builder turns
/// `numeric_predictors` and `categorical` into the design matrix, and the
/// reports use `alpha` for every decision.
#[derive(Debug, Clone)]
pub struct AnalysisSchema {
    /// Name of the numeric response column.
    pub response: String,
    /// Numeric predictor columns, in design-matrix order.
    pub numeric_predictors: Vec<String>,
    /// Categorical predictors, dummy-coded in the order given.
    pub categorical: Vec<CategoricalSpec>,
    /// Significance level for every decision rule.
    pub alpha: f64,
}

impl AnalysisSchema {
    /// Start a schema for the given response column.
    pub fn builder(response: impl Into<String>) -> AnalysisSchemaBuilder {
        AnalysisSchemaBuilder {
            schema: AnalysisSchema {
                response: response.into(),
                numeric_predictors: Vec::new(),
                categorical: Vec::new(),
                alpha: DEFAULT_ALPHA,
            },
        }
    }

    /// Schema of the salary dataset:
    /// `salary_million ~ experience_years + gender + education_level`.
    pub fn salary() -> Self {
        Self {
            response: "salary_million".to_string(),
            numeric_predictors: vec!["experience_years".to_string()],
            categorical: vec![
                CategoricalSpec::new("gender"),
                CategoricalSpec::new("education_level").with_prefix("edu"),
            ],
            alpha: DEFAULT_ALPHA,
        }
    }

    /// Columns that must be numeric: predictors followed by the response.
    pub fn numeric_columns(&self) -> Vec<&str> {
        self.numeric_predictors
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(self.response.as_str()))
            .collect()
    }

    /// Names of the categorical columns.
    pub fn categorical_columns(&self) -> Vec<&str> {
        self.categorical.iter().map(|c| c.column.as_str()).collect()
    }

    /// Validate column roles and the significance level.
    pub fn validate(&self) -> Result<(), OptionsError> {
        if !(self.alpha > 0.0 && self.alpha < 1.0) {
            return Err(OptionsError::InvalidSignificanceLevel(self.alpha));
        }
        if self.numeric_predictors.is_empty() && self.categorical.is_empty() {
            return Err(OptionsError::NoPredictors);
        }

        let mut seen = HashSet::new();
        for name in self
            .numeric_columns()
            .into_iter()
            .chain(self.categorical_columns())
        {
            if !seen.insert(name) {
                return Err(OptionsError::DuplicateColumn(name.to_string()));
            }
        }
        Ok(())
    }
}

impl Default for AnalysisSchema {
    fn default() -> Self {
        Self::salary()
    }
}

/// Builder for `AnalysisSchema`.
#[derive(Debug, Clone)]
pub struct AnalysisSchemaBuilder {
    schema: AnalysisSchema,
}

impl AnalysisSchemaBuilder {
    /// Add a numeric predictor.
    pub fn numeric(mut self, column: impl Into<String>) -> Self {
        self.schema.numeric_predictors.push(column.into());
        self
    }

    /// Add a categorical predictor with its own prefix and reference policy.
    pub fn categorical(mut self, spec: CategoricalSpec) -> Self {
        self.schema.categorical.push(spec);
        self
    }

    /// Add a categorical predictor using the column name as prefix and the
    /// lexicographically first level as reference.
    pub fn categorical_column(self, column: impl Into<String>) -> Self {
        self.categorical(CategoricalSpec::new(column))
    }

    /// Set the reference level of an already declared categorical column.
    pub fn reference(mut self, column: &str, level: impl Into<String>) -> Self {
        let level = level.into();
        if let Some(spec) = self
            .schema
            .categorical
            .iter_mut()
            .find(|c| c.column == column)
        {
            spec.reference = ReferenceLevel::Named(level);
        }
        self
    }

    /// Set the significance level.
    pub fn alpha(mut self, alpha: f64) -> Self {
        self.schema.alpha = alpha;
        self
    }

    /// Build and validate the schema.
    pub fn build(self) -> Result<AnalysisSchema, OptionsError> {
        self.schema.validate()?;
        Ok(self.schema)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_salary_schema() {
        let schema = AnalysisSchema::salary();
        assert!(schema.validate().is_ok());
        assert_eq!(
            schema.numeric_columns(),
            vec!["experience_years", "salary_million"]
        );
        assert_eq!(
            schema.categorical_columns(),
            vec!["gender", "education_level"]
        );
        assert_eq!(schema.categorical[1].prefix, "edu");
    }

    #[test]
    fn test_builder_sets_reference() {
        let schema = AnalysisSchema::builder("y")
            .numeric("x")
            .categorical_column("group")
            .reference("group", "b")
            .build()
            .unwrap();

        assert_eq!(
            schema.categorical[0].reference,
            ReferenceLevel::Named("b".to_string())
        );
    }

    #[test]
    fn test_duplicate_column_rejected() {
        let result = AnalysisSchema::builder("y").numeric("x").numeric("x").build();
        assert!(matches!(result, Err(OptionsError::DuplicateColumn(c)) if c == "x"));
    }

    #[test]
    fn test_invalid_alpha_rejected() {
        let result = AnalysisSchema::builder("y").numeric("x").alpha(1.5).build();
        assert!(matches!(
            result,
            Err(OptionsError::InvalidSignificanceLevel(_))
        ));
    }

    #[test]
    fn test_no_predictors_rejected() {
        let result = AnalysisSchema::builder("y").build();
        assert!(matches!(result, Err(OptionsError::NoPredictors)));
    }
}
