//! Numeric coercion and removal of incomplete observations.

use super::{DataError, ObservationTable};
use crate::core::AnalysisSchema;
use log::warn;
use std::fmt;

/// What the cleaner removed.
#[derive(Debug, Clone, PartialEq)]
pub struct CleaningReport {
    /// Number of rows before cleaning.
    pub n_original: usize,

    /// Number of rows kept.
    pub n_clean: usize,

    /// Missing values per required column after coercion, in the order the
    /// columns were requested.
    pub missing_per_column: Vec<(String, usize)>,

    /// Original indices of dropped rows.
    pub dropped_rows: Vec<usize>,
}

impl CleaningReport {
    /// Whether any required value was missing.
    pub fn has_missing(&self) -> bool {
        self.missing_per_column.iter().any(|(_, n)| *n > 0)
    }

    /// Number of rows removed.
    pub fn n_dropped(&self) -> usize {
        self.dropped_rows.len()
    }
}

impl fmt::Display for CleaningReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "WARNING: some values could not be converted or are missing.")?;
        for (column, n) in &self.missing_per_column {
            writeln!(f, "  {column:<20} {n}")?;
        }
        write!(
            f,
            "{} of {} rows will be dropped.",
            self.n_dropped(),
            self.n_original
        )
    }
}

/// Coerce `numeric` columns and drop every row with a missing value in a
/// numeric column or an empty cell in a `categorical` column.
pub fn clean(
    table: &ObservationTable,
    numeric: &[&str],
    categorical: &[&str],
) -> Result<(ObservationTable, CleaningReport), DataError> {
    let n = table.n_rows();
    let mut coerced = table.clone();
    let mut missing_per_column = Vec::with_capacity(numeric.len() + categorical.len());
    let mut missing_mask = vec![false; n];

    for &name in numeric {
        let n_missing = coerced.coerce_numeric(name)?;
        for (i, v) in coerced.numeric(name)?.iter().enumerate() {
            if v.is_nan() {
                missing_mask[i] = true;
            }
        }
        missing_per_column.push((name.to_string(), n_missing));
    }

    for &name in categorical {
        let cells = coerced.text(name)?;
        let mut n_missing = 0;
        for (i, cell) in cells.iter().enumerate() {
            if cell.trim().is_empty() {
                missing_mask[i] = true;
                n_missing += 1;
            }
        }
        missing_per_column.push((name.to_string(), n_missing));
    }

    let kept_indices: Vec<usize> = missing_mask
        .iter()
        .enumerate()
        .filter_map(|(i, &had_na)| if !had_na { Some(i) } else { None })
        .collect();
    let dropped_rows: Vec<usize> = missing_mask
        .iter()
        .enumerate()
        .filter_map(|(i, &had_na)| if had_na { Some(i) } else { None })
        .collect();

    if kept_indices.is_empty() && n > 0 {
        return Err(DataError::NoValidRows {
            dropped: dropped_rows.len(),
        });
    }

    let report = CleaningReport {
        n_original: n,
        n_clean: kept_indices.len(),
        missing_per_column,
        dropped_rows,
    };

    if report.n_dropped() > 0 {
        warn!(
            "dropping {} of {} rows with missing or unparseable values",
            report.n_dropped(),
            n
        );
        Ok((coerced.select_rows(&kept_indices), report))
    } else {
        Ok((coerced, report))
    }
}

/// Clean a table for the columns named by `schema`.
pub fn clean_for_schema(
    table: &ObservationTable,
    schema: &AnalysisSchema,
) -> Result<(ObservationTable, CleaningReport), DataError> {
    clean(
        table,
        &schema.numeric_columns(),
        &schema.categorical_columns(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::read_delimited;

    fn sample() -> ObservationTable {
        let text = "id,g,x,y\n\
                    1,L,1,2.0\n\
                    2,P,abc,3.0\n\
                    3,L,2,\n\
                    4,,3,4.0\n\
                    5,P,4,5.0\n";
        read_delimited(text.as_bytes(), b',').unwrap()
    }

    #[test]
    fn test_clean_drops_incomplete_rows() {
        let (clean_table, report) = clean(&sample(), &["x", "y"], &["g"]).unwrap();

        assert_eq!(report.n_original, 5);
        assert_eq!(report.n_clean, 2);
        assert_eq!(report.dropped_rows, vec![1, 2, 3]);
        assert_eq!(
            report.missing_per_column,
            vec![
                ("x".to_string(), 1),
                ("y".to_string(), 1),
                ("g".to_string(), 1)
            ]
        );
        assert!(report.has_missing());
        assert_eq!(clean_table.numeric("x").unwrap(), &[1.0, 4.0]);
        assert_eq!(clean_table.text("id").unwrap(), &["1", "5"]);
    }

    #[test]
    fn test_clean_data_untouched() {
        let text = "x,y\n1,2\n3,4\n";
        let table = read_delimited(text.as_bytes(), b',').unwrap();
        let (clean_table, report) = clean(&table, &["x", "y"], &[]).unwrap();

        assert!(!report.has_missing());
        assert_eq!(report.n_dropped(), 0);
        assert_eq!(clean_table.n_rows(), 2);
        assert_eq!(clean_table.numeric("y").unwrap(), &[2.0, 4.0]);
    }

    #[test]
    fn test_all_rows_invalid() {
        let table = read_delimited("x\nfoo\nbar\n".as_bytes(), b',').unwrap();
        let result = clean(&table, &["x"], &[]);
        assert!(matches!(result, Err(DataError::NoValidRows { dropped: 2 })));
    }

    #[test]
    fn test_missing_required_column() {
        let result = clean(&sample(), &["salary"], &[]);
        assert!(matches!(result, Err(DataError::ColumnNotFound(c)) if c == "salary"));
    }

    #[test]
    fn test_report_display_lists_columns() {
        let (_, report) = clean(&sample(), &["x", "y"], &["g"]).unwrap();
        let text = report.to_string();
        assert!(text.starts_with("WARNING"));
        assert!(text.contains("3 of 5 rows will be dropped."));
    }
}
