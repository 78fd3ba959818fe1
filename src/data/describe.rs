//! Descriptive statistics over the observation table.

use super::{DataError, ObservationTable};
use std::collections::BTreeMap;

/// Count of one combination of categorical levels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelCount {
    pub levels: Vec<String>,
    pub count: usize,
}

/// Count each distinct combination of the given text columns.
///
/// Sorted by count, descending; ties in lexicographic order of the levels.
pub fn value_counts(
    table: &ObservationTable,
    columns: &[&str],
) -> Result<Vec<LevelCount>, DataError> {
    let cells = columns
        .iter()
        .map(|&c| table.text(c))
        .collect::<Result<Vec<_>, _>>()?;

    let mut counts: BTreeMap<Vec<String>, usize> = BTreeMap::new();
    for i in 0..table.n_rows() {
        let key = cells.iter().map(|col| col[i].clone()).collect();
        *counts.entry(key).or_insert(0) += 1;
    }

    let mut out: Vec<LevelCount> = counts
        .into_iter()
        .map(|(levels, count)| LevelCount { levels, count })
        .collect();
    // stable sort keeps the BTreeMap order among ties
    out.sort_by(|a, b| b.count.cmp(&a.count));
    Ok(out)
}

/// Five-number-style summary of a numeric column.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericSummary {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (n - 1 denominator).
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

/// Summarise the non-missing values of a numeric column.
pub fn numeric_summary(
    table: &ObservationTable,
    column: &str,
) -> Result<NumericSummary, DataError> {
    let values: Vec<f64> = table
        .numeric(column)?
        .iter()
        .copied()
        .filter(|v| !v.is_nan())
        .collect();
    let count = values.len();

    if count == 0 {
        return Ok(NumericSummary {
            count,
            mean: f64::NAN,
            std: f64::NAN,
            min: f64::NAN,
            max: f64::NAN,
        });
    }

    let mean = values.iter().sum::<f64>() / count as f64;
    let std = if count > 1 {
        let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
        (ss / (count - 1) as f64).sqrt()
    } else {
        f64::NAN
    };

    Ok(NumericSummary {
        count,
        mean,
        std,
        min: values.iter().copied().fold(f64::INFINITY, f64::min),
        max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{read_delimited, Column};

    #[test]
    fn test_value_counts_ordering() {
        let text = "g,e\nL,S1\nP,SMA\nL,S1\nP,S1\nL,SMA\nP,SMA\n";
        let table = read_delimited(text.as_bytes(), b',').unwrap();
        let counts = value_counts(&table, &["g", "e"]).unwrap();

        assert_eq!(counts.len(), 4);
        assert_eq!(counts[0].levels, vec!["L", "S1"]);
        assert_eq!(counts[0].count, 2);
        assert_eq!(counts[1].levels, vec!["P", "SMA"]);
        assert_eq!(counts[2].levels, vec!["L", "SMA"]);
        assert_eq!(counts[3].count, 1);
    }

    #[test]
    fn test_numeric_summary() {
        let table =
            ObservationTable::new(vec![Column::numeric("x", vec![1.0, 2.0, f64::NAN, 3.0])])
                .unwrap();
        let summary = numeric_summary(&table, "x").unwrap();

        assert_eq!(summary.count, 3);
        assert!((summary.mean - 2.0).abs() < 1e-12);
        assert!((summary.std - 1.0).abs() < 1e-12);
        assert_eq!(summary.min, 1.0);
        assert_eq!(summary.max, 3.0);
    }

    #[test]
    fn test_value_counts_requires_text() {
        let table = ObservationTable::new(vec![Column::numeric("x", vec![1.0])]).unwrap();
        assert!(value_counts(&table, &["x"]).is_err());
    }
}
