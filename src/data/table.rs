//! In-memory observation table.

use super::DataError;
use std::collections::HashSet;
use std::fmt;

/// Type inferred for a raw column before cleaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Every non-empty cell parses as an integer and no cell is empty.
    Integer,
    /// Every non-empty cell parses as a number.
    Float,
    /// Anything else.
    Text,
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnKind::Integer => f.write_str("integer"),
            ColumnKind::Float => f.write_str("float"),
            ColumnKind::Text => f.write_str("text"),
        }
    }
}

/// Cell storage of one column.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    /// Raw cells as read from the file.
    Text(Vec<String>),
    /// Coerced numbers; NaN marks a missing value.
    Numeric(Vec<f64>),
}

impl ColumnData {
    fn len(&self) -> usize {
        match self {
            ColumnData::Text(v) => v.len(),
            ColumnData::Numeric(v) => v.len(),
        }
    }

    fn kind_name(&self) -> &'static str {
        match self {
            ColumnData::Text(_) => "text",
            ColumnData::Numeric(_) => "numeric",
        }
    }
}

/// A named column together with the kind inferred at load time.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub kind: ColumnKind,
    pub data: ColumnData,
}

impl Column {
    /// A text column whose kind is inferred from its cells.
    pub fn text(name: impl Into<String>, cells: Vec<String>) -> Self {
        let kind = infer_kind(&cells);
        Self {
            name: name.into(),
            kind,
            data: ColumnData::Text(cells),
        }
    }

    /// A numeric column.
    pub fn numeric(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            kind: ColumnKind::Float,
            data: ColumnData::Numeric(values),
        }
    }

    /// Render cell `row` for display.
    pub fn display_cell(&self, row: usize) -> String {
        match &self.data {
            ColumnData::Text(v) => v[row].clone(),
            ColumnData::Numeric(v) if v[row].is_nan() => "NaN".to_string(),
            ColumnData::Numeric(v) => format!("{}", v[row]),
        }
    }
}

/// Rows are observations, columns are named variables. All columns have
/// the same length.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservationTable {
    columns: Vec<Column>,
    n_rows: usize,
}

impl ObservationTable {
    /// Build a table from columns, checking lengths and name uniqueness.
    pub fn new(columns: Vec<Column>) -> Result<Self, DataError> {
        let n_rows = columns.first().map_or(0, |c| c.data.len());

        let mut seen = HashSet::new();
        for column in &columns {
            if !seen.insert(column.name.as_str()) {
                return Err(DataError::DuplicateColumn(column.name.clone()));
            }
            if column.data.len() != n_rows {
                return Err(DataError::RaggedColumn {
                    column: column.name.clone(),
                    found: column.data.len(),
                    expected: n_rows,
                });
            }
        }

        Ok(Self { columns, n_rows })
    }

    /// Build a text table from a header and row-major records.
    pub fn from_records(
        headers: Vec<String>,
        records: Vec<Vec<String>>,
    ) -> Result<Self, DataError> {
        let mut cells: Vec<Vec<String>> = vec![Vec::with_capacity(records.len()); headers.len()];
        for record in records {
            for (j, cell) in record.into_iter().enumerate() {
                if let Some(column) = cells.get_mut(j) {
                    column.push(cell);
                }
            }
        }

        let columns = headers
            .into_iter()
            .zip(cells)
            .map(|(name, values)| Column::text(name, values))
            .collect();
        Self::new(columns)
    }

    /// Number of observations.
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Number of columns.
    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    /// All columns in header order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Column names in header order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Whether a column with this name exists.
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    /// Look up a column by name.
    pub fn column(&self, name: &str) -> Result<&Column, DataError> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| DataError::ColumnNotFound(name.to_string()))
    }

    /// Cells of a text column.
    pub fn text(&self, name: &str) -> Result<&[String], DataError> {
        let column = self.column(name)?;
        match &column.data {
            ColumnData::Text(v) => Ok(v),
            other => Err(DataError::WrongColumnType {
                column: name.to_string(),
                expected: "text",
                found: other.kind_name(),
            }),
        }
    }

    /// Values of a numeric column.
    pub fn numeric(&self, name: &str) -> Result<&[f64], DataError> {
        let column = self.column(name)?;
        match &column.data {
            ColumnData::Numeric(v) => Ok(v),
            other => Err(DataError::WrongColumnType {
                column: name.to_string(),
                expected: "numeric",
                found: other.kind_name(),
            }),
        }
    }

    /// Convert a column to numbers in place.
    ///
    /// Cells that do not parse as a finite number become NaN. Returns the
    /// number of missing values after conversion. Already-numeric columns
    /// are left as they are.
    pub fn coerce_numeric(&mut self, name: &str) -> Result<usize, DataError> {
        let column = self
            .columns
            .iter_mut()
            .find(|c| c.name == name)
            .ok_or_else(|| DataError::ColumnNotFound(name.to_string()))?;

        if let ColumnData::Text(cells) = &column.data {
            let values = cells.iter().map(|c| parse_number(c)).collect();
            column.data = ColumnData::Numeric(values);
        }

        match &column.data {
            ColumnData::Numeric(v) => Ok(v.iter().filter(|x| x.is_nan()).count()),
            ColumnData::Text(_) => Ok(0),
        }
    }

    /// Keep only the rows at the given indices, in that order.
    pub fn select_rows(&self, rows: &[usize]) -> Self {
        let columns = self
            .columns
            .iter()
            .map(|c| Column {
                name: c.name.clone(),
                kind: c.kind,
                data: match &c.data {
                    ColumnData::Text(v) => ColumnData::Text(rows.iter().map(|&i| v[i].clone()).collect()),
                    ColumnData::Numeric(v) => ColumnData::Numeric(rows.iter().map(|&i| v[i]).collect()),
                },
            })
            .collect();

        Self {
            columns,
            n_rows: rows.len(),
        }
    }

    /// The first `n` rows.
    pub fn head(&self, n: usize) -> Self {
        let rows: Vec<usize> = (0..n.min(self.n_rows)).collect();
        self.select_rows(&rows)
    }
}

/// Parse a cell the way the cleaner does: trimmed, finite numbers only.
pub fn parse_number(cell: &str) -> f64 {
    match cell.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => f64::NAN,
    }
}

fn infer_kind(cells: &[String]) -> ColumnKind {
    let mut any_empty = false;
    let mut all_int = true;

    for cell in cells {
        let cell = cell.trim();
        if cell.is_empty() {
            any_empty = true;
            continue;
        }
        if cell.parse::<i64>().is_ok() {
            continue;
        }
        all_int = false;
        if cell.parse::<f64>().is_err() {
            return ColumnKind::Text;
        }
    }

    if all_int && !any_empty {
        ColumnKind::Integer
    } else {
        ColumnKind::Float
    }
}
