//! Loading, cleaning and describing the observation table.
//!
//! Every cell is read as text; the cleaner then coerces the declared numeric
//! columns and drops incomplete rows, reporting what it removed:
//!
//! ```rust,ignore
//! use dummy_regress::core::AnalysisSchema;
//! use dummy_regress::data::{clean_for_schema, load_csv};
//!
//! let raw = load_csv("data/gaji_dummy.csv")?;
//! let (table, report) = clean_for_schema(&raw, &AnalysisSchema::salary())?;
//! if report.has_missing() {
//!     println!("{report}");
//! }
//! ```

mod clean;
mod describe;
mod loader;
mod table;

pub use clean::{clean, clean_for_schema, CleaningReport};
pub use describe::{numeric_summary, value_counts, LevelCount, NumericSummary};
pub use loader::{load_csv, load_delimited, read_delimited};
pub use table::{parse_number, Column, ColumnData, ColumnKind, ObservationTable};

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or cleaning data.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to open data file '{}': {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed delimited data: {0}")]
    Csv(#[from] csv::Error),

    #[error("the input has no header row")]
    MissingHeader,

    #[error("column '{0}' appears more than once")]
    DuplicateColumn(String),

    #[error("required column '{0}' was not found; check spelling and case")]
    ColumnNotFound(String),

    #[error("column '{column}' is {found} but a {expected} column is required")]
    WrongColumnType {
        column: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("column '{column}' has {found} values but the table has {expected} rows")]
    RaggedColumn {
        column: String,
        found: usize,
        expected: usize,
    },

    #[error("no rows remain after dropping {dropped} incomplete observations")]
    NoValidRows { dropped: usize },
}
