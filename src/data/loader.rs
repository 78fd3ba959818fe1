//! Delimited-text loading.

use super::{DataError, ObservationTable};
use csv::{ReaderBuilder, Trim};
use log::debug;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Load a comma-separated file with a header row.
///
/// The file is opened and closed within this call. A missing or unreadable
/// file is reported as `DataError::Open`.
pub fn load_csv(path: impl AsRef<Path>) -> Result<ObservationTable, DataError> {
    load_delimited(path, b',')
}

/// Load a delimited file with a header row.
pub fn load_delimited(
    path: impl AsRef<Path>,
    delimiter: u8,
) -> Result<ObservationTable, DataError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| DataError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let table = read_delimited(file, delimiter)?;
    debug!(
        "loaded {} rows x {} columns from {}",
        table.n_rows(),
        table.n_columns(),
        path.display()
    );
    Ok(table)
}

/// Read delimited text with a header row from any reader.
pub fn read_delimited<R: Read>(reader: R, delimiter: u8) -> Result<ObservationTable, DataError> {
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if headers.is_empty() || headers.iter().all(String::is_empty) {
        return Err(DataError::MissingHeader);
    }

    let mut records = Vec::new();
    for record in reader.records() {
        let record = record?;
        records.push(record.iter().map(str::to_string).collect());
    }

    ObservationTable::from_records(headers, records)
}
