//! Error types for table construction and export.

use thiserror::Error;

/// Errors raised while building a table or exporting it.
///
/// Pipeline stages (search, sort, paginate) never fail; only construction
/// and the export writer can.
#[derive(Debug, Error)]
pub enum TableError {
    /// Two columns share the same key.
    #[error("Duplicate column key: {0}")]
    DuplicateColumn(String),

    /// A column names a field that no record in the dataset carries.
    #[error("Column key not found in dataset: {0}")]
    UnknownColumn(String),

    /// A formatter name in a dataset document is not recognised.
    #[error("Unknown formatter: {0}")]
    UnknownFormatter(String),

    /// The delimited-text writer rejected a record.
    #[error("Export failed: {0}")]
    Csv(#[from] csv::Error),

    /// Writing the export file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The export buffer was not valid UTF-8.
    #[error("Export is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}
