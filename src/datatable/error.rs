//! Errors returned by table construction and direct row mutation.

use thiserror::Error;

/// Errors raised by the data table.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableError {
    /// Two columns share an id.
    #[error("duplicate column id `{0}`")]
    DuplicateColumnId(String),

    /// A row index is past the end of the data.
    #[error("row index {index} out of bounds for {len} rows")]
    RowOutOfBounds {
        /// Requested index.
        index: usize,
        /// Number of rows.
        len: usize,
    },

    /// A field update named a column the row cannot hold.
    #[error("unknown column `{0}`")]
    UnknownColumn(String),

    /// Options could not be parsed.
    #[error("invalid table options: {0}")]
    InvalidOptions(String),
}

impl From<serde_json::Error> for TableError {
    fn from(err: serde_json::Error) -> Self {
        TableError::InvalidOptions(err.to_string())
    }
}

/// Result alias for table operations.
pub type Result<T> = std::result::Result<T, TableError>;
