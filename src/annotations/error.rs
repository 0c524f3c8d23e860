/// Errors that can occur while reading annotation tables
#[derive(Debug, thiserror::Error)]
pub enum AnnotationError {
    /// I/O error reading the table
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// CSV parsing error
    #[error("CSV parsing error: {0}")]
    CsvError(#[from] csv::Error),

    /// Required column not present in the header row
    #[error("Missing required annotation column: {0:?}")]
    MissingColumn(String),

    /// A field could not be parsed
    #[error("Invalid value {value:?} in column {column:?} of row {row}")]
    InvalidValue {
        /// Zero-based data row
        row: usize,
        /// Column name
        column: String,
        /// Raw field contents
        value: String,
    },
}
