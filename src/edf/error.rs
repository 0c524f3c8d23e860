/// Errors that can occur while reading EDF files
#[derive(Debug, thiserror::Error)]
pub enum EdfError {
    /// I/O error reading the file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Header is truncated or structurally invalid
    #[error("Invalid EDF header: {0}")]
    InvalidHeader(String),

    /// A header field could not be parsed
    #[error("Invalid EDF header field '{field}': {value:?}")]
    InvalidField {
        /// Header field name
        field: String,
        /// Raw field contents
        value: String,
    },

    /// The file has no data signals
    #[error("EDF file contains no data signals")]
    NoSignals,
}

impl EdfError {
    pub(crate) fn field(field: &str, value: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.to_string(),
            value: value.into(),
        }
    }
}
