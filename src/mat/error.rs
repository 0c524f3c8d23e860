/// Errors that can occur while reading MAT files
#[derive(Debug, thiserror::Error)]
pub enum MatError {
    /// I/O error reading the file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The file is not a level-5 MAT file or is truncated
    #[error("Invalid MAT file: {0}")]
    InvalidFormat(String),

    /// MAT-file version this reader does not handle (level 4, v7.3/HDF5)
    #[error("Unsupported MAT-file version: {0}")]
    UnsupportedVersion(String),

    /// Array class this reader does not handle (sparse, object, function handle)
    #[error("Unsupported MAT array class {class} for variable '{name}'")]
    UnsupportedClass {
        /// Raw mxCLASS identifier
        class: u8,
        /// Variable (or field) name
        name: String,
    },

    /// Data element type not valid in this position
    #[error("Unexpected data type {0} in MAT element")]
    UnexpectedDataType(u32),

    /// A required variable or field is missing or has the wrong shape/type
    #[error("Schema error: {0}")]
    Schema(String),
}

impl MatError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidFormat(message.into())
    }

    pub(crate) fn schema(message: impl Into<String>) -> Self {
        Self::Schema(message.into())
    }
}
