use ndarray_npy::{ReadNpyError, WriteNpyError};

/// Errors that can occur while writing or reading archives
#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    /// Filesystem error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Zip container error
    #[error("ZIP error: {0}")]
    ZipError(#[from] zip::result::ZipError),

    /// NPY encoding error
    #[error("Failed to encode array: {0}")]
    WriteNpyError(#[from] WriteNpyError),

    /// NPY decoding error
    #[error("Failed to decode array: {0}")]
    ReadNpyError(#[from] ReadNpyError),

    /// JSON entry error
    #[error("JSON serialization error: {0}")]
    SerdeJsonError(#[from] serde_json::Error),

    /// Requested entry is absent
    #[error("Archive entry not found: {0}")]
    MissingEntry(String),

    /// Entry name already used in this archive
    #[error("Archive entry written twice: {0}")]
    DuplicateEntry(String),

    /// Entry layout does not match the archive format
    #[error("Invalid archive: {0}")]
    InvalidFormat(String),
}
