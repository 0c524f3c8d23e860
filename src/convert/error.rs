use crate::annotations::AnnotationError;
use crate::archive::ArchiveError;
use crate::edf::EdfError;
use crate::mat::MatError;
use crate::signal::SignalError;

/// Errors that can occur during a conversion
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    /// MAT file could not be read or does not match the recording schema
    #[error("MAT error: {0}")]
    MatError(#[from] MatError),

    /// EDF file could not be read
    #[error("EDF error: {0}")]
    EdfError(#[from] EdfError),

    /// Annotation table could not be read
    #[error("Annotation error: {0}")]
    AnnotationError(#[from] AnnotationError),

    /// Recording cannot be resampled to the target rate
    #[error("Signal error: {0}")]
    SignalError(#[from] SignalError),

    /// Archive could not be written
    #[error("Archive error: {0}")]
    ArchiveError(#[from] ArchiveError),

    /// Filesystem error, e.g. creating the output directory
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Conversion parameters are inconsistent
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Requested trial does not exist in the recording
    #[error("Trial index {trial} out of range for {n_trials} trials")]
    TrialOutOfRange {
        /// Requested zero-based trial
        trial: usize,
        /// Trials in the recording
        n_trials: usize,
    },
}
