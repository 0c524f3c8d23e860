/// Errors that can occur while resampling
#[derive(Debug, thiserror::Error)]
pub enum SignalError {
    /// A sampling rate is zero, negative or not finite
    #[error("Invalid sampling rate: {0} Hz")]
    InvalidRate(f64),

    /// The resampled signal would exceed [`MAX_RESAMPLED_LEN`](super::MAX_RESAMPLED_LEN)
    #[error("Resampling {n_samples} samples from {from_rate} Hz to {to_rate} Hz needs {requested} samples, limit is {limit}")]
    TooLong {
        /// Input length
        n_samples: usize,
        /// Native rate in Hz
        from_rate: f64,
        /// Target rate in Hz
        to_rate: f64,
        /// Output length the rates imply
        requested: f64,
        /// Largest accepted output length
        limit: usize,
    },
}
