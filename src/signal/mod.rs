//! # Signal Module
//!
//! Sample-rate conversion and time-interval extraction for multichannel
//! recordings laid out as samples x channels.

mod error;
mod interval;
mod resample;

pub use error::SignalError;
pub use interval::{interval_indices, slice_interval, time_axis};
pub use resample::{resample, resampled_len, MAX_RESAMPLED_LEN};

use ndarray::{Array2, ArrayView2};

/// Resample a samples x channels matrix from `from_rate` to `to_rate` Hz.
///
/// The output length is `floor(n * to_rate / from_rate)`. Equal rates return
/// a copy of the input. Fails before allocating when the output would exceed
/// [`MAX_RESAMPLED_LEN`] samples.
pub fn resample_to_rate(
    data: ArrayView2<'_, f64>,
    from_rate: f64,
    to_rate: f64,
) -> Result<Array2<f64>, SignalError> {
    let new_len = resampled_len(data.nrows(), from_rate, to_rate)?;
    if from_rate == to_rate {
        return Ok(data.to_owned());
    }
    log::debug!(
        "Resampling {} samples at {} Hz to {} samples at {} Hz",
        data.nrows(),
        from_rate,
        new_len,
        to_rate
    );
    Ok(resample(data, new_len))
}
