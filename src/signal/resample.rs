//! Frequency-domain resampling.
//!
//! Fourier-method resampling of real signals: the spectrum is truncated or
//! zero-padded to the new length, the Nyquist bin is split or joined when
//! the shorter length is even, and the inverse transform is rescaled by
//! `new_len / old_len`. Signals are treated as periodic.

use ndarray::{Array2, ArrayView2, Axis};
use rustfft::{num_complex::Complex, FftPlanner};

use super::error::SignalError;

/// Largest output length [`resampled_len`] accepts, per channel.
///
/// About 12 days at 250 Hz.
pub const MAX_RESAMPLED_LEN: usize = 1 << 28;

/// Number of samples after resampling `n_samples` from `from_rate` to `to_rate`.
///
/// Truncates toward zero. Rates must be positive and finite, and the result
/// must not exceed [`MAX_RESAMPLED_LEN`].
pub fn resampled_len(n_samples: usize, from_rate: f64, to_rate: f64) -> Result<usize, SignalError> {
    for rate in [from_rate, to_rate] {
        if !(rate.is_finite() && rate > 0.0) {
            return Err(SignalError::InvalidRate(rate));
        }
    }
    let requested = (n_samples as f64 * to_rate / from_rate).floor();
    if !requested.is_finite() || requested > MAX_RESAMPLED_LEN as f64 {
        return Err(SignalError::TooLong {
            n_samples,
            from_rate,
            to_rate,
            requested,
            limit: MAX_RESAMPLED_LEN,
        });
    }
    Ok(requested as usize)
}

/// Resample every column of a samples x channels matrix to `new_len` samples.
pub fn resample(data: ArrayView2<'_, f64>, new_len: usize) -> Array2<f64> {
    let (old_len, n_channels) = data.dim();
    let mut out = Array2::<f64>::zeros((new_len, n_channels));
    if old_len == 0 || new_len == 0 {
        return out;
    }

    let mut planner = FftPlanner::<f64>::new();
    let forward = planner.plan_fft_forward(old_len);
    let inverse = planner.plan_fft_inverse(new_len);

    let mut buffer = vec![Complex::new(0.0, 0.0); old_len];
    let mut spectrum = vec![Complex::new(0.0, 0.0); new_len];

    for (column, mut target) in data.axis_iter(Axis(1)).zip(out.axis_iter_mut(Axis(1))) {
        for (slot, &value) in buffer.iter_mut().zip(column.iter()) {
            *slot = Complex::new(value, 0.0);
        }
        forward.process(&mut buffer);

        resize_spectrum(&buffer, &mut spectrum);
        inverse.process(&mut spectrum);

        // The inverse FFT is unnormalized: 1/new_len * new_len/old_len
        let scale = 1.0 / old_len as f64;
        for (slot, value) in target.iter_mut().zip(spectrum.iter()) {
            *slot = value.re * scale;
        }
    }

    out
}

/// Build a Hermitian spectrum of length `target.len()` from `source`.
fn resize_spectrum(source: &[Complex<f64>], target: &mut [Complex<f64>]) {
    let old_len = source.len();
    let new_len = target.len();
    let n = old_len.min(new_len);
    let nyquist = n / 2 + 1;

    target.iter_mut().for_each(|c| *c = Complex::new(0.0, 0.0));

    // Non-negative frequencies up to and including Nyquist of the shorter length
    let half_len = new_len / 2 + 1;
    let mut half: Vec<Complex<f64>> = vec![Complex::new(0.0, 0.0); half_len];
    half[..nyquist.min(half_len)].copy_from_slice(&source[..nyquist.min(half_len)]);

    if n % 2 == 0 && n / 2 < half_len {
        if new_len < old_len {
            // Fold the discarded negative Nyquist component into the kept one
            half[n / 2] *= 2.0;
        } else if new_len > old_len {
            // Split the old Nyquist component between +/- frequencies
            half[n / 2] *= 0.5;
        }
    }

    for (k, value) in half.iter().enumerate() {
        target[k] = *value;
        let mirror = new_len - k;
        if k > 0 && mirror > k && mirror < new_len {
            target[mirror] = value.conj();
        }
    }
}
