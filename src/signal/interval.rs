//! Time axes and interval extraction.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};

/// Evenly spaced sample times from 0 to `n_samples / rate` inclusive.
///
/// Endpoint-inclusive: the step is `duration / (n - 1)` and the last element is
/// exactly the duration, so sample times are slightly stretched relative to
/// `i / rate`.
pub fn time_axis(n_samples: usize, rate: f64) -> Array1<f64> {
    match n_samples {
        0 => Array1::zeros(0),
        1 => Array1::zeros(1),
        n => {
            let stop = n as f64 / rate;
            let step = stop / (n - 1) as f64;
            let mut axis = Array1::from_shape_fn(n, |i| i as f64 * step);
            axis[n - 1] = stop;
            axis
        }
    }
}

/// Indices of samples whose time lies in `[start, stop]`.
pub fn interval_indices(time: ArrayView1<'_, f64>, start: f64, stop: f64) -> Vec<usize> {
    time.iter()
        .enumerate()
        .filter(|(_, &t)| t >= start && t <= stop)
        .map(|(i, _)| i)
        .collect()
}

/// Rows of a samples x channels matrix whose time lies in `[start, stop]`.
///
/// Returns a `(0, channels)` matrix when no sample falls in the interval,
/// including when `start > stop`.
pub fn slice_interval(
    data: ArrayView2<'_, f64>,
    time: ArrayView1<'_, f64>,
    start: f64,
    stop: f64,
) -> Array2<f64> {
    let indices = interval_indices(time, start, stop);
    data.select(Axis(0), &indices)
}
