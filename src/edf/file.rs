//! EDF data record decoding.

use std::fs;
use std::path::Path;

use byteorder::{ByteOrder, LittleEndian};
use ndarray::{Array2, ArrayView2};

use super::error::EdfError;
use super::header::{parse_headers, EdfHeader, SignalHeader};
use crate::signal::resample;

/// A decoded EDF/EDF+ recording.
///
/// Only data signals are kept; EDF+ annotation signals are skipped. Samples
/// are converted to physical values and then to volts according to each
/// signal's physical dimension. Signals recorded at a lower rate than the
/// fastest data signal are Fourier-resampled up to it.
#[derive(Debug, Clone)]
pub struct EdfFile {
    header: EdfHeader,
    signals: Vec<SignalHeader>,
    /// Rate of the fastest data signal, Hz
    sample_rate: f64,
    /// channels x samples, volts
    data: Array2<f64>,
    path: String,
}

impl EdfFile {
    /// Open and decode an EDF file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, EdfError> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let bytes = fs::read(path).map_err(|e| {
            EdfError::IoError(std::io::Error::new(
                e.kind(),
                format!("Failed to open EDF file '{}': {}", path_str, e),
            ))
        })?;

        Self::from_bytes(&bytes, path_str)
    }

    /// Decode an EDF file held in memory.
    pub fn from_bytes(bytes: &[u8], label: impl Into<String>) -> Result<Self, EdfError> {
        let label = label.into();
        let (header, all_signals) = parse_headers(bytes)?;

        let data_indices: Vec<usize> = all_signals
            .iter()
            .enumerate()
            .filter(|(_, s)| !s.is_annotation())
            .map(|(i, _)| i)
            .collect();
        if data_indices.is_empty() {
            return Err(EdfError::NoSignals);
        }
        if !(header.record_duration.is_finite() && header.record_duration > 0.0) {
            return Err(EdfError::field(
                "data record duration",
                header.record_duration.to_string(),
            ));
        }

        // Lower-rate signals are brought up to the fastest one
        let samples_per_record = data_indices
            .iter()
            .map(|&i| all_signals[i].samples_per_record)
            .max()
            .unwrap_or(0);

        let record_len: usize = all_signals.iter().map(|s| s.samples_per_record * 2).sum();
        let body = &bytes[header.header_bytes..];
        let n_records = resolve_record_count(&header, body.len(), record_len);

        let scales: Vec<f64> = data_indices
            .iter()
            .map(|&i| {
                let signal = &all_signals[i];
                signal.volts_per_unit().unwrap_or_else(|| {
                    log::warn!(
                        "Unknown physical dimension {:?} for signal '{}'; values left unscaled",
                        signal.physical_dimension,
                        signal.label
                    );
                    1.0
                })
            })
            .collect();

        // Byte offset of each signal inside a record
        let offsets: Vec<usize> = all_signals
            .iter()
            .scan(0usize, |acc, s| {
                let offset = *acc;
                *acc += s.samples_per_record * 2;
                Some(offset)
            })
            .collect();

        let sample_rate = samples_per_record as f64 / header.record_duration;
        let n_samples = n_records * samples_per_record;
        let mut data = Array2::<f64>::zeros((data_indices.len(), n_samples));
        let mut upsampled = Vec::new();

        for (channel, &signal_index) in data_indices.iter().enumerate() {
            let signal = &all_signals[signal_index];
            let spr = signal.samples_per_record;
            let start = offsets[signal_index];
            let mut native = Array2::<f64>::zeros((n_records * spr, 1));

            for record in 0..n_records {
                let record_bytes = &body[record * record_len..(record + 1) * record_len];
                let raw = &record_bytes[start..start + spr * 2];
                for (k, chunk) in raw.chunks_exact(2).enumerate() {
                    let digital = LittleEndian::read_i16(chunk);
                    native[[record * spr + k, 0]] = signal.to_physical(digital) * scales[channel];
                }
            }

            if spr == samples_per_record {
                data.row_mut(channel).assign(&native.column(0));
            } else {
                let resampled = resample(native.view(), n_samples);
                data.row_mut(channel).assign(&resampled.column(0));
                upsampled.push(format!(
                    "{} ({} Hz)",
                    signal.label,
                    signal.sample_rate(header.record_duration)
                ));
            }
        }

        if !upsampled.is_empty() {
            log::warn!(
                "Upsampled {} to {} Hz in '{}'",
                upsampled.join(", "),
                sample_rate,
                label
            );
        }

        let signals: Vec<SignalHeader> = data_indices
            .iter()
            .map(|&i| all_signals[i].clone())
            .collect();

        log::debug!(
            "Decoded '{}': {} channels x {} samples at {} Hz",
            label,
            signals.len(),
            n_samples,
            sample_rate
        );

        Ok(Self {
            header,
            signals,
            sample_rate,
            data,
            path: label,
        })
    }

    /// File-level header.
    pub fn header(&self) -> &EdfHeader {
        &self.header
    }

    /// Headers of the data signals, in channel order.
    pub fn signals(&self) -> &[SignalHeader] {
        &self.signals
    }

    /// Sampling rate of the data matrix in Hz.
    ///
    /// This is the rate of the fastest data signal; slower signals are
    /// upsampled to it on load.
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Raw channel labels.
    pub fn channel_labels(&self) -> Vec<String> {
        self.signals.iter().map(|s| s.label.clone()).collect()
    }

    /// Number of data channels.
    pub fn n_channels(&self) -> usize {
        self.data.nrows()
    }

    /// Number of samples per channel.
    pub fn n_samples(&self) -> usize {
        self.data.ncols()
    }

    /// Recording duration in seconds.
    pub fn duration(&self) -> f64 {
        self.n_samples() as f64 / self.sample_rate()
    }

    /// Signal matrix as channels x samples, in volts.
    pub fn data(&self) -> ArrayView2<'_, f64> {
        self.data.view()
    }

    /// Signal matrix as samples x channels, in volts.
    pub fn samples_by_channels(&self) -> Array2<f64> {
        self.data.t().as_standard_layout().to_owned()
    }

    /// Path (or label) the file was loaded from.
    pub fn path(&self) -> &str {
        &self.path
    }
}

/// Number of complete data records available in the body.
fn resolve_record_count(header: &EdfHeader, body_len: usize, record_len: usize) -> usize {
    if record_len == 0 {
        return 0;
    }
    let available = body_len / record_len;
    if body_len % record_len != 0 {
        log::warn!(
            "EDF body has {} trailing bytes; dropping the partial data record",
            body_len % record_len
        );
    }

    if header.n_records < 0 {
        return available;
    }
    let declared = header.n_records as usize;
    if declared > available {
        log::warn!(
            "EDF header declares {} data records but only {} are present",
            declared,
            available
        );
        available
    } else {
        declared
    }
}
