//! Typed schema for SSVEP benchmark recordings.
//!
//! The expected layout is a single struct variable `data` with
//!
//! ```text
//! data.EEG                 channels x samples x trials x frequencies  [uV]
//! data.suppl_info.srate    sampling rate [Hz]
//! data.suppl_info.freqs    stimulus frequency of each condition [Hz]
//! data.suppl_info.chan     channels x 4 cell {x, y, z, name}
//! ```

use std::path::Path;

use ndarray::{Array4, ArrayD, Ix4, IxDyn, ShapeBuilder};

use super::error::MatError;
use super::file::MatFile;
use super::value::{MatValue, StructArray};
use crate::channels::ChannelDescriptor;

/// A validated SSVEP recording.
#[derive(Debug, Clone, PartialEq)]
pub struct SsvepRecording {
    /// EEG tensor, channels x samples x trials x frequencies, in microvolts
    pub eeg: Array4<f64>,
    /// Sampling rate in Hz
    pub srate: f64,
    /// Stimulus frequency of each condition along the last EEG axis
    pub freqs: Vec<f64>,
    /// Channel table
    pub chans: Vec<ChannelDescriptor>,
}

impl SsvepRecording {
    /// Load and validate a recording from disk.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, MatError> {
        Self::from_mat(&MatFile::open(path)?)
    }

    /// Validate a parsed MAT file against the recording schema.
    pub fn from_mat(mat: &MatFile) -> Result<Self, MatError> {
        let data = mat
            .require("data")?
            .as_struct()
            .ok_or_else(|| MatError::schema("'data' must be a struct"))?;

        let eeg = eeg_tensor(require_field(data, "data", "EEG")?)?;

        let suppl = require_field(data, "data", "suppl_info")?
            .as_struct()
            .ok_or_else(|| MatError::schema("'data.suppl_info' must be a struct"))?;

        let srate = require_field(suppl, "data.suppl_info", "srate")?
            .as_scalar()
            .ok_or_else(|| MatError::schema("'data.suppl_info.srate' must be a numeric scalar"))?;
        if !(srate.is_finite() && srate > 0.0) {
            return Err(MatError::schema(format!(
                "'data.suppl_info.srate' must be positive, got {}",
                srate
            )));
        }

        let freqs_value = require_field(suppl, "data.suppl_info", "freqs")?
            .as_numeric()
            .filter(|f| f.is_vector())
            .ok_or_else(|| MatError::schema("'data.suppl_info.freqs' must be a numeric vector"))?;
        let freqs = freqs_value.real.clone();

        let (n_channels, _, _, n_conditions) = eeg.dim();
        if freqs.len() != n_conditions {
            return Err(MatError::schema(format!(
                "{} stimulus frequencies for {} conditions in 'data.EEG'",
                freqs.len(),
                n_conditions
            )));
        }

        let chans = parse_channels(require_field(suppl, "data.suppl_info", "chan")?)?;
        if chans.len() != n_channels {
            log::warn!(
                "Channel table lists {} channels but EEG tensor has {}",
                chans.len(),
                n_channels
            );
        }

        Ok(Self {
            eeg,
            srate,
            freqs,
            chans,
        })
    }
}

fn require_field<'a>(
    parent: &'a StructArray,
    parent_name: &str,
    field: &str,
) -> Result<&'a MatValue, MatError> {
    parent
        .field(field)
        .ok_or_else(|| MatError::schema(format!("missing field '{}.{}'", parent_name, field)))
}

/// Build the 4-D tensor, restoring trailing singleton dimensions MATLAB drops.
fn eeg_tensor(value: &MatValue) -> Result<Array4<f64>, MatError> {
    let numeric = value
        .as_numeric()
        .ok_or_else(|| MatError::schema("'data.EEG' must be numeric"))?;

    let mut dims = numeric.dims.clone();
    while dims.len() > 4 && dims.last() == Some(&1) {
        dims.pop();
    }
    if dims.len() > 4 {
        return Err(MatError::schema(format!(
            "'data.EEG' must have at most 4 dimensions, got {:?}",
            numeric.dims
        )));
    }
    dims.resize(4, 1);

    ArrayD::from_shape_vec(IxDyn(&dims).f(), numeric.real.clone())
        .and_then(|a| a.into_dimensionality::<Ix4>())
        .map_err(|e| MatError::schema(format!("'data.EEG' has inconsistent shape: {}", e)))
}

fn parse_channels(value: &MatValue) -> Result<Vec<ChannelDescriptor>, MatError> {
    let cell = value
        .as_cell()
        .ok_or_else(|| MatError::schema("'data.suppl_info.chan' must be a cell array"))?;
    if cell.ncols() != 4 {
        return Err(MatError::schema(format!(
            "'data.suppl_info.chan' must have 4 columns {{x, y, z, name}}, got {:?}",
            cell.dims
        )));
    }

    (0..cell.nrows())
        .map(|row| {
            let coord = |col: usize| {
                cell.get(row, col).and_then(MatValue::as_scalar).ok_or_else(|| {
                    MatError::schema(format!(
                        "channel {} column {} must be a numeric scalar",
                        row, col
                    ))
                })
            };
            let name = cell
                .get(row, 3)
                .and_then(MatValue::as_string)
                .ok_or_else(|| MatError::schema(format!("channel {} name must be text", row)))?;
            Ok(ChannelDescriptor::new(coord(0)?, coord(1)?, coord(2)?, name))
        })
        .collect()
}
