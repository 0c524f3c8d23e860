//! MAT (SSVEP benchmark) to archive conversion.

use std::path::Path;

use ndarray::{Array1, Array3, Axis};

use super::config::{SaveOptions, SsvepConfig};
use super::error::ConvertError;
use crate::archive::{ArchiveError, ArchiveKind, ArchiveReader, ArchiveStats, ArchiveWriter, Manifest};
use crate::channels::ChannelDescriptor;
use crate::mat::SsvepRecording;

/// Output of the SSVEP converter.
#[derive(Debug, Clone, PartialEq)]
pub struct SsvepConversion {
    /// samples x channels x selected frequencies, volts
    pub eeg: Array3<f64>,
    /// Sampling rate in Hz
    pub srate: f64,
    /// Configured target frequencies
    pub ssvep: Vec<f64>,
    /// Channel table
    pub chans: Vec<ChannelDescriptor>,
}

impl SsvepConversion {
    /// Split into `(eeg, srate, ssvep, chans)`.
    pub fn into_parts(self) -> (Array3<f64>, f64, Vec<f64>, Vec<ChannelDescriptor>) {
        (self.eeg, self.srate, self.ssvep, self.chans)
    }

    /// Write `eeg`, `srate`, `ssvep` and `chans` to an archive.
    pub fn write_archive(&self, path: &Path, source: &str) -> Result<ArchiveStats, ArchiveError> {
        let mut writer = ArchiveWriter::create(path)?;
        writer.write_array("eeg", &self.eeg)?;
        writer.write_scalar("srate", self.srate)?;
        writer.write_array("ssvep", &Array1::from(self.ssvep.clone()))?;
        writer.write_json("chans", &self.chans)?;
        writer.write_manifest(&Manifest::new(ArchiveKind::Ssvep).with_source(source))?;
        writer.finish()
    }

    /// Read a result back from an archive written by [`Self::write_archive`].
    pub fn read_archive(path: &Path) -> Result<Self, ArchiveError> {
        let mut reader = ArchiveReader::open(path)?;
        let manifest = reader.manifest()?;
        if manifest.kind != ArchiveKind::Ssvep {
            return Err(ArchiveError::InvalidFormat(format!(
                "expected an ssvep archive, found {}",
                manifest.kind
            )));
        }
        Ok(Self {
            eeg: reader.read_array("eeg")?,
            srate: reader.read_scalar("srate")?,
            ssvep: reader.read_array::<ndarray::Ix1>("ssvep")?.to_vec(),
            chans: reader.read_json("chans")?,
        })
    }
}

/// Converts SSVEP MAT recordings.
#[derive(Debug, Clone, Default)]
pub struct SsvepConverter {
    config: SsvepConfig,
}

impl SsvepConverter {
    /// Converter with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Converter with explicit settings.
    pub fn with_config(config: SsvepConfig) -> Self {
        Self { config }
    }

    /// Active settings.
    pub fn config(&self) -> &SsvepConfig {
        &self.config
    }

    /// Load a MAT file, convert it and optionally persist the result.
    pub fn convert(
        &self,
        path: impl AsRef<Path>,
        save: &SaveOptions,
    ) -> Result<SsvepConversion, ConvertError> {
        let path = path.as_ref();
        save.validate()?;
        log::info!("Converting SSVEP recording {}", path.display());

        let recording = SsvepRecording::open(path)?;
        let conversion = self.convert_recording(&recording)?;

        if save.save_file {
            let archive = save.prepare()?;
            conversion.write_archive(&archive, &path.display().to_string())?;
        }
        Ok(conversion)
    }

    /// Select the configured trial and frequencies from a loaded recording.
    ///
    /// Frequencies keep the recording's order. When none of the targets is
    /// present the frequency axis is empty.
    pub fn convert_recording(
        &self,
        recording: &SsvepRecording,
    ) -> Result<SsvepConversion, ConvertError> {
        let (_, _, n_trials, _) = recording.eeg.dim();
        let trial = self.config.trial_index;
        if trial >= n_trials {
            return Err(ConvertError::TrialOutOfRange { trial, n_trials });
        }

        let selected: Vec<usize> = recording
            .freqs
            .iter()
            .enumerate()
            .filter(|(_, f)| self.config.target_frequencies.contains(*f))
            .map(|(i, _)| i)
            .collect();
        if selected.is_empty() {
            log::warn!(
                "None of the target frequencies {:?} occur in {:?}",
                self.config.target_frequencies,
                recording.freqs
            );
        }

        // channels x samples x frequencies -> samples x channels x frequencies
        let scale = self.config.amplitude_scale;
        let eeg = recording
            .eeg
            .index_axis(Axis(2), trial)
            .select(Axis(2), &selected)
            .permuted_axes([1, 0, 2])
            .as_standard_layout()
            .mapv(|v| v * scale);
        log::debug!("Selected trial {} -> eeg {:?}", trial, eeg.dim());

        Ok(SsvepConversion {
            eeg,
            srate: recording.srate,
            ssvep: self.config.target_frequencies.clone(),
            chans: recording.chans.clone(),
        })
    }
}

/// Convert a MAT file with default settings.
pub fn mat_to_npz(
    path: impl AsRef<Path>,
    save: &SaveOptions,
) -> Result<SsvepConversion, ConvertError> {
    SsvepConverter::new().convert(path, save)
}
