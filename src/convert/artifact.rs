//! EDF + annotation table to archive conversion.

use std::path::Path;

use ndarray::{Array1, Array2};

use super::config::{ArtifactConfig, SaveOptions};
use super::error::ConvertError;
use super::output::{ensure_extension, recording_key};
use crate::annotations::AnnotationTable;
use crate::archive::{ArchiveError, ArchiveKind, ArchiveReader, ArchiveStats, ArchiveWriter, Manifest};
use crate::channels::strip_decorations;
use crate::edf::EdfFile;
use crate::signal::{resample_to_rate, slice_interval, time_axis};

/// Archive name of the ocular segment collection
pub const EYE_SEGMENTS: &str = "eye_eeg";
/// Archive name of the muscular segment collection
pub const MUSCLE_SEGMENTS: &str = "mus_eeg";

/// Output of the artifact converter.
#[derive(Debug, Clone, PartialEq)]
pub struct ArtifactConversion {
    /// Ocular artifact segments, each samples x channels, in table order
    pub eye_eeg: Vec<Array2<f64>>,
    /// Muscular artifact segments, each samples x channels, in table order
    pub mus_eeg: Vec<Array2<f64>>,
    /// Sampling rate of the segments in Hz
    pub srate: f64,
    /// Channel names with decorations removed
    pub chans: Vec<String>,
}

impl ArtifactConversion {
    /// Split into `(eye_eeg, mus_eeg, srate, chans)`.
    pub fn into_parts(self) -> (Vec<Array2<f64>>, Vec<Array2<f64>>, f64, Vec<String>) {
        (self.eye_eeg, self.mus_eeg, self.srate, self.chans)
    }

    /// Write both segment collections, `srate` and `chans` to an archive.
    pub fn write_archive(
        &self,
        path: &Path,
        sources: &[String],
    ) -> Result<ArchiveStats, ArchiveError> {
        let manifest = sources
            .iter()
            .fold(Manifest::new(ArchiveKind::Artifact), |m, s| m.with_source(s.as_str()))
            .with_segments(EYE_SEGMENTS, self.eye_eeg.len())
            .with_segments(MUSCLE_SEGMENTS, self.mus_eeg.len());

        let mut writer = ArchiveWriter::create(path)?;
        writer.write_sequence(EYE_SEGMENTS, &self.eye_eeg)?;
        writer.write_sequence(MUSCLE_SEGMENTS, &self.mus_eeg)?;
        writer.write_scalar("srate", self.srate)?;
        writer.write_json("chans", &self.chans)?;
        writer.write_manifest(&manifest)?;
        writer.finish()
    }

    /// Read a result back from an archive written by [`Self::write_archive`].
    pub fn read_archive(path: &Path) -> Result<Self, ArchiveError> {
        let mut reader = ArchiveReader::open(path)?;
        let manifest = reader.manifest()?;
        if manifest.kind != ArchiveKind::Artifact {
            return Err(ArchiveError::InvalidFormat(format!(
                "expected an artifact archive, found {}",
                manifest.kind
            )));
        }

        let eye_eeg = reader.read_sequence(EYE_SEGMENTS)?;
        let mus_eeg = reader.read_sequence(MUSCLE_SEGMENTS)?;
        for (name, segments) in [(EYE_SEGMENTS, &eye_eeg), (MUSCLE_SEGMENTS, &mus_eeg)] {
            let recorded = manifest.segment_counts.get(name).copied().unwrap_or(0);
            if recorded != segments.len() {
                return Err(ArchiveError::InvalidFormat(format!(
                    "manifest lists {} {} segments, archive holds {}",
                    recorded,
                    name,
                    segments.len()
                )));
            }
        }

        Ok(Self {
            eye_eeg,
            mus_eeg,
            srate: reader.read_scalar("srate")?,
            chans: reader.read_json("chans")?,
        })
    }
}

/// Converts annotated EDF recordings into artifact segments.
#[derive(Debug, Clone, Default)]
pub struct ArtifactConverter {
    config: ArtifactConfig,
}

impl ArtifactConverter {
    /// Converter with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Converter with explicit settings.
    pub fn with_config(config: ArtifactConfig) -> Self {
        Self { config }
    }

    /// Active settings.
    pub fn config(&self) -> &ArtifactConfig {
        &self.config
    }

    /// Load an EDF file and its annotation table, extract the artifact
    /// segments and optionally persist them.
    ///
    /// `.edf` and `.csv` are appended to the paths when missing. Only
    /// annotation rows keyed by the EDF file name are used.
    pub fn convert(
        &self,
        edf_path: impl AsRef<Path>,
        csv_path: impl AsRef<Path>,
        save: &SaveOptions,
    ) -> Result<ArtifactConversion, ConvertError> {
        save.validate()?;
        if !(self.config.target_rate.is_finite() && self.config.target_rate > 0.0) {
            return Err(ConvertError::InvalidConfig(format!(
                "target_rate must be positive, got {}",
                self.config.target_rate
            )));
        }

        let edf_path = ensure_extension(edf_path.as_ref(), "edf");
        let csv_path = ensure_extension(csv_path.as_ref(), "csv");
        log::info!(
            "Converting artifact recording {} with annotations {}",
            edf_path.display(),
            csv_path.display()
        );

        let edf = EdfFile::open(&edf_path)?;
        let key = recording_key(&edf_path);
        let annotations = AnnotationTable::from_path(
            &csv_path,
            self.config.preamble_rows,
            &self.config.columns,
        )?
        .for_key(&key);
        log::debug!("{} annotation rows for key {}", annotations.len(), key);

        let conversion = self.convert_loaded(&edf, &annotations)?;

        if save.save_file {
            let archive = save.prepare()?;
            let sources = [
                edf_path.display().to_string(),
                csv_path.display().to_string(),
            ];
            conversion.write_archive(&archive, &sources)?;
        }
        Ok(conversion)
    }

    /// Resample a loaded recording and cut the annotated intervals.
    ///
    /// Every row of `annotations` is used; filter by recording key first.
    /// Fails with [`ConvertError::SignalError`] when the recording cannot be
    /// resampled to the target rate.
    pub fn convert_loaded(
        &self,
        edf: &EdfFile,
        annotations: &AnnotationTable,
    ) -> Result<ArtifactConversion, ConvertError> {
        let data = edf.samples_by_channels();
        if data.nrows() < data.ncols() {
            log::warn!(
                "{} has fewer samples ({}) than channels ({})",
                edf.path(),
                data.nrows(),
                data.ncols()
            );
        }

        let chans: Vec<String> = edf
            .channel_labels()
            .iter()
            .map(|label| strip_decorations(label, &self.config.channel_decorations))
            .collect();

        let target_rate = self.config.target_rate;
        let resampled = resample_to_rate(data.view(), edf.sample_rate(), target_rate)?;
        let time = time_axis(resampled.nrows(), target_rate);

        let eye_eeg = self.segments(annotations, &self.config.eye_label, &resampled, &time);
        let mus_eeg = self.segments(annotations, &self.config.muscle_label, &resampled, &time);
        log::info!(
            "Extracted {} ocular and {} muscular segments from {}",
            eye_eeg.len(),
            mus_eeg.len(),
            edf.path()
        );

        Ok(ArtifactConversion {
            eye_eeg,
            mus_eeg,
            srate: target_rate,
            chans,
        })
    }

    fn segments(
        &self,
        annotations: &AnnotationTable,
        label: &str,
        data: &Array2<f64>,
        time: &Array1<f64>,
    ) -> Vec<Array2<f64>> {
        annotations
            .with_label(label)
            .into_iter()
            .map(|row| slice_interval(data.view(), time.view(), row.start_time, row.stop_time))
            .collect()
    }
}

/// Convert an EDF file and its annotation table with default settings.
pub fn edf_to_npz(
    edf_path: impl AsRef<Path>,
    csv_path: impl AsRef<Path>,
    save: &SaveOptions,
) -> Result<ArtifactConversion, ConvertError> {
    ArtifactConverter::new().convert(edf_path, csv_path, save)
}
