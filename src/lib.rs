//! # eegnpz - EEG Recordings to NumPy Archives
//!
//! `eegnpz` converts EEG recordings from public datasets into one compressed
//! archive layout that `numpy.load` opens directly.
//!
//! ## Supported Sources
//!
//! - **SSVEP benchmark MAT files**: MATLAB level-5 files holding a
//!   `data.EEG` tensor (channels x samples x trials x frequencies, microvolts)
//!   with `data.suppl_info.{srate, freqs, chan}`. One trial and a set of
//!   stimulus frequencies are selected and rescaled to volts.
//!
//! - **Annotated EDF recordings**: EDF/EDF+ files with a CSV table of
//!   artifact intervals. The recording is resampled to 250 Hz and cut into
//!   ocular (`eyem`) and muscular (`musc`) segments.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use eegnpz::convert::{edf_to_npz, mat_to_npz, SaveOptions};
//!
//! // Keep the result in memory only
//! let ssvep = mat_to_npz("S1.mat", &SaveOptions::in_memory())?;
//! println!("eeg {:?} at {} Hz", ssvep.eeg.dim(), ssvep.srate);
//!
//! // Also write Data/Imported/artifacts.npz
//! let artifacts = edf_to_npz(
//!     "00001234_s001_t000",
//!     "labels_01_tcp_ar",
//!     &SaveOptions::save_as("artifacts"),
//! )?;
//! println!(
//!     "{} ocular / {} muscular segments",
//!     artifacts.eye_eeg.len(),
//!     artifacts.mus_eeg.len()
//! );
//! # Ok::<(), eegnpz::convert::ConvertError>(())
//! ```
//!
//! ## Archive Contents
//!
//! | Converter | Entries |
//! |-----------|---------|
//! | SSVEP | `eeg.npy`, `srate.npy`, `ssvep.npy`, `chans.json`, `manifest.json` |
//! | Artifact | `eye_eeg/<i>.npy`, `mus_eeg/<i>.npy`, `srate.npy`, `chans.json`, `manifest.json` |
//!
//! Segment collections are stored as `<name>/<i>.npy`, so `numpy.load`
//! exposes each segment under its own key (`"eye_eeg/0"`, `"eye_eeg/1"`, ...).
//!
//! ## Architecture
//!
//! - [`mat`]: MATLAB level-5 reader and the typed SSVEP schema
//! - [`edf`]: EDF/EDF+ reader producing physical values in volts
//! - [`annotations`]: artifact annotation tables
//! - [`channels`]: channel descriptors and label normalization
//! - [`signal`]: FFT resampling and interval extraction
//! - [`archive`]: `.npz` writer and reader
//! - [`convert`]: the two conversion pipelines and their configuration
//!
//! The crate logs through the [`log`] facade and never installs a logger.

#![warn(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod annotations;
pub mod archive;
pub mod channels;
pub mod convert;
pub mod edf;
pub mod mat;
pub mod signal;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::annotations::{AnnotationColumns, AnnotationTable, ArtifactAnnotation};
    pub use crate::archive::{ArchiveKind, ArchiveReader, ArchiveStats, ArchiveWriter, Manifest};
    pub use crate::channels::{strip_decorations, ChannelDescriptor};
    pub use crate::convert::{
        edf_to_npz, mat_to_npz, ArtifactConfig, ArtifactConversion, ArtifactConverter, Config,
        ConvertError, SaveOptions, SsvepConfig, SsvepConversion, SsvepConverter,
    };
    pub use crate::edf::EdfFile;
    pub use crate::mat::{MatFile, SsvepRecording};
}
