//! TOML configuration for the converters.
//!
//! Every field is optional; omitted fields take the defaults the public
//! datasets need:
//!
//! ```toml
//! # eegnpz.toml
//! [ssvep]
//! trial_index = 1
//! target_frequencies = [10.0, 12.0, 15.0]
//!
//! [artifact]
//! target_rate = 250.0
//! channel_decorations = ["EEG ", "-REF"]
//!
//! [output]
//! save_file = true
//! save_loc = "Data/Imported"
//! save_name = "S1"
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::annotations::{AnnotationColumns, DEFAULT_PREAMBLE_ROWS};
use crate::channels::DEFAULT_DECORATIONS;

/// Default output directory, relative to the output root.
pub const DEFAULT_SAVE_LOC: &str = "Data/Imported";

/// Root configuration structure for eegnpz.toml files.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// MAT converter settings.
    pub ssvep: SsvepConfig,
    /// EDF converter settings.
    pub artifact: ArtifactConfig,
    /// Where archives are written.
    pub output: SaveOptions,
}

/// Settings for the SSVEP (MAT) converter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SsvepConfig {
    /// Zero-based trial to extract.
    pub trial_index: usize,

    /// Stimulus frequencies to keep, in Hz. Matched exactly.
    pub target_frequencies: Vec<f64>,

    /// Factor applied to every sample (microvolts to volts).
    pub amplitude_scale: f64,
}

impl Default for SsvepConfig {
    fn default() -> Self {
        Self {
            trial_index: 1,
            target_frequencies: vec![10.0, 12.0, 15.0],
            amplitude_scale: 1e-6,
        }
    }
}

/// Settings for the artifact (EDF + CSV) converter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactConfig {
    /// Output sampling rate in Hz.
    pub target_rate: f64,

    /// Non-blank lines before the annotation header row.
    pub preamble_rows: usize,

    /// Label of ocular artifacts.
    pub eye_label: String,

    /// Label of muscular artifacts.
    pub muscle_label: String,

    /// Substrings removed from EDF channel labels.
    pub channel_decorations: Vec<String>,

    /// Annotation column names.
    pub columns: AnnotationColumns,
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            target_rate: 250.0,
            preamble_rows: DEFAULT_PREAMBLE_ROWS,
            eye_label: "eyem".to_string(),
            muscle_label: "musc".to_string(),
            channel_decorations: DEFAULT_DECORATIONS.iter().map(|d| d.to_string()).collect(),
            columns: AnnotationColumns::default(),
        }
    }
}

/// Whether and where a conversion result is persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SaveOptions {
    /// Write an archive in addition to returning the result.
    pub save_file: bool,

    /// Output directory, relative to `root`.
    pub save_loc: PathBuf,

    /// Archive base name; `.npz` is appended when missing.
    pub save_name: String,

    /// Directory `save_loc` is resolved against. Defaults to the
    /// current directory.
    pub root: Option<PathBuf>,
}

impl Default for SaveOptions {
    fn default() -> Self {
        Self {
            save_file: false,
            save_loc: PathBuf::from(DEFAULT_SAVE_LOC),
            save_name: String::new(),
            root: None,
        }
    }
}

impl SaveOptions {
    /// Options that persist under `name` in the default location.
    pub fn save_as(name: impl Into<String>) -> Self {
        Self {
            save_file: true,
            save_name: name.into(),
            ..Self::default()
        }
    }

    /// Options that only return the result.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Set the output directory.
    pub fn with_save_loc(mut self, save_loc: impl Into<PathBuf>) -> Self {
        self.save_loc = save_loc.into();
        self
    }

    /// Set the directory `save_loc` is resolved against.
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }
}
