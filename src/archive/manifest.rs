use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Version of the archive layout
pub const FORMAT_VERSION: &str = "1.0";

/// Which converter produced an archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArchiveKind {
    /// SSVEP tensor from a MAT file
    Ssvep,
    /// Artifact segments from an EDF recording
    Artifact,
}

impl std::fmt::Display for ArchiveKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArchiveKind::Ssvep => write!(f, "ssvep"),
            ArchiveKind::Artifact => write!(f, "artifact"),
        }
    }
}

/// Human-readable description stored as `manifest.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    /// Archive layout version
    pub format_version: String,
    /// Producing converter
    pub kind: ArchiveKind,
    /// Creation time
    pub created: DateTime<Utc>,
    /// Converter name and crate version
    pub converter: String,
    /// Input files the archive was built from
    pub source_files: Vec<String>,
    /// Number of arrays in each segment collection
    #[serde(default)]
    pub segment_counts: BTreeMap<String, usize>,
}

impl Manifest {
    /// New manifest stamped with the current time.
    pub fn new(kind: ArchiveKind) -> Self {
        Self {
            format_version: FORMAT_VERSION.to_string(),
            kind,
            created: Utc::now(),
            converter: format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
            source_files: Vec::new(),
            segment_counts: BTreeMap::new(),
        }
    }

    /// Record an input file.
    pub fn with_source<S: Into<String>>(mut self, source: S) -> Self {
        self.source_files.push(source.into());
        self
    }

    /// Record the size of a segment collection.
    pub fn with_segments<S: Into<String>>(mut self, name: S, count: usize) -> Self {
        self.segment_counts.insert(name.into(), count);
        self
    }
}
