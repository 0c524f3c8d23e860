//! # Archive Module
//!
//! Compressed numeric archives that `numpy.load` opens directly.
//!
//! ## Layout
//!
//! ```text
//! S1.npz
//! ├── eeg.npy            # numeric arrays, NPY v1
//! ├── srate.npy          # scalars as 0-d arrays
//! ├── eye_eeg/0.npy      # segment collections, one entry per segment
//! ├── eye_eeg/1.npy
//! ├── chans.json         # channel tables
//! └── manifest.json      # provenance
//! ```
//!
//! Entries are deflate-compressed. String data has no NPY representation
//! without pickling, so channel tables are stored as JSON.

mod error;
mod manifest;
mod reader;
mod writer;


pub use error::ArchiveError;
pub use manifest::{ArchiveKind, Manifest, FORMAT_VERSION};
pub use reader::ArchiveReader;
pub use writer::{ArchiveStats, ArchiveWriter};

/// File extension of archives
pub const ARCHIVE_EXTENSION: &str = "npz";

/// Entry name (without `.json`) of the manifest
pub const MANIFEST_NAME: &str = "manifest";
