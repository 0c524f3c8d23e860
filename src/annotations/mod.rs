//! # Annotation Module
//!
//! Parses artifact annotation tables that accompany EDF recordings.
//!
//! The tables are CSV files with a short preamble before the header row:
//!
//! ```text
//! # version = csv_v1.0.0
//! # bname = 00001234_s001_t000
//! # duration = 1200.00 secs
//! # montage_file = nedc_eas_default_montage.txt
//! # key, channel, start_time, stop_time, artifact_label, confidence
//! 00001234_s001_t000,FP1-F7,12.5000,14.0000,eyem,1.0000
//! ```
//!
//! Rows are filtered by recording key and split by artifact label.

mod error;
mod table;


pub use error::AnnotationError;
pub use table::{AnnotationColumns, AnnotationTable, ArtifactAnnotation, DEFAULT_PREAMBLE_ROWS};
