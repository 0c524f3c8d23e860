//! # EDF Module
//!
//! Reader for European Data Format (EDF and EDF+) biosignal recordings.
//!
//! [`EdfFile`] decodes every data signal into a channels x samples matrix in
//! volts. EDF+ annotation signals are skipped, and data signals recorded at a
//! lower rate are upsampled to the fastest one.

mod error;
mod file;
mod header;

pub use error::EdfError;
pub use file::EdfFile;
pub use header::{EdfHeader, SignalHeader, ANNOTATION_LABEL};
