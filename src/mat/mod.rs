//! # MAT-file Module
//!
//! Reader for MATLAB level-5 MAT files (v5, v6 and compressed v7), the
//! container used by SSVEP benchmark datasets.
//!
//! - [`MatFile`] loads every variable into a [`MatValue`] tree
//!   (numeric, logical, char, cell and struct arrays)
//! - [`SsvepRecording`] validates the `data.EEG` / `data.suppl_info`
//!   layout into typed fields
//!
//! ## Not Supported
//!
//! - Level 4 files and HDF5-based v7.3 files
//! - Sparse matrices, objects and function handles

mod error;
mod file;
mod reader;
mod schema;
mod value;

pub use error::MatError;
pub use file::{MatFile, MatVariable};
pub use reader::Endian;
pub use schema::SsvepRecording;
pub use value::{CellArray, CharArray, MatClass, MatValue, NumericArray, StructArray};
