//! # Conversion Module
//!
//! The two conversion pipelines and their shared configuration.
//!
//! - [`SsvepConverter`] / [`mat_to_npz`]: MAT benchmark recordings to a
//!   samples x channels x frequencies tensor.
//! - [`ArtifactConverter`] / [`edf_to_npz`]: EDF recordings plus annotation
//!   tables to ocular and muscular artifact segments.
//!
//! Both return their result whether or not [`SaveOptions::save_file`] is set;
//! writing the archive is a side effect.

mod artifact;
mod config;
mod error;
mod output;
mod ssvep;

pub use artifact::{edf_to_npz, ArtifactConversion, ArtifactConverter, EYE_SEGMENTS, MUSCLE_SEGMENTS};
pub use config::{ArtifactConfig, Config, SaveOptions, SsvepConfig, DEFAULT_SAVE_LOC};
pub use error::ConvertError;
pub use output::{ensure_extension, recording_key};
pub use ssvep::{mat_to_npz, SsvepConversion, SsvepConverter};
