//! Input path normalization and output location handling.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use super::config::SaveOptions;
use super::error::ConvertError;
use crate::archive::ARCHIVE_EXTENSION;

/// Append `.{extension}` unless the path already ends with it.
///
/// The check is a case-sensitive suffix test on the whole path.
pub fn ensure_extension(path: &Path, extension: &str) -> PathBuf {
    let suffix = format!(".{}", extension);
    if path.to_string_lossy().ends_with(&suffix) {
        return path.to_path_buf();
    }
    let mut raw: OsString = path.as_os_str().to_os_string();
    raw.push(&suffix);
    PathBuf::from(raw)
}

/// Key that identifies a recording in annotation tables: the file name up to
/// its first `.`.
///
/// ```
/// use std::path::Path;
/// use eegnpz::convert::recording_key;
///
/// assert_eq!(recording_key(Path::new("edf/01_tcp_ar/00001234_s001_t000.edf")), "00001234_s001_t000");
/// ```
pub fn recording_key(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    match name.split_once('.') {
        Some((stem, _)) => stem.to_string(),
        None => name,
    }
}

impl SaveOptions {
    /// Check that the options describe a usable destination.
    pub fn validate(&self) -> Result<(), ConvertError> {
        if self.save_file && self.save_name.trim().is_empty() {
            return Err(ConvertError::InvalidConfig(
                "save_name must not be empty when save_file is set".to_string(),
            ));
        }
        Ok(())
    }

    /// Directory the archive is written to.
    pub fn output_dir(&self) -> PathBuf {
        match &self.root {
            Some(root) => root.join(&self.save_loc),
            None => self.save_loc.clone(),
        }
    }

    /// Full archive path, `.npz` appended when missing.
    pub fn archive_path(&self) -> Result<PathBuf, ConvertError> {
        self.validate()?;
        Ok(ensure_extension(
            &self.output_dir().join(&self.save_name),
            ARCHIVE_EXTENSION,
        ))
    }

    /// Validate, create the output directory if needed and return the
    /// archive path.
    ///
    /// Creating an existing directory is not an error.
    pub fn prepare(&self) -> Result<PathBuf, ConvertError> {
        let path = self.archive_path()?;
        let dir = self.output_dir();
        fs::create_dir_all(&dir).map_err(|e| {
            ConvertError::IoError(std::io::Error::new(
                e.kind(),
                format!("Failed to create output directory '{}': {}", dir.display(), e),
            ))
        })?;
        Ok(path)
    }
}
