use std::collections::BTreeSet;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use ndarray::{arr0, Array2, ArrayBase, Data, Dimension};
use ndarray_npy::{WritableElement, WriteNpyExt};
use serde::Serialize;
use tempfile::NamedTempFile;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::{ArchiveError, Manifest, MANIFEST_NAME};

/// Statistics from a completed archive write
#[derive(Debug, Clone)]
pub struct ArchiveStats {
    /// Location of the archive
    pub path: PathBuf,
    /// Number of zip entries written, manifest included
    pub entries_written: usize,
    /// Archive size on disk in bytes
    pub total_size_bytes: u64,
}

impl std::fmt::Display for ArchiveStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Archive {}: {} entries, {} bytes",
            self.path.display(),
            self.entries_written,
            self.total_size_bytes
        )
    }
}

/// Writes named arrays into a deflate-compressed `.npz` container.
///
/// Entries are staged in a temporary file next to the target and moved into
/// place by [`ArchiveWriter::finish`]. An existing archive at the target path
/// is replaced only then; dropping the writer early leaves it untouched.
pub struct ArchiveWriter {
    path: PathBuf,
    zip: ZipWriter<BufWriter<NamedTempFile>>,
    options: SimpleFileOptions,
    entries: BTreeSet<String>,
}

impl ArchiveWriter {
    /// Start an archive at `path`. The parent directory must exist.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self, ArchiveError> {
        let path = path.as_ref().to_path_buf();
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let staging = NamedTempFile::new_in(&dir)?;
        let zip = ZipWriter::new(BufWriter::new(staging));
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .unix_permissions(0o644);

        log::debug!("Creating archive {}", path.display());
        Ok(Self {
            path,
            zip,
            options,
            entries: BTreeSet::new(),
        })
    }

    /// Path of the archive being written.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn start_entry(&mut self, entry: String) -> Result<(), ArchiveError> {
        if self.entries.contains(&entry) {
            return Err(ArchiveError::DuplicateEntry(entry));
        }
        self.zip.start_file(entry.as_str(), self.options)?;
        self.entries.insert(entry);
        Ok(())
    }

    /// Write an array as `<name>.npy`.
    pub fn write_array<A, S, D>(
        &mut self,
        name: &str,
        array: &ArrayBase<S, D>,
    ) -> Result<(), ArchiveError>
    where
        A: WritableElement,
        S: Data<Elem = A>,
        D: Dimension,
    {
        self.start_entry(format!("{}.npy", name))?;
        array.write_npy(&mut self.zip)?;
        Ok(())
    }

    /// Write a scalar as a zero-dimensional `<name>.npy`.
    pub fn write_scalar(&mut self, name: &str, value: f64) -> Result<(), ArchiveError> {
        self.write_array(name, &arr0(value))
    }

    /// Write a collection of differently sized matrices as
    /// `<name>/0.npy`, `<name>/1.npy`, ...
    pub fn write_sequence(
        &mut self,
        name: &str,
        arrays: &[Array2<f64>],
    ) -> Result<(), ArchiveError> {
        for (index, array) in arrays.iter().enumerate() {
            self.write_array(&format!("{}/{}", name, index), array)?;
        }
        log::debug!("Wrote {} arrays under {}/", arrays.len(), name);
        Ok(())
    }

    /// Write a serializable value as `<name>.json`.
    pub fn write_json<T: Serialize + ?Sized>(
        &mut self,
        name: &str,
        value: &T,
    ) -> Result<(), ArchiveError> {
        self.start_entry(format!("{}.json", name))?;
        let json = serde_json::to_vec_pretty(value)?;
        self.zip.write_all(&json)?;
        Ok(())
    }

    /// Write `manifest.json`.
    pub fn write_manifest(&mut self, manifest: &Manifest) -> Result<(), ArchiveError> {
        self.write_json(MANIFEST_NAME, manifest)
    }

    /// Finish the zip directory, flush it and move the archive into place.
    pub fn finish(self) -> Result<ArchiveStats, ArchiveError> {
        let Self {
            path, zip, entries, ..
        } = self;
        let staging = zip
            .finish()?
            .into_inner()
            .map_err(|e| e.into_error())?;
        staging.as_file().sync_all()?;
        staging.persist(&path).map_err(|e| e.error)?;

        let stats = ArchiveStats {
            total_size_bytes: fs::metadata(&path)?.len(),
            entries_written: entries.len(),
            path,
        };
        log::info!("{}", stats);
        Ok(stats)
    }
}
