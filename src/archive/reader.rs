use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use ndarray::{Array, Array0, Array2, Dimension};
use ndarray_npy::ReadNpyExt;
use serde::de::DeserializeOwned;
use zip::result::ZipError;
use zip::ZipArchive;

use super::{ArchiveError, Manifest, MANIFEST_NAME};

/// Reads arrays back out of an archive written by [`super::ArchiveWriter`].
pub struct ArchiveReader {
    path: PathBuf,
    archive: ZipArchive<BufReader<File>>,
}

fn lookup_error(err: ZipError, entry: &str) -> ArchiveError {
    match err {
        ZipError::FileNotFound => ArchiveError::MissingEntry(entry.to_string()),
        other => ArchiveError::ZipError(other),
    }
}

impl ArchiveReader {
    /// Open an archive file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ArchiveError> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path)?;
        let archive = ZipArchive::new(BufReader::new(file))?;
        Ok(Self { path, archive })
    }

    /// Path of the archive file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Entry names in archive order.
    pub fn names(&self) -> Vec<String> {
        self.archive.file_names().map(str::to_string).collect()
    }

    /// Whether an entry with this exact file name exists.
    pub fn contains(&self, entry: &str) -> bool {
        self.archive.index_for_name(entry).is_some()
    }

    /// Read `<name>.npy` as an `f64` array of dimension `D`.
    pub fn read_array<D: Dimension>(&mut self, name: &str) -> Result<Array<f64, D>, ArchiveError> {
        let entry = format!("{}.npy", name);
        let file = self
            .archive
            .by_name(&entry)
            .map_err(|e| lookup_error(e, &entry))?;
        Ok(Array::<f64, D>::read_npy(file)?)
    }

    /// Read a zero-dimensional `<name>.npy`.
    pub fn read_scalar(&mut self, name: &str) -> Result<f64, ArchiveError> {
        let value: Array0<f64> = self.read_array(name)?;
        Ok(value[()])
    }

    /// Read the collection written under `<name>/`.
    ///
    /// Returns an empty collection when no entry carries the prefix.
    pub fn read_sequence(&mut self, name: &str) -> Result<Vec<Array2<f64>>, ArchiveError> {
        let prefix = format!("{}/", name);
        let mut indices: Vec<usize> = Vec::new();
        for entry in self.archive.file_names() {
            let Some(rest) = entry.strip_prefix(&prefix) else {
                continue;
            };
            let index = rest
                .strip_suffix(".npy")
                .and_then(|stem| stem.parse::<usize>().ok())
                .ok_or_else(|| {
                    ArchiveError::InvalidFormat(format!("unexpected entry in sequence: {}", entry))
                })?;
            indices.push(index);
        }
        indices.sort_unstable();

        if indices.iter().enumerate().any(|(expected, &index)| expected != index) {
            return Err(ArchiveError::InvalidFormat(format!(
                "sequence {} is not numbered 0..{}",
                name,
                indices.len()
            )));
        }

        indices
            .iter()
            .map(|index| self.read_array(&format!("{}/{}", name, index)))
            .collect()
    }

    /// Deserialize `<name>.json`.
    pub fn read_json<T: DeserializeOwned>(&mut self, name: &str) -> Result<T, ArchiveError> {
        let entry = format!("{}.json", name);
        let file = self
            .archive
            .by_name(&entry)
            .map_err(|e| lookup_error(e, &entry))?;
        Ok(serde_json::from_reader(file)?)
    }

    /// Read `manifest.json`.
    pub fn manifest(&mut self) -> Result<Manifest, ArchiveError> {
        self.read_json(MANIFEST_NAME)
    }
}
