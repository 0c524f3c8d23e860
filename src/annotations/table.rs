use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use super::AnnotationError;

/// Number of preamble lines before the header row.
pub const DEFAULT_PREAMBLE_ROWS: usize = 4;

/// Header names of the columns the converter reads.
///
/// The names are matched verbatim, including the leading space the source
/// tables put after each comma.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotationColumns {
    /// Recording key column
    pub key: String,
    /// Artifact label column
    pub label: String,
    /// Interval start column (seconds)
    pub start: String,
    /// Interval stop column (seconds)
    pub stop: String,
}

impl Default for AnnotationColumns {
    fn default() -> Self {
        Self {
            key: "# key".to_string(),
            label: " artifact_label".to_string(),
            start: " start_time".to_string(),
            stop: " stop_time".to_string(),
        }
    }
}

/// One annotated artifact interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactAnnotation {
    /// Recording key (base file name of the EDF file)
    pub key: String,
    /// Artifact label, e.g. `eyem` or `musc`
    pub label: String,
    /// Interval start in seconds
    pub start_time: f64,
    /// Interval stop in seconds
    pub stop_time: f64,
}

/// Annotation rows in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnnotationTable {
    rows: Vec<ArtifactAnnotation>,
}

impl AnnotationTable {
    /// Create a table from rows.
    pub fn new(rows: Vec<ArtifactAnnotation>) -> Self {
        Self { rows }
    }

    /// Parse an annotation CSV file.
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        preamble_rows: usize,
        columns: &AnnotationColumns,
    ) -> Result<Self, AnnotationError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            AnnotationError::IoError(std::io::Error::new(
                e.kind(),
                format!("Failed to open annotation file '{}': {}", path.display(), e),
            ))
        })?;
        Self::from_reader(BufReader::new(file), preamble_rows, columns)
    }

    /// Parse an annotation table from a reader.
    ///
    /// The first `preamble_rows` non-blank lines are skipped; the next line is
    /// the header row.
    pub fn from_reader<R: BufRead>(
        mut reader: R,
        preamble_rows: usize,
        columns: &AnnotationColumns,
    ) -> Result<Self, AnnotationError> {
        let mut skipped = 0;
        let mut line = String::new();
        while skipped < preamble_rows {
            line.clear();
            if reader.read_line(&mut line)? == 0 {
                break;
            }
            if !line.trim().is_empty() {
                skipped += 1;
            }
        }

        Self::from_csv(reader, columns)
    }

    fn from_csv<R: Read>(reader: R, columns: &AnnotationColumns) -> Result<Self, AnnotationError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .flexible(true)
            .has_headers(true)
            .trim(csv::Trim::None)
            .from_reader(reader);

        let headers: Vec<String> = csv_reader.headers()?.iter().map(str::to_string).collect();
        let position = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| AnnotationError::MissingColumn(name.to_string()))
        };
        let key_idx = position(&columns.key)?;
        let label_idx = position(&columns.label)?;
        let start_idx = position(&columns.start)?;
        let stop_idx = position(&columns.stop)?;

        let mut rows = Vec::new();
        for (row, record) in csv_reader.records().enumerate() {
            let record = record?;
            let text = |idx: usize, column: &str| {
                record
                    .get(idx)
                    .map(str::to_string)
                    .ok_or_else(|| AnnotationError::InvalidValue {
                        row,
                        column: column.to_string(),
                        value: String::new(),
                    })
            };
            let seconds = |idx: usize, column: &str| {
                let value = text(idx, column)?;
                value
                    .trim()
                    .parse::<f64>()
                    .map_err(|_| AnnotationError::InvalidValue {
                        row,
                        column: column.to_string(),
                        value,
                    })
            };

            rows.push(ArtifactAnnotation {
                key: text(key_idx, &columns.key)?,
                label: text(label_idx, &columns.label)?,
                start_time: seconds(start_idx, &columns.start)?,
                stop_time: seconds(stop_idx, &columns.stop)?,
            });
        }

        Ok(Self { rows })
    }

    /// All rows.
    pub fn rows(&self) -> &[ArtifactAnnotation] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows whose key equals `key` exactly.
    pub fn for_key(&self, key: &str) -> AnnotationTable {
        AnnotationTable {
            rows: self.rows.iter().filter(|r| r.key == key).cloned().collect(),
        }
    }

    /// Rows whose label equals `label` exactly, in table order.
    pub fn with_label(&self, label: &str) -> Vec<&ArtifactAnnotation> {
        self.rows.iter().filter(|r| r.label == label).collect()
    }
}
