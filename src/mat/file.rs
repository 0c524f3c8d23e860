//! MAT file loading and variable listing.

use std::fs;
use std::path::Path;

use super::error::MatError;
use super::reader::parse_variables;
use super::value::MatValue;

/// A named top-level variable.
#[derive(Debug, Clone, PartialEq)]
pub struct MatVariable {
    /// Variable name as stored in the file
    pub name: String,
    /// Parsed contents
    pub value: MatValue,
}

/// A loaded level-5 MAT file.
///
/// Variables are kept in file order. Structs and cells are parsed into
/// nested [`MatValue`] trees; use [`SsvepRecording`](super::SsvepRecording)
/// for a validated, typed view of a known layout.
///
/// # Example
///
/// ```no_run
/// use eegnpz::mat::MatFile;
///
/// let mat = MatFile::open("S1.mat")?;
/// println!("{}", mat.describe());
/// # Ok::<(), eegnpz::mat::MatError>(())
/// ```
#[derive(Debug, Clone)]
pub struct MatFile {
    header_text: String,
    variables: Vec<MatVariable>,
    path: String,
}

impl MatFile {
    /// Open and parse a MAT file.
    ///
    /// # Errors
    ///
    /// - [`MatError::IoError`] if the file cannot be read
    /// - [`MatError::InvalidFormat`] if the contents are malformed
    /// - [`MatError::UnsupportedVersion`] for level 4 or v7.3 files
    /// - [`MatError::UnsupportedClass`] for sparse, object or function arrays
    pub fn open(path: impl AsRef<Path>) -> Result<Self, MatError> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let bytes = fs::read(path).map_err(|e| {
            MatError::IoError(std::io::Error::new(
                e.kind(),
                format!("Failed to open MAT file '{}': {}", path_str, e),
            ))
        })?;

        Self::from_bytes(&bytes, path_str)
    }

    /// Parse a MAT file already held in memory.
    ///
    /// `label` is used in error messages in place of a path.
    pub fn from_bytes(bytes: &[u8], label: impl Into<String>) -> Result<Self, MatError> {
        let label = label.into();
        let (header, variables) = parse_variables(bytes).map_err(|e| match e {
            MatError::InvalidFormat(msg) => {
                MatError::InvalidFormat(format!("Failed to parse MAT file '{}': {}", label, msg))
            }
            other => other,
        })?;

        log::debug!(
            "Loaded {} variables from '{}' ({})",
            variables.len(),
            label,
            header.text
        );

        Ok(Self {
            header_text: header.text,
            variables: variables
                .into_iter()
                .map(|(name, value)| MatVariable { name, value })
                .collect(),
            path: label,
        })
    }

    /// Descriptive text from the file header.
    pub fn header_text(&self) -> &str {
        &self.header_text
    }

    /// Get the names of all variables in file order.
    pub fn variable_names(&self) -> impl Iterator<Item = &str> {
        self.variables.iter().map(|v| v.name.as_str())
    }

    /// Get a variable by name.
    pub fn get(&self, name: &str) -> Option<&MatValue> {
        self.variables
            .iter()
            .find(|v| v.name == name)
            .map(|v| &v.value)
    }

    /// Get a variable by name, returning an error if not found.
    pub fn require(&self, name: &str) -> Result<&MatValue, MatError> {
        self.get(name).ok_or_else(|| {
            MatError::schema(format!(
                "Variable '{}' not found in MAT file '{}'",
                name, self.path
            ))
        })
    }

    /// Number of variables.
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    /// Whether the file holds no variables.
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Path (or label) the file was loaded from.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Iterate over all variables.
    pub fn iter(&self) -> impl Iterator<Item = &MatVariable> {
        self.variables.iter()
    }

    /// Table of variable names, shapes and classes.
    pub fn describe(&self) -> String {
        let mut lines = Vec::new();
        lines.push(format!("Variables in '{}':", self.path));
        lines.push(String::new());

        let max_name_len = self
            .variables
            .iter()
            .map(|v| v.name.len())
            .max()
            .unwrap_or(4)
            .max(4);

        lines.push(format!(
            "  {:<width$}  {:>16}  {:>8}",
            "Name",
            "Shape",
            "Class",
            width = max_name_len
        ));
        lines.push(format!(
            "  {:-<width$}  {:->16}  {:->8}",
            "",
            "",
            "",
            width = max_name_len
        ));

        for variable in &self.variables {
            let shape = variable
                .value
                .dims()
                .iter()
                .map(|d| d.to_string())
                .collect::<Vec<_>>()
                .join("x");
            lines.push(format!(
                "  {:<width$}  {:>16}  {:>8}",
                variable.name,
                shape,
                variable.value.class_name(),
                width = max_name_len
            ));
        }

        lines.join("\n")
    }
}
