//! In-memory representation of parsed MAT arrays.
//!
//! All arrays keep MATLAB's column-major element order and dimension list.
//! Numeric classes are widened to `f64` on load.

use ndarray::{ArrayD, IxDyn, ShapeBuilder};

use super::error::MatError;

/// MATLAB array class (`mxCLASS`) identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatClass {
    /// Cell array
    Cell,
    /// Struct array
    Struct,
    /// Character array
    Char,
    /// Double precision
    Double,
    /// Single precision
    Single,
    /// Signed 8-bit integer
    Int8,
    /// Unsigned 8-bit integer
    UInt8,
    /// Signed 16-bit integer
    Int16,
    /// Unsigned 16-bit integer
    UInt16,
    /// Signed 32-bit integer
    Int32,
    /// Unsigned 32-bit integer
    UInt32,
    /// Signed 64-bit integer
    Int64,
    /// Unsigned 64-bit integer
    UInt64,
}

impl MatClass {
    /// Map a raw class byte to a supported class.
    ///
    /// Returns `None` for object (3), sparse (5), function handles and any
    /// unknown identifier.
    pub fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            1 => Some(MatClass::Cell),
            2 => Some(MatClass::Struct),
            4 => Some(MatClass::Char),
            6 => Some(MatClass::Double),
            7 => Some(MatClass::Single),
            8 => Some(MatClass::Int8),
            9 => Some(MatClass::UInt8),
            10 => Some(MatClass::Int16),
            11 => Some(MatClass::UInt16),
            12 => Some(MatClass::Int32),
            13 => Some(MatClass::UInt32),
            14 => Some(MatClass::Int64),
            15 => Some(MatClass::UInt64),
            _ => None,
        }
    }

    /// Whether values of this class are stored as numbers.
    pub fn is_numeric(&self) -> bool {
        !matches!(self, MatClass::Cell | MatClass::Struct | MatClass::Char)
    }

    /// MATLAB name of the class, as shown by `whos`.
    pub fn name(&self) -> &'static str {
        match self {
            MatClass::Cell => "cell",
            MatClass::Struct => "struct",
            MatClass::Char => "char",
            MatClass::Double => "double",
            MatClass::Single => "single",
            MatClass::Int8 => "int8",
            MatClass::UInt8 => "uint8",
            MatClass::Int16 => "int16",
            MatClass::UInt16 => "uint16",
            MatClass::Int32 => "int32",
            MatClass::UInt32 => "uint32",
            MatClass::Int64 => "int64",
            MatClass::UInt64 => "uint64",
        }
    }
}

/// Number of elements described by a dimension list.
pub(crate) fn element_count(dims: &[usize]) -> usize {
    dims.iter().product()
}

/// A numeric (or logical) array widened to `f64`.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericArray {
    /// Storage class declared in the file
    pub class: MatClass,
    /// Dimensions, column-major
    pub dims: Vec<usize>,
    /// Real part, column-major
    pub real: Vec<f64>,
    /// Imaginary part for complex arrays
    pub imag: Option<Vec<f64>>,
    /// Whether the array carries the logical flag
    pub logical: bool,
}

impl NumericArray {
    /// An empty `0x0` double array, as produced by `[]`.
    pub fn empty() -> Self {
        Self {
            class: MatClass::Double,
            dims: vec![0, 0],
            real: Vec::new(),
            imag: None,
            logical: false,
        }
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.real.len()
    }

    /// Whether the array has no elements.
    pub fn is_empty(&self) -> bool {
        self.real.is_empty()
    }

    /// Whether the array holds complex values.
    pub fn is_complex(&self) -> bool {
        self.imag.is_some()
    }

    /// The single value of a 1x1 array.
    pub fn scalar(&self) -> Option<f64> {
        if self.real.len() == 1 {
            Some(self.real[0])
        } else {
            None
        }
    }

    /// Whether at most one dimension is larger than 1.
    pub fn is_vector(&self) -> bool {
        self.dims.iter().filter(|&&d| d > 1).count() <= 1
    }

    /// Real part as an n-dimensional array with MATLAB's dimensions.
    pub fn to_ndarray(&self) -> Result<ArrayD<f64>, MatError> {
        ArrayD::from_shape_vec(IxDyn(&self.dims).f(), self.real.clone()).map_err(|e| {
            MatError::invalid(format!(
                "dimensions {:?} do not match {} elements: {}",
                self.dims,
                self.real.len(),
                e
            ))
        })
    }
}

/// A character array.
#[derive(Debug, Clone, PartialEq)]
pub struct CharArray {
    /// Dimensions, column-major
    pub dims: Vec<usize>,
    /// Characters, column-major
    pub chars: Vec<char>,
}

impl CharArray {
    /// Rows of the character matrix as strings.
    pub fn rows(&self) -> Vec<String> {
        let nrows = self.dims.first().copied().unwrap_or(0);
        if nrows == 0 {
            return Vec::new();
        }
        let ncols = self.chars.len() / nrows;
        (0..nrows)
            .map(|r| (0..ncols).map(|c| self.chars[r + nrows * c]).collect())
            .collect()
    }

    /// The text of the array, rows joined by newlines.
    pub fn to_string_lossy(&self) -> String {
        self.rows().join("\n")
    }
}

/// A cell array.
#[derive(Debug, Clone, PartialEq)]
pub struct CellArray {
    /// Dimensions, column-major
    pub dims: Vec<usize>,
    /// Elements, column-major
    pub items: Vec<MatValue>,
}

impl CellArray {
    /// Number of cells.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cell array is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of rows (first dimension).
    pub fn nrows(&self) -> usize {
        self.dims.first().copied().unwrap_or(0)
    }

    /// Number of columns (product of the remaining dimensions).
    pub fn ncols(&self) -> usize {
        self.dims.iter().skip(1).product()
    }

    /// Cell at `(row, col)` of a 2-D cell array.
    pub fn get(&self, row: usize, col: usize) -> Option<&MatValue> {
        if row >= self.nrows() || col >= self.ncols() {
            return None;
        }
        self.items.get(row + self.nrows() * col)
    }
}

/// A struct array.
///
/// Field values are stored element-major: all fields of element 0, then all
/// fields of element 1, and so on.
#[derive(Debug, Clone, PartialEq)]
pub struct StructArray {
    /// Dimensions, column-major
    pub dims: Vec<usize>,
    /// Field names in file order
    pub fields: Vec<String>,
    /// Field values
    pub values: Vec<MatValue>,
}

impl StructArray {
    /// Number of struct elements.
    pub fn len(&self) -> usize {
        element_count(&self.dims)
    }

    /// Whether the struct array has no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Field of the given element.
    pub fn element_field(&self, element: usize, name: &str) -> Option<&MatValue> {
        let index = self.fields.iter().position(|f| f == name)?;
        self.values.get(element * self.fields.len() + index)
    }

    /// Field of a scalar (1x1) struct.
    pub fn field(&self, name: &str) -> Option<&MatValue> {
        if self.len() != 1 {
            return None;
        }
        self.element_field(0, name)
    }
}

/// A parsed MAT array of any supported class.
#[derive(Debug, Clone, PartialEq)]
pub enum MatValue {
    /// Numeric or logical array
    Numeric(NumericArray),
    /// Character array
    Char(CharArray),
    /// Cell array
    Cell(CellArray),
    /// Struct array
    Struct(StructArray),
}

impl MatValue {
    /// Dimensions of the array.
    pub fn dims(&self) -> &[usize] {
        match self {
            MatValue::Numeric(a) => &a.dims,
            MatValue::Char(a) => &a.dims,
            MatValue::Cell(a) => &a.dims,
            MatValue::Struct(a) => &a.dims,
        }
    }

    /// Short description of the value's class.
    pub fn class_name(&self) -> &'static str {
        match self {
            MatValue::Numeric(a) if a.logical => "logical",
            MatValue::Numeric(a) => a.class.name(),
            MatValue::Char(_) => "char",
            MatValue::Cell(_) => "cell",
            MatValue::Struct(_) => "struct",
        }
    }

    /// Numeric view.
    pub fn as_numeric(&self) -> Option<&NumericArray> {
        match self {
            MatValue::Numeric(a) => Some(a),
            _ => None,
        }
    }

    /// Character view.
    pub fn as_char(&self) -> Option<&CharArray> {
        match self {
            MatValue::Char(a) => Some(a),
            _ => None,
        }
    }

    /// Cell view.
    pub fn as_cell(&self) -> Option<&CellArray> {
        match self {
            MatValue::Cell(a) => Some(a),
            _ => None,
        }
    }

    /// Struct view.
    pub fn as_struct(&self) -> Option<&StructArray> {
        match self {
            MatValue::Struct(a) => Some(a),
            _ => None,
        }
    }

    /// The value of a numeric 1x1 array.
    pub fn as_scalar(&self) -> Option<f64> {
        self.as_numeric().and_then(NumericArray::scalar)
    }

    /// The text of a character array.
    pub fn as_string(&self) -> Option<String> {
        self.as_char().map(CharArray::to_string_lossy)
    }
}
