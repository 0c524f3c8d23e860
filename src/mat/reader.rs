//! Level-5 MAT-file element decoding.
//!
//! A level-5 file is a 128-byte header followed by a stream of tagged data
//! elements. Variables are `miMATRIX` elements, optionally wrapped in a
//! zlib-compressed `miCOMPRESSED` element (v7 files). Matrix elements nest:
//! array flags, dimensions, name, then class-specific payload.

use std::io::Read;

use byteorder::{BigEndian, ByteOrder, LittleEndian};
use flate2::read::ZlibDecoder;

use super::error::MatError;
use super::value::{CellArray, CharArray, MatClass, MatValue, NumericArray, StructArray};

/// Size of the fixed file header
pub(crate) const HEADER_LEN: usize = 128;

pub(crate) const MI_INT8: u32 = 1;
pub(crate) const MI_UINT8: u32 = 2;
pub(crate) const MI_INT16: u32 = 3;
pub(crate) const MI_UINT16: u32 = 4;
pub(crate) const MI_INT32: u32 = 5;
pub(crate) const MI_UINT32: u32 = 6;
pub(crate) const MI_SINGLE: u32 = 7;
pub(crate) const MI_DOUBLE: u32 = 9;
pub(crate) const MI_INT64: u32 = 12;
pub(crate) const MI_UINT64: u32 = 13;
pub(crate) const MI_MATRIX: u32 = 14;
pub(crate) const MI_COMPRESSED: u32 = 15;
pub(crate) const MI_UTF8: u32 = 16;
pub(crate) const MI_UTF16: u32 = 17;
pub(crate) const MI_UTF32: u32 = 18;

const FLAG_COMPLEX: u32 = 0x0800;
const FLAG_LOGICAL: u32 = 0x0200;

/// Byte order declared by the header's endian indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endian {
    /// `IM` indicator
    Little,
    /// `MI` indicator
    Big,
}

impl Endian {
    fn read_u32(self, bytes: &[u8]) -> u32 {
        match self {
            Endian::Little => LittleEndian::read_u32(bytes),
            Endian::Big => BigEndian::read_u32(bytes),
        }
    }

    fn read_u16(self, bytes: &[u8]) -> u16 {
        match self {
            Endian::Little => LittleEndian::read_u16(bytes),
            Endian::Big => BigEndian::read_u16(bytes),
        }
    }
}

/// Parsed file header.
#[derive(Debug, Clone)]
pub(crate) struct Header {
    pub text: String,
    pub endian: Endian,
}

pub(crate) fn parse_header(bytes: &[u8]) -> Result<Header, MatError> {
    if bytes.len() < HEADER_LEN {
        return Err(MatError::invalid(format!(
            "file is {} bytes, shorter than the {} byte header",
            bytes.len(),
            HEADER_LEN
        )));
    }

    let text = String::from_utf8_lossy(&bytes[..116])
        .trim_end_matches(|c: char| c == '\0' || c.is_whitespace())
        .to_string();

    if text.starts_with("MATLAB 7.3") {
        return Err(MatError::UnsupportedVersion(
            "v7.3 (HDF5-based) MAT files".to_string(),
        ));
    }

    let endian = match &bytes[126..128] {
        b"IM" => Endian::Little,
        b"MI" => Endian::Big,
        other => {
            return Err(MatError::UnsupportedVersion(format!(
                "no level-5 endian indicator (found {:?}); level 4 files are not supported",
                String::from_utf8_lossy(other)
            )))
        }
    };

    let version = endian.read_u16(&bytes[124..126]);
    if version != 0x0100 {
        return Err(MatError::UnsupportedVersion(format!(
            "header version 0x{:04x}",
            version
        )));
    }

    Ok(Header { text, endian })
}

/// One tagged data element.
struct Element<'a> {
    data_type: u32,
    data: &'a [u8],
}

/// Cursor over a sequence of tagged data elements.
struct ElementReader<'a> {
    bytes: &'a [u8],
    pos: usize,
    endian: Endian,
}

impl<'a> ElementReader<'a> {
    fn new(bytes: &'a [u8], endian: Endian) -> Self {
        Self {
            bytes,
            pos: 0,
            endian,
        }
    }

    fn remaining(&self) -> usize {
        self.bytes.len().saturating_sub(self.pos)
    }

    fn next_element(&mut self) -> Result<Element<'a>, MatError> {
        if self.remaining() < 8 {
            return Err(MatError::invalid(format!(
                "truncated element tag at offset {}",
                self.pos
            )));
        }

        let tag = &self.bytes[self.pos..self.pos + 8];
        let first = self.endian.read_u32(&tag[..4]);
        let small_len = (first >> 16) as usize;

        // Small data element format: length in the upper half of the type word
        if small_len != 0 {
            if small_len > 4 {
                return Err(MatError::invalid(format!(
                    "small data element claims {} bytes",
                    small_len
                )));
            }
            let start = self.pos + 4;
            self.pos += 8;
            return Ok(Element {
                data_type: first & 0xffff,
                data: &self.bytes[start..start + small_len],
            });
        }

        let len = self.endian.read_u32(&tag[4..]) as usize;
        let start = self.pos + 8;
        let end = start
            .checked_add(len)
            .filter(|&end| end <= self.bytes.len())
            .ok_or_else(|| {
                MatError::invalid(format!(
                    "element at offset {} needs {} bytes, {} available",
                    self.pos,
                    len,
                    self.bytes.len() - start
                ))
            })?;

        // Compressed elements are not padded to the 8-byte boundary
        self.pos = if first == MI_COMPRESSED {
            end
        } else {
            ((end + 7) & !7).min(self.bytes.len())
        };

        Ok(Element {
            data_type: first,
            data: &self.bytes[start..end],
        })
    }

    fn expect_element(&mut self, data_type: u32, what: &str) -> Result<Element<'a>, MatError> {
        let element = self.next_element()?;
        if element.data_type != data_type {
            return Err(MatError::invalid(format!(
                "expected {} element of type {}, found type {}",
                what, data_type, element.data_type
            )));
        }
        Ok(element)
    }
}

/// Decode every top-level variable following the header.
pub(crate) fn parse_variables(bytes: &[u8]) -> Result<(Header, Vec<(String, MatValue)>), MatError> {
    let header = parse_header(bytes)?;
    let endian = header.endian;
    let mut reader = ElementReader::new(&bytes[HEADER_LEN..], endian);
    let mut variables = Vec::new();

    while reader.remaining() >= 8 {
        let element = reader.next_element()?;
        match element.data_type {
            MI_COMPRESSED => {
                let inflated = inflate(element.data)?;
                let mut inner = ElementReader::new(&inflated, endian);
                let matrix = inner.expect_element(MI_MATRIX, "compressed matrix")?;
                variables.push(parse_matrix(matrix.data, endian)?);
            }
            MI_MATRIX => variables.push(parse_matrix(element.data, endian)?),
            other => log::debug!("Skipping top-level MAT element of type {}", other),
        }
    }

    Ok((header, variables))
}

fn inflate(data: &[u8]) -> Result<Vec<u8>, MatError> {
    let mut decoder = ZlibDecoder::new(data);
    let mut inflated = Vec::new();
    decoder
        .read_to_end(&mut inflated)
        .map_err(|e| MatError::invalid(format!("failed to inflate compressed element: {}", e)))?;
    Ok(inflated)
}

/// Decode the body of an `miMATRIX` element into a named value.
fn parse_matrix(data: &[u8], endian: Endian) -> Result<(String, MatValue), MatError> {
    // An empty matrix element stands for `[]`
    if data.is_empty() {
        return Ok((String::new(), MatValue::Numeric(NumericArray::empty())));
    }

    let mut reader = ElementReader::new(data, endian);

    let flags = reader.expect_element(MI_UINT32, "array flags")?;
    if flags.data.len() < 4 {
        return Err(MatError::invalid("array flags element too short"));
    }
    let flag_word = endian.read_u32(&flags.data[..4]);
    let class_raw = (flag_word & 0xff) as u8;
    let complex = flag_word & FLAG_COMPLEX != 0;
    let logical = flag_word & FLAG_LOGICAL != 0;

    let dims_element = reader.expect_element(MI_INT32, "dimensions")?;
    let dims = decode_numbers(MI_INT32, dims_element.data, endian)?
        .into_iter()
        .map(|d| {
            if d < 0.0 {
                Err(MatError::invalid(format!("negative dimension {}", d)))
            } else {
                Ok(d as usize)
            }
        })
        .collect::<Result<Vec<_>, _>>()?;

    let name_element = reader.expect_element(MI_INT8, "array name")?;
    let name = String::from_utf8_lossy(name_element.data).to_string();

    let class = MatClass::from_raw(class_raw).ok_or_else(|| MatError::UnsupportedClass {
        class: class_raw,
        name: name.clone(),
    })?;
    let count = dims
        .iter()
        .try_fold(1usize, |acc, &d| acc.checked_mul(d))
        .ok_or_else(|| MatError::invalid(format!("dimensions {:?} overflow", dims)))?;
    // Every nested element needs at least an 8-byte tag
    let max_children = reader.remaining() / 8;

    let value = match class {
        MatClass::Char => {
            let chars = if count == 0 && reader.remaining() == 0 {
                Vec::new()
            } else {
                let element = reader.next_element()?;
                decode_chars(element.data_type, element.data, endian)?
            };
            MatValue::Char(CharArray { dims, chars })
        }
        MatClass::Cell => {
            let mut items = Vec::with_capacity(count.min(max_children));
            for _ in 0..count {
                let element = reader.expect_element(MI_MATRIX, "cell item")?;
                items.push(parse_matrix(element.data, endian)?.1);
            }
            MatValue::Cell(CellArray { dims, items })
        }
        MatClass::Struct => {
            let fields = parse_field_names(&mut reader, endian)?;
            let n_values = count.checked_mul(fields.len()).ok_or_else(|| {
                MatError::invalid(format!("struct '{}' is too large", name))
            })?;
            let mut values = Vec::with_capacity(n_values.min(max_children));
            for _ in 0..n_values {
                let element = reader.expect_element(MI_MATRIX, "struct field")?;
                values.push(parse_matrix(element.data, endian)?.1);
            }
            MatValue::Struct(StructArray {
                dims,
                fields,
                values,
            })
        }
        _ => {
            let real = if count == 0 && reader.remaining() == 0 {
                Vec::new()
            } else {
                let element = reader.next_element()?;
                decode_numbers(element.data_type, element.data, endian)?
            };
            if real.len() != count {
                return Err(MatError::invalid(format!(
                    "variable '{}' has dimensions {:?} but {} values",
                    name,
                    dims,
                    real.len()
                )));
            }
            let imag = if complex {
                let element = reader.next_element()?;
                Some(decode_numbers(element.data_type, element.data, endian)?)
            } else {
                None
            };
            MatValue::Numeric(NumericArray {
                class,
                dims,
                real,
                imag,
                logical,
            })
        }
    };

    Ok((name, value))
}

fn parse_field_names(reader: &mut ElementReader<'_>, endian: Endian) -> Result<Vec<String>, MatError> {
    let length_element = reader.expect_element(MI_INT32, "field name length")?;
    let name_len = decode_numbers(MI_INT32, length_element.data, endian)?
        .first()
        .copied()
        .unwrap_or(0.0) as usize;

    let names_element = reader.expect_element(MI_INT8, "field names")?;
    if name_len == 0 {
        return Ok(Vec::new());
    }

    Ok(names_element
        .data
        .chunks(name_len)
        .map(|chunk| {
            let end = chunk.iter().position(|&b| b == 0).unwrap_or(chunk.len());
            String::from_utf8_lossy(&chunk[..end]).to_string()
        })
        .collect())
}

/// Widen a numeric data element to `f64`.
pub(crate) fn decode_numbers(data_type: u32, data: &[u8], endian: Endian) -> Result<Vec<f64>, MatError> {
    match endian {
        Endian::Little => decode_numbers_as::<LittleEndian>(data_type, data),
        Endian::Big => decode_numbers_as::<BigEndian>(data_type, data),
    }
}

fn decode_numbers_as<B: ByteOrder>(data_type: u32, data: &[u8]) -> Result<Vec<f64>, MatError> {
    let values = match data_type {
        MI_INT8 => data.iter().map(|&b| b as i8 as f64).collect(),
        MI_UINT8 => data.iter().map(|&b| b as f64).collect(),
        MI_INT16 => data.chunks_exact(2).map(|c| B::read_i16(c) as f64).collect(),
        MI_UINT16 => data.chunks_exact(2).map(|c| B::read_u16(c) as f64).collect(),
        MI_INT32 => data.chunks_exact(4).map(|c| B::read_i32(c) as f64).collect(),
        MI_UINT32 => data.chunks_exact(4).map(|c| B::read_u32(c) as f64).collect(),
        MI_INT64 => data.chunks_exact(8).map(|c| B::read_i64(c) as f64).collect(),
        MI_UINT64 => data.chunks_exact(8).map(|c| B::read_u64(c) as f64).collect(),
        MI_SINGLE => data.chunks_exact(4).map(|c| B::read_f32(c) as f64).collect(),
        MI_DOUBLE => data.chunks_exact(8).map(B::read_f64).collect(),
        other => return Err(MatError::UnexpectedDataType(other)),
    };
    Ok(values)
}

fn decode_chars(data_type: u32, data: &[u8], endian: Endian) -> Result<Vec<char>, MatError> {
    let chars = match data_type {
        MI_UTF8 | MI_UINT8 | MI_INT8 => String::from_utf8_lossy(data).chars().collect(),
        MI_UTF16 | MI_UINT16 => {
            let units: Vec<u16> = data.chunks_exact(2).map(|c| endian.read_u16(c)).collect();
            char::decode_utf16(units)
                .map(|r| r.unwrap_or(char::REPLACEMENT_CHARACTER))
                .collect()
        }
        MI_UTF32 | MI_UINT32 => data
            .chunks_exact(4)
            .map(|c| char::from_u32(endian.read_u32(c)).unwrap_or(char::REPLACEMENT_CHARACTER))
            .collect(),
        other => return Err(MatError::UnexpectedDataType(other)),
    };
    Ok(chars)
}
