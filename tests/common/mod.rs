//! Builders for synthetic MAT, EDF and annotation fixtures.

#![allow(dead_code)]

use std::io::Write;

use flate2::write::ZlibEncoder;
use flate2::Compression;
use ndarray::Array4;

/// Route crate log records to the test harness. Honors `RUST_LOG`.
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .is_test(true)
        .try_init();
}

const MI_INT8: u32 = 1;
const MI_UINT16: u32 = 4;
const MI_INT16: u32 = 3;
const MI_INT32: u32 = 5;
const MI_UINT32: u32 = 6;
const MI_DOUBLE: u32 = 9;
const MI_MATRIX: u32 = 14;
const MI_COMPRESSED: u32 = 15;

const CLASS_CELL: u32 = 1;
const CLASS_STRUCT: u32 = 2;
const CLASS_CHAR: u32 = 4;
const CLASS_DOUBLE: u32 = 6;

/// A MATLAB value to encode.
#[derive(Debug, Clone)]
pub enum Mat {
    /// Double class stored as miDOUBLE, values column-major
    Double { dims: Vec<usize>, values: Vec<f64> },
    /// Double class stored as miINT16, as MATLAB does for integral data
    DoubleAsInt16 { dims: Vec<usize>, values: Vec<i16> },
    /// 1 x n char array
    Char(String),
    /// Cell array, items column-major
    Cell { dims: Vec<usize>, items: Vec<Mat> },
    /// 1 x 1 struct
    Struct(Vec<(String, Mat)>),
}

impl Mat {
    pub fn scalar(value: f64) -> Self {
        Mat::Double {
            dims: vec![1, 1],
            values: vec![value],
        }
    }

    pub fn row(values: &[f64]) -> Self {
        Mat::Double {
            dims: vec![1, values.len()],
            values: values.to_vec(),
        }
    }

    pub fn text(value: &str) -> Self {
        Mat::Char(value.to_string())
    }

    pub fn structure(fields: Vec<(&str, Mat)>) -> Self {
        Mat::Struct(
            fields
                .into_iter()
                .map(|(name, value)| (name.to_string(), value))
                .collect(),
        )
    }
}

fn pad8(bytes: &mut Vec<u8>) {
    while bytes.len() % 8 != 0 {
        bytes.push(0);
    }
}

fn element(data_type: u32, data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(8 + data.len() + 7);
    out.extend_from_slice(&data_type.to_le_bytes());
    out.extend_from_slice(&(data.len() as u32).to_le_bytes());
    out.extend_from_slice(data);
    pad8(&mut out);
    out
}

fn small_element(data_type: u32, data: &[u8]) -> Vec<u8> {
    assert!(!data.is_empty() && data.len() <= 4);
    let mut out = Vec::with_capacity(8);
    out.extend_from_slice(&(((data.len() as u32) << 16) | data_type).to_le_bytes());
    out.extend_from_slice(data);
    out.resize(8, 0);
    out
}

fn name_element(name: &str) -> Vec<u8> {
    if (1..=4).contains(&name.len()) {
        small_element(MI_INT8, name.as_bytes())
    } else {
        element(MI_INT8, name.as_bytes())
    }
}

fn dims_element(dims: &[usize]) -> Vec<u8> {
    let data: Vec<u8> = dims
        .iter()
        .flat_map(|&d| (d as i32).to_le_bytes())
        .collect();
    element(MI_INT32, &data)
}

fn flags_element(class: u32) -> Vec<u8> {
    let mut data = Vec::with_capacity(8);
    data.extend_from_slice(&class.to_le_bytes());
    data.extend_from_slice(&0u32.to_le_bytes());
    element(MI_UINT32, &data)
}

/// Encode a named value as a complete miMATRIX element.
pub fn matrix(name: &str, value: &Mat) -> Vec<u8> {
    let mut body = Vec::new();
    match value {
        Mat::Double { dims, values } => {
            body.extend(flags_element(CLASS_DOUBLE));
            body.extend(dims_element(dims));
            body.extend(name_element(name));
            let data: Vec<u8> = values.iter().flat_map(|v| v.to_le_bytes()).collect();
            body.extend(element(MI_DOUBLE, &data));
        }
        Mat::DoubleAsInt16 { dims, values } => {
            body.extend(flags_element(CLASS_DOUBLE));
            body.extend(dims_element(dims));
            body.extend(name_element(name));
            let data: Vec<u8> = values.iter().flat_map(|v| v.to_le_bytes()).collect();
            body.extend(element(MI_INT16, &data));
        }
        Mat::Char(text) => {
            let units: Vec<u16> = text.encode_utf16().collect();
            body.extend(flags_element(CLASS_CHAR));
            body.extend(dims_element(&[1, units.len()]));
            body.extend(name_element(name));
            let data: Vec<u8> = units.iter().flat_map(|u| u.to_le_bytes()).collect();
            body.extend(element(MI_UINT16, &data));
        }
        Mat::Cell { dims, items } => {
            body.extend(flags_element(CLASS_CELL));
            body.extend(dims_element(dims));
            body.extend(name_element(name));
            for item in items {
                body.extend(matrix("", item));
            }
        }
        Mat::Struct(fields) => {
            const FIELD_NAME_LEN: usize = 32;
            body.extend(flags_element(CLASS_STRUCT));
            body.extend(dims_element(&[1, 1]));
            body.extend(name_element(name));
            body.extend(small_element(
                MI_INT32,
                &(FIELD_NAME_LEN as i32).to_le_bytes(),
            ));
            let mut names = Vec::with_capacity(fields.len() * FIELD_NAME_LEN);
            for (field, _) in fields {
                let mut padded = field.as_bytes().to_vec();
                padded.resize(FIELD_NAME_LEN, 0);
                names.extend(padded);
            }
            body.extend(element(MI_INT8, &names));
            for (_, field_value) in fields {
                body.extend(matrix("", field_value));
            }
        }
    }
    element(MI_MATRIX, &body)
}

fn mat_header() -> Vec<u8> {
    let mut header = vec![b' '; 128];
    let text = b"MATLAB 5.0 MAT-file, Platform: GLNXA64, Created on: Mon Jan  1 00:00:00 2024";
    header[..text.len()].copy_from_slice(text);
    header[116..124].fill(0);
    header[124..126].copy_from_slice(&0x0100u16.to_le_bytes());
    header[126..128].copy_from_slice(b"IM");
    header
}

/// Encode a level-5 MAT file. Compressed files wrap each variable in a
/// zlib miCOMPRESSED element, as MATLAB v7 does.
pub fn mat_file(variables: &[(&str, Mat)], compressed: bool) -> Vec<u8> {
    let mut bytes = mat_header();
    for (name, value) in variables {
        let encoded = matrix(name, value);
        if compressed {
            let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
            encoder.write_all(&encoded).unwrap();
            let deflated = encoder.finish().unwrap();
            bytes.extend_from_slice(&MI_COMPRESSED.to_le_bytes());
            bytes.extend_from_slice(&(deflated.len() as u32).to_le_bytes());
            bytes.extend_from_slice(&deflated);
        } else {
            bytes.extend(encoded);
        }
    }
    bytes
}

/// A 4-D tensor in MATLAB's column-major element order.
pub fn column_major(eeg: &Array4<f64>) -> Vec<f64> {
    eeg.t().iter().copied().collect()
}

/// Build an SSVEP benchmark file holding `data.EEG` and `data.suppl_info`.
pub fn ssvep_mat(
    eeg: &Array4<f64>,
    srate: f64,
    freqs: &[f64],
    chans: &[(f64, f64, f64, &str)],
    compressed: bool,
) -> Vec<u8> {
    let n = chans.len();
    let mut items = Vec::with_capacity(n * 4);
    for col in 0..4 {
        for &(x, y, z, name) in chans {
            items.push(match col {
                0 => Mat::scalar(x),
                1 => Mat::scalar(y),
                2 => Mat::scalar(z),
                _ => Mat::text(name),
            });
        }
    }

    let data = Mat::structure(vec![
        (
            "EEG",
            Mat::Double {
                dims: eeg.shape().to_vec(),
                values: column_major(eeg),
            },
        ),
        (
            "suppl_info",
            Mat::structure(vec![
                ("srate", Mat::scalar(srate)),
                ("freqs", Mat::row(freqs)),
                (
                    "chan",
                    Mat::Cell {
                        dims: vec![n, 4],
                        items,
                    },
                ),
            ]),
        ),
    ]);

    mat_file(&[("data", data)], compressed)
}

/// One EDF signal and its samples.
#[derive(Debug, Clone)]
pub struct EdfSignal {
    pub label: String,
    pub dimension: String,
    pub physical_min: f64,
    pub physical_max: f64,
    pub digital_min: i32,
    pub digital_max: i32,
    pub samples_per_record: usize,
    pub samples: Vec<i16>,
}

impl EdfSignal {
    /// Signal whose physical value equals its digital value, in `dimension`.
    pub fn identity(label: &str, dimension: &str, samples_per_record: usize, samples: Vec<i16>) -> Self {
        Self {
            label: label.to_string(),
            dimension: dimension.to_string(),
            physical_min: -32768.0,
            physical_max: 32767.0,
            digital_min: -32768,
            digital_max: 32767,
            samples_per_record,
            samples,
        }
    }

    /// EDF+ annotation signal filled with zero bytes.
    pub fn annotations(samples_per_record: usize, n_records: usize) -> Self {
        Self {
            label: "EDF Annotations".to_string(),
            dimension: String::new(),
            physical_min: -1.0,
            physical_max: 1.0,
            digital_min: -32768,
            digital_max: 32767,
            samples_per_record,
            samples: vec![0; samples_per_record * n_records],
        }
    }
}

fn field(out: &mut Vec<u8>, value: &str, width: usize) {
    let mut bytes = value.as_bytes().to_vec();
    assert!(bytes.len() <= width, "{:?} wider than {}", value, width);
    bytes.resize(width, b' ');
    out.extend(bytes);
}

/// Encode an EDF file. `n_records` overrides the record count field.
pub fn edf_file(
    signals: &[EdfSignal],
    record_duration: f64,
    n_records: Option<i64>,
    reserved: &str,
) -> Vec<u8> {
    let records = signals
        .first()
        .map(|s| s.samples.len() / s.samples_per_record)
        .unwrap_or(0);
    let ns = signals.len();

    let mut out = Vec::new();
    field(&mut out, "0", 8);
    field(&mut out, "X X X X", 80);
    field(&mut out, "Startdate 01-JAN-2024 X X X", 80);
    field(&mut out, "01.01.24", 8);
    field(&mut out, "10.30.00", 8);
    field(&mut out, &(256 * (ns + 1)).to_string(), 8);
    field(&mut out, reserved, 44);
    field(&mut out, &n_records.unwrap_or(records as i64).to_string(), 8);
    field(&mut out, &record_duration.to_string(), 8);
    field(&mut out, &ns.to_string(), 4);

    for s in signals {
        field(&mut out, &s.label, 16);
    }
    for _ in signals {
        field(&mut out, "AgAgCl electrode", 80);
    }
    for s in signals {
        field(&mut out, &s.dimension, 8);
    }
    for s in signals {
        field(&mut out, &s.physical_min.to_string(), 8);
    }
    for s in signals {
        field(&mut out, &s.physical_max.to_string(), 8);
    }
    for s in signals {
        field(&mut out, &s.digital_min.to_string(), 8);
    }
    for s in signals {
        field(&mut out, &s.digital_max.to_string(), 8);
    }
    for _ in signals {
        field(&mut out, "HP:0.1Hz LP:75Hz", 80);
    }
    for s in signals {
        field(&mut out, &s.samples_per_record.to_string(), 8);
    }
    for _ in signals {
        field(&mut out, "", 32);
    }

    for record in 0..records {
        for s in signals {
            let start = record * s.samples_per_record;
            for sample in &s.samples[start..start + s.samples_per_record] {
                out.extend_from_slice(&sample.to_le_bytes());
            }
        }
    }
    out
}

/// Annotation table with the usual four-line preamble.
pub fn annotation_csv(key: &str, rows: &[(&str, &str, f64, f64)]) -> String {
    let mut text = String::new();
    text.push_str("# version = csv_v1.0.0\n");
    text.push_str(&format!("# bname = {}\n", key));
    text.push_str("# duration = 30.00 secs\n");
    text.push_str("# montage_file = nedc_eas_default_montage.txt\n");
    text.push_str("# key, channel, start_time, stop_time, artifact_label, confidence\n");
    for (row_key, label, start, stop) in rows {
        text.push_str(&format!(
            "{},FP1-F7, {:.4}, {:.4},{},1.0000\n",
            row_key, start, stop, label
        ));
    }
    text
}
