//! Integration tests for the MAT-file reader and the SSVEP schema.

mod common;

use common::{mat_file, ssvep_mat, Mat};
use eegnpz::mat::{MatClass, MatError, MatFile, MatValue, SsvepRecording};
use ndarray::Array4;
use tempfile::tempdir;

fn sample_eeg() -> Array4<f64> {
    // channels x samples x trials x frequencies
    Array4::from_shape_fn((3, 5, 2, 4), |(c, s, t, f)| {
        (c as f64) + 10.0 * s as f64 + 100.0 * t as f64 + 1000.0 * f as f64
    })
}

const CHANS: [(f64, f64, f64, &str); 3] = [
    (-0.3, 0.9, 0.1, "PO3"),
    (0.0, 1.0, 0.0, "Oz"),
    (0.3, 0.9, 0.1, "PO4"),
];

#[test]
fn test_numeric_char_and_matrix_layout() {
    let bytes = mat_file(
        &[
            (
                "x",
                Mat::Double {
                    dims: vec![2, 3],
                    values: vec![1.0, 4.0, 2.0, 5.0, 3.0, 6.0],
                },
            ),
            ("label", Mat::text("Fp1")),
        ],
        false,
    );
    let mat = MatFile::from_bytes(&bytes, "memory").unwrap();
    assert_eq!(mat.len(), 2);
    assert_eq!(mat.variable_names().collect::<Vec<_>>(), vec!["x", "label"]);
    assert!(mat.header_text().starts_with("MATLAB 5.0 MAT-file"));

    let x = mat.get("x").unwrap().as_numeric().unwrap();
    assert_eq!(x.class, MatClass::Double);
    let array = x.to_ndarray().unwrap();
    // Column-major storage: row 0 is 1, 2, 3
    assert_eq!(array[[0, 0]], 1.0);
    assert_eq!(array[[0, 2]], 3.0);
    assert_eq!(array[[1, 0]], 4.0);

    assert_eq!(mat.get("label").unwrap().as_string().unwrap(), "Fp1");
}

#[test]
fn test_integer_storage_of_double_class() {
    let bytes = mat_file(
        &[(
            "counts",
            Mat::DoubleAsInt16 {
                dims: vec![1, 4],
                values: vec![-3, 0, 7, 32000],
            },
        )],
        false,
    );
    let mat = MatFile::from_bytes(&bytes, "memory").unwrap();
    let counts = mat.require("counts").unwrap().as_numeric().unwrap();
    assert_eq!(counts.class, MatClass::Double);
    assert_eq!(counts.real, vec![-3.0, 0.0, 7.0, 32000.0]);
}

#[test]
fn test_cells_and_structs() {
    let value = Mat::structure(vec![
        ("name", Mat::text("session one")),
        (
            "items",
            Mat::Cell {
                dims: vec![1, 2],
                items: vec![Mat::scalar(2.5), Mat::text("b")],
            },
        ),
    ]);
    let bytes = mat_file(&[("info", value)], false);
    let mat = MatFile::from_bytes(&bytes, "memory").unwrap();

    let info = mat.require("info").unwrap().as_struct().unwrap();
    assert_eq!(info.fields, vec!["name".to_string(), "items".to_string()]);
    assert_eq!(info.field("name").unwrap().as_string().unwrap(), "session one");

    let items = info.field("items").unwrap().as_cell().unwrap();
    assert_eq!(items.get(0, 0).and_then(MatValue::as_scalar), Some(2.5));
    assert_eq!(items.get(0, 1).and_then(MatValue::as_string).unwrap(), "b");
    assert!(items.get(1, 0).is_none());
}

#[test]
fn test_compressed_matches_uncompressed() {
    let eeg = sample_eeg();
    let plain = MatFile::from_bytes(&ssvep_mat(&eeg, 250.0, &[8.0, 10.0, 12.0, 15.0], &CHANS, false), "plain").unwrap();
    let packed = MatFile::from_bytes(&ssvep_mat(&eeg, 250.0, &[8.0, 10.0, 12.0, 15.0], &CHANS, true), "packed").unwrap();
    assert_eq!(plain.get("data"), packed.get("data"));
}

#[test]
fn test_describe_lists_variables() {
    let bytes = mat_file(&[("srate", Mat::scalar(250.0)), ("chan", Mat::text("Oz"))], false);
    let mat = MatFile::from_bytes(&bytes, "subject.mat").unwrap();
    let summary = mat.describe();
    assert!(summary.contains("subject.mat"));
    assert!(summary.lines().any(|l| l.contains("srate") && l.contains("1x1") && l.contains("double")));
    assert!(summary.lines().any(|l| l.contains("chan") && l.contains("char")));
}

#[test]
fn test_require_missing_variable() {
    let bytes = mat_file(&[("a", Mat::scalar(1.0))], false);
    let mat = MatFile::from_bytes(&bytes, "memory").unwrap();
    assert!(matches!(mat.require("data"), Err(MatError::Schema(_))));
}

#[test]
fn test_ssvep_schema() {
    let eeg = sample_eeg();
    let dir = tempdir().unwrap();
    let path = dir.path().join("S1.mat");
    std::fs::write(&path, ssvep_mat(&eeg, 250.0, &[8.0, 10.0, 12.0, 15.0], &CHANS, true)).unwrap();

    let recording = SsvepRecording::open(&path).unwrap();
    assert_eq!(recording.eeg, eeg);
    assert_eq!(recording.srate, 250.0);
    assert_eq!(recording.freqs, vec![8.0, 10.0, 12.0, 15.0]);
    assert_eq!(recording.chans.len(), 3);
    assert_eq!(recording.chans[1].name, "Oz");
    assert_eq!(recording.chans[2].location(), [0.3, 0.9, 0.1]);
}

#[test]
fn test_ssvep_schema_restores_dropped_dimension() {
    // A single condition: MATLAB drops the trailing singleton dimension
    let eeg = Array4::from_shape_fn((2, 3, 2, 1), |(c, s, t, _)| (c + 10 * s + 100 * t) as f64);
    let data = Mat::structure(vec![
        (
            "EEG",
            Mat::Double {
                dims: vec![2, 3, 2],
                values: common::column_major(&eeg),
            },
        ),
        (
            "suppl_info",
            Mat::structure(vec![
                ("srate", Mat::scalar(250.0)),
                ("freqs", Mat::scalar(10.0)),
                (
                    "chan",
                    Mat::Cell {
                        dims: vec![2, 4],
                        items: vec![
                            Mat::scalar(0.0),
                            Mat::scalar(1.0),
                            Mat::scalar(0.0),
                            Mat::scalar(1.0),
                            Mat::scalar(0.0),
                            Mat::scalar(1.0),
                            Mat::text("O1"),
                            Mat::text("O2"),
                        ],
                    },
                ),
            ]),
        ),
    ]);
    let mat = MatFile::from_bytes(&mat_file(&[("data", data)], false), "memory").unwrap();
    let recording = SsvepRecording::from_mat(&mat).unwrap();
    assert_eq!(recording.eeg, eeg);
    assert_eq!(recording.chans[1].name, "O2");
    assert_eq!(recording.chans[1].location(), [1.0, 1.0, 1.0]);
}

#[test]
fn test_ssvep_schema_rejects_frequency_mismatch() {
    let bytes = ssvep_mat(&sample_eeg(), 250.0, &[10.0, 12.0], &CHANS, false);
    let mat = MatFile::from_bytes(&bytes, "memory").unwrap();
    assert!(matches!(SsvepRecording::from_mat(&mat), Err(MatError::Schema(_))));
}

#[test]
fn test_ssvep_schema_rejects_bad_srate() {
    let bytes = ssvep_mat(&sample_eeg(), 0.0, &[8.0, 10.0, 12.0, 15.0], &CHANS, false);
    let mat = MatFile::from_bytes(&bytes, "memory").unwrap();
    assert!(matches!(SsvepRecording::from_mat(&mat), Err(MatError::Schema(_))));
}

#[test]
fn test_ssvep_schema_requires_data_struct() {
    let bytes = mat_file(&[("data", Mat::scalar(1.0))], false);
    let mat = MatFile::from_bytes(&bytes, "memory").unwrap();
    assert!(matches!(SsvepRecording::from_mat(&mat), Err(MatError::Schema(_))));
}

#[test]
fn test_rejects_non_mat_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("notes.mat");
    std::fs::write(&path, b"not a mat file").unwrap();
    assert!(matches!(SsvepRecording::open(&path), Err(MatError::InvalidFormat(_))));
}
