//! Integration tests for the EDF reader.

mod common;

use chrono::NaiveDate;
use common::{edf_file, EdfSignal};
use eegnpz::edf::{EdfError, EdfFile};
use tempfile::tempdir;

fn ramp(n: usize, offset: i16) -> Vec<i16> {
    (0..n as i16).map(|i| i * 3 + offset).collect()
}

#[test]
fn test_decode_identity_signals() {
    let signals = vec![
        EdfSignal::identity("EEG FP1-REF", "uV", 4, ramp(12, 0)),
        EdfSignal::identity("EEG FP2-REF", "uV", 4, ramp(12, -50)),
    ];
    let bytes = edf_file(&signals, 1.0, None, "");
    let edf = EdfFile::from_bytes(&bytes, "memory").unwrap();

    assert_eq!(edf.n_channels(), 2);
    assert_eq!(edf.n_samples(), 12);
    assert_eq!(edf.sample_rate(), 4.0);
    assert_eq!(edf.duration(), 3.0);
    assert_eq!(edf.channel_labels(), vec!["EEG FP1-REF", "EEG FP2-REF"]);
    assert_eq!(edf.header().n_records, 3);
    assert_eq!(
        edf.header().start,
        NaiveDate::from_ymd_opt(2024, 1, 1).and_then(|d| d.and_hms_opt(10, 30, 0))
    );

    let data = edf.data();
    for (k, &digital) in ramp(12, -50).iter().enumerate() {
        assert_eq!(data[[1, k]], digital as f64 * 1e-6);
    }

    let transposed = edf.samples_by_channels();
    assert_eq!(transposed.dim(), (12, 2));
    assert_eq!(transposed[[5, 0]], data[[0, 5]]);
}

#[test]
fn test_physical_scaling_and_units() {
    let mut signal = EdfSignal::identity("C3", "mV", 2, vec![-2048, 2047, 0, 1024]);
    signal.physical_min = -1.0;
    signal.physical_max = 1.0;
    signal.digital_min = -2048;
    signal.digital_max = 2047;
    let bytes = edf_file(&[signal], 0.5, None, "");
    let edf = EdfFile::from_bytes(&bytes, "memory").unwrap();

    assert_eq!(edf.sample_rate(), 4.0);
    let data = edf.data();
    // Digital extremes map to physical extremes, then mV -> V
    assert!((data[[0, 0]] + 1e-3).abs() < 1e-15);
    assert!((data[[0, 1]] - 1e-3).abs() < 1e-15);
    let gain = 2.0 / 4095.0;
    assert!((data[[0, 3]] - ((1024.0 + 2048.0) * gain - 1.0) * 1e-3).abs() < 1e-15);
}

#[test]
fn test_unknown_unit_left_unscaled() {
    let bytes = edf_file(&[EdfSignal::identity("Resp", "Ohm", 2, vec![5, 6])], 1.0, None, "");
    let edf = EdfFile::from_bytes(&bytes, "memory").unwrap();
    assert_eq!(edf.data()[[0, 1]], 6.0);
}

#[test]
fn test_annotation_signal_skipped() {
    let signals = vec![
        EdfSignal::identity("EEG O1-REF", "uV", 5, ramp(10, 1)),
        EdfSignal::annotations(8, 2),
        EdfSignal::identity("EEG O2-REF", "uV", 5, ramp(10, 2)),
    ];
    let bytes = edf_file(&signals, 1.0, None, "EDF+C");
    let edf = EdfFile::from_bytes(&bytes, "memory").unwrap();

    assert!(edf.header().is_edf_plus());
    assert_eq!(edf.header().n_signals, 3);
    assert_eq!(edf.channel_labels(), vec!["EEG O1-REF", "EEG O2-REF"]);
    assert_eq!(edf.n_samples(), 10);
    // Second record of O2 starts after the annotation block of the first
    assert_eq!(edf.data()[[1, 5]], ramp(10, 2)[5] as f64 * 1e-6);
}

#[test]
fn test_unknown_record_count() {
    let signals = vec![EdfSignal::identity("Cz", "uV", 3, ramp(9, 0))];
    let bytes = edf_file(&signals, 1.0, Some(-1), "");
    let edf = EdfFile::from_bytes(&bytes, "memory").unwrap();
    assert_eq!(edf.n_samples(), 9);
}

#[test]
fn test_partial_record_dropped() {
    let signals = vec![EdfSignal::identity("Cz", "uV", 3, ramp(9, 0))];
    let mut bytes = edf_file(&signals, 1.0, Some(-1), "");
    bytes.truncate(bytes.len() - 2);
    let edf = EdfFile::from_bytes(&bytes, "memory").unwrap();
    assert_eq!(edf.n_samples(), 6);
}

#[test]
fn test_mixed_sample_rates_upsampled_to_fastest() {
    let signals = vec![
        EdfSignal::identity("Fz", "uV", 4, ramp(8, 0)),
        EdfSignal::identity("IBI", "uV", 1, vec![5, 5]),
        EdfSignal::identity("Pz", "uV", 2, vec![-7; 4]),
    ];
    let bytes = edf_file(&signals, 1.0, None, "");
    let edf = EdfFile::from_bytes(&bytes, "memory").unwrap();

    assert_eq!(edf.n_channels(), 3);
    assert_eq!(edf.n_samples(), 8);
    assert_eq!(edf.sample_rate(), 4.0);
    assert_eq!(edf.duration(), 2.0);

    let data = edf.data();
    for (k, &digital) in ramp(8, 0).iter().enumerate() {
        assert_eq!(data[[0, k]], digital as f64 * 1e-6);
    }
    // Constant slow signals stay constant after upsampling
    for k in 0..8 {
        assert!((data[[1, k]] - 5e-6).abs() < 1e-15);
        assert!((data[[2, k]] + 7e-6).abs() < 1e-15);
    }
}

#[test]
fn test_only_annotations() {
    let bytes = edf_file(&[EdfSignal::annotations(4, 2)], 1.0, None, "EDF+C");
    assert!(matches!(
        EdfFile::from_bytes(&bytes, "memory"),
        Err(EdfError::NoSignals)
    ));
}

#[test]
fn test_open_from_disk() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("rec.edf");
    std::fs::write(
        &path,
        edf_file(&[EdfSignal::identity("Oz", "uV", 2, vec![1, 2, 3, 4])], 1.0, None, ""),
    )
    .unwrap();

    let edf = EdfFile::open(&path).unwrap();
    assert_eq!(edf.path(), path.display().to_string());
    assert!(matches!(
        EdfFile::open(dir.path().join("missing.edf")),
        Err(EdfError::IoError(_))
    ));
}

#[test]
fn test_truncated_header() {
    let bytes = edf_file(&[EdfSignal::identity("Oz", "uV", 2, vec![1, 2])], 1.0, None, "");
    assert!(matches!(
        EdfFile::from_bytes(&bytes[..300], "memory"),
        Err(EdfError::InvalidHeader(_))
    ));
}
