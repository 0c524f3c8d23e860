//! EDF/EDF+ header parsing.
//!
//! The header is plain ASCII: a 256-byte fixed part followed by 256 bytes per
//! signal, laid out field-by-field (all labels, then all transducers, ...).

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use super::error::EdfError;

/// Size of the fixed header and of each per-signal block.
pub(crate) const BLOCK_LEN: usize = 256;

/// Label of EDF+ annotation signals.
pub const ANNOTATION_LABEL: &str = "EDF Annotations";

/// File-level header fields.
#[derive(Debug, Clone, PartialEq)]
pub struct EdfHeader {
    /// Format version, `0` for EDF
    pub version: String,
    /// Local patient identification
    pub patient: String,
    /// Local recording identification
    pub recording: String,
    /// Recording start, when the date and time fields are well formed
    pub start: Option<NaiveDateTime>,
    /// Number of header bytes
    pub header_bytes: usize,
    /// Reserved field (`EDF+C` / `EDF+D` for EDF+)
    pub reserved: String,
    /// Number of data records, `-1` if unknown
    pub n_records: i64,
    /// Duration of one data record in seconds
    pub record_duration: f64,
    /// Number of signals, including annotation signals
    pub n_signals: usize,
}

impl EdfHeader {
    /// Whether the reserved field marks an EDF+ file.
    pub fn is_edf_plus(&self) -> bool {
        self.reserved.starts_with("EDF+")
    }
}

/// Per-signal header fields.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalHeader {
    /// Signal label, e.g. `EEG Fp1-REF`
    pub label: String,
    /// Transducer type
    pub transducer: String,
    /// Physical dimension, e.g. `uV`
    pub physical_dimension: String,
    /// Physical minimum
    pub physical_min: f64,
    /// Physical maximum
    pub physical_max: f64,
    /// Digital minimum
    pub digital_min: i32,
    /// Digital maximum
    pub digital_max: i32,
    /// Prefiltering description
    pub prefilter: String,
    /// Samples in each data record
    pub samples_per_record: usize,
}

impl SignalHeader {
    /// Whether this is an EDF+ annotation signal rather than data.
    pub fn is_annotation(&self) -> bool {
        self.label == ANNOTATION_LABEL
    }

    /// Physical units per digital step.
    pub fn gain(&self) -> f64 {
        let digital_range = (self.digital_max - self.digital_min) as f64;
        if digital_range == 0.0 {
            1.0
        } else {
            (self.physical_max - self.physical_min) / digital_range
        }
    }

    /// Convert a stored digital value to physical units.
    pub fn to_physical(&self, digital: i16) -> f64 {
        (digital as f64 - self.digital_min as f64) * self.gain() + self.physical_min
    }

    /// Factor converting the physical dimension to volts.
    ///
    /// Returns `None` for dimensions that are not a voltage.
    pub fn volts_per_unit(&self) -> Option<f64> {
        match self.physical_dimension.to_lowercase().as_str() {
            "v" => Some(1.0),
            "mv" => Some(1e-3),
            "uv" | "µv" | "μv" => Some(1e-6),
            "nv" => Some(1e-9),
            _ => None,
        }
    }

    /// Sampling rate given the record duration.
    pub fn sample_rate(&self, record_duration: f64) -> f64 {
        self.samples_per_record as f64 / record_duration
    }
}

fn ascii(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).trim().to_string()
}

fn number<T: std::str::FromStr>(field: &str, bytes: &[u8]) -> Result<T, EdfError> {
    let text = ascii(bytes);
    text.parse().map_err(|_| EdfError::field(field, text))
}

/// Parse `dd.mm.yy` and `hh.mm.ss`.
fn parse_start(date: &str, time: &str) -> Option<NaiveDateTime> {
    let mut date_parts = date.split('.').map(|p| p.trim().parse::<u32>().ok());
    let day = date_parts.next()??;
    let month = date_parts.next()??;
    let yy = date_parts.next()??;
    // Two-digit years: 85-99 are 19xx, the rest 20xx
    let year = (if yy >= 85 { 1900 + yy } else { 2000 + yy }) as i32;

    let mut time_parts = time.split('.').map(|p| p.trim().parse::<u32>().ok());
    let hour = time_parts.next()??;
    let minute = time_parts.next()??;
    let second = time_parts.next()??;

    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    let time = NaiveTime::from_hms_opt(hour, minute, second)?;
    Some(NaiveDateTime::new(date, time))
}

/// Parse the fixed header and all signal headers.
pub(crate) fn parse_headers(bytes: &[u8]) -> Result<(EdfHeader, Vec<SignalHeader>), EdfError> {
    if bytes.len() < BLOCK_LEN {
        return Err(EdfError::InvalidHeader(format!(
            "file is {} bytes, shorter than the {} byte header",
            bytes.len(),
            BLOCK_LEN
        )));
    }

    let start_date = ascii(&bytes[168..176]);
    let start_time = ascii(&bytes[176..184]);
    let start = parse_start(&start_date, &start_time);
    if start.is_none() {
        log::warn!(
            "Unparsable EDF start date/time {:?} {:?}",
            start_date,
            start_time
        );
    }

    let header = EdfHeader {
        version: ascii(&bytes[0..8]),
        patient: ascii(&bytes[8..88]),
        recording: ascii(&bytes[88..168]),
        start,
        header_bytes: number("header bytes", &bytes[184..192])?,
        reserved: ascii(&bytes[192..236]),
        n_records: number("number of data records", &bytes[236..244])?,
        record_duration: number("data record duration", &bytes[244..252])?,
        n_signals: number("number of signals", &bytes[252..256])?,
    };

    let ns = header.n_signals;
    let expected_len = BLOCK_LEN * (ns + 1);
    if header.header_bytes != expected_len {
        return Err(EdfError::InvalidHeader(format!(
            "header declares {} bytes, {} signals require {}",
            header.header_bytes, ns, expected_len
        )));
    }
    if bytes.len() < expected_len {
        return Err(EdfError::InvalidHeader(format!(
            "file is {} bytes, signal headers need {}",
            bytes.len(),
            expected_len
        )));
    }

    // Each field is an array of `ns` entries of fixed width
    let mut offset = BLOCK_LEN;
    let mut field = move |width: usize| {
        let start = offset;
        offset += width * ns;
        (0..ns)
            .map(|i| &bytes[start + i * width..start + (i + 1) * width])
            .collect::<Vec<_>>()
    };

    let labels = field(16);
    let transducers = field(80);
    let dimensions = field(8);
    let physical_mins = field(8);
    let physical_maxs = field(8);
    let digital_mins = field(8);
    let digital_maxs = field(8);
    let prefilters = field(80);
    let samples = field(8);

    let signals = (0..ns)
        .map(|i| {
            Ok(SignalHeader {
                label: ascii(labels[i]),
                transducer: ascii(transducers[i]),
                physical_dimension: ascii(dimensions[i]),
                physical_min: number("physical minimum", physical_mins[i])?,
                physical_max: number("physical maximum", physical_maxs[i])?,
                digital_min: number("digital minimum", digital_mins[i])?,
                digital_max: number("digital maximum", digital_maxs[i])?,
                prefilter: ascii(prefilters[i]),
                samples_per_record: number("samples per record", samples[i])?,
            })
        })
        .collect::<Result<Vec<_>, EdfError>>()?;

    Ok((header, signals))
}
