#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(edf) = eegnpz::edf::EdfFile::from_bytes(data, "fuzz") {
        // Any decoded recording must survive the rest of the pipeline
        let samples = edf.samples_by_channels();
        let time = eegnpz::signal::time_axis(samples.nrows(), edf.sample_rate());
        let _ = eegnpz::signal::slice_interval(samples.view(), time.view(), 0.0, 1.0);
    }
});
