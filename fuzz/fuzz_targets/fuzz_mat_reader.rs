#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Malformed input must produce an error, never a panic
    if let Ok(mat) = eegnpz::mat::MatFile::from_bytes(data, "fuzz") {
        let _ = mat.describe();
        let _ = eegnpz::mat::SsvepRecording::from_mat(&mat);
        for variable in mat.iter() {
            if let Some(numeric) = variable.value.as_numeric() {
                let _ = numeric.to_ndarray();
            }
        }
    }
});
