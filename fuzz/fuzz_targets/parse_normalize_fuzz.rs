//! Fuzz target: arbitrary bytes through parse_bytes, then normalization of
//! whatever parsed. Neither step may panic.
//! Build with: cargo fuzz run parse_normalize_fuzz (requires nightly and cargo fuzz).

#![cfg_attr(fuzzing, no_main)]

#[cfg(fuzzing)]
use libfuzzer_sys::fuzz_target;

#[cfg(fuzzing)]
fuzz_target!(|data: &[u8]| {
    let Ok(definitions) = asnnorm::parse_bytes(data) else {
        return;
    };
    let registry = asnnorm::Registry::new();
    let normalizer = asnnorm::Normalizer::new(&registry);
    for normalized in normalizer.normalize_all(&definitions) {
        let _ = serde_json::to_string(&normalized);
    }
});

#[cfg(not(fuzzing))]
fn main() {
    eprintln!("Build with: cargo fuzz run parse_normalize_fuzz");
}
