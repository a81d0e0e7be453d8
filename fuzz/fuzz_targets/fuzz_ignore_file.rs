//! Fuzz target for `.pre-deploy-ignore` and `edgeguard.toml`.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_ignore_file
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        edgeguard_settings::fuzz::parse_ignore(text);
        edgeguard_settings::fuzz::parse_settings(text);
        let _ = edgeguard_repo::fuzz::parse_package(text);
    }
});
