//! Fuzz target for both deploy-config dialects.
//!
//! Goal: neither the JSONC cleaner nor the TOML subset parser may panic.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_config_parsers
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        edgeguard_config::fuzz::parse_any(text);
    }
});
