//! Fuzz target for inline `@pre-deploy-ok` directives.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_inline_suppressions
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        edgeguard_inline_suppressions::fuzz::parse_suppressions(text);
    }
});
