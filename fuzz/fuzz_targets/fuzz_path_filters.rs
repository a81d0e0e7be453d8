//! Fuzz target for the source-walk path filters (test globs plus user excludes).
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_path_filters
//! ```

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct FilterInput {
    /// User exclude globs (e.g. "src/generated/**").
    excludes: Vec<String>,
    /// Project-relative paths to classify.
    paths: Vec<String>,
}

fuzz_target!(|input: FilterInput| {
    if input.excludes.len() > 20 || input.paths.len() > 100 {
        return;
    }
    let excludes: Vec<String> = input.excludes.into_iter().filter(|p| p.len() <= 256).collect();
    let paths: Vec<String> = input.paths.into_iter().filter(|p| p.len() <= 512).collect();

    if let Ok(flags) = edgeguard_repo::fuzz::classify_paths(&paths, &excludes) {
        assert_eq!(flags.len(), paths.len());
    }
});
