//! Config parsing for edgeguard.
//!
//! Two dialects are supported, selected by file name:
//! - JSON with comments and trailing commas (`wrangler.jsonc`, `wrangler.json`)
//! - a lenient line-oriented TOML subset (`wrangler.toml`)
//!
//! Both produce the same [`ConfigNode`] tree with a mapping at the root.
//! This crate does no IO.

#![forbid(unsafe_code)]

mod error;
mod jsonc;
mod node;
mod toml_lite;

pub use error::ConfigError;
pub use jsonc::{parse_jsonc, strip_comments, strip_trailing_commas};
pub use node::{ConfigMap, ConfigNode, Scalar};
pub use toml_lite::parse_toml_lite;

/// Config file names in discovery order.
pub const CONFIG_FILE_NAMES: &[&str] = &["wrangler.jsonc", "wrangler.toml", "wrangler.json"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dialect {
    Jsonc,
    TomlLite,
}

impl Dialect {
    /// `.toml` selects the TOML subset; everything else is treated as JSONC.
    pub fn from_file_name(name: &str) -> Self {
        if name.to_ascii_lowercase().ends_with(".toml") {
            Dialect::TomlLite
        } else {
            Dialect::Jsonc
        }
    }
}

/// Parse config text in the given dialect.
///
/// The TOML subset never fails; JSONC fails when the cleaned text is not valid JSON
/// or its root is not an object.
pub fn parse_config(text: &str, dialect: Dialect) -> Result<ConfigNode, ConfigError> {
    match dialect {
        Dialect::Jsonc => parse_jsonc(text),
        Dialect::TomlLite => Ok(parse_toml_lite(text)),
    }
}

/// Fuzz-friendly API for testing parsing robustness.
/// These functions never panic on any input.
pub mod fuzz {
    pub fn parse_any(text: &str) {
        let _ = super::parse_jsonc(text);
        let _ = super::parse_toml_lite(text);
    }
}
