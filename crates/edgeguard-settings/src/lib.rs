//! Settings parsing and resolution.
//!
//! This crate is intentionally IO-free: it parses and resolves configuration provided as strings.
//! Two inputs are handled:
//! - `edgeguard.toml`, the tool settings (limits, source directory, excludes)
//! - `.pre-deploy-ignore`, the project ignore and blocking policy

#![forbid(unsafe_code)]

mod ignore;
mod model;
mod resolve;

pub use ignore::{IGNORE_FILE_NAME, parse_ignore_file};
pub use model::EdgeguardConfigV1;
pub use resolve::{DEFAULT_SOURCE_DIR, Overrides, ResolvedSettings};

/// Settings file name at the project root.
pub const SETTINGS_FILE_NAME: &str = "edgeguard.toml";

/// Parse `edgeguard.toml` into a typed model.
pub fn parse_settings_toml(input: &str) -> anyhow::Result<EdgeguardConfigV1> {
    let cfg: EdgeguardConfigV1 = toml::from_str(input)?;
    Ok(cfg)
}

/// Resolve the effective settings (overrides, then file, then defaults).
pub fn resolve_settings(
    cfg: EdgeguardConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedSettings> {
    resolve::resolve_settings(cfg, overrides)
}

/// Fuzz-friendly API for testing parsing robustness.
pub mod fuzz {
    pub fn parse_ignore(text: &str) {
        let _ = super::parse_ignore_file(text);
    }

    pub fn parse_settings(text: &str) {
        if let Ok(cfg) = super::parse_settings_toml(text) {
            let _ = super::resolve_settings(cfg, super::Overrides::default());
        }
    }
}
