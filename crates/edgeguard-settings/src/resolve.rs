use crate::model::EdgeguardConfigV1;
use anyhow::Context;
use edgeguard_domain::policy::Limits;
use globset::Glob;

pub const DEFAULT_SOURCE_DIR: &str = "src";

#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub source_dir: Option<String>,
    pub debug_log: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedSettings {
    pub limits: Limits,
    pub source_dir: String,
    pub exclude: Vec<String>,
    pub debug_log: Option<String>,
}

impl Default for ResolvedSettings {
    fn default() -> Self {
        Self {
            limits: Limits::default(),
            source_dir: DEFAULT_SOURCE_DIR.to_string(),
            exclude: Vec::new(),
            debug_log: None,
        }
    }
}

pub fn resolve_settings(
    cfg: EdgeguardConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedSettings> {
    let mut resolved = ResolvedSettings::default();

    if let Some(dir) = overrides.source_dir.or(cfg.source_dir) {
        resolved.source_dir = normalize_source_dir(&dir)?;
    }

    validate_excludes(&cfg.exclude)?;
    resolved.exclude = cfg.exclude;

    let limits = &mut resolved.limits;
    if let Some(v) = cfg.retry_threshold {
        limits.retry_threshold = non_negative("retry_threshold", v)?;
    }
    if let Some(v) = cfg.cpu_ms_api_ceiling {
        limits.cpu_ms_api_ceiling = non_negative("cpu_ms_api_ceiling", v)?;
    }
    if let Some(v) = cfg.free_bundle_bytes {
        limits.free_bundle_bytes = v;
    }
    if let Some(v) = cfg.paid_bundle_bytes {
        limits.paid_bundle_bytes = v;
    }
    if limits.free_bundle_bytes > limits.paid_bundle_bytes {
        anyhow::bail!(
            "free_bundle_bytes ({}) must not exceed paid_bundle_bytes ({})",
            limits.free_bundle_bytes,
            limits.paid_bundle_bytes
        );
    }
    if let Some(v) = cfg.daily_requests {
        limits.daily_requests = v;
    }
    if let Some(v) = cfg.loop_fanout {
        limits.loop_fanout = v;
    }

    resolved.debug_log = overrides.debug_log.or(cfg.debug_log);

    Ok(resolved)
}

fn validate_excludes(patterns: &[String]) -> anyhow::Result<()> {
    for pattern in patterns {
        Glob::new(pattern).with_context(|| format!("invalid exclude glob: {pattern}"))?;
    }
    Ok(())
}

fn normalize_source_dir(dir: &str) -> anyhow::Result<String> {
    let dir = dir.trim().replace('\\', "/");
    let dir = dir.trim_start_matches("./").trim_end_matches('/');
    if dir.starts_with('/') || dir.split('/').any(|seg| seg == "..") {
        anyhow::bail!("source_dir must stay inside the project: {dir}");
    }
    Ok(if dir.is_empty() { ".".to_string() } else { dir.to_string() })
}

fn non_negative(field: &str, v: i64) -> anyhow::Result<i64> {
    if v < 0 {
        anyhow::bail!("{field} must not be negative (got {v})");
    }
    Ok(v)
}
