use serde::{Deserialize, Serialize};

/// `edgeguard.toml` schema v1.
///
/// Every field is optional and unknown keys are ignored.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EdgeguardConfigV1 {
    /// Optional schema string for tooling (`edgeguard.config.v1`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Directory scanned for source files, relative to the project root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_dir: Option<String>,

    /// Extra glob patterns excluded from the source scan.
    #[serde(default)]
    pub exclude: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_threshold: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu_ms_api_ceiling: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub free_bundle_bytes: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_bundle_bytes: Option<u64>,

    /// Traffic assumed by the loop cost simulation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub daily_requests: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loop_fanout: Option<u64>,

    /// Append diagnostics to this file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug_log: Option<String>,
}
