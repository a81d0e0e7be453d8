use crate::Issue;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Stable schema identifier for edgeguard reports.
pub const SCHEMA_REPORT_V1: &str = "edgeguard.report.v1";

/// Deployment verdict. Only an explicit opt-in blocking rule produces `Block`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Allow,
    Block,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolMeta {
    pub name: String,
    pub version: String,
}

/// An issue as emitted in the report, with a stable fingerprint for trending.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportIssue {
    #[serde(flatten)]
    pub issue: Issue,
    pub fingerprint: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AuditReport {
    pub schema: String,
    pub tool: ToolMeta,
    #[serde(with = "time::serde::rfc3339")]
    pub started_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub finished_at: OffsetDateTime,
    pub verdict: Verdict,

    /// Config file the audit ran against (project-relative), if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_file: Option<String>,

    /// Why the audit did not run (bypass, missing or unparsable config).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skipped: Option<String>,

    pub blocking_rule_ids: Vec<String>,
    pub blocking: Vec<ReportIssue>,
    pub warnings: Vec<ReportIssue>,

    pub files_scanned: u32,
    pub issues_suppressed: u32,
}

impl AuditReport {
    pub fn issue_count(&self) -> usize {
        self.blocking.len() + self.warnings.len()
    }
}
