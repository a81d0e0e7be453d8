use edgeguard_domain::report::AuditResult;
use edgeguard_types::{AuditReport, Issue, ReportIssue, SCHEMA_REPORT_V1, ToolMeta};
use sha2::{Digest, Sha256};
use time::OffsetDateTime;

/// Stable SHA-256 fingerprint of an issue: `id|message`.
///
/// The message embeds the queue, bucket or `path:line`, so this identifies the finding
/// without depending on severity or fix wording.
pub fn fingerprint_issue(issue: &Issue) -> String {
    let canonical = format!("{}|{}", issue.id, issue.message);
    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    hex::encode(hasher.finalize())
}

pub(crate) fn tool_meta() -> ToolMeta {
    ToolMeta {
        name: "edgeguard".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }
}

fn with_fingerprints(issues: Vec<Issue>) -> Vec<ReportIssue> {
    issues
        .into_iter()
        .map(|issue| {
            let fingerprint = fingerprint_issue(&issue);
            ReportIssue { issue, fingerprint }
        })
        .collect()
}

/// Wrap a domain result in the emitted report envelope.
pub fn build_report(
    result: AuditResult,
    config_file: Option<String>,
    files_scanned: u32,
    started_at: OffsetDateTime,
    finished_at: OffsetDateTime,
) -> AuditReport {
    let AuditResult {
        blocking,
        warnings,
        blocking_rule_ids,
        verdict,
        suppressed,
        ..
    } = result;

    AuditReport {
        schema: SCHEMA_REPORT_V1.to_string(),
        tool: tool_meta(),
        started_at,
        finished_at,
        verdict,
        config_file,
        skipped: None,
        blocking_rule_ids,
        blocking: with_fingerprints(blocking),
        warnings: with_fingerprints(warnings),
        files_scanned,
        issues_suppressed: suppressed,
    }
}
