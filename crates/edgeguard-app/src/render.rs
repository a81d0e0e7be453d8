//! Plain text and JSON rendering of audit reports.

use anyhow::Context;
use camino::Utf8Path;
use edgeguard_types::{AuditReport, ReportIssue, Verdict};
use std::fmt::Write as _;

/// Human-readable report: blocking issues first, then warnings.
pub fn render_text(report: &AuditReport) -> String {
    let mut out = String::new();

    if let Some(reason) = &report.skipped {
        let _ = writeln!(out, "Pre-deploy audit skipped: {reason}");
        return out;
    }

    if report.issue_count() == 0 {
        let _ = writeln!(out, "Pre-deploy audit: no issues found");
        return out;
    }

    let _ = writeln!(
        out,
        "Pre-deploy audit: {} blocking, {} warning(s)",
        report.blocking.len(),
        report.warnings.len()
    );

    if !report.blocking.is_empty() {
        out.push_str("\nBLOCKING\n");
        for item in &report.blocking {
            write_issue(&mut out, item);
        }
    }

    if !report.warnings.is_empty() {
        out.push_str("\nWARNINGS\n");
        for item in &report.warnings {
            write_issue(&mut out, item);
        }
    }

    out.push('\n');
    match report.verdict {
        Verdict::Block => {
            let ids: Vec<&str> = report
                .blocking
                .iter()
                .map(|b| b.issue.id.as_str())
                .collect::<std::collections::BTreeSet<_>>()
                .into_iter()
                .collect();
            let _ = writeln!(out, "DEPLOYMENT BLOCKED by: {}", ids.join(", "));
            out.push_str("Fix these issues, or remove the `!RULE` line from .pre-deploy-ignore.\n");
        }
        Verdict::Allow => {
            out.push_str("Deployment allowed. Add `!RULE` to .pre-deploy-ignore to make a rule blocking.\n");
        }
    }
    if report.issues_suppressed > 0 {
        let _ = writeln!(out, "{} issue(s) suppressed by .pre-deploy-ignore", report.issues_suppressed);
    }

    out
}

fn write_issue(out: &mut String, item: &ReportIssue) {
    let issue = &item.issue;
    let _ = writeln!(out, "  [{}] {} {}", issue.id, issue.severity, issue.message);
    let _ = writeln!(out, "      fix: {}", issue.fix);
    if let Some(verify) = &issue.verify {
        let _ = writeln!(out, "      verify: {verify}");
    }
}

pub fn serialize_report(report: &AuditReport) -> anyhow::Result<String> {
    let mut text = serde_json::to_string_pretty(report).context("serialize report")?;
    text.push('\n');
    Ok(text)
}

pub fn write_report(path: &Utf8Path, report: &AuditReport) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_str().is_empty()
    {
        std::fs::create_dir_all(parent).with_context(|| format!("create {parent}"))?;
    }
    let text = serialize_report(report)?;
    std::fs::write(path, text).with_context(|| format!("write {path}"))
}
