//! The `audit` use case: load the project, evaluate the rule catalog, produce a report.
//!
//! Every failure here is fail-open: an unreadable config, settings or ignore file
//! degrades to an ALLOW report with a `skipped` reason or to defaults.

use crate::diagnostics::{DiagnosticLog, diagnostic_log_for};
use crate::report::{build_report, tool_meta};
use camino::Utf8Path;
use edgeguard_domain::policy::IgnorePolicy;
use edgeguard_settings::{Overrides, ResolvedSettings};
use edgeguard_types::{AuditReport, SCHEMA_REPORT_V1, Verdict};
use time::OffsetDateTime;

#[derive(Clone, Debug)]
pub struct AuditInput<'a> {
    /// Directory holding the deploy config.
    pub project_root: &'a Utf8Path,
    /// CLI overrides applied on top of `edgeguard.toml`.
    pub overrides: Overrides,
}

#[derive(Clone, Debug)]
pub struct AuditOutput {
    pub report: AuditReport,
    pub settings: ResolvedSettings,
}

/// Map verdict to exit code: 0 = allow, 2 = block.
pub fn verdict_exit_code(verdict: Verdict) -> i32 {
    match verdict {
        Verdict::Allow => 0,
        Verdict::Block => 2,
    }
}

/// An ALLOW report for an audit that did not run.
pub fn skipped_report(reason: &str) -> AuditReport {
    let now = OffsetDateTime::now_utc();
    AuditReport {
        schema: SCHEMA_REPORT_V1.to_string(),
        tool: tool_meta(),
        started_at: now,
        finished_at: now,
        verdict: Verdict::Allow,
        config_file: None,
        skipped: Some(reason.to_string()),
        blocking_rule_ids: Vec::new(),
        blocking: Vec::new(),
        warnings: Vec::new(),
        files_scanned: 0,
        issues_suppressed: 0,
    }
}

/// Resolve settings, open the diagnostic log they ask for, and audit the project.
pub fn run_audit(input: AuditInput<'_>) -> AuditOutput {
    let root = input.project_root;
    let fallback_log = input.overrides.debug_log.clone();

    let (settings, settings_error) = match edgeguard_repo::read_settings(root, input.overrides) {
        Ok(settings) => (settings, None),
        Err(err) => {
            let settings = ResolvedSettings {
                debug_log: fallback_log,
                ..ResolvedSettings::default()
            };
            (settings, Some(format!("{err:#}")))
        }
    };

    let log = diagnostic_log_for(root, settings.debug_log.as_deref());
    if let Some(err) = settings_error {
        tracing::warn!(error = %err, "invalid edgeguard.toml; using defaults");
        log.record(&format!("invalid settings, using defaults: {err}"));
    }

    audit_with_log(root, settings, log.as_ref())
}

/// Audit with already-resolved settings and an injected diagnostic log.
pub fn audit_with_log(
    project_root: &Utf8Path,
    settings: ResolvedSettings,
    log: &dyn DiagnosticLog,
) -> AuditOutput {
    let started_at = OffsetDateTime::now_utc();
    log.record(&format!("audit started in {project_root}"));

    let loaded = match edgeguard_repo::load_config(project_root) {
        Ok(Some(loaded)) => loaded,
        Ok(None) => {
            log.record("no deploy config found; allowing");
            return AuditOutput {
                report: skipped_report("no deploy config found"),
                settings,
            };
        }
        Err(err) => {
            let reason = format!("config unreadable: {err:#}");
            tracing::warn!(error = %format!("{err:#}"), "deploy config unreadable; allowing");
            log.record(&format!("{reason}; allowing"));
            return AuditOutput {
                report: skipped_report(&reason),
                settings,
            };
        }
    };
    log.record(&format!("found config: {}", loaded.path));

    let policy = match edgeguard_repo::read_ignore_policy(project_root) {
        Ok(policy) => policy,
        Err(err) => {
            tracing::warn!(error = %format!("{err:#}"), "ignore file unreadable; using empty policy");
            log.record(&format!("ignore file unreadable: {err:#}"));
            IgnorePolicy::new()
        }
    };

    let model = edgeguard_repo::build_project_model(project_root, loaded.node, &settings);
    let files_scanned = model.files_scanned();
    let result = edgeguard_domain::evaluate(&model, &settings.limits, &policy);

    tracing::info!(
        verdict = ?result.verdict,
        blocking = result.blocking.len(),
        warnings = result.warnings.len(),
        suppressed = result.suppressed,
        files = files_scanned,
        "audit finished"
    );
    log.record(&format!(
        "audit finished: {:?}, {} blocking, {} warning(s), {} suppressed",
        result.verdict,
        result.blocking.len(),
        result.warnings.len(),
        result.suppressed
    ));

    let finished_at = OffsetDateTime::now_utc();
    let report = build_report(
        result,
        Some(loaded.path.as_str().to_string()),
        files_scanned,
        started_at,
        finished_at,
    );

    AuditOutput { report, settings }
}
