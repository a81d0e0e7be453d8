use crate::checks;
use crate::cost;
use crate::model::ProjectModel;
use crate::policy::{IgnorePolicy, Limits};
use crate::report::AuditResult;
use crate::scanner::dedupe;
use edgeguard_types::{Issue, Verdict};
use tracing::debug;

pub fn evaluate(model: &ProjectModel, limits: &Limits, policy: &IgnorePolicy) -> AuditResult {
    let ctx = model.context(limits);
    let raw = checks::run_all(&ctx);
    debug!(raw = raw.len(), "rules evaluated");

    let mut issues = dedupe(raw);
    let before = issues.len();
    issues.retain(|issue| !policy.is_suppressed(issue));
    let suppressed = (before - issues.len()) as u32;
    debug!(kept = issues.len(), suppressed, "ignore policy applied");

    if let Some(simulation) = cost::simulate(&issues, limits)
        && !policy.is_suppressed(&simulation)
    {
        issues.push(simulation);
    }

    let mut result = decide(issues, policy);
    result.suppressed = suppressed;
    result
}

/// Partition filtered issues into blocking and warning sets and render the verdict.
///
/// Only rule ids the project opted into can block. Severity never does.
pub fn decide(mut issues: Vec<Issue>, policy: &IgnorePolicy) -> AuditResult {
    issues.sort_by(compare_issues);

    let (blocking, warnings): (Vec<Issue>, Vec<Issue>) = issues
        .iter()
        .cloned()
        .partition(|issue| policy.is_blocking(&issue.id));

    let verdict = if blocking.is_empty() {
        Verdict::Allow
    } else {
        Verdict::Block
    };

    AuditResult {
        issues,
        blocking,
        warnings,
        blocking_rule_ids: policy.blocking_rule_ids().map(str::to_string).collect(),
        verdict,
        suppressed: 0,
    }
}

fn compare_issues(a: &Issue, b: &Issue) -> std::cmp::Ordering {
    // 1) severity (critical -> info)
    // 2) rule id
    // 3) message
    a.severity
        .rank()
        .cmp(&b.severity.rank())
        .then_with(|| a.id.cmp(&b.id))
        .then_with(|| a.message.cmp(&b.message))
}
