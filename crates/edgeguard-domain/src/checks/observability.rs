use super::utils::{is_true, logs_enabled, queue_consumers, route_patterns, sources_match};
use crate::model::RuleContext;
use edgeguard_config::ConfigNode;
use edgeguard_types::{Detection, Issue, Severity, ids};
use regex::Regex;
use std::sync::LazyLock;

/// Packages that ship logs somewhere other than Workers Logs.
const LOG_EXPORT_PACKAGES: &[&str] = &[
    "@sentry/",
    "toucan-js",
    "@axiomhq/",
    "@logtail/",
    "@baselime/",
    "@datadog/",
    "@honeycombio/",
    "@opentelemetry/",
    "@microlabs/otel-cf-workers",
    "workers-honeycomb-logger",
    "pino",
    "winston",
];

static LOG_EXPORT_IMPORT_RE: LazyLock<Regex> = LazyLock::new(|| {
    let alternatives = LOG_EXPORT_PACKAGES
        .iter()
        .map(|p| regex::escape(p))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(
        r#"(?:\bfrom\s*|\brequire\s*\(\s*|\bimport\s*\(?\s*)['"](?:{alternatives})"#
    ))
    .expect("log export import pattern is valid")
});

pub fn run(ctx: &RuleContext<'_>) -> Vec<Issue> {
    let mut out = Vec::new();

    if !logs_enabled(ctx.config) {
        out.push(Issue::new(
            ids::PERF004,
            Severity::Low,
            Detection::Config,
            "Observability logs not enabled",
            "Add: \"observability\": { \"logs\": { \"enabled\": true } }",
        ));
        return out;
    }

    if !has_export_destination(ctx) {
        out.push(
            Issue::new(
                ids::OBS001,
                Severity::Medium,
                Detection::Heuristic,
                "Workers Logs enabled but no log export destination found",
                "Add \"tail_consumers\", set \"logpush\": true, or ship logs with an SDK",
            )
            .with_verify("Check whether logs are exported by a mechanism outside this worker"),
        );
    }

    let rate = sampling_rate(ctx.config);
    if rate >= 1.0 && is_high_volume(ctx.config) {
        out.push(Issue::new(
            ids::OBS002,
            Severity::Info,
            Detection::Config,
            "Logging 100% of invocations (head_sampling_rate=1) on a high-volume worker",
            "Set: \"observability\": { \"head_sampling_rate\": 0.1 }",
        ));
    }

    out
}

fn has_export_destination(ctx: &RuleContext<'_>) -> bool {
    let tail = ctx
        .config
        .get("tail_consumers")
        .is_some_and(|t| !t.entries().is_empty() && t.as_mapping().is_none_or(|m| !m.is_empty()));
    if tail || is_true(ctx.config.get("logpush")) {
        return true;
    }
    if sources_match(ctx, &LOG_EXPORT_IMPORT_RE) {
        return true;
    }
    ctx.package.is_some_and(|pkg| {
        pkg.dependencies
            .iter()
            .any(|d| LOG_EXPORT_PACKAGES.iter().any(|p| d.starts_with(p)))
    })
}

fn sampling_rate(config: &ConfigNode) -> f64 {
    config
        .get_path(&["observability", "head_sampling_rate"])
        .or_else(|| config.get_path(&["observability", "logs", "head_sampling_rate"]))
        .and_then(ConfigNode::as_f64)
        .unwrap_or(1.0)
}

fn is_high_volume(config: &ConfigNode) -> bool {
    let routes = route_patterns(config);
    routes.len() >= 2 || routes.iter().any(|r| r.contains('*')) || !queue_consumers(config).is_empty()
}
