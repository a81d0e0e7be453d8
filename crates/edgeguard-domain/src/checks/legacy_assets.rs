use crate::model::RuleContext;
use edgeguard_types::{Detection, Issue, Severity, ids};

const LEGACY_KEYS: &[&str] = &["site", "legacy_assets"];

pub fn run(ctx: &RuleContext<'_>) -> Vec<Issue> {
    LEGACY_KEYS
        .iter()
        .filter(|key| ctx.config.contains_key(key))
        .map(|key| {
            Issue::new(
                ids::CFG001,
                Severity::Medium,
                Detection::Config,
                format!("Deprecated '{key}' static asset configuration"),
                "Replace with: \"assets\": { \"directory\": \"./public\" }",
            )
        })
        .collect()
}
