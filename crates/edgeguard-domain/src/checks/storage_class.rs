use super::utils::sources_match;
use crate::model::RuleContext;
use edgeguard_config::ConfigNode;
use edgeguard_types::{Detection, Issue, Severity, ids};
use regex::Regex;
use std::sync::LazyLock;

static INFREQUENT_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:^|[-_.])(?:ia|infrequent|archive|archival|cold|coldline|backups?|glacier)(?:$|[-_.])")
        .expect("infrequent access name pattern is valid")
});

static CACHE_SIGNAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"caches\.(?:default|open)|cacheTtl|cacheEverything|cacheKey")
        .expect("cache signal pattern is valid")
});

const VERIFY: &str = "Storage class is not visible from code; check the bucket settings in the dashboard";

pub fn run(ctx: &RuleContext<'_>) -> Vec<Issue> {
    let mut out = Vec::new();
    let Some(buckets) = ctx.config.get("r2_buckets") else {
        return out;
    };
    let cached = sources_match(ctx, &CACHE_SIGNAL_RE);

    for bucket in buckets.entries() {
        let Some(name) = bucket.get("bucket_name").and_then(ConfigNode::scalar_text) else {
            continue;
        };
        if !INFREQUENT_NAME_RE.is_match(&name) {
            continue;
        }
        let binding = bucket.get("binding").and_then(ConfigNode::scalar_text);
        let reads = binding.as_deref().is_some_and(|b| reads_binding(ctx, b));

        let issue = if reads && !cached {
            Issue::new(
                ids::R2001,
                Severity::High,
                Detection::Heuristic,
                format!("Bucket '{name}' looks like Infrequent Access and is read without a cache"),
                "Put the Cache API or KV in front of reads, or move the data to Standard storage",
            )
        } else {
            Issue::new(
                ids::R2001,
                Severity::Info,
                Detection::Heuristic,
                format!("Bucket '{name}' looks like Infrequent Access; retrievals are billed"),
                "Keep reads rare or cached",
            )
        };
        out.push(issue.with_verify(VERIFY));
    }
    out
}

fn reads_binding(ctx: &RuleContext<'_>, binding: &str) -> bool {
    let pattern = format!(r"\b{}\s*\.\s*get\s*\(", regex::escape(binding));
    match Regex::new(&pattern) {
        Ok(re) => sources_match(ctx, &re),
        Err(_) => false,
    }
}
