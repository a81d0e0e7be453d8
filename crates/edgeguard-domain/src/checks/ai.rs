use crate::model::{RuleContext, SourceFile};
use crate::scanner::{self, PatternRule};
use edgeguard_types::{Detection, Issue, Severity, ids};
use regex::{Captures, Regex};
use std::sync::LazyLock;

static CACHE_SIGNAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)caches\.(?:default|open)|cache(?:Ttl|Key|Everything)|\bgateway\s*:|\b\w*(?:cache|kv)\w*\.(?:get|put)\s*\(",
    )
    .expect("ai cache signal pattern is valid")
});

static RULES: LazyLock<Vec<PatternRule>> = LazyLock::new(|| {
    vec![
        PatternRule::new(
            ids::AI001,
            Severity::High,
            Detection::Static,
            r"(?i)@(?:cf|hf)/[\w.-]+/[\w.-]*?(?:32b|70b|90b|405b|8x7b)[\w.-]*",
            "Expensive inference model $0",
            "Use a smaller model (e.g. an 8B variant) where quality allows",
        )
        .skip_tests(),
        PatternRule::new(
            ids::AI002,
            Severity::Medium,
            Detection::Heuristic,
            r"\.AI\.run\s*\(",
            "Workers AI call without caching",
            "Cache responses in KV or the Cache API, or route through AI Gateway",
        )
        .skip_tests()
        .verify("Check whether identical prompts can reach this call")
        .refine(no_cache_in_file),
    ]
});

pub fn run(ctx: &RuleContext<'_>) -> Vec<Issue> {
    ctx.sources
        .map(|tree| scanner::scan(tree, &RULES))
        .unwrap_or_default()
}

fn no_cache_in_file(file: &SourceFile, _: &Captures<'_>, sev: Severity) -> Option<Severity> {
    if CACHE_SIGNAL_RE.is_match(&file.text) {
        None
    } else {
        Some(sev)
    }
}
