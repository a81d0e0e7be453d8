use crate::model::RuleContext;
use edgeguard_config::ConfigNode;
use regex::Regex;
use std::sync::LazyLock;

/// Platform default when a consumer does not set `max_retries`.
pub const DEFAULT_MAX_RETRIES: i64 = 3;

pub fn queue_consumers<'a>(config: &'a ConfigNode) -> Vec<&'a ConfigNode> {
    config
        .get_path(&["queues", "consumers"])
        .map(ConfigNode::entries)
        .unwrap_or_default()
        .into_iter()
        .filter(|c| c.as_mapping().is_some())
        .collect()
}

/// Consumer queue name, or `consumer[<index>]` when it has none.
pub fn consumer_name(consumer: &ConfigNode, index: usize) -> String {
    consumer
        .get("queue")
        .and_then(ConfigNode::scalar_text)
        .unwrap_or_else(|| format!("consumer[{index}]"))
}

/// Integer value, accepting numeric strings.
pub fn int_value(node: &ConfigNode) -> Option<i64> {
    node.as_i64()
        .or_else(|| node.as_str().and_then(|s| s.trim().parse().ok()))
}

/// Boolean value, accepting `"true"` strings.
pub fn is_true(node: Option<&ConfigNode>) -> bool {
    match node {
        Some(n) => n
            .as_bool()
            .or_else(|| n.as_str().map(|s| s.trim().eq_ignore_ascii_case("true")))
            .unwrap_or(false),
        None => false,
    }
}

/// Structured logs are on via `observability.logs.enabled` or `observability.enabled`.
pub fn logs_enabled(config: &ConfigNode) -> bool {
    is_true(config.get_path(&["observability", "logs", "enabled"]))
        || is_true(config.get_path(&["observability", "enabled"]))
}

static INLINE_ENTRY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\{[^}]*\}|"([^"]*)"|'([^']*)'"#).expect("inline entry pattern is valid")
});

static INLINE_PATTERN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\bpattern\s*=\s*(?:"([^"]*)"|'([^']*)')"#).expect("inline pattern key is valid")
});

/// Entries of a TOML inline array, which the config parser keeps as text:
/// quoted strings, and the `pattern` of `{ pattern = "..." }` tables.
/// `None` when `text` is not bracketed.
fn inline_array_items(text: &str) -> Option<Vec<String>> {
    let inner = text.trim().strip_prefix('[')?.strip_suffix(']')?;
    let items = INLINE_ENTRY_RE
        .captures_iter(inner)
        .filter_map(|caps| {
            if let Some(quoted) = caps.get(1).or_else(|| caps.get(2)) {
                return Some(quoted.as_str().to_string());
            }
            let table = INLINE_PATTERN_RE.captures(caps.get(0)?.as_str())?;
            table.get(1).or_else(|| table.get(2)).map(|m| m.as_str().to_string())
        })
        .collect();
    Some(items)
}

/// Route patterns from `routes` (strings or `{ pattern = ... }` tables) and `route`.
pub fn route_patterns(config: &ConfigNode) -> Vec<String> {
    let mut out = Vec::new();
    for key in ["routes", "route"] {
        let Some(node) = config.get(key) else { continue };
        for entry in node.entries() {
            if let Some(text) = entry.as_str() {
                match inline_array_items(text) {
                    Some(items) => out.extend(items),
                    None => out.push(text.to_string()),
                }
            } else if let Some(p) = entry.get("pattern").and_then(ConfigNode::scalar_text) {
                out.push(p);
            }
        }
    }
    out
}

pub fn cron_count(config: &ConfigNode) -> usize {
    match config.get_path(&["triggers", "crons"]) {
        Some(ConfigNode::Sequence(items)) => items.len(),
        Some(node) => node
            .as_str()
            .and_then(inline_array_items)
            .map_or(0, |items| items.len()),
        None => 0,
    }
}

/// True when any production source file matches `re`.
pub fn sources_match(ctx: &RuleContext<'_>, re: &regex::Regex) -> bool {
    ctx.sources
        .is_some_and(|tree| tree.any_production_file(|f| re.is_match(&f.text)))
}
