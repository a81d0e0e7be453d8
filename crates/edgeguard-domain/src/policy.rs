use edgeguard_types::{Issue, RepoPath, ids};
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

pub const DEFAULT_RETRY_THRESHOLD: i64 = 2;
pub const DEFAULT_CPU_MS_API_CEILING: i64 = 30_000;
pub const DEFAULT_FREE_BUNDLE_BYTES: u64 = 3 * 1024 * 1024;
pub const DEFAULT_PAID_BUNDLE_BYTES: u64 = 10 * 1024 * 1024;
pub const DEFAULT_DAILY_REQUESTS: u64 = 100_000;
pub const DEFAULT_LOOP_FANOUT: u64 = 100;

/// Numeric thresholds the rules compare against.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Limits {
    /// Queue consumers retrying more than this are flagged (COST001).
    pub retry_threshold: i64,
    /// `limits.cpu_ms` above this on an API-shaped worker is flagged (PERF003).
    pub cpu_ms_api_ceiling: i64,
    pub free_bundle_bytes: u64,
    pub paid_bundle_bytes: u64,
    /// Assumed traffic for the cost simulation.
    pub daily_requests: u64,
    /// Assumed iterations per flagged loop for the cost simulation.
    pub loop_fanout: u64,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            retry_threshold: DEFAULT_RETRY_THRESHOLD,
            cpu_ms_api_ceiling: DEFAULT_CPU_MS_API_CEILING,
            free_bundle_bytes: DEFAULT_FREE_BUNDLE_BYTES,
            paid_bundle_bytes: DEFAULT_PAID_BUNDLE_BYTES,
            daily_requests: DEFAULT_DAILY_REQUESTS,
            loop_fanout: DEFAULT_LOOP_FANOUT,
        }
    }
}

/// Project-level ignore and blocking policy.
///
/// Suppressions map a rule id to contexts; the empty context means "everywhere".
/// Blocking is strictly opt-in: only ids registered with [`IgnorePolicy::add_blocking`]
/// can block a deploy.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IgnorePolicy {
    suppressions: BTreeMap<String, BTreeSet<String>>,
    blocking: BTreeSet<String>,
}

impl IgnorePolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a suppression. `*` and the empty string both mean global.
    pub fn suppress(&mut self, rule_id: &str, context: &str) {
        let context = context.trim();
        let context = if context == "*" {
            String::new()
        } else {
            context.to_lowercase()
        };
        self.suppressions
            .entry(rule_id.trim().to_ascii_uppercase())
            .or_default()
            .insert(context);
    }

    pub fn add_blocking(&mut self, rule_id: &str) {
        let id = rule_id.trim().to_ascii_uppercase();
        if !id.is_empty() {
            self.blocking.insert(id);
        }
    }

    /// Advisory rules never block, even when listed.
    pub fn is_blocking(&self, rule_id: &str) -> bool {
        !ids::is_advisory(rule_id) && self.blocking.contains(rule_id)
    }

    pub fn blocking_rule_ids(&self) -> impl Iterator<Item = &str> {
        self.blocking.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.suppressions.is_empty() && self.blocking.is_empty()
    }

    pub fn is_suppressed(&self, issue: &Issue) -> bool {
        let Some(contexts) = self.suppressions.get(&issue.id.to_ascii_uppercase()) else {
            return false;
        };
        if contexts.contains("") {
            return true;
        }
        issue_contexts(&issue.message)
            .iter()
            .any(|c| contexts.contains(&c.to_lowercase()))
    }
}

static QUEUE_CONTEXT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Queue '([^']+)'").expect("queue context pattern is valid"));
static BUCKET_CONTEXT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Bucket '([^']+)'").expect("bucket context pattern is valid"));
static LOCATION_CONTEXT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\S+):(\d+)\s*$").expect("location context pattern is valid")
});

/// Candidate ignore contexts for an issue message.
///
/// The first kind that matches wins: queue name, then bucket name, then a trailing
/// `path:line`. A location yields the full path and the bare file name, each with
/// and without the line number.
pub fn issue_contexts(message: &str) -> Vec<String> {
    if let Some(caps) = QUEUE_CONTEXT_RE.captures(message) {
        return vec![caps[1].to_string()];
    }
    if let Some(caps) = BUCKET_CONTEXT_RE.captures(message) {
        return vec![caps[1].to_string()];
    }
    if let Some(caps) = LOCATION_CONTEXT_RE.captures(message) {
        let path = RepoPath::new(&caps[1]);
        let line = &caps[2];
        let file = path.file_name();
        let mut out = vec![path.to_string(), format!("{path}:{line}")];
        if file != path.as_str() {
            out.push(file.to_string());
            out.push(format!("{file}:{line}"));
        }
        return out;
    }
    Vec::new()
}
