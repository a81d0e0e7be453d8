//! Explain registry for rule IDs.
//!
//! Maps rule IDs to human-readable explanations with remediation guidance.

use crate::ids;

/// Explanation entry for a rule.
#[derive(Debug, Clone)]
pub struct Explanation {
    /// Short description of the rule.
    pub title: &'static str,
    /// What the rule detects and why it matters.
    pub description: &'static str,
    /// How to fix or acknowledge findings.
    pub remediation: &'static str,
}

/// Look up an explanation by rule ID (case-insensitive).
///
/// Returns `None` if the identifier is not recognized.
pub fn lookup_explanation(identifier: &str) -> Option<Explanation> {
    let id = identifier.trim().to_ascii_uppercase();
    let entry = match id.as_str() {
        ids::SEC001 => Explanation {
            title: "Secret in plaintext vars",
            description: "\
A `vars` entry whose name looks like a credential holds a literal value.
Plaintext vars are committed with the config and visible in the dashboard.",
            remediation: "Move the value to a secret: `wrangler secret put <KEY>`.",
        },
        ids::RES001 => Explanation {
            title: "Queue consumer without dead letter queue",
            description: "\
Messages that exhaust their retries are dropped when no dead letter queue is
configured. Failures become invisible and data is lost.",
            remediation: "Add `dead_letter_queue = \"<queue>-dlq\"` to the consumer.",
        },
        ids::RES002 => Explanation {
            title: "Queue consumer without concurrency cap",
            description: "\
Without `max_concurrency` a backlog scales consumers up to the platform limit,
which can overwhelm downstream databases and APIs.",
            remediation: "Set `max_concurrency` to what downstream systems can absorb.",
        },
        ids::COST001 => Explanation {
            title: "High queue retry count",
            description: "\
Every retry is a billed invocation. The platform default is 3 retries when
`max_retries` is not set.",
            remediation: "Set `max_retries` to 1 or 2 for idempotent consumers.",
        },
        ids::COST002 => Explanation {
            title: "Loop cost simulation",
            description: "\
Order-of-magnitude daily cost estimate for the loop-sensitive patterns found in
this deploy. Informational only; never blocks a deploy.",
            remediation: "Address the LOOP findings listed alongside this estimate.",
        },
        ids::PERF001 => Explanation {
            title: "Smart Placement not enabled",
            description: "\
Workers that talk to a single back end run closer to it with Smart Placement,
cutting round-trip latency.",
            remediation: "Add `[placement]` with `mode = \"smart\"`.",
        },
        ids::PERF002 => Explanation {
            title: "No CPU time ceiling",
            description: "\
Without `limits.cpu_ms` a runaway request can consume the plan maximum.",
            remediation: "Set `[limits]` `cpu_ms` to a value that fits the workload.",
        },
        ids::PERF003 => Explanation {
            title: "CPU ceiling unusually high for an API workload",
            description: "\
Request/response workers rarely need tens of seconds of CPU. A high ceiling hides
hot loops and inflates cost.",
            remediation: "Lower `limits.cpu_ms`, or move long work to queues or workflows.",
        },
        ids::PERF004 => Explanation {
            title: "Observability logs disabled",
            description: "Without Workers Logs there is no record of errors after deploy.",
            remediation: "Add `[observability.logs]` with `enabled = true`.",
        },
        ids::OBS001 => Explanation {
            title: "Logs enabled without an export destination",
            description: "\
Workers Logs retention is short. No tail consumer, logpush or logging SDK import
was found, so logs may not outlive the retention window.",
            remediation: "Configure `tail_consumers`, `logpush = true`, or a log shipping SDK.",
        },
        ids::OBS002 => Explanation {
            title: "Full log sampling on a high-volume worker",
            description: "\
`head_sampling_rate` is 1.0 (the default) on a worker with wildcard or multiple
routes or a queue consumer. Logging every invocation at volume is costly.",
            remediation: "Set `observability.head_sampling_rate` below 1, e.g. 0.1.",
        },
        ids::CFG001 => Explanation {
            title: "Deprecated static asset configuration",
            description: "`site` / `legacy_assets` blocks are superseded by `assets`.",
            remediation: "Replace the block with `[assets]` `directory = \"./public\"`.",
        },
        ids::BUNDLE001 => Explanation {
            title: "Bundle size over budget",
            description: "\
The estimated bundle (source plus known heavy dependencies) exceeds the free
(3 MiB) or paid (10 MiB) worker size limit.",
            remediation: "Run a dry-run build to measure, then trim or lazy-load dependencies.",
        },
        ids::BUNDLE002 => Explanation {
            title: "Dependency incompatible with the edge runtime",
            description: "Native bindings and Node-only modules fail at deploy or run time.",
            remediation: "Replace the dependency with a Web-standard or WASM alternative.",
        },
        ids::BUNDLE003 => Explanation {
            title: "Disproportionately heavy dependency",
            description: "The dependency adds significant size for functionality with lighter options.",
            remediation: "Swap for the suggested lighter alternative.",
        },
        ids::R2001 => Explanation {
            title: "Reads against an infrequent-access bucket",
            description: "\
The bucket name suggests the Infrequent Access storage class, which bills data
retrieval. Storage class is not visible from code, so this is speculative.",
            remediation: "Put a cache in front of reads, or confirm the bucket storage class.",
        },
        ids::QUERY001 => Explanation {
            title: "Unbounded SELECT",
            description: "\
`SELECT *` without LIMIT reads every row. D1 bills rows read, and result sets
grow with the table.",
            remediation: "Add LIMIT/OFFSET or cursor pagination.",
        },
        ids::LOOP001 => Explanation {
            title: "Database query inside a loop",
            description: "N+1 query pattern: cost and latency scale with the iteration count.",
            remediation: "Batch with `db.batch([...])` or a single `WHERE id IN (...)` query.",
        },
        ids::LOOP002 => Explanation {
            title: "Storage operation inside a loop",
            description: "KV/R2 operations per iteration multiply billed operations.",
            remediation: "Batch keys, or cache results outside the loop.",
        },
        ids::LOOP003 => Explanation {
            title: "Self-referential fetch",
            description: "A worker fetching its own URL can recurse until subrequest limits hit.",
            remediation: "Call the handler function directly or use a service binding.",
        },
        ids::LOOP004 => Explanation {
            title: "Unguarded periodic timer",
            description: "`setInterval` without `clearInterval` keeps the isolate busy and billed.",
            remediation: "Clear the interval, or use Cron Triggers / Durable Object alarms.",
        },
        ids::LOOP005 => Explanation {
            title: "Recursion without depth guard",
            description: "A recursive function with no depth/level bound can exhaust CPU or subrequests.",
            remediation: "Pass and check a depth parameter, or rewrite iteratively.",
        },
        ids::LOOP006 => Explanation {
            title: "Unbounded parallel subrequests",
            description: "`Promise.all(items.map(fetch ...))` fans out one subrequest per item.",
            remediation: "Chunk the input and cap concurrency.",
        },
        ids::LOOP007 => Explanation {
            title: "Unbounded loop",
            description: "`while (true)` / `for (;;)` relies on an internal exit that may never come.",
            remediation: "Bound the loop with an iteration limit or deadline.",
        },
        ids::AI001 => Explanation {
            title: "Expensive inference model",
            description: "Large models cost many times more per request and add latency.",
            remediation: "Use a smaller model where quality allows.",
        },
        ids::AI002 => Explanation {
            title: "Inference without caching",
            description: "Identical prompts are re-run on every request when nothing caches results.",
            remediation: "Cache responses in KV or the Cache API, or route through AI Gateway.",
        },
        _ => return None,
    };
    Some(entry)
}

/// List all known rule IDs.
pub fn all_rule_ids() -> &'static [&'static str] {
    &[
        ids::SEC001,
        ids::RES001,
        ids::RES002,
        ids::COST001,
        ids::COST002,
        ids::PERF001,
        ids::PERF002,
        ids::PERF003,
        ids::PERF004,
        ids::OBS001,
        ids::OBS002,
        ids::CFG001,
        ids::BUNDLE001,
        ids::BUNDLE002,
        ids::BUNDLE003,
        ids::R2001,
        ids::QUERY001,
        ids::LOOP001,
        ids::LOOP002,
        ids::LOOP003,
        ids::LOOP004,
        ids::LOOP005,
        ids::LOOP006,
        ids::LOOP007,
        ids::AI001,
        ids::AI002,
    ]
}
