use crate::model::RuleContext;
use edgeguard_types::{Issue, ids};

mod ai;
mod bundle;
mod legacy_assets;
mod loops;
mod observability;
mod queries;
mod queues;
mod runtime;
mod secrets;
mod storage_class;
mod utils;


pub use loops::RECURSION_WINDOW;

/// Uniform rule signature. Rules are pure and never see each other's output.
pub type RuleFn = fn(&RuleContext<'_>) -> Vec<Issue>;

/// One registry entry: a rule function and the ids it can emit.
pub struct Rule {
    pub name: &'static str,
    pub ids: &'static [&'static str],
    pub run: RuleFn,
}

pub const CATALOG: &[Rule] = &[
    Rule {
        name: "secrets",
        ids: &[ids::SEC001],
        run: secrets::run,
    },
    Rule {
        name: "queues",
        ids: &[ids::RES001, ids::COST001, ids::RES002],
        run: queues::run,
    },
    Rule {
        name: "observability",
        ids: &[ids::PERF004, ids::OBS001, ids::OBS002],
        run: observability::run,
    },
    Rule {
        name: "runtime",
        ids: &[ids::PERF001, ids::PERF002, ids::PERF003],
        run: runtime::run,
    },
    Rule {
        name: "legacy_assets",
        ids: &[ids::CFG001],
        run: legacy_assets::run,
    },
    Rule {
        name: "bundle",
        ids: &[ids::BUNDLE001, ids::BUNDLE002, ids::BUNDLE003],
        run: bundle::run,
    },
    Rule {
        name: "storage_class",
        ids: &[ids::R2001],
        run: storage_class::run,
    },
    Rule {
        name: "queries",
        ids: &[ids::QUERY001],
        run: queries::run,
    },
    Rule {
        name: "loops",
        ids: &[
            ids::LOOP001,
            ids::LOOP002,
            ids::LOOP003,
            ids::LOOP004,
            ids::LOOP005,
            ids::LOOP006,
            ids::LOOP007,
        ],
        run: loops::run,
    },
    Rule {
        name: "ai",
        ids: &[ids::AI001, ids::AI002],
        run: ai::run,
    },
];

/// Run every registered rule, in registry order.
pub fn run_all(ctx: &RuleContext<'_>) -> Vec<Issue> {
    CATALOG
        .iter()
        .flat_map(|rule| {
            let found = (rule.run)(ctx);
            tracing::debug!(rule = rule.name, issues = found.len(), "rule evaluated");
            found
        })
        .collect()
}
