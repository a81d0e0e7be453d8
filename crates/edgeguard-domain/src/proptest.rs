//! Property-based tests for the domain crate.
//!
//! These tests use proptest to verify invariants around:
//! - decision monotonicity (more blocking ids never turn BLOCK into ALLOW)
//! - ignore filtering (more suppressions never add issues)
//! - ordering determinism regardless of input order

use crate::engine::{decide, evaluate};
use crate::model::{ProjectModel, SourceFile, SourceTree};
use crate::policy::{IgnorePolicy, Limits};
use crate::test_support::jsonc;
use edgeguard_types::{Detection, Issue, RepoPath, Severity, Verdict, ids};
use proptest::prelude::*;

const RULE_POOL: &[&str] = &[
    ids::SEC001,
    ids::RES001,
    ids::COST001,
    ids::PERF001,
    ids::LOOP001,
    ids::LOOP007,
    ids::COST002,
    ids::AI002,
];

fn arb_severity() -> impl Strategy<Value = Severity> {
    prop_oneof![
        Just(Severity::Critical),
        Just(Severity::High),
        Just(Severity::Medium),
        Just(Severity::Low),
        Just(Severity::Info),
    ]
}

fn arb_issue() -> impl Strategy<Value = Issue> {
    (prop::sample::select(RULE_POOL), arb_severity(), "[a-z]{1,6}").prop_map(|(id, sev, msg)| {
        Issue::new(id, sev, Detection::Static, format!("{msg} at src/{msg}.ts:1"), "fix")
    })
}

fn arb_rule_set() -> impl Strategy<Value = Vec<&'static str>> {
    prop::collection::vec(prop::sample::select(RULE_POOL), 0..5)
}

fn policy_blocking(rules: &[&str]) -> IgnorePolicy {
    let mut policy = IgnorePolicy::new();
    for r in rules {
        policy.add_blocking(r);
    }
    policy
}

fn sample_project() -> ProjectModel {
    let config = jsonc(
        r#"{
            "vars": { "API_KEY": "sk_live_abcdef123456" },
            "queues": { "consumers": [ { "queue": "orders" }, { "queue": "emails", "max_retries": 5 } ] }
        }"#,
    );
    let files = vec![
        SourceFile::new(
            RepoPath::new("src/poll.ts"),
            "while (true) {\n  await tick();\n}\n".to_string(),
            false,
        ),
        SourceFile::new(
            RepoPath::new("src/ai.ts"),
            "await env.AI.run('@cf/meta/llama-3.1-70b-instruct', {});\n".to_string(),
            false,
        ),
    ];
    ProjectModel {
        config,
        sources: Some(SourceTree::new(files)),
        package: None,
    }
}

proptest! {
    #[test]
    fn adding_blocking_ids_never_unblocks(
        issues in prop::collection::vec(arb_issue(), 0..12),
        base in arb_rule_set(),
        extra in arb_rule_set(),
    ) {
        let small = decide(issues.clone(), &policy_blocking(&base));
        let mut wider: Vec<&str> = base.clone();
        wider.extend(extra);
        let large = decide(issues, &policy_blocking(&wider));

        if small.verdict == Verdict::Block {
            prop_assert_eq!(large.verdict, Verdict::Block);
        }
        prop_assert!(large.blocking.len() >= small.blocking.len());
    }

    #[test]
    fn verdict_is_block_iff_blocking_nonempty(
        issues in prop::collection::vec(arb_issue(), 0..12),
        blocking in arb_rule_set(),
    ) {
        let result = decide(issues, &policy_blocking(&blocking));
        prop_assert_eq!(result.verdict == Verdict::Block, !result.blocking.is_empty());
        prop_assert!(result.blocking.iter().all(|i| i.id != ids::COST002));
        prop_assert_eq!(result.blocking.len() + result.warnings.len(), result.issues.len());
    }

    #[test]
    fn decision_ignores_input_order(
        issues in prop::collection::vec(arb_issue(), 0..12),
        blocking in arb_rule_set(),
    ) {
        let policy = policy_blocking(&blocking);
        let forward = decide(issues.clone(), &policy);
        let mut reversed_input = issues;
        reversed_input.reverse();
        let backward = decide(reversed_input, &policy);
        prop_assert_eq!(forward, backward);
    }

    #[test]
    fn suppressing_more_rules_never_adds_issues(
        first in arb_rule_set(),
        second in arb_rule_set(),
    ) {
        let model = sample_project();
        let limits = Limits::default();

        let mut narrow = IgnorePolicy::new();
        for r in &first {
            narrow.suppress(r, "");
        }
        let mut broad = narrow.clone();
        for r in &second {
            broad.suppress(r, "");
        }

        let a = evaluate(&model, &limits, &narrow);
        let b = evaluate(&model, &limits, &broad);
        prop_assert!(b.issues.len() <= a.issues.len());
        for issue in &b.issues {
            prop_assert!(a.issues.contains(issue));
        }
    }
}

#[test]
fn sample_project_scenario() {
    let model = sample_project();
    let mut policy = IgnorePolicy::new();
    policy.add_blocking("SEC001");
    let result = evaluate(&model, &Limits::default(), &policy);

    assert_eq!(result.verdict, Verdict::Block);
    let blocking: Vec<&str> = result.blocking.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(blocking, vec![ids::SEC001]);
    assert!(result.warnings.iter().any(|i| i.id == ids::RES001));
    assert!(result.warnings.iter().any(|i| i.id == ids::LOOP007));
    // Loop findings survive, so the advisory simulation is appended.
    assert!(result.warnings.iter().any(|i| i.id == ids::COST002));
}

#[test]
fn suppressing_loops_drops_cost_simulation() {
    let model = sample_project();
    let mut policy = IgnorePolicy::new();
    policy.suppress("LOOP007", "poll.ts");
    let result = evaluate(&model, &Limits::default(), &policy);
    assert!(result.issues.iter().all(|i| i.id != ids::LOOP007));
    assert!(result.issues.iter().all(|i| i.id != ids::COST002));
}
