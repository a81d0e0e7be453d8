//! Order-of-magnitude cost simulation for loop findings (COST002).
//!
//! The estimate is advisory: it is appended after filtering and never takes
//! part in the blocking decision.

use crate::policy::Limits;
use edgeguard_types::{Detection, Issue, Severity, ids};

/// USD per million extra operations caused by one iteration of a flagged loop.
fn unit_price_per_million(rule_id: &str) -> f64 {
    match rule_id {
        // D1 rows read, assuming a modest scan per query.
        ids::LOOP001 => 1.0,
        // KV reads / R2 class B operations.
        ids::LOOP002 => 0.5,
        // Extra requests and subrequests.
        ids::LOOP003 | ids::LOOP006 => 0.3,
        // CPU milliseconds.
        _ => 0.02,
    }
}

/// Build the simulation entry for the loop issues among `issues`, if any.
pub fn simulate(issues: &[Issue], limits: &Limits) -> Option<Issue> {
    let loops: Vec<&Issue> = issues.iter().filter(|i| ids::is_loop_rule(&i.id)).collect();
    if loops.is_empty() {
        return None;
    }

    let ops_per_pattern = limits.daily_requests.saturating_mul(limits.loop_fanout);
    let daily_usd: f64 = loops
        .iter()
        .map(|i| ops_per_pattern as f64 / 1_000_000.0 * unit_price_per_million(&i.id))
        .sum();

    let message = format!(
        "Loop cost simulation: {} loop pattern(s), ~{} extra operations/day each, roughly ${:.2}/day ({} requests/day x {} iterations)",
        loops.len(),
        ops_per_pattern,
        daily_usd,
        limits.daily_requests,
        limits.loop_fanout,
    );

    Some(
        Issue::new(
            ids::COST002,
            Severity::Info,
            Detection::Heuristic,
            message,
            "Fix the LOOP findings; this estimate is informational",
        )
        .with_verify("Tune daily_requests and loop_fanout in edgeguard.toml to match real traffic"),
    )
}
