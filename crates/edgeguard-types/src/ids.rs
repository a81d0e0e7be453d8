//! Stable rule identifiers.
//!
//! IDs are `PREFIX` + three digits. The prefix names the concern, not the
//! severity; severity lives on the emitted issue.

// Secrets
pub const SEC001: &str = "SEC001";

// Queue resilience
pub const RES001: &str = "RES001";
pub const RES002: &str = "RES002";

// Cost
pub const COST001: &str = "COST001";
pub const COST002: &str = "COST002";

// Performance / runtime limits
pub const PERF001: &str = "PERF001";
pub const PERF002: &str = "PERF002";
pub const PERF003: &str = "PERF003";
pub const PERF004: &str = "PERF004";

// Observability
pub const OBS001: &str = "OBS001";
pub const OBS002: &str = "OBS002";

// Deprecated configuration shape
pub const CFG001: &str = "CFG001";

// Bundle size budget
pub const BUNDLE001: &str = "BUNDLE001";
pub const BUNDLE002: &str = "BUNDLE002";
pub const BUNDLE003: &str = "BUNDLE003";

// Storage class
pub const R2001: &str = "R2001";

// Query explosion
pub const QUERY001: &str = "QUERY001";

// Loop-sensitive resource use
pub const LOOP001: &str = "LOOP001";
pub const LOOP002: &str = "LOOP002";
pub const LOOP003: &str = "LOOP003";
pub const LOOP004: &str = "LOOP004";
pub const LOOP005: &str = "LOOP005";
pub const LOOP006: &str = "LOOP006";
pub const LOOP007: &str = "LOOP007";

// AI inference
pub const AI001: &str = "AI001";
pub const AI002: &str = "AI002";

/// Rules whose output is an estimate rather than a defect. They are shown to
/// the user but never carry decision weight, even when listed as blocking.
pub const ADVISORY_RULES: &[&str] = &[COST002];

pub fn is_advisory(rule_id: &str) -> bool {
    ADVISORY_RULES.contains(&rule_id)
}

pub fn is_loop_rule(rule_id: &str) -> bool {
    rule_id.starts_with("LOOP")
}
