use edgeguard_types::{Issue, Verdict};

/// Outcome of one audit.
#[derive(Clone, Debug, PartialEq)]
pub struct AuditResult {
    /// Every surviving issue, ordered by severity, then id, then message.
    pub issues: Vec<Issue>,
    /// Issues whose rule the project opted into blocking.
    pub blocking: Vec<Issue>,
    pub warnings: Vec<Issue>,
    /// The configured blocking set, sorted.
    pub blocking_rule_ids: Vec<String>,
    pub verdict: Verdict,
    /// Issues dropped by the ignore policy.
    pub suppressed: u32,
}

impl AuditResult {
    pub fn is_blocked(&self) -> bool {
        self.verdict == Verdict::Block
    }
}
