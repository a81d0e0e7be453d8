use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity is informational metadata for prioritization and display.
/// It never decides the verdict on its own.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
    Info,
}

impl Severity {
    /// Sort rank: most severe first.
    pub fn rank(self) -> u8 {
        match self {
            Severity::Critical => 0,
            Severity::High => 1,
            Severity::Medium => 2,
            Severity::Low => 3,
            Severity::Info => 4,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Critical => "CRITICAL",
            Severity::High => "HIGH",
            Severity::Medium => "MEDIUM",
            Severity::Low => "LOW",
            Severity::Info => "INFO",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How confident the rule is in the finding.
///
/// - `Config`: derived purely from structured configuration
/// - `Static`: confident source-pattern match
/// - `Heuristic`: name or pattern inference that may false-positive
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Detection {
    Config,
    Static,
    Heuristic,
}

impl Detection {
    pub fn as_str(self) -> &'static str {
        match self {
            Detection::Config => "CONFIG",
            Detection::Static => "STATIC",
            Detection::Heuristic => "HEURISTIC",
        }
    }
}

impl fmt::Display for Detection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One detected problem. Created by exactly one rule and never mutated after.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Issue {
    pub id: String,
    pub severity: Severity,
    pub message: String,
    pub fix: String,
    pub detection: Detection,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verify: Option<String>,
}

impl Issue {
    pub fn new(
        id: &str,
        severity: Severity,
        detection: Detection,
        message: impl Into<String>,
        fix: impl Into<String>,
    ) -> Self {
        Self {
            id: id.to_string(),
            severity,
            message: message.into(),
            fix: fix.into(),
            detection,
            verify: None,
        }
    }

    pub fn with_verify(mut self, verify: impl Into<String>) -> Self {
        self.verify = Some(verify.into());
        self
    }

    pub fn is_heuristic(&self) -> bool {
        self.detection == Detection::Heuristic
    }
}
