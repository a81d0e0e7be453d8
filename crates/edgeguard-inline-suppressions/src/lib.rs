//! Inline suppression comments for source files.
//!
//! A directive is a `//` or `/* */` comment carrying the `@pre-deploy-ok` marker,
//! optionally followed by rule ids:
//!
//! ```text
//! // @pre-deploy-ok                   suppress every rule
//! // @pre-deploy-ok LOOP007           suppress one rule
//! /* @pre-deploy-ok LOOP001 LOOP002 */
//! ```
//!
//! A directive on line `i` covers line `i` (trailing comment) and line `i + 1`
//! (comment on the line above).

#![forbid(unsafe_code)]

use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

pub const MARKER: &str = "@pre-deploy-ok";

static DIRECTIVE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?://|/\*)\s*@pre-deploy-ok((?:[ \t,]+[A-Za-z]+[0-9]+)*)[ \t]*(?:\*/)?")
        .expect("directive pattern is valid")
});

static RULE_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z]+[0-9]+").expect("rule id pattern is valid"));

/// A single parsed directive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Directive {
    All,
    Rules(Vec<String>),
}

/// What is suppressed on one line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LineSuppression {
    All,
    Rules(BTreeSet<String>),
}

impl LineSuppression {
    fn covers(&self, rule_id: &str) -> bool {
        match self {
            LineSuppression::All => true,
            LineSuppression::Rules(ids) => ids.contains(&rule_id.to_ascii_uppercase()),
        }
    }

    fn merge(&mut self, directive: &Directive) {
        match (self, directive) {
            (LineSuppression::All, _) => {}
            (slot, Directive::All) => *slot = LineSuppression::All,
            (LineSuppression::Rules(ids), Directive::Rules(more)) => {
                ids.extend(more.iter().cloned());
            }
        }
    }
}

/// Parse every directive on one line of source text.
pub fn parse_line(line: &str) -> Vec<Directive> {
    DIRECTIVE_RE
        .captures_iter(line)
        .map(|caps| {
            let ids: Vec<String> = caps
                .get(1)
                .map(|m| {
                    RULE_ID_RE
                        .find_iter(m.as_str())
                        .map(|id| id.as_str().to_ascii_uppercase())
                        .collect()
                })
                .unwrap_or_default();
            if ids.is_empty() {
                Directive::All
            } else {
                Directive::Rules(ids)
            }
        })
        .collect()
}

/// Per-file map from 1-based line number to suppressed rule ids.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SuppressionIndex {
    lines: BTreeMap<u32, LineSuppression>,
}

impl SuppressionIndex {
    pub fn parse(text: &str) -> Self {
        let mut index = SuppressionIndex::default();
        for (idx, line) in text.lines().enumerate() {
            if !line.to_ascii_lowercase().contains(MARKER) {
                continue;
            }
            let line_no = idx as u32 + 1;
            for directive in parse_line(line) {
                index.record(line_no, &directive);
                index.record(line_no + 1, &directive);
            }
        }
        index
    }

    fn record(&mut self, line: u32, directive: &Directive) {
        self.lines
            .entry(line)
            .or_insert_with(|| LineSuppression::Rules(BTreeSet::new()))
            .merge(directive);
    }

    pub fn is_suppressed(&self, line: u32, rule_id: &str) -> bool {
        self.lines.get(&line).is_some_and(|s| s.covers(rule_id))
    }

    pub fn get(&self, line: u32) -> Option<&LineSuppression> {
        self.lines.get(&line)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Fuzz-friendly API for testing parsing robustness.
pub mod fuzz {
    pub fn parse_suppressions(text: &str) {
        let index = super::SuppressionIndex::parse(text);
        let _ = index.is_suppressed(1, "LOOP007");
    }
}
