//! Regex-driven source scanning.
//!
//! A [`PatternRule`] is applied to every file of a [`SourceTree`]. Each
//! non-overlapping match becomes an issue located at the line of the match
//! start, unless an inline directive suppresses that line for the rule.

use crate::model::{SourceFile, SourceTree};
use edgeguard_types::{Detection, Issue, Severity};
use rayon::prelude::*;
use regex::{Captures, Regex};
use std::collections::HashSet;

/// Post-match confirmation. Returns the severity to report, or `None` to drop
/// the match.
pub type Refine = fn(&SourceFile, &Captures<'_>, Severity) -> Option<Severity>;

pub struct PatternRule {
    pub id: &'static str,
    pub severity: Severity,
    pub detection: Detection,
    pub pattern: Regex,
    /// Message template; `$name` / `$1` refer to capture groups. The location
    /// ` at <path>:<line>` is appended.
    pub message: &'static str,
    pub fix: &'static str,
    pub verify: Option<&'static str>,
    /// Skip test, fixture, story and mock files.
    pub skip_tests: bool,
    pub refine: Option<Refine>,
}

impl PatternRule {
    pub fn new(
        id: &'static str,
        severity: Severity,
        detection: Detection,
        pattern: &str,
        message: &'static str,
        fix: &'static str,
    ) -> Self {
        Self {
            id,
            severity,
            detection,
            pattern: Regex::new(pattern).expect("built-in pattern is valid"),
            message,
            fix,
            verify: None,
            skip_tests: false,
            refine: None,
        }
    }

    pub fn skip_tests(mut self) -> Self {
        self.skip_tests = true;
        self
    }

    pub fn verify(mut self, hint: &'static str) -> Self {
        self.verify = Some(hint);
        self
    }

    pub fn refine(mut self, refine: Refine) -> Self {
        self.refine = Some(refine);
        self
    }
}

/// Apply `rules` to every file in `tree`. Files are scanned in parallel; the
/// result keeps file order and is deduplicated by (rule id, message).
pub fn scan(tree: &SourceTree, rules: &[PatternRule]) -> Vec<Issue> {
    let per_file: Vec<Vec<Issue>> = tree
        .files
        .par_iter()
        .map(|file| scan_file(file, rules))
        .collect();
    dedupe(per_file.into_iter().flatten())
}

pub fn scan_file(file: &SourceFile, rules: &[PatternRule]) -> Vec<Issue> {
    let mut out = Vec::new();
    for rule in rules {
        if rule.skip_tests && file.is_test {
            continue;
        }
        for caps in rule.pattern.captures_iter(&file.text) {
            let Some(whole) = caps.get(0) else { continue };
            let line = file.line_of(whole.start());
            if file.is_suppressed(line, rule.id) {
                continue;
            }
            let severity = match rule.refine {
                Some(refine) => match refine(file, &caps, rule.severity) {
                    Some(sev) => sev,
                    None => continue,
                },
                None => rule.severity,
            };

            let mut message = String::new();
            caps.expand(rule.message, &mut message);
            message.push_str(&format!(" at {}:{}", file.path, line));

            let mut issue = Issue::new(rule.id, severity, rule.detection, message, rule.fix);
            if let Some(hint) = rule.verify {
                issue = issue.with_verify(hint);
            }
            out.push(issue);
        }
    }
    out
}

/// Keep the first issue for each (rule id, message) pair.
pub fn dedupe(issues: impl IntoIterator<Item = Issue>) -> Vec<Issue> {
    let mut seen: HashSet<(String, String)> = HashSet::new();
    issues
        .into_iter()
        .filter(|i| seen.insert((i.id.clone(), i.message.clone())))
        .collect()
}

/// Slice of `text` starting at `start`, at most `len` bytes, cut back to a
/// char boundary.
pub fn window(text: &str, start: usize, len: usize) -> &str {
    let start = start.min(text.len());
    let mut end = start.saturating_add(len).min(text.len());
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[start..end]
}

/// Up to `len` bytes of `text` ending at `end`, cut forward to a char boundary.
pub fn window_before(text: &str, end: usize, len: usize) -> &str {
    let end = end.min(text.len());
    let mut start = end.saturating_sub(len);
    while !text.is_char_boundary(start) {
        start += 1;
    }
    &text[start..end]
}
