//! Stable DTOs and IDs used across the edgeguard workspace.
//!
//! This crate is intentionally boring:
//! - the `Issue` record every rule emits
//! - stable rule identifiers
//! - canonical project-relative path handling
//! - the emitted JSON report envelope
//! - explain registry for remediation guidance

#![forbid(unsafe_code)]

pub mod explain;
pub mod ids;
pub mod issue;
pub mod path;
pub mod report;

pub use explain::{Explanation, all_rule_ids, lookup_explanation};
pub use issue::{Detection, Issue, Severity};
pub use path::RepoPath;
pub use report::{AuditReport, ReportIssue, SCHEMA_REPORT_V1, ToolMeta, Verdict};
