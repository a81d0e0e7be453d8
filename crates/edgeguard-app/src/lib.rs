//! Use case orchestration for edgeguard.
//!
//! This crate provides the application layer: use cases that coordinate the domain, repo, and
//! settings layers. It is intentionally thin and delegates heavy lifting to the appropriate layers.
//!
//! The CLI crate depends on this; it only handles argument parsing and I/O.

#![forbid(unsafe_code)]

mod audit;
mod deploy;
mod diagnostics;
mod explain;
mod hook;
mod render;
mod report;

pub use audit::{AuditInput, AuditOutput, audit_with_log, run_audit, skipped_report, verdict_exit_code};
pub use deploy::{SKIP_ENV_VAR, bypass_requested, is_deploy_command, is_truthy};
pub use diagnostics::{DiagnosticLog, FileDiagnosticLog, NullDiagnosticLog, diagnostic_log_for};
pub use explain::{ExplainOutput, format_explanation, format_not_found, run_explain};
pub use hook::{HookEnvelope, HookInput, HookOutput, ToolInput, parse_envelope, run_hook};
pub use render::{render_text, serialize_report, write_report};
pub use report::{build_report, fingerprint_issue};
