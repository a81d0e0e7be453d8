//! The `hook` use case: a pre-tool-use gate around deploy commands.
//!
//! The host writes a JSON envelope to stdin. Anything that is not a shell deploy
//! passes through with exit code 0 and no output.

use crate::audit::{AuditInput, run_audit, verdict_exit_code};
use crate::deploy::{bypass_requested, is_deploy_command};
use crate::render::render_text;
use camino::{Utf8Path, Utf8PathBuf};
use edgeguard_settings::Overrides;
use serde::Deserialize;

/// Tool name the host uses for shell commands.
const SHELL_TOOL: &str = "Bash";

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct HookEnvelope {
    #[serde(default)]
    pub tool_name: String,
    #[serde(default)]
    pub tool_input: ToolInput,
    #[serde(default)]
    pub cwd: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct ToolInput {
    #[serde(default)]
    pub command: String,
}

/// `None` for anything that is not a JSON envelope object.
pub fn parse_envelope(text: &str) -> Option<HookEnvelope> {
    match serde_json::from_str(text) {
        Ok(envelope) => Some(envelope),
        Err(err) => {
            tracing::debug!(error = %err, "hook envelope is not valid JSON; allowing");
            None
        }
    }
}

#[derive(Clone, Debug)]
pub struct HookInput<'a> {
    /// Raw stdin.
    pub stdin: &'a str,
    /// Value of the bypass environment variable, if set.
    pub skip_env: Option<&'a str>,
    /// Directory to audit when the envelope carries no `cwd`.
    pub fallback_dir: &'a Utf8Path,
    pub overrides: Overrides,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HookOutput {
    pub exit_code: i32,
    /// Text for the host's stderr; empty when there is nothing to say.
    pub stderr: String,
}

impl HookOutput {
    fn pass() -> Self {
        Self {
            exit_code: 0,
            stderr: String::new(),
        }
    }
}

pub fn run_hook(input: HookInput<'_>) -> HookOutput {
    let Some(envelope) = parse_envelope(input.stdin) else {
        return HookOutput::pass();
    };
    if envelope.tool_name != SHELL_TOOL {
        return HookOutput::pass();
    }
    let command = envelope.tool_input.command.as_str();
    if !is_deploy_command(command) {
        return HookOutput::pass();
    }
    tracing::info!(command, "intercepted deploy command");

    if bypass_requested(input.skip_env, Some(command)) {
        return HookOutput {
            exit_code: 0,
            stderr: "Pre-deploy audit skipped: EDGEGUARD_SKIP is set\n".to_string(),
        };
    }

    let project_root = envelope
        .cwd
        .as_deref()
        .filter(|c| !c.trim().is_empty())
        .map(Utf8PathBuf::from)
        .unwrap_or_else(|| input.fallback_dir.to_path_buf());

    let output = run_audit(AuditInput {
        project_root: &project_root,
        overrides: input.overrides,
    });
    let report = output.report;

    // Missing or unreadable config stays quiet, like a non-deploy command.
    let stderr = if report.skipped.is_none() && report.issue_count() > 0 {
        render_text(&report)
    } else {
        String::new()
    };

    HookOutput {
        exit_code: verdict_exit_code(report.verdict),
        stderr,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn utf8_root(tmp: &TempDir) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf8 path")
    }

    fn envelope(command: &str, cwd: &Utf8Path) -> String {
        serde_json::json!({
            "tool_name": "Bash",
            "tool_input": { "command": command },
            "cwd": cwd.as_str(),
        })
        .to_string()
    }

    fn blocking_project(tmp: &TempDir) -> Utf8PathBuf {
        let root = utf8_root(tmp);
        std::fs::write(
            root.join("wrangler.jsonc"),
            r#"{ "vars": { "API_KEY": "sk_live_abcdef123456" } }"#,
        )
        .expect("write config");
        std::fs::write(root.join(".pre-deploy-ignore"), "!SEC001\n").expect("write ignore");
        root
    }

    fn run(stdin: &str, skip_env: Option<&str>, fallback: &Utf8Path) -> HookOutput {
        run_hook(HookInput {
            stdin,
            skip_env,
            fallback_dir: fallback,
            overrides: Overrides::default(),
        })
    }

    #[test]
    fn envelope_parsing_is_lenient() {
        let env = parse_envelope(r#"{"tool_name":"Bash","tool_input":{"command":"ls"},"extra":1}"#)
            .expect("envelope");
        assert_eq!(env.tool_input.command, "ls");
        assert_eq!(env.cwd, None);
        assert!(parse_envelope("not json").is_none());
        assert!(parse_envelope("[1,2]").is_none());
    }

    #[test]
    fn malformed_or_foreign_input_passes() {
        let tmp = TempDir::new().expect("temp dir");
        let root = blocking_project(&tmp);
        assert_eq!(run("{", None, &root), HookOutput::pass());
        let edit = r#"{"tool_name":"Edit","tool_input":{"command":"wrangler deploy"}}"#;
        assert_eq!(run(edit, None, &root), HookOutput::pass());
        assert_eq!(run(&envelope("wrangler dev", &root), None, &root), HookOutput::pass());
    }

    #[test]
    fn deploy_with_blocking_issue_exits_2() {
        let tmp = TempDir::new().expect("temp dir");
        let root = blocking_project(&tmp);
        let out = run(&envelope("npx wrangler deploy", &root), None, Utf8Path::new("/nonexistent"));
        assert_eq!(out.exit_code, 2);
        assert!(out.stderr.contains("[SEC001]"));
        assert!(out.stderr.contains("DEPLOYMENT BLOCKED"));
    }

    #[test]
    fn bypass_skips_audit() {
        let tmp = TempDir::new().expect("temp dir");
        let root = blocking_project(&tmp);
        let from_env = run(&envelope("wrangler deploy", &root), Some("1"), &root);
        assert_eq!(from_env.exit_code, 0);
        assert!(from_env.stderr.contains("skipped"));

        let inline = run(&envelope("EDGEGUARD_SKIP=1 wrangler deploy", &root), None, &root);
        assert_eq!(inline.exit_code, 0);
    }

    #[test]
    fn missing_cwd_uses_fallback_dir() {
        let tmp = TempDir::new().expect("temp dir");
        let root = blocking_project(&tmp);
        let stdin = r#"{"tool_name":"Bash","tool_input":{"command":"wrangler deploy"}}"#;
        assert_eq!(run(stdin, None, &root).exit_code, 2);
    }

    #[test]
    fn project_without_config_is_silent() {
        let tmp = TempDir::new().expect("temp dir");
        let root = utf8_root(&tmp);
        assert_eq!(run(&envelope("wrangler deploy", &root), None, &root), HookOutput::pass());
    }
}
