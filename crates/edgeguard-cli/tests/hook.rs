//! `edgeguard hook` end-to-end: JSON envelope on stdin, verdict as exit code.

use assert_cmd::Command;
use edgeguard_test_util::fixtures_dir;
use predicates::prelude::*;
use std::path::PathBuf;

#[allow(deprecated)]
fn edgeguard_cmd() -> Command {
    let mut cmd = Command::cargo_bin("edgeguard").expect("edgeguard binary not found");
    cmd.env_remove("EDGEGUARD_SKIP").env_remove("EDGEGUARD_LOG");
    cmd
}

fn fixture(name: &str) -> PathBuf {
    fixtures_dir(env!("CARGO_MANIFEST_DIR")).join(name)
}

fn envelope(tool: &str, command: &str, cwd: &PathBuf) -> String {
    serde_json::json!({
        "tool_name": tool,
        "tool_input": { "command": command },
        "cwd": cwd.to_str().expect("utf8 fixture path"),
    })
    .to_string()
}

#[test]
fn deploy_into_blocking_project_is_blocked() {
    let project = fixture("blocking_policy");
    edgeguard_cmd()
        .arg("hook")
        .write_stdin(envelope("Bash", "npx wrangler deploy", &project))
        .assert()
        .code(2)
        .stderr(predicate::str::contains("[SEC001]"));
}

#[test]
fn warnings_are_printed_but_allowed() {
    let project = fixture("risky_jsonc");
    edgeguard_cmd()
        .arg("hook")
        .write_stdin(envelope("Bash", "pnpm exec wrangler deploy", &project))
        .assert()
        .success()
        .stderr(predicate::str::contains("[RES001]"));
}

#[test]
fn non_deploy_commands_pass_silently() {
    let project = fixture("blocking_policy");
    edgeguard_cmd()
        .arg("hook")
        .write_stdin(envelope("Bash", "wrangler dev", &project))
        .assert()
        .success()
        .stderr(predicate::str::is_empty());
}

#[test]
fn other_tools_pass_silently() {
    let project = fixture("blocking_policy");
    edgeguard_cmd()
        .arg("hook")
        .write_stdin(envelope("Write", "wrangler deploy", &project))
        .assert()
        .success()
        .stderr(predicate::str::is_empty());
}

#[test]
fn malformed_envelope_is_allowed() {
    edgeguard_cmd()
        .arg("hook")
        .write_stdin("this is not json")
        .assert()
        .success();
}

#[test]
fn inline_skip_assignment_bypasses() {
    let project = fixture("blocking_policy");
    edgeguard_cmd()
        .arg("hook")
        .write_stdin(envelope("Bash", "EDGEGUARD_SKIP=true wrangler deploy", &project))
        .assert()
        .success()
        .stderr(predicate::str::contains("skipped"));
}
