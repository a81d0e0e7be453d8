//! End-to-end `edgeguard check` tests against the projects in `tests/fixtures/`.

use assert_cmd::Command;
use edgeguard_test_util::{fixtures_dir, normalize_nondeterministic};
use predicates::prelude::*;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Wraps the deprecated cargo_bin to centralize the deprecation warning.
#[allow(deprecated)]
fn edgeguard_cmd() -> Command {
    let mut cmd = Command::cargo_bin("edgeguard").expect("edgeguard binary not found");
    cmd.env_remove("EDGEGUARD_SKIP").env_remove("EDGEGUARD_LOG");
    cmd
}

fn fixture(name: &str) -> PathBuf {
    fixtures_dir(env!("CARGO_MANIFEST_DIR")).join(name)
}

fn check_json(project: &Path) -> (i32, Value) {
    let output = edgeguard_cmd()
        .arg("check")
        .arg("--project-dir")
        .arg(project)
        .arg("--format")
        .arg("json")
        .output()
        .expect("run edgeguard");
    let code = output.status.code().expect("exit code");
    let value: Value = serde_json::from_slice(&output.stdout).expect("stdout is a JSON report");
    (code, value)
}

fn issue_ids(report: &Value, section: &str) -> Vec<String> {
    report[section]
        .as_array()
        .expect("section array")
        .iter()
        .map(|i| i["id"].as_str().expect("id").to_string())
        .collect()
}

#[test]
fn clean_worker_matches_golden_report() {
    let project = fixture("clean_worker");
    let (code, actual) = check_json(&project);
    assert_eq!(code, 0);

    let expected_text =
        std::fs::read_to_string(project.join("expected.report.json")).expect("read golden");
    let expected: Value = serde_json::from_str(&expected_text).expect("parse golden");
    assert_eq!(normalize_nondeterministic(actual), expected);
}

#[test]
fn risky_project_warns_without_blocking() {
    let (code, report) = check_json(&fixture("risky_jsonc"));
    assert_eq!(code, 0);
    assert_eq!(report["verdict"], "allow");
    assert!(issue_ids(&report, "blocking").is_empty());

    let warnings = issue_ids(&report, "warnings");
    for id in ["SEC001", "RES001", "COST001", "PERF001", "PERF002", "PERF004"] {
        assert!(warnings.iter().any(|w| w == id), "missing {id} in {warnings:?}");
    }
    // `${STRIPE_TOKEN}` is a reference, not a secret.
    let secrets: Vec<&Value> = report["warnings"]
        .as_array()
        .expect("warnings")
        .iter()
        .filter(|i| i["id"] == "SEC001")
        .collect();
    assert_eq!(secrets.len(), 1);
    assert_eq!(secrets[0]["message"], "Potential secret in plaintext: vars.API_KEY");
}

#[test]
fn opt_in_blocking_exits_2() {
    edgeguard_cmd()
        .arg("check")
        .arg("--project-dir")
        .arg(fixture("blocking_policy"))
        .assert()
        .code(2)
        .stdout(predicate::str::contains("BLOCKING"))
        .stdout(predicate::str::contains("[SEC001] HIGH"))
        .stdout(predicate::str::contains("DEPLOYMENT BLOCKED by: SEC001"))
        .stdout(predicate::str::contains("[PERF001]").not());
}

#[test]
fn blocking_report_lists_rule_ids_and_suppressed_count() {
    let (code, report) = check_json(&fixture("blocking_policy"));
    assert_eq!(code, 2);
    assert_eq!(report["verdict"], "block");
    assert_eq!(report["blocking_rule_ids"], serde_json::json!(["SEC001"]));
    assert_eq!(issue_ids(&report, "blocking"), vec!["SEC001".to_string()]);
    assert_eq!(report["issues_suppressed"], 1);
}

#[test]
fn toml_config_flags_only_the_consumer_without_dlq() {
    let (code, report) = check_json(&fixture("toml_queues"));
    assert_eq!(code, 0);
    assert_eq!(report["config_file"], "wrangler.toml");

    let messages: Vec<&str> = report["warnings"]
        .as_array()
        .expect("warnings")
        .iter()
        .map(|i| i["message"].as_str().expect("message"))
        .collect();
    assert!(messages.contains(&"Queue 'orders' missing dead_letter_queue"));
    assert!(messages.contains(&"Queue 'orders' has max_retries=5 (each retry costs)"));
    assert!(!messages.iter().any(|m| m.contains("'emails'")));
}

#[test]
fn inline_suppression_hides_only_the_marked_loop() {
    let (code, report) = check_json(&fixture("suppressed_loop"));
    assert_eq!(code, 0);
    assert_eq!(report["files_scanned"], 2);

    let loops: Vec<&str> = report["warnings"]
        .as_array()
        .expect("warnings")
        .iter()
        .filter(|i| i["id"] == "LOOP007")
        .map(|i| i["message"].as_str().expect("message"))
        .collect();
    assert_eq!(loops, vec!["Unbounded loop at src/worker.ts:3"]);
    assert!(issue_ids(&report, "warnings").iter().any(|id| id == "COST002"));
}

#[test]
fn broken_config_fails_open() {
    let (code, report) = check_json(&fixture("broken_config"));
    assert_eq!(code, 0);
    assert_eq!(report["verdict"], "allow");
    assert!(
        report["skipped"]
            .as_str()
            .is_some_and(|s| s.starts_with("config unreadable"))
    );
}

#[test]
fn missing_config_is_skipped() {
    let tmp = TempDir::new().expect("temp dir");
    edgeguard_cmd()
        .arg("check")
        .arg("--project-dir")
        .arg(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("skipped: no deploy config found"));
}

#[test]
fn skip_env_bypasses_blocking_project() {
    edgeguard_cmd()
        .env("EDGEGUARD_SKIP", "1")
        .arg("check")
        .arg("--project-dir")
        .arg(fixture("blocking_policy"))
        .assert()
        .success()
        .stdout(predicate::str::contains("EDGEGUARD_SKIP is set"));
}

#[test]
fn report_out_writes_json_alongside_text() {
    let tmp = TempDir::new().expect("temp dir");
    let out = tmp.path().join("artifacts").join("report.json");
    edgeguard_cmd()
        .arg("check")
        .arg("--project-dir")
        .arg(fixture("risky_jsonc"))
        .arg("--report-out")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("WARNINGS"));

    let text = std::fs::read_to_string(&out).expect("report written");
    let report: Value = serde_json::from_str(&text).expect("json");
    assert_eq!(report["schema"], "edgeguard.report.v1");
    assert!(report["warnings"][0]["fingerprint"].is_string());
}
