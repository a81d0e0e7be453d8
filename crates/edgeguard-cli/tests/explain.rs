use assert_cmd::Command;
use predicates::prelude::*;

#[allow(deprecated)]
fn edgeguard_cmd() -> Command {
    Command::cargo_bin("edgeguard").expect("edgeguard binary not found")
}

#[test]
fn explain_known_rule() {
    edgeguard_cmd()
        .args(["explain", "loop007"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("LOOP007: "))
        .stdout(predicate::str::contains("Remediation"));
}

#[test]
fn explain_unknown_rule_lists_known_ids() {
    edgeguard_cmd()
        .args(["explain", "XYZ123"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Unknown rule id: XYZ123"))
        .stderr(predicate::str::contains("  - SEC001"));
}
