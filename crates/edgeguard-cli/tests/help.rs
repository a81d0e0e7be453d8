use assert_cmd::Command;

#[allow(deprecated)]
fn edgeguard_cmd() -> Command {
    Command::cargo_bin("edgeguard").expect("edgeguard binary not found")
}

#[test]
fn help_works() {
    edgeguard_cmd().arg("--help").assert().success();
}

#[test]
fn subcommand_help_works() {
    for sub in ["check", "hook", "explain"] {
        edgeguard_cmd().args([sub, "--help"]).assert().success();
    }
}

#[test]
fn unknown_format_is_rejected() {
    edgeguard_cmd()
        .args(["check", "--format", "yaml"])
        .assert()
        .failure();
}
