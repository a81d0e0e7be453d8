//! Deploy-command detection and the bypass signal.

use regex::Regex;
use std::sync::LazyLock;

/// Environment variable (or command-line assignment) that skips the audit.
pub const SKIP_ENV_VAR: &str = "EDGEGUARD_SKIP";

// Matches the bare CLI as well as npx/pnpm [exec]/yarn/bunx/bun x wrappers.
static DEPLOY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bwrangler\s+(?:deploy|publish)\b").expect("deploy pattern is valid")
});

static SKIP_ASSIGNMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:^|[\s;&|(])EDGEGUARD_SKIP=(?:"([^"]*)"|'([^']*)'|([^\s;&|)]*))"#)
        .expect("skip assignment pattern is valid")
});

pub fn is_deploy_command(command: &str) -> bool {
    DEPLOY_RE.is_match(command)
}

/// `1`, `true`, `yes`, `on`, case-insensitive.
pub fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Bypass when the environment value is truthy, or the command itself assigns a truthy value.
pub fn bypass_requested(env_value: Option<&str>, command: Option<&str>) -> bool {
    if env_value.is_some_and(is_truthy) {
        return true;
    }
    command.is_some_and(|cmd| {
        SKIP_ASSIGNMENT_RE.captures_iter(cmd).any(|caps| {
            caps.get(1)
                .or_else(|| caps.get(2))
                .or_else(|| caps.get(3))
                .is_some_and(|m| is_truthy(m.as_str()))
        })
    })
}
