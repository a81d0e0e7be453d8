use crate::model::RuleContext;
use edgeguard_types::{Detection, Issue, Severity, ids};

const SECRET_NAME_MARKERS: &[&str] = &[
    "API_KEY",
    "SECRET",
    "PASSWORD",
    "TOKEN",
    "PRIVATE",
    "CREDENTIAL",
];

/// Values this short are assumed to be flags or placeholders, not credentials.
const MIN_SECRET_LEN: usize = 9;

pub fn run(ctx: &RuleContext<'_>) -> Vec<Issue> {
    let mut out = Vec::new();
    let Some(vars) = ctx.config.get("vars") else {
        return out;
    };

    for (key, value) in vars.map_iter() {
        let upper = key.to_ascii_uppercase();
        if !SECRET_NAME_MARKERS.iter().any(|m| upper.contains(m)) {
            continue;
        }
        let Some(text) = value.scalar_text() else { continue };
        if text.chars().count() < MIN_SECRET_LEN || text.starts_with("${") {
            continue;
        }
        out.push(Issue::new(
            ids::SEC001,
            Severity::Critical,
            Detection::Config,
            format!("Potential secret in plaintext: vars.{key}"),
            format!("Remove vars.{key} and use: wrangler secret put {key}"),
        ));
    }
    out
}
