use super::utils::{cron_count, int_value, queue_consumers};
use crate::model::RuleContext;
use edgeguard_config::ConfigNode;
use edgeguard_types::{Detection, Issue, Severity, ids};

pub fn run(ctx: &RuleContext<'_>) -> Vec<Issue> {
    let mut out = Vec::new();
    let config = ctx.config;

    let placement = config
        .get_path(&["placement", "mode"])
        .and_then(ConfigNode::as_str);
    if placement != Some("smart") {
        out.push(Issue::new(
            ids::PERF001,
            Severity::Low,
            Detection::Config,
            "Smart Placement not enabled",
            "Add: \"placement\": { \"mode\": \"smart\" }",
        ));
    }

    match config.get_path(&["limits", "cpu_ms"]).and_then(int_value) {
        None => out.push(Issue::new(
            ids::PERF002,
            Severity::Medium,
            Detection::Config,
            "No CPU time limit (limits.cpu_ms) configured",
            "Add: \"limits\": { \"cpu_ms\": 50 } sized to the workload",
        )),
        Some(cpu_ms) => {
            let api_shaped = queue_consumers(config).is_empty() && cron_count(config) == 0;
            if api_shaped && cpu_ms > ctx.limits.cpu_ms_api_ceiling {
                out.push(Issue::new(
                    ids::PERF003,
                    Severity::Low,
                    Detection::Config,
                    format!(
                        "limits.cpu_ms={cpu_ms} is above {} for a request/response worker",
                        ctx.limits.cpu_ms_api_ceiling
                    ),
                    "Lower limits.cpu_ms, or move long-running work to queues or workflows",
                ));
            }
        }
    }

    out
}
