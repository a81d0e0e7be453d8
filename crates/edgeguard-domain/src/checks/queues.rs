use super::utils::{DEFAULT_MAX_RETRIES, consumer_name, int_value, queue_consumers};
use crate::model::RuleContext;
use edgeguard_types::{Detection, Issue, Severity, ids};

pub fn run(ctx: &RuleContext<'_>) -> Vec<Issue> {
    let mut out = Vec::new();

    for (index, consumer) in queue_consumers(ctx.config).into_iter().enumerate() {
        let name = consumer_name(consumer, index);

        if !consumer.contains_key("dead_letter_queue") && !looks_like_dead_letter_queue(&name) {
            out.push(Issue::new(
                ids::RES001,
                Severity::High,
                Detection::Config,
                format!("Queue '{name}' missing dead_letter_queue"),
                format!("Add: \"dead_letter_queue\": \"{name}-dlq\""),
            ));
        }

        let retries = consumer
            .get("max_retries")
            .and_then(int_value)
            .unwrap_or(DEFAULT_MAX_RETRIES);
        if retries > ctx.limits.retry_threshold {
            out.push(Issue::new(
                ids::COST001,
                Severity::Medium,
                Detection::Config,
                format!("Queue '{name}' has max_retries={retries} (each retry costs)"),
                "Set max_retries to 1 if the consumer is idempotent",
            ));
        }

        if !consumer.contains_key("max_concurrency") {
            out.push(Issue::new(
                ids::RES002,
                Severity::Medium,
                Detection::Config,
                format!("Queue '{name}' has no max_concurrency"),
                "Add: \"max_concurrency\": <what downstream systems can absorb>",
            ));
        }
    }

    out
}

fn looks_like_dead_letter_queue(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    lower.ends_with("-dlq") || lower.contains("dead_letter") || lower.contains("dlq")
}
