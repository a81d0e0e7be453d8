use edgeguard_domain::policy::IgnorePolicy;

/// Ignore file name at the project root.
pub const IGNORE_FILE_NAME: &str = ".pre-deploy-ignore";

/// Parse `.pre-deploy-ignore` text.
///
/// ```text
/// # comment
/// !SEC001            block deploys on SEC001
/// RES001:orders      ignore RES001 for queue "orders"
/// LOOP004:poll.ts    ignore LOOP004 in files named poll.ts
/// PERF001            ignore PERF001 everywhere (same as PERF001:*)
/// ```
pub fn parse_ignore_file(text: &str) -> IgnorePolicy {
    let mut policy = IgnorePolicy::new();
    for raw in text.lines() {
        let line = match raw.find('#') {
            Some(idx) => &raw[..idx],
            None => raw,
        }
        .trim();
        if line.is_empty() {
            continue;
        }

        if let Some(rule) = line.strip_prefix('!') {
            policy.add_blocking(rule);
            continue;
        }

        match line.split_once(':') {
            Some((rule, context)) => {
                let rule = rule.trim();
                if !rule.is_empty() {
                    policy.suppress(rule, context);
                }
            }
            None => policy.suppress(line, ""),
        }
    }
    policy
}

#[cfg(test)]
mod tests {
    use super::*;
    use edgeguard_types::{Detection, Issue, Severity};
    use proptest::prelude::*;

    fn issue(id: &str, message: &str) -> Issue {
        Issue::new(id, Severity::High, Detection::Config, message, "fix")
    }

    #[test]
    fn blocking_lines_are_upper_cased() {
        let policy = parse_ignore_file("!sec001\n! RES001 \n");
        let ids: Vec<&str> = policy.blocking_rule_ids().collect();
        assert_eq!(ids, vec!["RES001", "SEC001"]);
    }

    #[test]
    fn comments_and_blanks_are_skipped() {
        let policy = parse_ignore_file("# only a comment\n\n   \nPERF001 # trailing\n");
        assert!(policy.is_suppressed(&issue("PERF001", "Smart Placement not enabled")));
        assert_eq!(policy.blocking_rule_ids().count(), 0);
    }

    #[test]
    fn context_scoped_and_global_entries() {
        let policy = parse_ignore_file("RES001:Orders\nPERF004:*\n");
        assert!(policy.is_suppressed(&issue("RES001", "Queue 'orders' missing dead_letter_queue")));
        assert!(!policy.is_suppressed(&issue("RES001", "Queue 'emails' missing dead_letter_queue")));
        assert!(policy.is_suppressed(&issue("PERF004", "Observability logs not enabled")));
    }

    #[test]
    fn a_rule_without_bang_never_blocks() {
        let policy = parse_ignore_file("SEC001:other\n");
        assert!(!policy.is_blocking("SEC001"));
    }

    #[test]
    fn missing_file_is_empty_policy() {
        assert!(parse_ignore_file("").is_empty());
    }

    proptest! {
        #[test]
        fn parse_never_panics(input in ".*") {
            let _ = parse_ignore_file(&input);
        }

        #[test]
        fn global_entry_suppresses_any_context(
            queue in "[a-z][a-z0-9-]{0,12}",
        ) {
            let policy = parse_ignore_file("RES001\n");
            let message = format!("Queue '{queue}' missing dead_letter_queue");
            prop_assert!(policy.is_suppressed(&issue("RES001", &message)));
        }

        #[test]
        fn scoped_entry_only_matches_its_queue(
            a in "[a-z]{1,8}",
            b in "[a-z]{1,8}",
        ) {
            prop_assume!(a != b);
            let policy = parse_ignore_file(&format!("RES001:{a}\n"));
            let hit = issue("RES001", &format!("Queue '{a}' missing dead_letter_queue"));
            let miss = issue("RES001", &format!("Queue '{b}' missing dead_letter_queue"));
            prop_assert!(policy.is_suppressed(&hit));
            prop_assert!(!policy.is_suppressed(&miss));
        }
    }
}
