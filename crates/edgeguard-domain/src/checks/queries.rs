use crate::model::{RuleContext, SourceFile};
use crate::scanner::{self, PatternRule, window};
use edgeguard_types::{Detection, Issue, Severity, ids};
use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Bytes after a match searched for the rest of the statement.
const STATEMENT_WINDOW: usize = 400;

static PAGINATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:LIMIT|OFFSET)\b").expect("pagination pattern is valid"));
static ID_LOOKUP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bWHERE\s+(?:\w+\.)?id\s*=").expect("id lookup pattern is valid")
});
static BUILDER_LIMIT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.limit\s*\(").expect("builder limit pattern is valid"));

static RULES: LazyLock<Vec<PatternRule>> = LazyLock::new(|| {
    vec![
        PatternRule::new(
            ids::QUERY001,
            Severity::High,
            Detection::Static,
            r"(?i)\bSELECT\s+\*\s+FROM\s+(?P<table>[\w.]+)",
            "Unbounded SELECT * FROM $table without LIMIT",
            "Add LIMIT/OFFSET or cursor pagination",
        )
        .skip_tests()
        .refine(unpaginated_sql),
        PatternRule::new(
            ids::QUERY001,
            Severity::High,
            Detection::Static,
            r"\.select\s*\(\s*\)\s*\.from\s*\(\s*(?P<table>[\w.]+)\s*\)",
            "Unbounded select().from($table) without .limit()",
            "Chain .limit(n) or paginate with a cursor",
        )
        .skip_tests()
        .refine(unpaginated_builder),
        PatternRule::new(
            ids::QUERY001,
            Severity::High,
            Detection::Static,
            r"\.selectAll\s*\(\s*\)",
            "Unbounded selectAll() without .limit()",
            "Chain .limit(n) or paginate with a cursor",
        )
        .skip_tests()
        .refine(unpaginated_builder),
    ]
});

pub fn run(ctx: &RuleContext<'_>) -> Vec<Issue> {
    ctx.sources
        .map(|tree| scanner::scan(tree, &RULES))
        .unwrap_or_default()
}

/// Rest of the SQL string: up to the closing quote, a `;`, or the window end.
fn sql_tail<'t>(file: &'t SourceFile, end: usize) -> &'t str {
    let rest = window(&file.text, end, STATEMENT_WINDOW);
    let stop = rest.find(['"', '\'', '`', ';']).unwrap_or(rest.len());
    &rest[..stop]
}

fn unpaginated_sql(file: &SourceFile, caps: &Captures<'_>, sev: Severity) -> Option<Severity> {
    let end = caps.get(0)?.end();
    let tail = sql_tail(file, end);
    if PAGINATION_RE.is_match(tail) || ID_LOOKUP_RE.is_match(tail) {
        return None;
    }
    Some(sev)
}

fn unpaginated_builder(file: &SourceFile, caps: &Captures<'_>, sev: Severity) -> Option<Severity> {
    let end = caps.get(0)?.end();
    let rest = window(&file.text, end, STATEMENT_WINDOW);
    let statement = &rest[..rest.find(';').unwrap_or(rest.len())];
    if BUILDER_LIMIT_RE.is_match(statement) {
        return None;
    }
    Some(sev)
}
