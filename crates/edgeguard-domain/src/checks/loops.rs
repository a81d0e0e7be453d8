//! Loop-sensitive resource use (LOOP001..LOOP007).
//!
//! These are textual heuristics: a loop "body" is the text between the loop
//! header and the first closing brace, and a callback body is either a braced
//! block or an expression up to `;`. Recursion checks look at the function's
//! own body, delimited by brace matching.

use crate::model::{RuleContext, SourceFile};
use crate::scanner::{self, PatternRule, window, window_before};
use edgeguard_types::{Detection, Issue, Severity, ids};
use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Bytes at the start of a function body searched for a depth guard.
pub const RECURSION_WINDOW: usize = 600;

const LOOP_HEADER: &str = r"\b(?:for(?:\s+await)?|while)\s*\([^)]*\)\s*\{[^}]*?";
const CALLBACK_HEADER: &str =
    r"\.(?:forEach|map)\s*\(\s*(?:async\s+)?(?:\([^)]*\)|\w+)\s*=>\s*(?:\{[^}]*?|[^{};]*?)";
const D1_CALL: &str = r"(?:\.(?:prepare|batch)\s*\(|\b\w*(?i:db|d1)\w*\.exec\s*\()";
const STORAGE_CALL: &str = r"\benv\.\w+\.(?:get|put|delete|list)\s*\(";

static GUARD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:depth|level|counter|max|limit)\w*\s*(?:[<>]=?|[!=]==?)|(?:[<>]=?|[!=]==?)\s*\w*(?:depth|level|counter|max|limit)",
    )
    .expect("guard pattern is valid")
});

static RECURSIVE_IO_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bfetch\s*\(|\.(?:prepare|batch)\s*\(|\benv\.\w+\.(?:get|put|delete|list)\s*\(")
        .expect("recursive io pattern is valid")
});

static RULES: LazyLock<Vec<PatternRule>> = LazyLock::new(|| {
    vec![
        PatternRule::new(
            ids::LOOP001,
            Severity::Critical,
            Detection::Static,
            &format!("{LOOP_HEADER}{D1_CALL}"),
            "D1 query inside a loop (N+1 queries)",
            "Batch with db.batch([...]) or a single WHERE id IN (...) query",
        )
        .skip_tests(),
        PatternRule::new(
            ids::LOOP001,
            Severity::Critical,
            Detection::Static,
            &format!("{CALLBACK_HEADER}{D1_CALL}"),
            "D1 query inside a loop (N+1 queries)",
            "Batch with db.batch([...]) or a single WHERE id IN (...) query",
        )
        .skip_tests()
        .refine(not_building_a_batch),
        PatternRule::new(
            ids::LOOP002,
            Severity::High,
            Detection::Static,
            &format!("{LOOP_HEADER}{STORAGE_CALL}"),
            "KV/R2 operation inside a loop",
            "Batch keys, or read once outside the loop and cache the result",
        )
        .skip_tests(),
        PatternRule::new(
            ids::LOOP002,
            Severity::High,
            Detection::Static,
            &format!("{CALLBACK_HEADER}{STORAGE_CALL}"),
            "KV/R2 operation inside a loop",
            "Batch keys, or read once outside the loop and cache the result",
        )
        .skip_tests(),
        PatternRule::new(
            ids::LOOP003,
            Severity::High,
            Detection::Static,
            r"\bfetch\s*\(\s*(?:new\s+(?:Request|URL)\s*\([^)]*?)?\b(?:request|req)\.url\b",
            "Self-referential fetch of the incoming request URL",
            "Call the handler directly or use a service binding",
        )
        .skip_tests(),
        PatternRule::new(
            ids::LOOP004,
            Severity::Medium,
            Detection::Heuristic,
            r"\bsetInterval\s*\(",
            "setInterval without clearInterval",
            "Clear the interval, or use Cron Triggers / Durable Object alarms",
        )
        .skip_tests()
        .verify("Confirm the timer cannot outlive the request")
        .refine(interval_never_cleared),
        PatternRule::new(
            ids::LOOP005,
            Severity::Medium,
            Detection::Heuristic,
            r"(?:\bfunction\s*\*?\s*(?P<fname>\w+)\s*\(|\b(?:const|let|var)\s+(?P<vname>\w+)\s*=\s*(?:async\s+)?(?:function\b[^(]*)?\([^)]*\)\s*(?:=>)?)",
            "Recursive function without a depth guard",
            "Pass and check a depth parameter, or rewrite iteratively",
        )
        .skip_tests()
        .verify("Confirm the recursion is bounded by its input")
        .refine(unguarded_recursion),
        PatternRule::new(
            ids::LOOP006,
            Severity::High,
            Detection::Static,
            r"\bPromise\.all(?:Settled)?\s*\(\s*[\w.]+\.map\s*\([^;]*?\bfetch\s*\(",
            "Unbounded parallel subrequests (Promise.all over map with fetch)",
            "Chunk the input and cap concurrency",
        )
        .skip_tests(),
        PatternRule::new(
            ids::LOOP007,
            Severity::Critical,
            Detection::Static,
            r"\bwhile\s*\(\s*(?:true|1)\s*\)|\bfor\s*\(\s*;\s*;\s*\)",
            "Unbounded loop",
            "Bound the loop with an iteration limit or deadline",
        )
        .skip_tests(),
    ]
});

pub fn run(ctx: &RuleContext<'_>) -> Vec<Issue> {
    ctx.sources
        .map(|tree| scanner::scan(tree, &RULES))
        .unwrap_or_default()
}

/// `db.batch(items.map(i => db.prepare(...)))` is the fix, not the problem.
fn not_building_a_batch(file: &SourceFile, caps: &Captures<'_>, sev: Severity) -> Option<Severity> {
    let start = caps.get(0)?.start();
    let before = window_before(&file.text, start, 80);
    if before.contains(".batch(") {
        return None;
    }
    Some(sev)
}

fn interval_never_cleared(file: &SourceFile, _: &Captures<'_>, sev: Severity) -> Option<Severity> {
    if file.text.contains("clearInterval") {
        None
    } else {
        Some(sev)
    }
}

fn unguarded_recursion(file: &SourceFile, caps: &Captures<'_>, sev: Severity) -> Option<Severity> {
    let header = caps.get(0)?;
    let name = caps.name("fname").or_else(|| caps.name("vname"))?.as_str();
    let body = function_body(&file.text, header.end())?;

    let call = Regex::new(&format!(r"\b{}\s*\(", regex::escape(name))).ok()?;
    if !call.is_match(body) {
        return None;
    }
    if GUARD_RE.is_match(header.as_str()) || GUARD_RE.is_match(window(body, 0, RECURSION_WINDOW)) {
        return None;
    }
    if RECURSIVE_IO_RE.is_match(body) {
        return Some(Severity::High);
    }
    Some(sev)
}

/// Body of the function whose header ends at `at`: the braced block, or the
/// expression of a concise arrow function. `None` when the header is not
/// followed by a function body.
fn function_body(text: &str, at: usize) -> Option<&str> {
    let bytes = text.as_bytes();
    // `function name(` stops inside the parameter list.
    let mut pos = if at > 0 && bytes.get(at - 1) == Some(&b'(') {
        matching_close(text, at - 1)? + 1
    } else {
        at
    };

    let arrow_matched = text[..pos].trim_end().ends_with("=>");
    let token = if arrow_matched {
        Some(pos)
    } else {
        text[pos..].find(['{', ';', '=']).map(|i| pos + i)
    };
    let token = token?;
    if !arrow_matched {
        // Only whitespace or a return type annotation may sit between `)` and the body.
        let between = text[pos..token].trim();
        if !between.is_empty() && !between.starts_with(':') {
            return None;
        }
    }

    pos = token;
    if !arrow_matched {
        match bytes.get(pos) {
            Some(b'{') => return Some(braced(text, pos)),
            Some(b'=') if text[pos..].starts_with("=>") => pos += 2,
            _ => return None,
        }
    }

    let rest = &text[pos..];
    let pos = pos + (rest.len() - rest.trim_start().len());
    if bytes.get(pos) == Some(&b'{') {
        return Some(braced(text, pos));
    }
    let end = text[pos..].find([';', '\n']).map_or(text.len(), |i| pos + i);
    Some(&text[pos..end])
}

/// Contents of the block opened at `open`, or the rest of the text when the
/// block never closes.
fn braced(text: &str, open: usize) -> &str {
    match matching_close(text, open) {
        Some(close) => &text[open + 1..close],
        None => &text[open + 1..],
    }
}

/// Index of the delimiter closing the one at `open`. String literals are
/// skipped; they end at their quote or at a newline.
fn matching_close(text: &str, open: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let (opener, closer) = match bytes.get(open)? {
        b'(' => (b'(', b')'),
        b'{' => (b'{', b'}'),
        _ => return None,
    };
    let mut depth = 0usize;
    let mut quote: Option<u8> = None;
    let mut i = open;
    while i < bytes.len() {
        let b = bytes[i];
        if let Some(q) = quote {
            if b == b'\\' {
                i += 2;
                continue;
            }
            if b == q || b == b'\n' {
                quote = None;
            }
        } else if b == b'"' || b == b'\'' {
            quote = Some(b);
        } else if b == opener {
            depth += 1;
        } else if b == closer {
            depth = depth.saturating_sub(1);
            if depth == 0 {
                return Some(i);
            }
        }
        i += 1;
    }
    None
}
