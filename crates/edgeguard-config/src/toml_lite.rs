//! Lenient, line-oriented parser for the TOML subset wrangler configs use.
//!
//! It never rejects input: every line it can interpret produces a value and
//! every line it cannot is skipped.

use crate::node::{ConfigMap, ConfigNode};

/// One step from the root to the current write target.
#[derive(Clone, Debug, PartialEq)]
enum Step {
    Key(String),
    Index(usize),
}

pub fn parse_toml_lite(text: &str) -> ConfigNode {
    let mut root = ConfigMap::new();
    // `None` after a header that could not be resolved: assignments are dropped
    // until the next header.
    let mut target: Option<Vec<Step>> = Some(Vec::new());

    for raw_line in text.lines() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with('[') {
            let header = strip_comment(line).trim_end();
            if let Some(name) = header.strip_prefix("[[").and_then(|h| h.strip_suffix("]]")) {
                target = open_header(&mut root, name, true);
                continue;
            }
            if let Some(name) = header.strip_prefix('[').and_then(|h| h.strip_suffix(']')) {
                target = open_header(&mut root, name, false);
                continue;
            }
            // Not a header (e.g. a stray inline array line); fall through.
        }

        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let key = unquote(key.trim());
        if key.is_empty() {
            continue;
        }
        let Some(path) = target.as_ref() else {
            continue;
        };
        if let Some(map) = resolve(&mut root, path) {
            map.insert(key, parse_value(value));
        }
    }

    ConfigNode::Mapping(root)
}

fn open_header(root: &mut ConfigMap, name: &str, append: bool) -> Option<Vec<Step>> {
    let segments: Vec<String> = name.split('.').map(|s| unquote(s.trim())).collect();
    if segments.iter().any(|s| s.is_empty()) {
        return None;
    }
    let mut path = Vec::new();
    if open_section(root, &segments, append, &mut path) {
        Some(path)
    } else {
        None
    }
}

/// Navigate (creating mappings as needed) along `segments`. With `append`, the
/// final segment is a sequence that receives a fresh mapping. Navigating through
/// an existing sequence descends into its last element.
fn open_section(map: &mut ConfigMap, segments: &[String], append: bool, path: &mut Vec<Step>) -> bool {
    let Some((first, rest)) = segments.split_first() else {
        return true;
    };

    if rest.is_empty() && append {
        let node = map.entry_or_insert_with(first, || ConfigNode::Sequence(Vec::new()));
        let ConfigNode::Sequence(items) = node else {
            return false;
        };
        items.push(ConfigNode::Mapping(ConfigMap::new()));
        path.push(Step::Key(first.clone()));
        path.push(Step::Index(items.len() - 1));
        return true;
    }

    let node = map.entry_or_insert_with(first, || ConfigNode::Mapping(ConfigMap::new()));
    path.push(Step::Key(first.clone()));
    let child = match node {
        ConfigNode::Mapping(m) => m,
        ConfigNode::Sequence(items) => {
            let idx = items.len().saturating_sub(1);
            match items.last_mut() {
                Some(ConfigNode::Mapping(m)) => {
                    path.push(Step::Index(idx));
                    m
                }
                _ => return false,
            }
        }
        ConfigNode::Scalar(_) => return false,
    };
    open_section(child, rest, append, path)
}

fn resolve<'a>(map: &'a mut ConfigMap, path: &[Step]) -> Option<&'a mut ConfigMap> {
    match path {
        [] => Some(map),
        [Step::Key(k), Step::Index(idx), rest @ ..] => match map.get_mut(k)? {
            ConfigNode::Sequence(items) => match items.get_mut(*idx)? {
                ConfigNode::Mapping(m) => resolve(m, rest),
                _ => None,
            },
            _ => None,
        },
        [Step::Key(k), rest @ ..] => match map.get_mut(k)? {
            ConfigNode::Mapping(m) => resolve(m, rest),
            _ => None,
        },
        [Step::Index(_), ..] => None,
    }
}

fn strip_comment(s: &str) -> &str {
    match s.find('#') {
        Some(idx) => &s[..idx],
        None => s,
    }
}

/// Remove one layer of matching single or double quotes.
fn unquote(s: &str) -> String {
    let bytes = s.as_bytes();
    if bytes.len() >= 2 {
        let first = bytes[0];
        if (first == b'"' || first == b'\'') && bytes[bytes.len() - 1] == first {
            return s[1..s.len() - 1].to_string();
        }
    }
    s.to_string()
}

/// Extract the value text: one quote layer removed (anything after the closing
/// quote is ignored), or for bare values a trailing ` #` comment cut off.
fn value_text(raw: &str) -> String {
    let raw = raw.trim();
    let Some(quote) = raw.chars().next().filter(|c| *c == '"' || *c == '\'') else {
        let bare = match raw.find(" #").or_else(|| raw.find("\t#")) {
            Some(idx) => &raw[..idx],
            None => raw,
        };
        return bare.trim().to_string();
    };

    let body = &raw[1..];
    let mut escaped = false;
    for (idx, c) in body.char_indices() {
        if quote == '"' && escaped {
            escaped = false;
            continue;
        }
        if quote == '"' && c == '\\' {
            escaped = true;
            continue;
        }
        if c == quote {
            return body[..idx].to_string();
        }
    }
    // Unterminated: keep everything after the opening quote.
    body.to_string()
}

fn parse_value(raw: &str) -> ConfigNode {
    let text = value_text(raw);

    if text.eq_ignore_ascii_case("true") {
        return ConfigNode::bool(true);
    }
    if text.eq_ignore_ascii_case("false") {
        return ConfigNode::bool(false);
    }
    if looks_like_integer(&text)
        && let Ok(i) = text.replace('_', "").parse::<i64>()
    {
        return ConfigNode::integer(i);
    }
    if looks_like_decimal(&text)
        && let Ok(x) = text.replace('_', "").parse::<f64>()
    {
        return ConfigNode::float(x);
    }
    ConfigNode::string(text)
}

fn looks_like_integer(s: &str) -> bool {
    let digits = s.strip_prefix(['+', '-']).unwrap_or(s);
    !digits.is_empty()
        && digits.starts_with(|c: char| c.is_ascii_digit())
        && digits.ends_with(|c: char| c.is_ascii_digit())
        && digits.chars().all(|c| c.is_ascii_digit() || c == '_')
}

fn looks_like_decimal(s: &str) -> bool {
    let body = s.strip_prefix(['+', '-']).unwrap_or(s);
    let Some(first) = body.chars().next() else {
        return false;
    };
    first.is_ascii_digit()
        && body.contains(['.', 'e', 'E'])
        && body
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-' | '_'))
}
