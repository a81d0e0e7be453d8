use crate::error::ConfigError;
use crate::node::{ConfigMap, ConfigNode};
use serde_json::Value;

/// Upper bound on trailing-comma cleanup passes.
const MAX_COMMA_PASSES: usize = 5;

/// Parse JSON-with-comments text into a config tree.
pub fn parse_jsonc(text: &str) -> Result<ConfigNode, ConfigError> {
    let stripped = strip_comments(text);
    let mut cleaned = stripped;
    for _ in 0..MAX_COMMA_PASSES {
        let next = strip_trailing_commas(&cleaned);
        if next == cleaned {
            break;
        }
        cleaned = next;
    }

    let value: Value = serde_json::from_str(&cleaned)?;
    if !value.is_object() {
        return Err(ConfigError::RootNotObject {
            found: json_kind(&value),
        });
    }
    Ok(from_json(value).unwrap_or_default())
}

/// Remove `//` line comments and `/* */` block comments outside string literals.
///
/// Line comments stop before the newline so line numbers survive. An unterminated
/// block comment consumes the rest of the input.
pub fn strip_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    let mut in_string = false;
    let mut escape = false;

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            if escape {
                escape = false;
            } else if c == '\\' {
                escape = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            '/' if chars.peek() == Some(&'/') => {
                while let Some(&next) = chars.peek() {
                    if next == '\n' {
                        break;
                    }
                    chars.next();
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev = '\0';
                for next in chars.by_ref() {
                    if prev == '*' && next == '/' {
                        break;
                    }
                    prev = next;
                }
            }
            _ => out.push(c),
        }
    }

    out
}

/// Drop commas that are followed (after whitespace) by `}` or `]`.
///
/// String-aware: commas inside string literals are left alone.
pub fn strip_trailing_commas(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut in_string = false;
    let mut escape = false;

    for (i, &c) in chars.iter().enumerate() {
        if in_string {
            out.push(c);
            if escape {
                escape = false;
            } else if c == '\\' {
                escape = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        if c == '"' {
            in_string = true;
        } else if c == ',' {
            let closes = chars[i + 1..]
                .iter()
                .find(|ch| !ch.is_whitespace())
                .is_some_and(|ch| *ch == '}' || *ch == ']');
            if closes {
                continue;
            }
        }
        out.push(c);
    }

    out
}

/// Convert parsed JSON into a config node. `null` is treated as absent.
fn from_json(value: Value) -> Option<ConfigNode> {
    let node = match value {
        Value::Null => return None,
        Value::Bool(b) => ConfigNode::bool(b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => ConfigNode::integer(i),
            None => ConfigNode::float(n.as_f64().unwrap_or(0.0)),
        },
        Value::String(s) => ConfigNode::string(s),
        Value::Array(items) => ConfigNode::Sequence(items.into_iter().filter_map(from_json).collect()),
        Value::Object(obj) => {
            let mut map = ConfigMap::new();
            for (k, v) in obj {
                if let Some(node) = from_json(v) {
                    map.insert(k, node);
                }
            }
            ConfigNode::Mapping(map)
        }
    };
    Some(node)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
