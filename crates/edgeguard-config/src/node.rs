use std::fmt;

/// A leaf value.
#[derive(Clone, Debug, PartialEq)]
pub enum Scalar {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::String(s) => f.write_str(s),
            Scalar::Integer(i) => write!(f, "{i}"),
            Scalar::Float(x) => write!(f, "{x}"),
            Scalar::Bool(b) => write!(f, "{b}"),
        }
    }
}

/// Ordered mapping with unique keys. Iteration follows insertion order so
/// rule traversal is deterministic.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConfigMap {
    entries: Vec<(String, ConfigNode)>,
}

impl ConfigMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn get(&self, key: &str) -> Option<&ConfigNode> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut ConfigNode> {
        self.entries
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Insert or replace. A replaced key keeps its original position.
    pub fn insert(&mut self, key: impl Into<String>, value: ConfigNode) {
        let key = key.into();
        match self.get_mut(&key) {
            Some(slot) => *slot = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Get the node at `key`, inserting `default()` first if absent.
    pub fn entry_or_insert_with(
        &mut self,
        key: &str,
        default: impl FnOnce() -> ConfigNode,
    ) -> &mut ConfigNode {
        let idx = match self.entries.iter().position(|(k, _)| k == key) {
            Some(idx) => idx,
            None => {
                self.entries.push((key.to_string(), default()));
                self.entries.len() - 1
            }
        };
        &mut self.entries[idx].1
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConfigNode)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }
}

/// Config tree node. Accessors return `None` for both "absent" and "wrong type"
/// so callers can fall back to defaults without matching on variants.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigNode {
    Scalar(Scalar),
    Mapping(ConfigMap),
    Sequence(Vec<ConfigNode>),
}

impl Default for ConfigNode {
    fn default() -> Self {
        ConfigNode::Mapping(ConfigMap::new())
    }
}

impl ConfigNode {
    pub fn string(s: impl Into<String>) -> Self {
        ConfigNode::Scalar(Scalar::String(s.into()))
    }

    pub fn integer(i: i64) -> Self {
        ConfigNode::Scalar(Scalar::Integer(i))
    }

    pub fn float(x: f64) -> Self {
        ConfigNode::Scalar(Scalar::Float(x))
    }

    pub fn bool(b: bool) -> Self {
        ConfigNode::Scalar(Scalar::Bool(b))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ConfigNode::Scalar(_) => "scalar",
            ConfigNode::Mapping(_) => "mapping",
            ConfigNode::Sequence(_) => "sequence",
        }
    }

    pub fn as_mapping(&self) -> Option<&ConfigMap> {
        match self {
            ConfigNode::Mapping(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[ConfigNode]> {
        match self {
            ConfigNode::Sequence(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            ConfigNode::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigNode::Scalar(Scalar::String(s)) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ConfigNode::Scalar(Scalar::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    /// Integers, and floats without a fractional part.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ConfigNode::Scalar(Scalar::Integer(i)) => Some(*i),
            ConfigNode::Scalar(Scalar::Float(x)) if x.fract() == 0.0 && x.is_finite() => {
                Some(*x as i64)
            }
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ConfigNode::Scalar(Scalar::Integer(i)) => Some(*i as f64),
            ConfigNode::Scalar(Scalar::Float(x)) => Some(*x),
            _ => None,
        }
    }

    /// Scalar rendered as text (strings unquoted, numbers and booleans formatted).
    pub fn scalar_text(&self) -> Option<String> {
        self.as_scalar().map(|s| s.to_string())
    }

    /// Child of a mapping node.
    pub fn get(&self, key: &str) -> Option<&ConfigNode> {
        self.as_mapping().and_then(|m| m.get(key))
    }

    /// Walk nested mappings: `node.get_path(&["observability", "logs", "enabled"])`.
    pub fn get_path(&self, path: &[&str]) -> Option<&ConfigNode> {
        path.iter().try_fold(self, |node, key| node.get(key))
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Treat a node as a list of entries: a sequence yields its elements,
    /// any other node yields itself. Config authors mix both shapes.
    pub fn entries(&self) -> Vec<&ConfigNode> {
        match self {
            ConfigNode::Sequence(items) => items.iter().collect(),
            other => vec![other],
        }
    }

    /// Mapping entries of a node; empty for anything that is not a mapping.
    pub fn map_iter(&self) -> impl Iterator<Item = (&str, &ConfigNode)> {
        self.as_mapping().into_iter().flat_map(|m| m.iter())
    }
}
