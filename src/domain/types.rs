//! Attribute descriptors and resolved values.

use std::collections::{BTreeSet, HashMap};

use serde::Serialize;
use serde_json::Value;

/// Declared type of an attribute; drives coercion of the raw JSON value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ValueKind {
    /// JSON string, taken verbatim (empty string is a found value).
    String,
    /// `null` means `false`; strings are parsed case-insensitively.
    Boolean,
    /// JSON array, every element stringified.
    StringSet,
    /// Raw JSON value, left for the caller to convert.
    Opaque,
}

/// A named rule mapping a logical field to a path and an expected type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AttributeDescriptor {
    pub name: String,
    pub path: String,
    pub kind: ValueKind,
}

impl AttributeDescriptor {
    pub fn new(name: impl Into<String>, path: impl Into<String>, kind: ValueKind) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            kind,
        }
    }
}

/// A successfully coerced attribute value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AttributeValue {
    String(String),
    Boolean(bool),
    StringSet(BTreeSet<String>),
    Opaque(Value),
}

impl AttributeValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttributeValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_set(&self) -> Option<&BTreeSet<String>> {
        match self {
            AttributeValue::StringSet(set) => Some(set),
            _ => None,
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            AttributeValue::Opaque(v) => Some(v),
            _ => None,
        }
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            AttributeValue::String(_) => ValueKind::String,
            AttributeValue::Boolean(_) => ValueKind::Boolean,
            AttributeValue::StringSet(_) => ValueKind::StringSet,
            AttributeValue::Opaque(_) => ValueKind::Opaque,
        }
    }
}

impl std::fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttributeValue::String(s) => write!(f, "{s}"),
            AttributeValue::Boolean(b) => write!(f, "{b}"),
            AttributeValue::StringSet(set) => {
                let items: Vec<&str> = set.iter().map(String::as_str).collect();
                write!(f, "[{}]", items.join(", "))
            }
            AttributeValue::Opaque(v) => write!(f, "{v}"),
        }
    }
}

/// What a read path does with a failure: raise it, or degrade to absent/empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    #[default]
    Propagate,
    Ignore,
}

impl ErrorPolicy {
    pub fn from_ignore_flag(ignore_errors: bool) -> Self {
        if ignore_errors {
            ErrorPolicy::Ignore
        } else {
            ErrorPolicy::Propagate
        }
    }

    pub fn ignores(self) -> bool {
        self == ErrorPolicy::Ignore
    }
}

/// Result map of a batch resolution: attribute name to present/absent value.
///
/// Every requested descriptor has an entry; absence covers both "not found"
/// and "failed but suppressed".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedAttributes {
    entries: HashMap<String, Option<AttributeValue>>,
}

impl ResolvedAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: Option<AttributeValue>) {
        self.entries.insert(name.into(), value);
    }

    /// The value for `name`, if the entry exists and is present.
    pub fn get(&self, name: &str) -> Option<&AttributeValue> {
        self.entries.get(name).and_then(Option::as_ref)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(AttributeValue::as_str)
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(AttributeValue::as_bool)
    }

    /// Whether an entry (present or absent) exists for `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn absent_count(&self) -> usize {
        self.entries.values().filter(|v| v.is_none()).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&AttributeValue>)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_ref()))
    }
}
