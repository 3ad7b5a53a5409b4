//! Attribute extraction: evaluate one descriptor path against one profile
//! document and coerce the result to the declared type.
//!
//! Path evaluation is delegated to `serde_json_path` (RFC 9535). A definite
//! path must select exactly one node. An indefinite path (wildcard, descendant,
//! filter, slice or union) yields the array of everything it selected.

use std::collections::BTreeSet;

use serde_json::{Value, json};
use serde_json_path::JsonPath;

use crate::domain::{AttributeDescriptor, AttributeValue, ErrorPolicy, ValueKind};
use crate::error::{ProfileError, ProfileResult};

/// A parsed remote document, owned by a single resolution call.
///
/// An empty or unparseable body is kept as a failure so each descriptor
/// evaluated against it fails (and is classified) on its own.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileDocument {
    root: Result<Value, String>,
}

impl ProfileDocument {
    pub fn parse(raw: &str) -> Self {
        let root = if raw.trim().is_empty() {
            Err("empty document".to_string())
        } else {
            serde_json::from_str(raw).map_err(|e| format!("invalid json document: {e}"))
        };
        Self { root }
    }

    pub fn from_value(value: Value) -> Self {
        Self { root: Ok(value) }
    }

    /// Re-root a list-wrapped response (`{"data": [p0, ...]}`) as `{"data": p0}`
    /// so single-object paths apply unchanged.
    pub fn first_of_list(raw: &str) -> Self {
        let root = Self::parse(raw).root.and_then(|value| match value.pointer("/data/0") {
            Some(first) => Ok(json!({ "data": first })),
            None => Err("response has no data[0] element".to_string()),
        });
        Self { root }
    }

    pub fn root(&self) -> Option<&Value> {
        self.root.as_ref().ok()
    }

    /// Evaluate `path` and return the selected value.
    pub fn select(&self, path: &str) -> Result<Value, String> {
        let root = self.root.as_ref().map_err(|e| e.clone())?;
        evaluate(root, path)
    }
}

pub fn evaluate(root: &Value, path: &str) -> Result<Value, String> {
    let compiled = JsonPath::parse(path).map_err(|e| format!("invalid path: {e}"))?;
    let nodes = compiled.query(root).all();

    if !is_definite(path) {
        return Ok(Value::Array(nodes.into_iter().cloned().collect()));
    }
    match nodes.as_slice() {
        [single] => Ok((*single).clone()),
        [] => Err("path not found".to_string()),
        many => Err(format!("definite path matched {} nodes", many.len())),
    }
}

/// Whether `path` can select at most one node.
pub fn is_definite(path: &str) -> bool {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut prev = None;
    for c in path.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None => match c {
                '\'' | '"' => quote = Some(c),
                '.' if prev == Some('.') => return false,
                '[' => depth += 1,
                ']' => depth = depth.saturating_sub(1),
                '*' => return false,
                '?' | ':' | ',' if depth > 0 => return false,
                _ => {}
            },
        }
        prev = if quote.is_some() { None } else { Some(c) };
    }
    true
}

/// Coerce a selected value to `kind`. `Ok(None)` means "treat as absent".
pub fn coerce(value: Value, kind: ValueKind) -> Result<Option<AttributeValue>, String> {
    match kind {
        ValueKind::String => match value {
            Value::Null => Ok(None),
            Value::String(s) => Ok(Some(AttributeValue::String(s))),
            other => Err(format!("expected string, found {}", type_name(&other))),
        },
        // A present-but-null flag is `false`, not absent.
        ValueKind::Boolean => match value {
            Value::Null => Ok(Some(AttributeValue::Boolean(false))),
            Value::Bool(b) => Ok(Some(AttributeValue::Boolean(b))),
            Value::String(s) => Ok(Some(AttributeValue::Boolean(s.eq_ignore_ascii_case("true")))),
            other => Ok(Some(AttributeValue::Boolean(other.to_string().eq_ignore_ascii_case("true")))),
        },
        ValueKind::StringSet => match value {
            Value::Array(items) => {
                let set: BTreeSet<String> = items
                    .into_iter()
                    .map(|item| match item {
                        Value::String(s) => s,
                        other => other.to_string(),
                    })
                    .collect();
                Ok(Some(AttributeValue::StringSet(set)))
            }
            other => Err(format!("expected array, found {}", type_name(&other))),
        },
        ValueKind::Opaque => match value {
            Value::Null => Ok(None),
            other => Ok(Some(AttributeValue::Opaque(other))),
        },
    }
}

/// Resolve one descriptor against one document under `policy`.
pub fn extract(
    document: &ProfileDocument,
    descriptor: &AttributeDescriptor,
    policy: ErrorPolicy,
) -> ProfileResult<Option<AttributeValue>> {
    match document
        .select(&descriptor.path)
        .and_then(|value| coerce(value, descriptor.kind))
    {
        Ok(value) => Ok(value),
        Err(cause) => {
            tracing::debug!(
                attribute = %descriptor.name,
                path = %descriptor.path,
                %cause,
                ignored = policy.ignores(),
                "attribute resolution failed"
            );
            if policy.ignores() {
                Ok(None)
            } else {
                Err(ProfileError::AttributeResolution {
                    attribute: descriptor.name.clone(),
                    path: descriptor.path.clone(),
                    cause,
                })
            }
        }
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
