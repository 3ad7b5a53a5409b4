//! Terminal output for `vpc`.
//!
//! Text formatting lives in `format`; JSON output is the serde shape of each
//! result, pretty-printed.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::domain::ResolvedAttributes;
use crate::error::AppError;

pub mod format;

pub use format::{format_associated, format_attributes, format_partner_detail, format_user_contexts};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_json_flag(json: bool) -> Self {
        if json { OutputFormat::Json } else { OutputFormat::Text }
    }
}

pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, AppError> {
    serde_json::to_string_pretty(value).map_err(|e| AppError::new(4, format!("failed to encode output: {e}")))
}

/// Resolved attributes as a JSON object in `names` order; absent values are `null`.
pub fn attributes_json(names: &[&str], resolved: &ResolvedAttributes) -> Value {
    let mut out = Map::new();
    for name in names {
        let value = resolved
            .get(name)
            .and_then(|v| serde_json::to_value(v).ok())
            .unwrap_or(Value::Null);
        out.insert((*name).to_string(), value);
    }
    Value::Object(out)
}
