//! Value transforms.
//!
//! A mapping can rewrite a field value before the marker/metadata lookup,
//! e.g. collapsing an HTTP status code into its class bucket so one
//! marker entry covers all of 4xx. Transforms are a tagged enum rather
//! than stored closures so definitions files can declare them:
//!
//! { "op": "http_status_class" }
//! { "op": "map_to", "value": "redacted" }
//! { "op": "strip_prefix", "prefix": "models/" }

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Transform {
    /// 100..=599 -> "1xx".."5xx". Accepts numbers or numeric strings.
    HttpStatusClass,
    Lowercase,
    Uppercase,
    /// Replace the value outright.
    MapTo { value: String },
    StripPrefix { prefix: String },
}

impl Transform {
    /// Apply the transform to a field value.
    ///
    /// Returns None when the transform does not fit the value's shape
    /// (e.g. `strip_prefix` on a number); the caller then falls back to
    /// the untransformed value instead of failing the log call.
    pub fn apply(&self, value: &Value) -> Option<Value> {
        match self {
            Transform::HttpStatusClass => {
                let code = value
                    .as_u64()
                    .or_else(|| value.as_str()?.trim().parse().ok())?;
                if !(100..=599).contains(&code) {
                    return None;
                }
                Some(Value::String(format!("{}xx", code / 100)))
            }
            Transform::Lowercase => Some(Value::String(value.as_str()?.to_lowercase())),
            Transform::Uppercase => Some(Value::String(value.as_str()?.to_uppercase())),
            Transform::MapTo { value: target } => Some(Value::String(target.clone())),
            Transform::StripPrefix { prefix } => value
                .as_str()?
                .strip_prefix(prefix.as_str())
                .map(|rest| Value::String(rest.to_string())),
        }
    }
}
