//! Validated in-memory rule types.
//!
//! All lookup tables (`visual_markers`, `transformations`,
//! `metadata_fields`) are keyed by the lower-cased string form of a field
//! value; `spec::SetsSpec::validate_and_build` normalizes keys on load and
//! `builtin` constructs them lower-cased directly.

use crate::sets::Transform;
use serde_json::Value;
use std::collections::BTreeMap;

/// A named, prioritized bundle of rules contributed by one logical source
/// (e.g. the HTTP domain). Immutable once registered.
#[derive(Debug, Clone, PartialEq)]
pub struct EventSet {
    pub name: String,
    /// Higher priority sets are consulted first.
    pub priority: i32,
    pub mappings: Vec<EventMapping>,
    pub field_mappings: Vec<FieldMapping>,
}

/// One rule, scoped to a field-name family (e.g. "http_method"): how to
/// turn that field's value into a visual marker and optional metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct EventMapping {
    /// Matched against log field keys (exact, simple-key, or dotted form).
    pub name: String,
    /// value key -> marker text (rendered as `[marker]` in the message).
    pub visual_markers: BTreeMap<String, String>,
    /// Fallback key into `visual_markers` when the exact value is absent.
    pub default_key: String,
    /// value key -> transform applied before the marker/metadata lookup.
    pub transformations: BTreeMap<String, Transform>,
    /// value key -> extra fields merged into the event (never overwriting).
    pub metadata_fields: BTreeMap<String, BTreeMap<String, Value>>,
}

impl EventMapping {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            visual_markers: BTreeMap::new(),
            default_key: "default".to_string(),
            transformations: BTreeMap::new(),
            metadata_fields: BTreeMap::new(),
        }
    }
}

/// Opaque per-field augmentation record. The resolver aggregates these
/// across sets for downstream consumers but never interprets them.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FieldMapping {
    pub field: String,

    #[serde(default)]
    pub attributes: BTreeMap<String, Value>,
}
