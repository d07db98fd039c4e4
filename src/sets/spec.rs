//! Definitions file (sets.json): serde-friendly raw shapes + validation.
//!
//! JSON shape:
//! {
//!   "sets": [
//!     {
//!       "name": "http",
//!       "priority": 100,
//!       "mappings": [
//!         {
//!           "name": "http_status_code",
//!           "visual_markers": { "4xx": "WARN", "5xx": "ERROR" },
//!           "default_key": "default",
//!           "transformations": { "404": { "op": "http_status_class" } },
//!           "metadata_fields": { "5xx": { "status_class": "server_error" } }
//!         }
//!       ],
//!       "field_mappings": [
//!         { "field": "http.route", "attributes": { "indexed": true } }
//!       ]
//!     }
//!   ]
//! }
//!
//! We validate names, then normalize every lookup-table key to lower case
//! (the resolver looks values up by their lower-cased string form).

use crate::Result;
use crate::sets::model::{EventMapping, EventSet, FieldMapping};
use crate::sets::transform::Transform;

use anyhow::{Context, bail};
use serde::Deserialize;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;

#[derive(Debug, Clone, Deserialize)]
pub struct SetsSpec {
    #[serde(default)]
    pub sets: Vec<RawEventSet>,
}

/// Raw event set shape as it appears in sets.json.
#[derive(Debug, Clone, Deserialize)]
pub struct RawEventSet {
    pub name: String,

    #[serde(default)]
    pub priority: i32,

    #[serde(default)]
    pub mappings: Vec<RawMapping>,

    #[serde(default)]
    pub field_mappings: Vec<FieldMapping>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawMapping {
    pub name: String,

    #[serde(default)]
    pub visual_markers: BTreeMap<String, String>,

    #[serde(default = "default_marker_key")]
    pub default_key: String,

    #[serde(default)]
    pub transformations: BTreeMap<String, Transform>,

    #[serde(default)]
    pub metadata_fields: BTreeMap<String, BTreeMap<String, Value>>,
}

fn default_marker_key() -> String {
    "default".to_string()
}

impl SetsSpec {
    /// Validate all raw sets and build the in-memory rule types:
    /// - set names unique and non-empty
    /// - mapping names non-empty, unique within their set
    /// - lookup-table keys normalized to lower case (collisions rejected)
    pub fn validate_and_build(&self) -> Result<Vec<EventSet>> {
        let mut seen_sets = BTreeSet::new();
        let mut out = Vec::new();

        for raw_set in &self.sets {
            let set_name = raw_set.name.trim();
            if set_name.is_empty() {
                bail!("event set with empty name in definitions");
            }
            if !seen_sets.insert(set_name.to_string()) {
                bail!("duplicate event set name in definitions: {}", set_name);
            }

            let mut seen_mappings = BTreeSet::new();
            let mut mappings = Vec::new();
            for raw in &raw_set.mappings {
                let name = raw.name.trim();
                if name.is_empty() {
                    bail!("event set '{}' has a mapping with an empty name", set_name);
                }
                if !seen_mappings.insert(name.to_string()) {
                    bail!(
                        "event set '{}' has duplicate mapping name '{}'",
                        set_name,
                        name
                    );
                }

                mappings.push(EventMapping {
                    name: name.to_string(),
                    visual_markers: lowercase_keys(&raw.visual_markers, set_name, name)?,
                    default_key: raw.default_key.to_lowercase(),
                    transformations: lowercase_keys(&raw.transformations, set_name, name)?,
                    metadata_fields: lowercase_keys(&raw.metadata_fields, set_name, name)?,
                });
            }

            out.push(EventSet {
                name: set_name.to_string(),
                priority: raw_set.priority,
                mappings,
                field_mappings: raw_set.field_mappings.clone(),
            });
        }

        Ok(out)
    }
}

fn lowercase_keys<V: Clone>(
    table: &BTreeMap<String, V>,
    set_name: &str,
    mapping_name: &str,
) -> Result<BTreeMap<String, V>> {
    let mut out = BTreeMap::new();
    for (key, value) in table {
        if out.insert(key.to_lowercase(), value.clone()).is_some() {
            bail!(
                "event set '{}' mapping '{}' has keys that collide after lower-casing: {}",
                set_name,
                mapping_name,
                key
            );
        }
    }
    Ok(out)
}

/// Read, parse and validate a definitions file.
pub fn load_sets_file(path: &str) -> Result<Vec<EventSet>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("read event set definitions {}", path))?;
    let spec: SetsSpec = serde_json::from_str(&text)
        .with_context(|| format!("parse event set definitions {}", path))?;
    spec.validate_and_build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(text: &str) -> SetsSpec {
        serde_json::from_str(text).unwrap()
    }

    #[test]
    fn builds_sets_with_defaults_filled_in() {
        let spec = parse(
            r#"{
                "sets": [
                    {
                        "name": "http",
                        "priority": 100,
                        "mappings": [
                            {
                                "name": "http_method",
                                "visual_markers": { "GET": "GET", "Post": "POST" }
                            }
                        ]
                    }
                ]
            }"#,
        );

        let sets = spec.validate_and_build().unwrap();
        assert_eq!(sets.len(), 1);
        assert_eq!(sets[0].name, "http");
        assert_eq!(sets[0].priority, 100);

        let mapping = &sets[0].mappings[0];
        assert_eq!(mapping.default_key, "default");
        // Keys are normalized to lower case on load.
        assert_eq!(mapping.visual_markers.get("get"), Some(&"GET".to_string()));
        assert_eq!(mapping.visual_markers.get("post"), Some(&"POST".to_string()));
        assert!(mapping.visual_markers.get("GET").is_none());
    }

    #[test]
    fn rejects_duplicate_set_names() {
        let spec = parse(r#"{ "sets": [ { "name": "a" }, { "name": "a" } ] }"#);
        let err = spec.validate_and_build().unwrap_err();
        assert!(err.to_string().contains("duplicate event set name"));
    }

    #[test]
    fn rejects_empty_mapping_name() {
        let spec = parse(r#"{ "sets": [ { "name": "a", "mappings": [ { "name": "  " } ] } ] }"#);
        let err = spec.validate_and_build().unwrap_err();
        assert!(err.to_string().contains("empty name"));
    }

    #[test]
    fn rejects_marker_keys_colliding_after_lowercase() {
        let spec = parse(
            r#"{
                "sets": [
                    {
                        "name": "a",
                        "mappings": [
                            {
                                "name": "status",
                                "visual_markers": { "OK": "x", "ok": "y" }
                            }
                        ]
                    }
                ]
            }"#,
        );
        let err = spec.validate_and_build().unwrap_err();
        assert!(err.to_string().contains("collide after lower-casing"));
    }

    #[test]
    fn parses_transformations_and_metadata() {
        let spec = parse(
            r#"{
                "sets": [
                    {
                        "name": "http",
                        "mappings": [
                            {
                                "name": "http_status_code",
                                "transformations": { "404": { "op": "http_status_class" } },
                                "metadata_fields": { "4XX": { "status_class": "client_error" } }
                            }
                        ]
                    }
                ]
            }"#,
        );

        let sets = spec.validate_and_build().unwrap();
        let mapping = &sets[0].mappings[0];
        assert_eq!(
            mapping.transformations.get("404"),
            Some(&Transform::HttpStatusClass)
        );
        assert!(mapping.metadata_fields.contains_key("4xx"));
    }
}
