//! Per-event enrichment: merge registered event sets, match fields to
//! mappings, attach markers and metadata, decorate the message.
//!
//! The resolver keeps two merged views rebuilt by [`Resolver::resolve`]:
//! a flat list of field mappings and a per-set list of event mappings.
//! Both preserve the registry's priority order; matching is a
//! first-match-wins linear scan (set order, then in-set order), which the
//! small rule-table sizes make cheap.

use crate::Result;
use crate::event::{EVENT_KEY, LogEvent, value_key};
use crate::registry::{Registry, SharedRegistry};
use crate::sets::{EventMapping, FieldMapping};

use anyhow::anyhow;
use serde_json::Value;
use std::sync::{Arc, Mutex, OnceLock, RwLock};

/// Dotted field-key families recognized by the prefix rule: a key like
/// "http.status_code" may match a mapping named "http_status_code".
const DOTTED_FAMILIES: [(&str, &str); 4] = [
    ("http.", "http_"),
    ("llm.", "llm_"),
    ("db.", "db_"),
    ("task.", "task_"),
];

pub struct Resolver {
    registry: SharedRegistry,
    /// Flattened across all sets, in set order.
    field_mappings: Vec<FieldMapping>,
    /// (set name, its mappings), in the registry's priority order. A Vec
    /// rather than a map so iteration keeps that order.
    event_mappings_by_set: Vec<(String, Vec<EventMapping>)>,
    resolved: bool,
}

impl Resolver {
    pub fn new(registry: SharedRegistry) -> Self {
        Self {
            registry,
            field_mappings: Vec::new(),
            event_mappings_by_set: Vec::new(),
            resolved: false,
        }
    }

    /// Discard and rebuild the merged tables from the current registry
    /// contents. Idempotent; call again after changing the registry to
    /// pick up new sets (enrichment does not re-resolve on its own).
    pub fn resolve(&mut self) -> Result<()> {
        let registry = self
            .registry
            .read()
            .map_err(|_| anyhow!("event set registry lock poisoned"))?;

        self.field_mappings.clear();
        self.event_mappings_by_set.clear();

        for set in registry.list_event_sets() {
            self.event_mappings_by_set
                .push((set.name.clone(), set.mappings.clone()));
            self.field_mappings.extend(set.field_mappings.iter().cloned());
        }

        self.resolved = true;
        Ok(())
    }

    /// Flat view of every set's field mappings, for downstream consumers.
    pub fn field_mappings(&self) -> &[FieldMapping] {
        &self.field_mappings
    }

    /// First mapping whose name matches the field key: exact simple-key
    /// match (substring after the last '.'), exact full-key match, or the
    /// recognized dotted-prefix rule. Scan order is set order then in-set
    /// order, so higher-priority sets win.
    fn find_mapping(&self, field_key: &str) -> Option<&EventMapping> {
        let simple_key = field_key.rsplit('.').next().unwrap_or(field_key);

        for (_set_name, mappings) in &self.event_mappings_by_set {
            for mapping in mappings {
                if mapping.name == simple_key || mapping.name == field_key {
                    return Some(mapping);
                }
                let dotted = DOTTED_FAMILIES.iter().any(|(dot_prefix, flat_prefix)| {
                    field_key.starts_with(dot_prefix)
                        && mapping.name.starts_with(flat_prefix)
                        && field_key.replace('.', "_") == mapping.name
                });
                if dotted {
                    return Some(mapping);
                }
            }
        }
        None
    }

    /// Enrich one field: look up its mapping, derive the marker, and merge
    /// any metadata into the event (never overwriting existing fields).
    /// Returns the marker when one applies.
    fn process_field(
        &self,
        field_key: &str,
        field_value: &Value,
        event: &mut LogEvent,
    ) -> Option<String> {
        let mapping = self.find_mapping(field_key)?;
        let value_str = resolved_value_key(mapping, field_value);
        let marker = marker_for(mapping, &value_str);

        if let Some(extra) = mapping.metadata_fields.get(&value_str) {
            for (key, value) in extra {
                event.entry(key.clone()).or_insert_with(|| value.clone());
            }
        }

        marker
    }

    /// Prepend collected markers to the message: each wrapped in brackets,
    /// concatenated without separators, then one space before the original
    /// message (if any).
    fn apply_visual_enrichments(&self, markers: &[String], event: &mut LogEvent) {
        if markers.is_empty() {
            return;
        }

        let mut prefix = String::new();
        for marker in markers {
            prefix.push('[');
            prefix.push_str(marker);
            prefix.push(']');
        }

        let message = event
            .get(EVENT_KEY)
            .and_then(Value::as_str)
            .unwrap_or("")
            .to_string();
        let decorated = if message.is_empty() {
            prefix
        } else {
            format!("{} {}", prefix, message)
        };
        event.insert(EVENT_KEY.to_string(), Value::String(decorated));
    }

    /// Enrich a log event in place. Resolves lazily on first use.
    ///
    /// Fields are visited via a snapshot (metadata may be added
    /// mid-iteration) in insertion order; the message field and null
    /// values are skipped. Markers keep discovery order, duplicates
    /// included.
    pub fn enrich_event(&mut self, event: &mut LogEvent) -> Result<()> {
        if !self.resolved {
            self.resolve()?;
        }

        let snapshot: Vec<(String, Value)> = event
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        let mut markers = Vec::new();
        for (key, value) in &snapshot {
            if key == EVENT_KEY || value.is_null() {
                continue;
            }
            if let Some(marker) = self.process_field(key, value, event) {
                markers.push(marker);
            }
        }

        self.apply_visual_enrichments(&markers, event);
        Ok(())
    }

    /// Read-only preview: the markers `enrich_event` would collect, with
    /// no metadata merge and no message rewrite.
    pub fn get_visual_markers(&mut self, event: &LogEvent) -> Result<Vec<String>> {
        if !self.resolved {
            self.resolve()?;
        }

        let mut markers = Vec::new();
        for (key, value) in event {
            if key == EVENT_KEY || value.is_null() {
                continue;
            }
            if let Some(mapping) = self.find_mapping(key) {
                let value_str = resolved_value_key(mapping, value);
                if let Some(marker) = marker_for(mapping, &value_str) {
                    markers.push(marker);
                }
            }
        }
        Ok(markers)
    }
}

/// Lower-cased lookup key for a field value, after applying the mapping's
/// transformation when one is keyed by the raw value. A transform that
/// does not fit the value's shape is skipped rather than failing the call.
fn resolved_value_key(mapping: &EventMapping, field_value: &Value) -> String {
    let value_str = value_key(field_value);
    if let Some(transform) = mapping.transformations.get(&value_str) {
        if let Some(transformed) = transform.apply(field_value) {
            return value_key(&transformed);
        }
    }
    value_str
}

/// Marker lookup: exact value key, then the mapping's default key. An
/// empty marker string counts as no marker.
fn marker_for(mapping: &EventMapping, value_str: &str) -> Option<String> {
    let marker = mapping
        .visual_markers
        .get(value_str)
        .or_else(|| mapping.visual_markers.get(&mapping.default_key))?;
    if marker.is_empty() {
        return None;
    }
    Some(marker.clone())
}

static GLOBAL_REGISTRY: OnceLock<SharedRegistry> = OnceLock::new();
static GLOBAL_RESOLVER: OnceLock<Mutex<Resolver>> = OnceLock::new();

/// Process-wide registry backing the shared resolver.
pub fn global_registry() -> SharedRegistry {
    GLOBAL_REGISTRY
        .get_or_init(|| Arc::new(RwLock::new(Registry::new())))
        .clone()
}

/// Process-wide resolver, lock-guarded because the hosting logging
/// framework may emit from multiple threads.
pub fn get_resolver() -> &'static Mutex<Resolver> {
    GLOBAL_RESOLVER.get_or_init(|| Mutex::new(Resolver::new(global_registry())))
}

/// Convenience wrapper over the shared resolver.
pub fn enrich_event(event: &mut LogEvent) -> Result<()> {
    let mut resolver = get_resolver()
        .lock()
        .map_err(|_| anyhow!("resolver lock poisoned"))?;
    resolver.enrich_event(event)
}
