//! Built-in event sets for the four recognized dotted-prefix families
//! (http., llm., db., task.). Callers register these explicitly; nothing
//! forces them on, and a definitions file can shadow them by registering a
//! set with higher priority.

use crate::sets::model::{EventMapping, EventSet, FieldMapping};
use crate::sets::transform::Transform;
use serde_json::{Value, json};
use std::collections::BTreeMap;

pub fn builtin_event_sets() -> Vec<EventSet> {
    vec![http_set(), llm_set(), db_set(), task_set()]
}

fn http_set() -> EventSet {
    let mut status = EventMapping::new("http_status_code");
    status.visual_markers = markers(&[
        ("2xx", "OK"),
        ("3xx", "REDIRECT"),
        ("4xx", "WARN"),
        ("5xx", "ERROR"),
    ]);
    // One transform entry per code we expect to see; the class bucket is
    // what the marker and metadata tables are keyed by.
    for code in [
        "200", "201", "202", "204", "301", "302", "304", "400", "401", "403", "404", "409", "422",
        "429", "500", "502", "503", "504",
    ] {
        status
            .transformations
            .insert(code.to_string(), Transform::HttpStatusClass);
    }
    status.metadata_fields = BTreeMap::from([
        (
            "4xx".to_string(),
            meta(&[("status_class", json!("client_error"))]),
        ),
        (
            "5xx".to_string(),
            meta(&[("status_class", json!("server_error"))]),
        ),
    ]);

    let mut method = EventMapping::new("http_method");
    method.visual_markers = markers(&[
        ("get", "GET"),
        ("post", "POST"),
        ("put", "PUT"),
        ("patch", "PATCH"),
        ("delete", "DELETE"),
        ("head", "HEAD"),
        ("options", "OPTIONS"),
    ]);

    EventSet {
        name: "http".to_string(),
        priority: 100,
        mappings: vec![method, status],
        field_mappings: vec![FieldMapping {
            field: "http.route".to_string(),
            attributes: BTreeMap::from([("indexed".to_string(), json!(true))]),
        }],
    }
}

fn llm_set() -> EventSet {
    let mut provider = EventMapping::new("llm_provider");
    provider.visual_markers = markers(&[
        ("openai", "OPENAI"),
        ("anthropic", "ANTHROPIC"),
        ("google", "GOOGLE"),
        ("mistral", "MISTRAL"),
        ("default", "LLM"),
    ]);
    provider.metadata_fields = BTreeMap::from([
        (
            "openai".to_string(),
            meta(&[("llm_vendor", json!("openai"))]),
        ),
        (
            "anthropic".to_string(),
            meta(&[("llm_vendor", json!("anthropic"))]),
        ),
    ]);

    EventSet {
        name: "llm".to_string(),
        priority: 90,
        mappings: vec![provider],
        field_mappings: vec![FieldMapping {
            field: "llm.tokens".to_string(),
            attributes: BTreeMap::from([("aggregate".to_string(), json!("sum"))]),
        }],
    }
}

fn db_set() -> EventSet {
    let mut operation = EventMapping::new("db_operation");
    operation.visual_markers = markers(&[
        ("select", "SELECT"),
        ("insert", "INSERT"),
        ("update", "UPDATE"),
        ("delete", "DELETE"),
        ("default", "DB"),
    ]);

    EventSet {
        name: "db".to_string(),
        priority: 80,
        mappings: vec![operation],
        field_mappings: Vec::new(),
    }
}

fn task_set() -> EventSet {
    let mut status = EventMapping::new("task_status");
    status.visual_markers = markers(&[
        ("success", "OK"),
        ("failed", "FAIL"),
        ("retry", "RETRY"),
        ("timeout", "TIMEOUT"),
    ]);
    status.metadata_fields = BTreeMap::from([(
        "failed".to_string(),
        meta(&[("alert", json!(true))]),
    )]);

    EventSet {
        name: "task".to_string(),
        priority: 70,
        mappings: vec![status],
        field_mappings: Vec::new(),
    }
}

fn markers(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn meta(pairs: &[(&str, Value)]) -> BTreeMap<String, Value> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeSet;

    #[test]
    fn set_names_are_unique_and_priorities_descend() {
        let sets = builtin_event_sets();
        let names: BTreeSet<&str> = sets.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names.len(), sets.len());

        let priorities: Vec<i32> = sets.iter().map(|s| s.priority).collect();
        let mut sorted = priorities.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(priorities, sorted);
    }

    #[test]
    fn lookup_keys_are_lower_cased() {
        for set in builtin_event_sets() {
            for mapping in &set.mappings {
                for key in mapping
                    .visual_markers
                    .keys()
                    .chain(mapping.transformations.keys())
                    .chain(mapping.metadata_fields.keys())
                {
                    assert_eq!(key, &key.to_lowercase(), "key {:?} in {}", key, mapping.name);
                }
            }
        }
    }

    #[test]
    fn status_code_transform_covers_common_errors() {
        let sets = builtin_event_sets();
        let http = &sets[0];
        let status = http
            .mappings
            .iter()
            .find(|m| m.name == "http_status_code")
            .unwrap();
        assert!(status.transformations.contains_key("404"));
        assert!(status.transformations.contains_key("500"));
        assert_eq!(status.visual_markers.get("5xx"), Some(&"ERROR".to_string()));
    }
}
