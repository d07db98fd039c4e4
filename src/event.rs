//! Log event representation.
//!
//! An event is a plain JSON object. `serde_json` is built with
//! `preserve_order`, so iterating an event yields fields in insertion
//! order; metadata merging relies on that (first writer wins when two
//! fields would set the same metadata key).

use serde_json::Value;

/// Field name -> value mapping for one emitted log event.
pub type LogEvent = serde_json::Map<String, Value>;

/// The key holding the human-readable message of an event.
pub const EVENT_KEY: &str = "event";

/// Lower-cased string form of a field value, used as the key into a
/// mapping's marker/transformation/metadata tables.
///
/// Strings are lower-cased directly; everything else goes through its JSON
/// rendering first (so 404 -> "404", true -> "true").
pub fn value_key(value: &Value) -> String {
    match value {
        Value::String(s) => s.to_lowercase(),
        other => other.to_string().to_lowercase(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn value_key_lowercases_strings_without_quoting() {
        assert_eq!(value_key(&json!("GET")), "get");
        assert_eq!(value_key(&json!("Anthropic")), "anthropic");
    }

    #[test]
    fn value_key_renders_scalars() {
        assert_eq!(value_key(&json!(404)), "404");
        assert_eq!(value_key(&json!(true)), "true");
        assert_eq!(value_key(&json!(1.5)), "1.5");
    }

    #[test]
    fn events_iterate_in_insertion_order() {
        let mut event = LogEvent::new();
        event.insert("zeta".to_string(), json!(1));
        event.insert("alpha".to_string(), json!(2));
        let keys: Vec<&str> = event.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);
    }
}
