//! Event set layer: rule data model + JSON definitions + built-ins.
//!
//! This module is intentionally separate from the resolver. It owns:
//! - the in-memory rule types (EventSet, EventMapping, FieldMapping)
//! - value transforms (tagged enum, declarable from JSON)
//! - the definitions-file schema and its validation
//! - the built-in http/llm/db/task rule sets

pub mod builtin;
pub mod model;
pub mod spec;
pub mod transform;

pub use builtin::builtin_event_sets;
pub use model::{EventMapping, EventSet, FieldMapping};
pub use spec::{SetsSpec, load_sets_file};
pub use transform::Transform;
