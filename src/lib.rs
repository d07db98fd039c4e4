//! logmark: event-set driven enrichment for structured log events.
//!
//! A log event is an insertion-ordered map of field name -> JSON value.
//! "Event sets" are prioritized bundles of rules that map field keys/values
//! to short visual markers (`[ERROR]`, `[SLOW]`, ...) and extra metadata.
//! The [`resolver::Resolver`] merges all registered sets into flat lookup
//! tables and decorates each event's message with the markers its fields
//! earned.
//!
//! Layering:
//! - `sets`: rule data model + JSON definitions + built-in rule sets
//! - `registry`: priority-ordered storage for registered event sets
//! - `resolver`: per-event matching, metadata merge, message decoration
//! - `pipeline`: minimal processor chain hosting the resolver

pub mod event;
pub mod pipeline;
pub mod registry;
pub mod resolver;
pub mod sets;

pub type Result<T> = anyhow::Result<T>;

pub use event::{EVENT_KEY, LogEvent};
pub use registry::{Registry, SharedRegistry};
pub use resolver::{Resolver, enrich_event, get_resolver, global_registry};
pub use sets::{EventMapping, EventSet, FieldMapping, Transform, builtin_event_sets};
