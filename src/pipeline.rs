//! Minimal processor chain.
//!
//! The hosting logging setup assembles an ordered list of processors,
//! each of which may mutate the event's fields before emission. Only the
//! chain mechanics and the enrichment stage live here; rendering,
//! timestamping and exporters are someone else's concern.

use crate::Result;
use crate::event::LogEvent;
use crate::registry::SharedRegistry;
use crate::resolver::Resolver;

use anyhow::Context;

pub trait Processor {
    fn name(&self) -> &str;

    /// Mutate the event in place. A failing processor fails the log call.
    fn process(&mut self, event: &mut LogEvent) -> Result<()>;
}

/// Runs processors in registration order.
#[derive(Default)]
pub struct Pipeline {
    processors: Vec<Box<dyn Processor>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, processor: Box<dyn Processor>) {
        self.processors.push(processor);
    }

    pub fn with(mut self, processor: Box<dyn Processor>) -> Self {
        self.push(processor);
        self
    }

    pub fn run(&mut self, event: &mut LogEvent) -> Result<()> {
        for processor in &mut self.processors {
            let name = processor.name().to_string();
            processor
                .process(event)
                .with_context(|| format!("processor '{}' failed", name))?;
        }
        Ok(())
    }
}

/// Event-set enrichment packaged as one chain stage.
pub struct EnrichmentProcessor {
    resolver: Resolver,
}

impl EnrichmentProcessor {
    pub fn new(registry: SharedRegistry) -> Self {
        Self {
            resolver: Resolver::new(registry),
        }
    }
}

impl Processor for EnrichmentProcessor {
    fn name(&self) -> &str {
        "event_set_enrichment"
    }

    fn process(&mut self, event: &mut LogEvent) -> Result<()> {
        self.resolver.enrich_event(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Registry;
    use crate::sets::builtin_event_sets;
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};

    struct Tag(&'static str);

    impl Processor for Tag {
        fn name(&self) -> &str {
            "tag"
        }

        fn process(&mut self, event: &mut LogEvent) -> Result<()> {
            event
                .entry("trace".to_string())
                .or_insert_with(|| Value::Array(Vec::new()));
            if let Some(Value::Array(items)) = event.get_mut("trace") {
                items.push(json!(self.0));
            }
            Ok(())
        }
    }

    #[test]
    fn runs_processors_in_order() {
        let mut pipeline = Pipeline::new()
            .with(Box::new(Tag("first")))
            .with(Box::new(Tag("second")));

        let mut event = LogEvent::new();
        pipeline.run(&mut event).unwrap();
        assert_eq!(event.get("trace"), Some(&json!(["first", "second"])));
    }

    #[test]
    fn enrichment_stage_decorates_events() {
        let mut registry = Registry::new();
        registry.register_all(builtin_event_sets()).unwrap();

        let mut pipeline =
            Pipeline::new().with(Box::new(EnrichmentProcessor::new(registry.into_shared())));

        let mut event = LogEvent::new();
        event.insert("event".to_string(), json!("fetch done"));
        event.insert("http.method".to_string(), json!("GET"));
        event.insert("http.status_code".to_string(), json!(200));
        pipeline.run(&mut event).unwrap();

        assert_eq!(event.get("event"), Some(&json!("[GET][OK] fetch done")));
    }
}
