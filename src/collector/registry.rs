//! Explicit registry of per-kind collectors.

use super::{CollectError, KindCollector, RegistryError};

/// The set of collectors served on one scrape endpoint.
///
/// Built once at startup and handed to whatever serves the text.
#[derive(Default)]
pub struct CollectorRegistry {
    collectors: Vec<Box<dyn KindCollector>>,
}

impl CollectorRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a collector. Each kind may be registered once.
    pub fn register(&mut self, collector: Box<dyn KindCollector>) -> Result<(), RegistryError> {
        let kind = collector.kind();
        if self.collectors.iter().any(|c| c.kind() == kind) {
            return Err(RegistryError::DuplicateKind(kind.to_string()));
        }
        tracing::info!(kind, "Registered collector");
        self.collectors.push(collector);
        Ok(())
    }

    /// Registered kinds, in registration order.
    pub fn kinds(&self) -> Vec<&'static str> {
        self.collectors.iter().map(|c| c.kind()).collect()
    }

    /// Number of registered collectors.
    pub fn len(&self) -> usize {
        self.collectors.len()
    }

    /// Returns true if no collector is registered.
    pub fn is_empty(&self) -> bool {
        self.collectors.is_empty()
    }

    /// Runs every collector and concatenates their output.
    ///
    /// The first failing kind fails the whole gather.
    pub fn gather(&self) -> Result<String, CollectError> {
        let mut out = String::new();
        for collector in &self.collectors {
            out.push_str(&collector.collect()?);
        }
        Ok(out)
    }
}
