//! Collection engine.
//!
//! A [`Collector`] pairs the family table of one resource kind with a
//! [`Lister`]. Each pass lists once, applies every enabled family to every
//! resource and renders the result:
//!
//! ```text
//! lister → resources → families × resources → samples → text
//! ```
//!
//! Families are rendered in declaration order, each preceded by its
//! `# HELP`/`# TYPE` preamble; within a family samples follow listing
//! order. A listing failure fails the whole pass and no text is produced.

mod registry;

pub use registry::CollectorRegistry;

use std::collections::HashSet;
use std::time::Instant;

use thiserror::Error;

use crate::config::Options;
use crate::metrics::labels::{is_valid_label_name, is_valid_metric_name};
use crate::metrics::render::{write_header, write_sample};
use crate::metrics::{FamilyGenerator, Telemetry};
use crate::resources::Resource;
use crate::store::{ListError, Lister};

/// Label carrying the resource namespace.
pub const NAMESPACE_LABEL: &str = "namespace";

/// Errors raised by a collection pass.
#[derive(Debug, Error)]
pub enum CollectError {
    /// The lister failed; no output is produced for the pass.
    #[error("failed to list {kind} resources: {source}")]
    List {
        /// Kind being collected.
        kind: &'static str,
        /// Lister error.
        #[source]
        source: ListError,
    },
}

/// Errors raised while assembling collectors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// A family name is not a valid metric name.
    #[error("invalid metric name: {0:?}")]
    InvalidMetricName(String),
    /// The kind is not usable as a label name.
    #[error("invalid kind label name: {0:?}")]
    InvalidKind(String),
    /// Two families share a name.
    #[error("family {0} registered twice")]
    DuplicateFamily(String),
    /// Two collectors share a kind.
    #[error("collector for kind {0} registered twice")]
    DuplicateKind(String),
}

/// Object-safe view of a collector, so kinds with different resource
/// types can share one registry.
pub trait KindCollector: Send + Sync {
    /// Kind label name, e.g. `statefulset`.
    fn kind(&self) -> &'static str;

    /// Runs one collection pass and returns the exposition text.
    fn collect(&self) -> Result<String, CollectError>;
}

/// Collector for one resource kind.
pub struct Collector<R, L> {
    families: Vec<FamilyGenerator<R>>,
    lister: L,
    options: Options,
    telemetry: Option<Telemetry>,
}

impl<R, L> Collector<R, L>
where
    R: Resource,
    L: Lister<R>,
{
    /// Creates a collector, dropping families disabled by `options`.
    ///
    /// Fails if a family name is not a valid metric name or appears twice.
    pub fn new(
        families: Vec<FamilyGenerator<R>>,
        lister: L,
        options: &Options,
    ) -> Result<Self, RegistryError> {
        if !is_valid_label_name(R::KIND) || R::KIND == NAMESPACE_LABEL {
            return Err(RegistryError::InvalidKind(R::KIND.to_string()));
        }

        let mut seen = HashSet::new();
        for family in &families {
            if !is_valid_metric_name(family.name()) {
                return Err(RegistryError::InvalidMetricName(family.name().to_string()));
            }
            if !seen.insert(family.name().to_string()) {
                return Err(RegistryError::DuplicateFamily(family.name().to_string()));
            }
        }

        let total = families.len();
        let families: Vec<_> = families
            .into_iter()
            .filter(|f| options.family_enabled(f.name()))
            .collect();
        tracing::debug!(
            kind = R::KIND,
            enabled = families.len(),
            disabled = total - families.len(),
            "Collector created"
        );

        Ok(Self {
            families,
            lister,
            options: options.clone(),
            telemetry: None,
        })
    }

    /// Records pass outcomes in `telemetry`.
    pub fn with_telemetry(mut self, telemetry: Telemetry) -> Self {
        self.telemetry = Some(telemetry);
        self
    }

    /// Enabled families, in exposition order.
    pub fn families(&self) -> &[FamilyGenerator<R>] {
        &self.families
    }

    /// Renders the exposition text for an already listed snapshot.
    pub fn render(&self, resources: &[R]) -> String {
        let mut out = String::new();

        for family in &self.families {
            write_header(&mut out, family.name(), family.help(), family.kind());

            for resource in resources {
                for sample in family.generate(resource) {
                    let mut labels = Vec::with_capacity(sample.labels.len() + 2);
                    labels.push((NAMESPACE_LABEL.to_string(), resource.namespace().to_string()));
                    labels.push((R::KIND.to_string(), resource.name().to_string()));
                    labels.extend(sample.labels);
                    labels.sort_by(|a, b| a.0.cmp(&b.0));

                    write_sample(&mut out, family.name(), &labels, sample.value);
                }
            }
        }

        out
    }
}

impl<R, L> KindCollector for Collector<R, L>
where
    R: Resource + Send + Sync,
    L: Lister<R>,
{
    fn kind(&self) -> &'static str {
        R::KIND
    }

    fn collect(&self) -> Result<String, CollectError> {
        let started = Instant::now();

        let resources = match self.lister.list() {
            Ok(resources) => resources,
            Err(source) => {
                tracing::warn!(kind = R::KIND, error = %source, "Listing resources failed");
                if let Some(telemetry) = &self.telemetry {
                    telemetry.record_failure(R::KIND);
                }
                return Err(CollectError::List {
                    kind: R::KIND,
                    source,
                });
            }
        };

        let listed = resources.len();
        let resources: Vec<R> = resources
            .into_iter()
            .filter(|r| self.options.namespace_enabled(r.namespace()))
            .collect();

        let output = self.render(&resources);

        tracing::debug!(
            kind = R::KIND,
            listed,
            collected = resources.len(),
            bytes = output.len(),
            "Collection pass finished"
        );
        if let Some(telemetry) = &self.telemetry {
            telemetry.record_success(R::KIND, resources.len(), started.elapsed());
        }

        Ok(output)
    }
}
