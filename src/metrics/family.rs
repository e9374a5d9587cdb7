//! Metric family descriptors and the samples they generate.

use std::fmt;

/// Prometheus metric type of a family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricKind {
    /// A value that can go up and down.
    Gauge,
    /// A monotonically increasing value.
    Counter,
}

impl MetricKind {
    /// Returns the name used on `# TYPE` lines.
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKind::Gauge => "gauge",
            MetricKind::Counter => "counter",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One observation within a family.
///
/// Only the labels specific to the observation are carried here. The
/// family name comes from the [`FamilyGenerator`] that produced the sample
/// and the identity labels (`namespace`, kind) are added by the collector.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    /// Extra labels, e.g. `revision` or `label_<key>`.
    pub labels: Vec<(String, String)>,
    /// Sample value.
    pub value: f64,
}

impl Sample {
    /// Creates a sample without extra labels.
    pub fn new(value: f64) -> Self {
        Self {
            labels: Vec::new(),
            value,
        }
    }

    /// Creates a sample carrying a single extra label.
    pub fn with_label(name: impl Into<String>, value: impl Into<String>, sample: f64) -> Self {
        Self {
            labels: vec![(name.into(), value.into())],
            value: sample,
        }
    }
}

type GenerateFn<R> = dyn Fn(&R) -> Vec<Sample> + Send + Sync;

/// Static description of a metric family plus the function that
/// derives its samples from one resource.
///
/// Name, help and kind are fixed when the descriptor is built and never
/// depend on the resource being rendered.
pub struct FamilyGenerator<R> {
    name: String,
    help: String,
    kind: MetricKind,
    generate: Box<GenerateFn<R>>,
}

impl<R> FamilyGenerator<R> {
    /// Creates a family descriptor.
    pub fn new<F>(
        name: impl Into<String>,
        help: impl Into<String>,
        kind: MetricKind,
        generate: F,
    ) -> Self
    where
        F: Fn(&R) -> Vec<Sample> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            help: help.into(),
            kind,
            generate: Box::new(generate),
        }
    }

    /// Creates a gauge family descriptor.
    pub fn gauge<F>(name: impl Into<String>, help: impl Into<String>, generate: F) -> Self
    where
        F: Fn(&R) -> Vec<Sample> + Send + Sync + 'static,
    {
        Self::new(name, help, MetricKind::Gauge, generate)
    }

    /// Family name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Help text.
    pub fn help(&self) -> &str {
        &self.help
    }

    /// Metric type.
    pub fn kind(&self) -> MetricKind {
        self.kind
    }

    /// Derives the samples of this family for one resource.
    pub fn generate(&self, resource: &R) -> Vec<Sample> {
        (self.generate)(resource)
    }
}

impl<R> fmt::Debug for FamilyGenerator<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FamilyGenerator")
            .field("name", &self.name)
            .field("help", &self.help)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}
