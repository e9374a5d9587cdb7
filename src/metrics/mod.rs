//! Metric families, samples and their text rendering.
//!
//! A family is declared once per resource kind as a [`FamilyGenerator`]:
//! fixed name, help and type plus a function from one resource to its
//! samples. The helpers in [`extract`] cover the recurring field shapes:
//!
//! - `value` — always emitted, zero when the field is unset
//! - `optional` — emitted only when the field is present
//! - `timestamp` — Unix seconds, omitted when unset
//! - `label_valued` — string status as a `1` sample with the string as a label
//!
//! Resource labels go through [`labels`] so arbitrary keys become valid
//! `label_<key>` metric labels.
//!
//! # Example
//!
//! ```
//! use kube_state_exporter::metrics::{extract, render, FamilyGenerator};
//!
//! let family = FamilyGenerator::gauge("kube_example_size", "Example size.", |size: &Option<u32>| {
//!     extract::optional(size.map(f64::from))
//! });
//!
//! let mut out = String::new();
//! render::write_header(&mut out, family.name(), family.help(), family.kind());
//! for sample in family.generate(&Some(1_500_000_000)) {
//!     render::write_sample(&mut out, family.name(), &sample.labels, sample.value);
//! }
//! assert!(out.ends_with("kube_example_size 1.5e+09\n"));
//! ```
//!
//! The exporter's own metrics (list outcomes, pass durations) are kept
//! separately in [`Telemetry`].

pub mod extract;
mod family;
pub mod labels;
pub mod render;
#[cfg(feature = "server")]
mod server;
mod telemetry;

pub use family::{FamilyGenerator, MetricKind, Sample};
#[cfg(feature = "server")]
pub use server::{MetricsServer, ServerError};
pub use telemetry::{Telemetry, TelemetryError};
