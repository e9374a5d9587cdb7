//! Kube State Exporter Library
//!
//! Turns snapshots of cluster resources into Prometheus text exposition.
//! Each resource kind declares a table of metric families; a generic
//! collector lists the resources and renders every family for every
//! resource on each scrape.
//!
//! # Architecture
//!
//! The system follows an explicit data flow:
//!
//! ```text
//! store → collector → (families × resources) → samples → render
//!   ↑                                                       ↓
//! lister                               registry → scrape endpoint
//! ```
//!
//! # Design Principles
//!
//! - **Unset is not zero**: optional fields that were never reported emit
//!   no sample; counters with a meaningful zero always emit
//! - **No partial output**: a failed listing fails the whole pass
//! - **No global state**: collectors live in an explicitly built registry
//! - **Deterministic text**: families in declaration order, labels sorted
//!
//! # Example
//!
//! ```
//! use kube_state_exporter::{
//!     collector::CollectorRegistry,
//!     config::Options,
//!     resources::{statefulset, ObjectMeta, StatefulSet},
//!     store::StaticStore,
//! };
//!
//! let web = StatefulSet {
//!     metadata: ObjectMeta {
//!         name: "web".into(),
//!         namespace: "default".into(),
//!         ..Default::default()
//!     },
//!     ..Default::default()
//! };
//!
//! let collector = statefulset::collector(StaticStore::new(vec![web]), &Options::default())?;
//! let mut registry = CollectorRegistry::new();
//! registry.register(Box::new(collector))?;
//!
//! let text = registry.gather()?;
//! assert!(text.contains("kube_statefulset_status_replicas{namespace=\"default\",statefulset=\"web\"} 0"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod collector;
pub mod config;
pub mod metrics;
pub mod resources;
pub mod store;
pub mod testutil;

// Re-export commonly used types at crate root
pub use collector::{CollectError, Collector, CollectorRegistry, KindCollector, RegistryError};
pub use config::{FileConfig, Options};
pub use metrics::{FamilyGenerator, MetricKind, Sample, Telemetry};
pub use resources::{Resource, StatefulSet};
pub use store::{FileStore, ListError, Lister, StaticStore};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
