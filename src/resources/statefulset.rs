//! StatefulSet metrics.
//!
//! Status counters default to zero and are always emitted. Observed
//! generation and desired replicas are optional: when the controller has
//! not reported them they produce no sample rather than a misleading zero.

use serde::{Deserialize, Serialize};

use super::{ObjectMeta, Resource};
use crate::collector::{Collector, RegistryError};
use crate::config::Options;
use crate::metrics::extract::{self, REVISION_LABEL};
use crate::metrics::{labels, FamilyGenerator};
use crate::store::Lister;

/// Prefix shared by every StatefulSet family.
pub const METRIC_PREFIX: &str = "kube_statefulset";

/// StatefulSet projection used for metrics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatefulSet {
    /// Identity.
    pub metadata: ObjectMeta,
    /// Desired state.
    pub spec: StatefulSetSpec,
    /// Observed state.
    pub status: StatefulSetStatus,
}

/// Desired state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StatefulSetSpec {
    /// Desired pod count; unset when the field is absent.
    pub replicas: Option<i32>,
    /// Governing service.
    pub service_name: String,
}

/// Observed state as reported by the controller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StatefulSetStatus {
    /// Unset until the controller has observed the object.
    pub observed_generation: Option<i64>,
    /// Pods created by the controller.
    pub replicas: i32,
    /// Pods at `current_revision`.
    pub current_replicas: i32,
    /// Pods with a Ready condition.
    pub ready_replicas: i32,
    /// Pods at `update_revision`.
    pub updated_replicas: i32,
    /// Revision used to generate the current pods.
    pub current_revision: String,
    /// Revision pods are being rolled to.
    pub update_revision: String,
}

impl Resource for StatefulSet {
    const KIND: &'static str = "statefulset";

    fn name(&self) -> &str {
        &self.metadata.name
    }

    fn namespace(&self) -> &str {
        &self.metadata.namespace
    }
}

fn family_name(suffix: &str) -> String {
    format!("{METRIC_PREFIX}_{suffix}")
}

/// Families exported for every StatefulSet, in exposition order.
pub fn families() -> Vec<FamilyGenerator<StatefulSet>> {
    vec![
        FamilyGenerator::gauge(
            family_name("created"),
            "Unix creation timestamp",
            |s: &StatefulSet| extract::timestamp(s.metadata.creation_timestamp.as_ref()),
        ),
        FamilyGenerator::gauge(
            family_name("status_current_revision"),
            "Indicates the version of the StatefulSet used to generate Pods in the sequence [0,currentReplicas).",
            |s: &StatefulSet| extract::label_valued(REVISION_LABEL, &s.status.current_revision),
        ),
        FamilyGenerator::gauge(
            family_name("status_replicas"),
            "The number of replicas per StatefulSet.",
            |s: &StatefulSet| extract::value(f64::from(s.status.replicas)),
        ),
        FamilyGenerator::gauge(
            family_name("status_replicas_current"),
            "The number of current replicas per StatefulSet.",
            |s: &StatefulSet| extract::value(f64::from(s.status.current_replicas)),
        ),
        FamilyGenerator::gauge(
            family_name("status_replicas_ready"),
            "The number of ready replicas per StatefulSet.",
            |s: &StatefulSet| extract::value(f64::from(s.status.ready_replicas)),
        ),
        FamilyGenerator::gauge(
            family_name("status_replicas_updated"),
            "The number of updated replicas per StatefulSet.",
            |s: &StatefulSet| extract::value(f64::from(s.status.updated_replicas)),
        ),
        FamilyGenerator::gauge(
            family_name("status_observed_generation"),
            "The generation observed by the StatefulSet controller.",
            |s: &StatefulSet| extract::optional(s.status.observed_generation.map(|g| g as f64)),
        ),
        FamilyGenerator::gauge(
            family_name("status_update_revision"),
            "Indicates the version of the StatefulSet used to generate Pods in the sequence [replicas-updatedReplicas,replicas)",
            |s: &StatefulSet| extract::label_valued(REVISION_LABEL, &s.status.update_revision),
        ),
        FamilyGenerator::gauge(
            family_name("replicas"),
            "Number of desired pods for a StatefulSet.",
            |s: &StatefulSet| extract::optional(s.spec.replicas.map(f64::from)),
        ),
        FamilyGenerator::gauge(
            family_name("metadata_generation"),
            "Sequence number representing a specific generation of the desired state for the StatefulSet.",
            |s: &StatefulSet| extract::value(s.metadata.generation as f64),
        ),
        FamilyGenerator::gauge(
            family_name("labels"),
            "Kubernetes labels converted to Prometheus labels.",
            |s: &StatefulSet| labels::label_samples(&s.metadata.labels),
        ),
    ]
}

/// Builds the StatefulSet collector over `lister`.
pub fn collector<L>(
    lister: L,
    options: &Options,
) -> Result<Collector<StatefulSet, L>, RegistryError>
where
    L: Lister<StatefulSet>,
{
    Collector::new(families(), lister, options)
}
