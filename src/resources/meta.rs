//! Object metadata shared by all kinds.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identity region of a resource.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ObjectMeta {
    /// Object name, unique within the namespace.
    pub name: String,
    /// Namespace the object lives in.
    pub namespace: String,
    /// Unset when the API server has not stamped the object.
    pub creation_timestamp: Option<DateTime<Utc>>,
    /// Sequence number of the desired state.
    pub generation: i64,
    /// User-supplied labels with arbitrary keys.
    pub labels: BTreeMap<String, String>,
}
