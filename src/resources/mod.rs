//! Typed projections of cluster resources.
//!
//! Each kind carries its own family table; the collection engine only
//! needs the identity exposed by [`Resource`].

mod meta;
pub mod statefulset;

pub use meta::ObjectMeta;
pub use statefulset::{StatefulSet, StatefulSetSpec, StatefulSetStatus};

/// Identity every collected resource exposes.
pub trait Resource {
    /// Kind label name, e.g. `statefulset`.
    const KIND: &'static str;

    /// Object name.
    fn name(&self) -> &str;

    /// Object namespace.
    fn namespace(&self) -> &str;
}
