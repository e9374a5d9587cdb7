//! Resource listers.
//!
//! A collector never talks to the cluster itself. It asks a [`Lister`]
//! for the current snapshot of one kind on every pass; anything from an
//! informer cache to a file on disk can sit behind the trait.

mod file;

pub use file::FileStore;

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

/// Errors that can occur while listing resources.
#[derive(Debug, Error)]
pub enum ListError {
    /// The snapshot file could not be read.
    #[error("failed to read snapshot {path}: {source}")]
    Io {
        /// Snapshot path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The snapshot is not a valid resource or resource list.
    #[error("failed to parse snapshot {path}: {source}")]
    Parse {
        /// Snapshot path.
        path: PathBuf,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
    /// The backing source cannot serve a listing right now.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Supplies the current snapshot of resources of one kind.
///
/// Implementations must be safe to call from concurrent scrapes.
pub trait Lister<R>: Send + Sync {
    /// Returns every resource currently known, in a stable order.
    fn list(&self) -> Result<Vec<R>, ListError>;
}

impl<R, L> Lister<R> for Arc<L>
where
    L: Lister<R> + ?Sized,
{
    fn list(&self) -> Result<Vec<R>, ListError> {
        (**self).list()
    }
}

/// Fixed in-memory snapshot.
#[derive(Debug, Clone, Default)]
pub struct StaticStore<R> {
    items: Vec<R>,
}

impl<R> StaticStore<R> {
    /// Creates a store that always lists `items`.
    pub fn new(items: Vec<R>) -> Self {
        Self { items }
    }
}

impl<R: Clone + Send + Sync> Lister<R> for StaticStore<R> {
    fn list(&self) -> Result<Vec<R>, ListError> {
        Ok(self.items.clone())
    }
}

/// Lister backed by a closure, mostly for test doubles.
pub struct FnStore<F> {
    f: F,
}

impl<F> FnStore<F> {
    /// Creates a store that calls `f` on every listing.
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<R, F> Lister<R> for FnStore<F>
where
    F: Fn() -> Result<Vec<R>, ListError> + Send + Sync,
{
    fn list(&self) -> Result<Vec<R>, ListError> {
        (self.f)()
    }
}
