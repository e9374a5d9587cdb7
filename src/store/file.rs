//! Snapshot files in Kubernetes JSON form.

use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::{ListError, Lister};

/// Reads resources from a JSON file on every `list()` call, so edits to
/// the file show up on the next scrape.
#[derive(Debug, Clone)]
pub struct FileStore<R> {
    path: PathBuf,
    _marker: PhantomData<fn() -> R>,
}

impl<R> FileStore<R> {
    /// Creates a store reading `path`. The file is not opened until the
    /// first listing.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _marker: PhantomData,
        }
    }

    /// Path of the snapshot file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl<R: DeserializeOwned> Lister<R> for FileStore<R> {
    fn list(&self) -> Result<Vec<R>, ListError> {
        let content = std::fs::read_to_string(&self.path).map_err(|source| ListError::Io {
            path: self.path.clone(),
            source,
        })?;
        let parse_error = |source| ListError::Parse {
            path: self.path.clone(),
            source,
        };

        // Either a `kubectl get -o json` list or a single object.
        let mut document: Value = serde_json::from_str(&content).map_err(parse_error)?;
        let items: Vec<R> = match document.get_mut("items") {
            Some(items) => serde_json::from_value(items.take()).map_err(parse_error)?,
            None => vec![serde_json::from_value(document).map_err(parse_error)?],
        };
        tracing::trace!(path = %self.path.display(), count = items.len(), "Read snapshot");
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::StatefulSet;

    fn write_temp(name: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "kube-state-exporter-{}-{}.json",
            std::process::id(),
            name
        ));
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_reads_list() {
        let path = write_temp(
            "list",
            r#"{
                "apiVersion": "v1",
                "kind": "List",
                "items": [
                    {"metadata": {"name": "web", "namespace": "default"},
                     "spec": {"replicas": 3, "serviceName": "web"},
                     "status": {"replicas": 3, "readyReplicas": 2}},
                    {"metadata": {"name": "db", "namespace": "data"}}
                ]
            }"#,
        );

        let store: FileStore<StatefulSet> = FileStore::new(&path);
        assert_eq!(store.path(), path.as_path());
        let items = store.list().unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].metadata.name, "web");
        assert_eq!(items[0].spec.replicas, Some(3));
        assert_eq!(items[0].status.ready_replicas, 2);
        assert_eq!(items[1].spec.replicas, None);
    }

    #[test]
    fn test_reads_single_object() {
        let path = write_temp(
            "single",
            r#"{"metadata": {"name": "web", "namespace": "default",
                "creationTimestamp": "2017-07-14T02:40:00Z"}}"#,
        );

        let store: FileStore<StatefulSet> = FileStore::new(&path);
        let items = store.list().unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(items.len(), 1);
        assert_eq!(
            items[0].metadata.creation_timestamp.map(|t| t.timestamp()),
            Some(1_500_000_000)
        );
    }

    #[test]
    fn test_malformed_item_fails_whole_list() {
        let path = write_temp(
            "bad-item",
            r#"{"items": [{"metadata": {"name": "web"}, "spec": {"replicas": "three"}}]}"#,
        );
        let store: FileStore<StatefulSet> = FileStore::new(&path);
        let result = store.list();
        std::fs::remove_file(&path).ok();

        assert!(matches!(result, Err(ListError::Parse { .. })));
    }

    #[test]
    fn test_missing_file() {
        let store: FileStore<StatefulSet> = FileStore::new("/nonexistent/snapshot.json");
        assert!(matches!(store.list(), Err(ListError::Io { .. })));
    }

    #[test]
    fn test_malformed_file() {
        let path = write_temp("malformed", "{ not json");
        let store: FileStore<StatefulSet> = FileStore::new(&path);
        let result = store.list();
        std::fs::remove_file(&path).ok();

        assert!(matches!(result, Err(ListError::Parse { .. })));
    }
}
