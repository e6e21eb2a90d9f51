//! Extension-area storage backend.
//!
//! Keeps every key in a single human-readable JSON document, the way an
//! extension's storage area holds structured values. The document is read
//! lazily on first access and written back with an atomic write
//! (write-to-temp + rename) after every change, so a crash never leaves a
//! half-written file behind.
//!
//! # File Format
//!
//! ```json
//! {
//!   "calculator_settings": { "precision": 4, "historyEnabled": true, "theme": "dracula" },
//!   "calculator_history": [
//!     { "expression": "1+2", "result": "3", "timestamp": 1718000000000 }
//!   ]
//! }
//! ```

use crate::domain::error::{PopcalcError, Result};
use crate::storage::backend::{BackendKind, KeyValueBackend};
use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::Instrument;

type Document = Map<String, Value>;

/// JSON document storage backend.
///
/// The in-memory copy of the document is guarded by an async mutex, so reads
/// and writes from the session and the persistence worker never interleave.
pub struct ExtensionStorage {
    /// Path to the JSON document on disk.
    file_path: PathBuf,

    /// Cached document, `None` until first loaded.
    data: Mutex<Option<Document>>,
}

impl ExtensionStorage {
    /// Creates a backend over the document at `file_path`.
    ///
    /// Nothing is read until the first operation. Parent directories are
    /// created on the first write.
    #[must_use]
    pub fn new(file_path: PathBuf) -> Self {
        tracing::debug!(path = ?file_path, "initializing extension storage");
        Self {
            file_path,
            data: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Loads the document from disk. A missing file is an empty document.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a JSON object.
    async fn load_from_file(path: &Path) -> Result<Document> {
        let contents = match tokio::fs::read_to_string(path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("no storage document yet, starting empty");
                return Ok(Document::new());
            }
            Err(e) => return Err(e.into()),
        };

        let document: Document = serde_json::from_str(&contents)
            .map_err(|e| PopcalcError::Storage(format!("failed to parse JSON: {e}")))?;

        tracing::debug!(keys = document.len(), "loaded storage document");
        Ok(document)
    }

    /// Writes the document to disk atomically.
    ///
    /// # Errors
    ///
    /// Returns an error if the temporary file cannot be written or renamed.
    async fn save_to_file(&self, document: &Document) -> Result<()> {
        tracing::debug!(path = ?self.file_path, "saving storage document");

        if let Some(parent) = self.file_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(document)
            .map_err(|e| PopcalcError::Storage(format!("failed to serialize JSON: {e}")))?;

        let tmp_path = self.file_path.with_extension("tmp");

        tracing::trace!(tmp_path = ?tmp_path, "writing to temporary file");
        tokio::fs::write(&tmp_path, json).await?;

        tracing::trace!("renaming temporary file to final location");
        tokio::fs::rename(&tmp_path, &self.file_path).await?;

        tracing::debug!("storage document saved");
        Ok(())
    }

    /// Returns the cached document, loading it on first use.
    async fn loaded<'g>(&self, slot: &'g mut Option<Document>) -> Result<&'g mut Document> {
        if slot.is_none() {
            *slot = Some(Self::load_from_file(&self.file_path).await?);
        }
        Ok(slot.get_or_insert_with(Document::new))
    }
}

impl KeyValueBackend for ExtensionStorage {
    fn kind(&self) -> BackendKind {
        BackendKind::Extension
    }

    fn get<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<Option<Value>>> {
        async move {
            let mut slot = self.data.lock().await;
            let value = self.loaded(&mut slot).await?.get(key).cloned();

            tracing::debug!(found = value.is_some(), "key lookup complete");
            Ok(value)
        }
        .instrument(tracing::debug_span!("extension_get", key = %key))
        .boxed()
    }

    fn set<'a>(&'a self, key: &'a str, value: Value) -> BoxFuture<'a, Result<()>> {
        async move {
            let mut slot = self.data.lock().await;
            let document = self.loaded(&mut slot).await?;
            document.insert(key.to_string(), value);
            self.save_to_file(document).await
        }
        .instrument(tracing::debug_span!("extension_set", key = %key))
        .boxed()
    }

    fn remove<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<()>> {
        async move {
            let mut slot = self.data.lock().await;
            let document = self.loaded(&mut slot).await?;
            if document.remove(key).is_none() {
                tracing::trace!("key already absent");
                return Ok(());
            }
            self.save_to_file(document).await
        }
        .instrument(tracing::debug_span!("extension_remove", key = %key))
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_file_reads_empty() {
        let dir = TempDir::new().expect("tempdir");
        let storage = ExtensionStorage::new(dir.path().join("ext.json"));

        assert_eq!(storage.get("anything").await.expect("get"), None);
        assert!(!storage.path().exists());
    }

    #[tokio::test]
    async fn test_writes_one_document_and_reloads() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("nested").join("ext.json");

        let storage = ExtensionStorage::new(path.clone());
        storage.set("a", json!({"precision": 4})).await.expect("set");
        storage.set("b", json!([1, 2])).await.expect("set");
        storage.remove("b").await.expect("remove");

        let on_disk: Value =
            serde_json::from_str(&std::fs::read_to_string(&path).expect("read")).expect("json");
        assert_eq!(on_disk, json!({"a": {"precision": 4}}));
        assert!(!path.with_extension("tmp").exists());

        let reopened = ExtensionStorage::new(path);
        assert_eq!(
            reopened.get("a").await.expect("get"),
            Some(json!({"precision": 4}))
        );
        assert_eq!(reopened.get("b").await.expect("get"), None);
    }

    #[tokio::test]
    async fn test_malformed_document_is_an_error() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("ext.json");
        std::fs::write(&path, "not json").expect("write");

        let storage = ExtensionStorage::new(path);
        assert!(matches!(
            storage.get("a").await,
            Err(PopcalcError::Storage(_))
        ));
    }
}
