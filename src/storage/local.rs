//! Per-key string storage backend.
//!
//! Each key lives in its own file under a directory, holding the value's JSON
//! text, the way a same-origin local store keeps `JSON.stringify`-ed strings.
//! An empty file reads as absent.

use crate::domain::error::Result;
use crate::storage::backend::{BackendKind, KeyValueBackend};
use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use serde_json::Value;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::Instrument;

/// Directory-backed storage, one `<key>.json` file per key.
pub struct LocalStorage {
    dir: PathBuf,
}

impl LocalStorage {
    #[must_use]
    pub fn new(dir: PathBuf) -> Self {
        tracing::debug!(dir = ?dir, "initializing local storage");
        Self { dir }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueBackend for LocalStorage {
    fn kind(&self) -> BackendKind {
        BackendKind::Local
    }

    fn get<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<Option<Value>>> {
        async move {
            let raw = match tokio::fs::read_to_string(self.key_path(key)).await {
                Ok(raw) => raw,
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    tracing::debug!(found = false, "key lookup complete");
                    return Ok(None);
                }
                Err(e) => return Err(e.into()),
            };

            if raw.trim().is_empty() {
                tracing::debug!(found = false, "empty value treated as absent");
                return Ok(None);
            }

            let value = serde_json::from_str(&raw)?;
            tracing::debug!(found = true, "key lookup complete");
            Ok(Some(value))
        }
        .instrument(tracing::debug_span!("local_get", key = %key))
        .boxed()
    }

    fn set<'a>(&'a self, key: &'a str, value: Value) -> BoxFuture<'a, Result<()>> {
        async move {
            tokio::fs::create_dir_all(&self.dir).await?;
            let raw = serde_json::to_string(&value)?;
            tokio::fs::write(self.key_path(key), raw).await?;

            tracing::debug!("value stored");
            Ok(())
        }
        .instrument(tracing::debug_span!("local_set", key = %key))
        .boxed()
    }

    fn remove<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<()>> {
        async move {
            match tokio::fs::remove_file(self.key_path(key)).await {
                Ok(()) => {
                    tracing::debug!("value removed");
                    Ok(())
                }
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
                Err(e) => Err(e.into()),
            }
        }
        .instrument(tracing::debug_span!("local_remove", key = %key))
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_one_file_per_key() {
        let dir = TempDir::new().expect("tempdir");
        let storage = LocalStorage::new(dir.path().join("storage"));

        storage.set("calculator_history", json!([])).await.expect("set");
        storage.set("calculator_settings", json!({"theme": "nord"})).await.expect("set");

        let raw = std::fs::read_to_string(storage.dir().join("calculator_settings.json"))
            .expect("read");
        assert_eq!(raw, r#"{"theme":"nord"}"#);
        assert_eq!(
            storage.get("calculator_history").await.expect("get"),
            Some(json!([]))
        );

        storage.remove("calculator_history").await.expect("remove");
        storage.remove("calculator_history").await.expect("remove twice");
        assert_eq!(storage.get("calculator_history").await.expect("get"), None);
    }

    #[tokio::test]
    async fn test_empty_file_is_absent() {
        let dir = TempDir::new().expect("tempdir");
        std::fs::write(dir.path().join("k.json"), "  \n").expect("write");

        let storage = LocalStorage::new(dir.path().to_path_buf());
        assert_eq!(storage.get("k").await.expect("get"), None);
    }

    #[tokio::test]
    async fn test_unparsable_value_is_an_error() {
        let dir = TempDir::new().expect("tempdir");
        std::fs::write(dir.path().join("k.json"), "{oops").expect("write");

        let storage = LocalStorage::new(dir.path().to_path_buf());
        assert!(storage.get("k").await.is_err());
    }
}
