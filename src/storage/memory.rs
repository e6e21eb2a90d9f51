//! In-process storage backend for tests and ephemeral sessions.

use crate::domain::error::Result;
use crate::storage::backend::{BackendKind, KeyValueBackend};
use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::Mutex;

/// Map-backed storage. Nothing survives the process.
#[derive(Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, Value>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend pre-populated with `entries`.
    #[must_use]
    pub fn with_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        Self {
            entries: Mutex::new(entries.into_iter().collect()),
        }
    }
}

impl KeyValueBackend for MemoryStorage {
    fn kind(&self) -> BackendKind {
        BackendKind::Memory
    }

    fn get<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<Option<Value>>> {
        async move { Ok(self.entries.lock().await.get(key).cloned()) }.boxed()
    }

    fn set<'a>(&'a self, key: &'a str, value: Value) -> BoxFuture<'a, Result<()>> {
        async move {
            tracing::trace!(key = %key, "memory set");
            self.entries.lock().await.insert(key.to_string(), value);
            Ok(())
        }
        .boxed()
    }

    fn remove<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<()>> {
        async move {
            tracing::trace!(key = %key, "memory remove");
            self.entries.lock().await.remove(key);
            Ok(())
        }
        .boxed()
    }
}
