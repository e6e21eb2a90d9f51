//! Key/value backend abstraction.
//!
//! This module defines the [`KeyValueBackend`] trait the settings and history
//! store is written against. The backend is picked once at start-up and then
//! shared between the session (for loads) and the persistence worker (for
//! writes), so implementations are `Send + Sync` and take `&self`.
//!
//! # Design Philosophy
//!
//! The trait mirrors the three operations a browser-style storage area offers
//! and nothing more. Values are arbitrary JSON; encoding records into values is
//! the store's job, not the backend's.

use crate::domain::error::Result;
use futures_util::future::BoxFuture;
use serde_json::Value;
use std::fmt;

/// Which storage mechanism a backend represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// Structured storage area shared by the whole extension.
    Extension,
    /// Per-origin string storage.
    Local,
    /// In-process map, lost on exit.
    Memory,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Extension => "extension",
            Self::Local => "local",
            Self::Memory => "memory",
        };
        f.write_str(name)
    }
}

/// Asynchronous key/value storage.
///
/// # Implementations
///
/// - [`ExtensionStorage`](crate::storage::ExtensionStorage): one JSON document with atomic writes
/// - [`LocalStorage`](crate::storage::LocalStorage): one file per key
/// - [`MemoryStorage`](crate::storage::MemoryStorage): in-process map
///
/// # Examples
///
/// ```
/// use popcalc::storage::{KeyValueBackend, MemoryStorage};
/// use serde_json::json;
///
/// # tokio::runtime::Builder::new_current_thread().build()?.block_on(async {
/// let storage = MemoryStorage::new();
/// storage.set("answer", json!(42)).await?;
/// assert_eq!(storage.get("answer").await?, Some(json!(42)));
/// storage.remove("answer").await?;
/// assert_eq!(storage.get("answer").await?, None);
/// # Ok::<(), popcalc::PopcalcError>(())
/// # })?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub trait KeyValueBackend: Send + Sync {
    /// The mechanism this backend uses.
    fn kind(&self) -> BackendKind;

    /// Reads the value stored under `key`.
    ///
    /// Returns `Ok(None)` if the key is absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage cannot be read or holds a
    /// value that is not valid JSON.
    fn get<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<Option<Value>>>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn set<'a>(&'a self, key: &'a str, value: Value) -> BoxFuture<'a, Result<()>>;

    /// Removes `key`. Removing an absent key succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the removal fails.
    fn remove<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<()>>;
}
