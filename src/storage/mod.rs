//! Storage layer for persistent settings and history.
//!
//! This module provides the key/value abstraction the calculator persists
//! through, three interchangeable backends, and the typed [`SettingsStore`]
//! on top of them. Exactly one backend is chosen at start-up by
//! [`select_backend`] and injected; there is no global storage state.
//!
//! # Modules
//!
//! - `backend`: [`KeyValueBackend`] trait
//! - `extension`: single JSON document with atomic writes
//! - `local`: one file per key
//! - `memory`: in-process map
//! - `store`: settings/history records over any backend

pub mod backend;
pub mod extension;
pub mod local;
pub mod memory;
pub mod store;

pub use backend::{BackendKind, KeyValueBackend};
pub use extension::ExtensionStorage;
pub use local::LocalStorage;
pub use memory::MemoryStorage;
pub use store::{SettingsStore, HISTORY_KEY, SETTINGS_KEY};

use crate::Config;
use std::sync::Arc;

/// Picks the storage backend the configuration makes available.
///
/// - `storage = "memory"` selects [`MemoryStorage`].
/// - A configured extension storage area selects [`ExtensionStorage`].
/// - Otherwise [`LocalStorage`] under `<data_dir>/storage` is used.
///
/// # Examples
///
/// ```
/// use popcalc::storage::{select_backend, BackendKind};
/// use popcalc::Config;
///
/// let config = Config {
///     storage: Some("memory".to_string()),
///     ..Config::default()
/// };
/// assert_eq!(select_backend(&config).kind(), BackendKind::Memory);
/// ```
#[must_use]
pub fn select_backend(config: &Config) -> Arc<dyn KeyValueBackend> {
    if config
        .storage
        .as_deref()
        .is_some_and(|s| s.eq_ignore_ascii_case("memory"))
    {
        tracing::debug!("using in-memory storage");
        return Arc::new(MemoryStorage::new());
    }

    if let Some(path) = &config.extension_storage {
        tracing::debug!(path = ?path, "extension storage area available");
        return Arc::new(ExtensionStorage::new(path.clone()));
    }

    let dir = config.data_dir.join("storage");
    tracing::debug!(dir = ?dir, "falling back to local storage");
    Arc::new(LocalStorage::new(dir))
}
