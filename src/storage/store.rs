//! Settings and history persistence on top of a [`KeyValueBackend`].
//!
//! Loads never fail: a missing record, an unreadable record or a backend error
//! all degrade to defaults (settings) or an empty list (history), with a
//! warning in the log. Saves return their error so the persistence worker can
//! log it.

use crate::domain::error::Result;
use crate::domain::{History, HistoryItem, Settings};
use crate::storage::backend::{BackendKind, KeyValueBackend};
use std::sync::Arc;

/// Key the settings record is stored under.
pub const SETTINGS_KEY: &str = "calculator_settings";

/// Key the history list is stored under.
pub const HISTORY_KEY: &str = "calculator_history";

/// Typed access to the calculator's persisted records.
///
/// Cloning is cheap; clones share the backend.
///
/// # Examples
///
/// ```
/// use popcalc::domain::{Settings, SettingsPatch, Theme};
/// use popcalc::storage::{MemoryStorage, SettingsStore};
/// use std::sync::Arc;
///
/// # tokio::runtime::Builder::new_current_thread().build()?.block_on(async {
/// let store = SettingsStore::new(Arc::new(MemoryStorage::new()));
/// assert_eq!(store.load_settings().await, Settings::default());
///
/// let dracula = Settings::default().merged(&SettingsPatch::theme(Theme::Dracula));
/// store.save_settings(&dracula).await?;
/// assert_eq!(store.load_settings().await, dracula);
/// # Ok::<(), popcalc::PopcalcError>(())
/// # })?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone)]
pub struct SettingsStore {
    backend: Arc<dyn KeyValueBackend>,
}

impl SettingsStore {
    #[must_use]
    pub fn new(backend: Arc<dyn KeyValueBackend>) -> Self {
        Self { backend }
    }

    #[must_use]
    pub fn backend_kind(&self) -> BackendKind {
        self.backend.kind()
    }

    /// Loads settings, merging the stored record over the defaults.
    pub async fn load_settings(&self) -> Settings {
        match self.backend.get(SETTINGS_KEY).await {
            Ok(stored) => {
                let settings = Settings::from_stored(stored.as_ref());
                tracing::debug!(
                    stored = stored.is_some(),
                    precision = %settings.precision,
                    theme = %settings.theme,
                    "settings loaded"
                );
                settings
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to load settings, using defaults");
                Settings::default()
            }
        }
    }

    /// Overwrites the stored settings record.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend write fails.
    pub async fn save_settings(&self, settings: &Settings) -> Result<()> {
        let value = serde_json::to_value(settings)?;
        self.backend.set(SETTINGS_KEY, value).await
    }

    /// Loads the history, or an empty one if nothing usable is stored.
    pub async fn load_history(&self) -> History {
        let stored = match self.backend.get(HISTORY_KEY).await {
            Ok(stored) => stored,
            Err(e) => {
                tracing::warn!(error = %e, "failed to load history, starting empty");
                return History::new();
            }
        };

        let Some(value) = stored else {
            tracing::debug!("no stored history");
            return History::new();
        };

        match serde_json::from_value::<Vec<HistoryItem>>(value) {
            Ok(items) => {
                let history = History::from_items(items);
                tracing::debug!(count = history.len(), "history loaded");
                history
            }
            Err(e) => {
                tracing::warn!(error = %e, "stored history is unreadable, starting empty");
                History::new()
            }
        }
    }

    /// Writes the full history list. The caller is responsible for the cap.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend write fails.
    pub async fn save_history(&self, history: &History) -> Result<()> {
        let value = serde_json::to_value(history)?;
        self.backend.set(HISTORY_KEY, value).await
    }

    /// Removes the history key entirely.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend removal fails.
    pub async fn clear_history(&self) -> Result<()> {
        self.backend.remove(HISTORY_KEY).await
    }
}
