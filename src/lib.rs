//! popcalc: the engine of a popup calculator.
//!
//! popcalc evaluates an expression on every keystroke and provides:
//! - Live results formatted to a configurable precision (0 to 10 digits)
//! - Bracket assistance: auto-pairing, skip-over, paired delete, balance hint
//! - A capped, most-recent-first history of committed results
//! - Settings and history persisted through interchangeable storage backends
//! - Fire-and-forget persistence on a background task, applied in order

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Front end (main.rs: line-oriented terminal REPL)   │  ← Presentation
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← Session
//! │  - Event handling                                   │
//! │  - Action execution                                 │
//! │  - Outcome observers (watch channel)                │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ calculator/   │   │ storage/      │   │ worker/       │
//! │ - Evaluation  │   │ - Backends    │   │ - Ordered     │
//! │ - Formatting  │   │ - Settings &  │   │   writes      │
//! │ editor/       │   │   history     │   │ - Flush       │
//! │ - Brackets    │   │   store       │   │               │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!         │                    │                    │
//! ┌─────────────────────────────────────────────────────┐
//! │  Infrastructure & Domain Layers                     │
//! │  - Paths and clipboard (infrastructure/)            │
//! │  - Settings, history, errors (domain/)              │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Observability (observability/)                     │  ← Optional
//! │  - tracing subscriber writing a rotating log file   │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`app`]: Session, state, events and actions
//! - [`calculator`]: Evaluation contract and precision formatting
//! - [`editor`]: Bracket tracking and per-key input control
//! - [`domain`]: Settings, history and error types
//! - [`storage`]: Key/value backends and the settings/history store
//! - [`worker`]: Background persistence task
//! - [`infrastructure`]: Data directory paths and clipboard
//! - [`ui`]: Terminal view models and rendering
//! - [`observability`]: Log file setup
//!
//! # Configuration
//!
//! ```toml
//! # ~/.config/popcalc/config.toml
//! data_dir = "~/.local/share/popcalc"
//! extension_storage = "~/.local/share/popcalc/extension.json"
//! trace_level = "debug"
//! ```
//!
//! Every key can also be given as a `POPCALC_*` environment variable, which
//! takes precedence over the file.
//!
//! # Example
//!
//! ```rust
//! use popcalc::calculator::Outcome;
//! use popcalc::editor::KeyPress;
//! use popcalc::{initialize, Config};
//!
//! # tokio::runtime::Builder::new_current_thread().build()?.block_on(async {
//! let config = Config {
//!     storage: Some("memory".to_string()),
//!     ..Config::default()
//! };
//! let mut session = initialize(&config).await;
//!
//! for c in "sqrt(16".chars() {
//!     session.handle_key(KeyPress::Char(c));
//! }
//! assert_eq!(session.expression(), "sqrt(16)");
//! assert_eq!(session.outcome(), &Outcome::Value("4".into()));
//! # });
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod app;
pub mod calculator;
pub mod domain;
pub mod editor;
pub mod infrastructure;
pub mod storage;
pub mod worker;

pub mod ui;

pub mod observability;

pub use app::{handle_event, Action, AppState, CalculatorSession, Event, SessionPhase};
pub use calculator::Outcome;
pub use domain::{PopcalcError, Result};

use infrastructure::paths;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Environment variables overlaid on top of file or map configuration.
const ENV_KEYS: &[(&str, &str)] = &[
    ("POPCALC_DATA_DIR", "data_dir"),
    ("POPCALC_EXTENSION_STORAGE", "extension_storage"),
    ("POPCALC_STORAGE", "storage"),
    ("POPCALC_TRACE_LEVEL", "trace_level"),
];

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory for local storage and the log file.
    ///
    /// Default: `<platform data dir>/popcalc`.
    pub data_dir: PathBuf,

    /// Path of the extension storage document.
    ///
    /// When set, settings and history live in this single JSON file instead
    /// of per-key files under `data_dir`.
    pub extension_storage: Option<PathBuf>,

    /// Explicit backend override. Only `"memory"` is recognised.
    pub storage: Option<String>,

    /// Log level or filter directive.
    ///
    /// Options: `trace`, `debug`, `info`, `warn`, `error`. Default: `"info"`
    pub trace_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: paths::get_data_dir(),
            extension_storage: None,
            storage: None,
            trace_level: None,
        }
    }
}

impl Config {
    /// Parses configuration from `key = value` pairs.
    ///
    /// # Parsing Rules
    ///
    /// - `data_dir`: path, `~` expanded; blank keeps the default
    /// - `extension_storage`: path, `~` expanded; blank means unset
    /// - `storage`: string; blank means unset
    /// - `trace_level`: string; blank means unset
    ///
    /// Unknown keys are ignored.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use std::path::PathBuf;
    /// use popcalc::Config;
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("data_dir".to_string(), "/var/lib/popcalc".to_string());
    /// map.insert("storage".to_string(), "memory".to_string());
    ///
    /// let config = Config::from_map(&map);
    /// assert_eq!(config.data_dir, PathBuf::from("/var/lib/popcalc"));
    /// assert_eq!(config.storage.as_deref(), Some("memory"));
    /// ```
    #[must_use]
    pub fn from_map(config: &BTreeMap<String, String>) -> Self {
        Self::default().overlay(config)
    }

    /// Reads a TOML configuration file.
    ///
    /// Values may be strings or any other TOML scalar.
    ///
    /// # Errors
    ///
    /// Returns [`PopcalcError::Io`] if the file cannot be read and
    /// [`PopcalcError::Config`] if it is not valid TOML.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parses TOML configuration text.
    ///
    /// # Errors
    ///
    /// Returns [`PopcalcError::Config`] if the text is not valid TOML.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let table: toml::Table = contents
            .parse()
            .map_err(|e| PopcalcError::Config(format!("failed to parse config: {e}")))?;

        let map = table
            .into_iter()
            .map(|(key, value)| {
                let value = match value {
                    toml::Value::String(s) => s,
                    other => other.to_string(),
                };
                (key, value)
            })
            .collect();

        Ok(Self::from_map(&map))
    }

    /// Applies `POPCALC_*` environment variables on top of `self`.
    #[must_use]
    pub fn with_env(self) -> Self {
        self.with_env_from(|name| std::env::var(name).ok())
    }

    /// Like [`Config::with_env`] with an explicit variable lookup.
    #[must_use]
    pub fn with_env_from<F>(self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let overrides: BTreeMap<String, String> = ENV_KEYS
            .iter()
            .filter_map(|(var, key)| lookup(var).map(|value| ((*key).to_string(), value)))
            .collect();
        self.overlay(&overrides)
    }

    fn overlay(mut self, config: &BTreeMap<String, String>) -> Self {
        let non_blank = |key: &str| {
            config
                .get(key)
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(String::from)
        };

        if let Some(dir) = non_blank("data_dir") {
            self.data_dir = paths::expand_tilde(&dir);
        }
        if let Some(path) = non_blank("extension_storage") {
            self.extension_storage = Some(paths::expand_tilde(&path));
        }
        if let Some(storage) = non_blank("storage") {
            self.storage = Some(storage);
        }
        if let Some(level) = non_blank("trace_level") {
            self.trace_level = Some(level);
        }

        self
    }
}

/// Creates a calculator session for `config` and waits until it is ready.
///
/// Picks the storage backend, spawns the persistence worker and loads
/// settings and history. Copies go to the system clipboard.
///
/// # Panics
///
/// Panics if called outside a tokio runtime.
pub async fn initialize(config: &Config) -> CalculatorSession {
    tracing::debug!(config = ?config, "initializing calculator session");

    let store = storage::SettingsStore::new(storage::select_backend(config));
    let mut session =
        CalculatorSession::new(store, Box::new(infrastructure::SystemClipboard));
    session.start().await;

    tracing::debug!(
        precision = %session.settings().precision,
        history_len = session.history().len(),
        "calculator initialized"
    );
    session
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_map_ignores_blank_and_unknown() {
        let mut map = BTreeMap::new();
        map.insert("data_dir".to_string(), "  ".to_string());
        map.insert("extension_storage".to_string(), String::new());
        map.insert("colour".to_string(), "red".to_string());

        assert_eq!(Config::from_map(&map), Config::default());
    }

    #[test]
    fn test_from_toml() {
        let config = Config::from_toml(
            r#"
            data_dir = "/srv/popcalc"
            extension_storage = "/srv/popcalc/ext.json"
            trace_level = "debug"
            "#,
        )
        .expect("valid toml");

        assert_eq!(config.data_dir, PathBuf::from("/srv/popcalc"));
        assert_eq!(
            config.extension_storage,
            Some(PathBuf::from("/srv/popcalc/ext.json"))
        );
        assert_eq!(config.trace_level.as_deref(), Some("debug"));
        assert_eq!(config.storage, None);
    }

    #[test]
    fn test_from_toml_rejects_garbage() {
        assert!(matches!(
            Config::from_toml("data_dir = "),
            Err(PopcalcError::Config(_))
        ));
    }

    #[test]
    fn test_env_overrides_file() {
        let config = Config::from_toml("trace_level = \"warn\"")
            .expect("valid toml")
            .with_env_from(|name| match name {
                "POPCALC_TRACE_LEVEL" => Some("trace".to_string()),
                "POPCALC_EXTENSION_STORAGE" => Some("/tmp/ext.json".to_string()),
                _ => None,
            });

        assert_eq!(config.trace_level.as_deref(), Some("trace"));
        assert_eq!(config.extension_storage, Some(PathBuf::from("/tmp/ext.json")));
    }
}
