//! Domain layer for the calculator engine.
//!
//! Holds the records the session keeps in memory and persists between runs,
//! independent of any storage backend or front end.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`settings`]: Display settings, precision and theme
//! - [`history`]: Capped, most-recent-first calculation history
//!
//! # Examples
//!
//! ```
//! use popcalc::domain::{History, HistoryItem, Settings, SettingsPatch, Theme};
//!
//! let settings = Settings::default().merged(&SettingsPatch::theme(Theme::Light));
//! assert_eq!(settings.theme, Theme::Light);
//!
//! let mut history = History::new();
//! history.push_front(HistoryItem::new("1+1", "2"));
//! assert_eq!(history.len(), 1);
//! ```

pub mod error;
pub mod history;
pub mod settings;

pub use error::{PopcalcError, Result};
pub use history::{History, HistoryItem, HISTORY_LIMIT};
pub use settings::{Precision, Settings, SettingsPatch, Theme};
