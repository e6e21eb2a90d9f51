//! Persistence worker message types.
//!
//! This module defines the protocol between the calculator session and the
//! background task that performs storage writes. Messages carry full snapshots
//! of the records to write, so the worker never reads session state.

use crate::domain::{History, Settings};
use tokio::sync::oneshot;

/// Macro to generate builder methods for `StoreMessage` variants.
macro_rules! store_message_builders {
    (
        $(
            $builder_name:ident($variant:ident { $($field:ident: $ty:ty),* $(,)? })
        ),* $(,)?
    ) => {
        impl StoreMessage {
            $(
                #[doc = concat!("Create a ", stringify!($variant), " message")]
                #[must_use]
                pub fn $builder_name($($field: $ty),*) -> Self {
                    Self::$variant { $($field,)* }
                }
            )*
        }
    };
}

store_message_builders! {
    save_settings(SaveSettings { settings: Settings }),
    save_history(SaveHistory { history: History }),
}

/// Writes posted by the session to the persistence worker.
///
/// Writes are applied strictly in posting order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreMessage {
    /// Overwrite the stored settings record.
    SaveSettings {
        /// Settings as they are in memory at posting time.
        settings: Settings,
    },

    /// Overwrite the stored history list.
    SaveHistory {
        /// Full, already capped history.
        history: History,
    },

    /// Remove the stored history.
    ClearHistory,
}

impl StoreMessage {
    /// Short operation name used in logs.
    #[must_use]
    pub const fn operation(&self) -> &'static str {
        match self {
            Self::SaveSettings { .. } => "save settings",
            Self::SaveHistory { .. } => "save history",
            Self::ClearHistory => "clear history",
        }
    }
}

/// Result of one write, reported by the worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerResponse {
    /// The settings record was written.
    SettingsSaved,

    /// The history list was written.
    HistorySaved {
        /// Number of entries written.
        count: usize,
    },

    /// The history key was removed.
    HistoryCleared,

    /// The write failed. In-memory state is unaffected.
    Error {
        /// Human-readable error message.
        message: String,
    },
}

/// Envelope on the worker channel.
#[derive(Debug)]
pub(crate) enum Command {
    Store(StoreMessage),
    /// Answer once every earlier command has been applied.
    Flush(oneshot::Sender<()>),
}
