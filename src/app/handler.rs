//! Event handling and state transition logic.
//!
//! This module implements the handler that turns session events into state
//! changes and side-effect actions. It never performs I/O itself: storage
//! writes and clipboard copies come back as [`Action`]s for the session to
//! execute.
//!
//! # Architecture
//!
//! The handler follows a unidirectional data flow pattern:
//! 1. The session wraps each public operation into an [`Event`]
//! 2. [`handle_event`] pattern-matches the event type
//! 3. State mutations happen on [`AppState`], memory first
//! 4. Actions are collected and returned for execution
//!
//! # Event Types
//!
//! - **Lifecycle**: `Loaded`
//! - **Input**: `ExpressionChanged`, `Key`, `SelectHistoryItem`
//! - **Settings**: `SettingsChanged`
//! - **History**: `CommitToHistory`, `ClearHistory`
//! - **Clipboard**: `CopyResult`, `ResultCopied`
//!
//! # Example
//!
//! ```rust
//! use popcalc::app::{handle_event, Action, AppState, Event};
//! use popcalc::domain::{History, Settings};
//!
//! let mut state = AppState::new();
//! handle_event(&mut state, &Event::Loaded {
//!     settings: Settings::default(),
//!     history: History::new(),
//! });
//! handle_event(&mut state, &Event::ExpressionChanged("1+2".into()));
//!
//! let (_, actions) = handle_event(&mut state, &Event::CommitToHistory);
//! assert!(matches!(actions.as_slice(), [Action::PostToWorker(_)]));
//! assert_eq!(state.history.len(), 1);
//! ```

use crate::app::{Action, AppState, SessionPhase};
use crate::domain::{History, HistoryItem, Settings, SettingsPatch};
use crate::editor::{self, KeyAction, KeyPress};
use crate::worker::StoreMessage;

/// Events processed by the calculator session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Persisted settings and history finished loading.
    ///
    /// Moves the session to `Ready` and evaluates the current text.
    Loaded {
        settings: Settings,
        history: History,
    },

    /// The whole expression text was replaced (cursor moves to the end).
    ExpressionChanged(String),

    /// A key was pressed in the expression input.
    Key(KeyPress),

    /// Some settings fields changed.
    SettingsChanged(SettingsPatch),

    /// Commit the current expression and result to the history.
    CommitToHistory,

    /// Remove every history entry.
    ClearHistory,

    /// Load a past expression back into the input by its history index.
    SelectHistoryItem(usize),

    /// Copy the current result.
    CopyResult,

    /// The clipboard accepted the result.
    ResultCopied,
}

/// Processes an event, mutates state, and returns actions to execute.
///
/// The returned flag is `true` when something observable changed (the text,
/// outcome, settings, history or `copied` flag).
///
/// # Tracing
///
/// Each call creates a debug-level span with the event.
#[must_use = "actions must be executed"]
pub fn handle_event(state: &mut AppState, event: &Event) -> (bool, Vec<Action>) {
    let _span = tracing::debug_span!("handle_event", event_type = ?event).entered();

    match event {
        Event::Loaded { settings, history } => {
            tracing::debug!(
                precision = %settings.precision,
                theme = %settings.theme,
                history_len = history.len(),
                "session ready"
            );
            state.settings = *settings;
            state.history = history.clone();
            state.phase = SessionPhase::Ready;
            state.recompute();
            (true, vec![])
        }

        Event::ExpressionChanged(text) => {
            state.set_expression(text.clone());
            (true, vec![])
        }

        Event::Key(key) => handle_key(state, *key),

        Event::SettingsChanged(patch) => {
            if patch.is_empty() {
                return (false, vec![]);
            }

            let previous = state.settings;
            state.settings = previous.merged(patch);

            if state.settings.precision != previous.precision {
                tracing::debug!(
                    from = %previous.precision,
                    to = %state.settings.precision,
                    "precision changed"
                );
                state.recompute();
            }

            (
                true,
                vec![Action::PostToWorker(StoreMessage::save_settings(state.settings))],
            )
        }

        Event::CommitToHistory => {
            if !state.can_commit() {
                tracing::debug!(
                    history_enabled = state.settings.history_enabled,
                    outcome = ?state.outcome,
                    "nothing to commit"
                );
                return (false, vec![]);
            }

            let Some(result) = state.outcome.value() else {
                return (false, vec![]);
            };

            let item = HistoryItem::new(state.field.text(), result);
            tracing::debug!(expression = %item.expression, result = %item.result, "committing to history");
            state.history.push_front(item);

            (
                true,
                vec![Action::PostToWorker(StoreMessage::save_history(
                    state.history.clone(),
                ))],
            )
        }

        Event::ClearHistory => {
            tracing::debug!(cleared = state.history.len(), "clearing history");
            state.history.clear();
            (true, vec![Action::PostToWorker(StoreMessage::ClearHistory)])
        }

        Event::SelectHistoryItem(index) => {
            let Some(item) = state.history.get(*index) else {
                tracing::debug!(index = index, len = state.history.len(), "no such history item");
                return (false, vec![]);
            };

            let expression = item.expression.clone();
            state.set_expression(expression);
            (true, vec![])
        }

        Event::CopyResult => state.outcome.value().map_or_else(
            || {
                tracing::debug!("no result to copy");
                (false, vec![])
            },
            |result| (false, vec![Action::CopyToClipboard(result.to_string())]),
        ),

        Event::ResultCopied => {
            // Stays set until the next edit; there is no timed expiry.
            state.copied = true;
            (true, vec![])
        }
    }
}

fn handle_key(state: &mut AppState, key: KeyPress) -> (bool, Vec<Action>) {
    match editor::handle_key(&state.field, key, &state.outcome) {
        KeyAction::Commit => handle_event(state, &Event::CommitToHistory),
        KeyAction::CopyResult => handle_event(state, &Event::CopyResult),
        KeyAction::Edit(field) => {
            state.set_field(field);
            (true, vec![])
        }
        KeyAction::PassThrough => {
            let next = editor::apply_default(&state.field, key);
            if next == state.field {
                return (false, vec![]);
            }
            state.set_field(next);
            (true, vec![])
        }
    }
}
