//! Calculator session: the public face of the engine.
//!
//! A [`CalculatorSession`] owns the [`AppState`], routes every operation
//! through [`handle_event`], and executes the resulting actions: storage
//! writes go to the persistence worker, copies go to the clipboard. Observers
//! follow the latest [`Outcome`] through a watch channel.

use crate::app::handler::{handle_event, Event};
use crate::app::state::DynBackend;
use crate::app::{Action, AppState, SessionPhase};
use crate::calculator::Outcome;
use crate::domain::error::Result;
use crate::domain::{History, Settings, SettingsPatch};
use crate::editor::{KeyPress, MissingBrackets};
use crate::infrastructure::Clipboard;
use crate::storage::SettingsStore;
use crate::worker::{PersistenceHandle, PersistenceWorker};
use tokio::sync::watch;

/// One interactive calculator.
///
/// # Examples
///
/// ```
/// use popcalc::app::CalculatorSession;
/// use popcalc::calculator::Outcome;
/// use popcalc::infrastructure::MemoryClipboard;
/// use popcalc::storage::{MemoryStorage, SettingsStore};
/// use std::sync::Arc;
///
/// # tokio::runtime::Builder::new_current_thread().build()?.block_on(async {
/// let store = SettingsStore::new(Arc::new(MemoryStorage::new()));
/// let mut session = CalculatorSession::new(store, Box::new(MemoryClipboard::new()));
/// session.start().await;
///
/// session.set_expression("2^3 + sqrt(16)");
/// assert_eq!(session.outcome(), &Outcome::Value("12".into()));
/// session.add_to_history();
/// session.flush().await?;
/// assert_eq!(session.history().len(), 1);
/// # Ok::<(), popcalc::PopcalcError>(())
/// # })?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct CalculatorSession {
    state: AppState,
    store: SettingsStore,
    persistence: PersistenceHandle,
    clipboard: Box<dyn Clipboard>,
    outcome_tx: watch::Sender<Outcome>,
}

impl CalculatorSession {
    /// Creates a loading session and spawns its persistence worker.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    #[must_use]
    pub fn new(store: SettingsStore, clipboard: Box<dyn Clipboard>) -> Self {
        Self::with_state(AppState::new(), store, clipboard)
    }

    /// Like [`CalculatorSession::new`] but evaluating through `backend`.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    #[must_use]
    pub fn with_backend(
        store: SettingsStore,
        clipboard: Box<dyn Clipboard>,
        backend: DynBackend,
    ) -> Self {
        Self::with_state(AppState::with_backend(backend), store, clipboard)
    }

    fn with_state(state: AppState, store: SettingsStore, clipboard: Box<dyn Clipboard>) -> Self {
        tracing::debug!(backend = %store.backend_kind(), "creating calculator session");
        let persistence = PersistenceWorker::new(store.clone()).spawn();
        let (outcome_tx, _) = watch::channel(Outcome::Empty);
        Self {
            state,
            store,
            persistence,
            clipboard,
            outcome_tx,
        }
    }

    /// Loads settings and history concurrently, then becomes ready.
    ///
    /// Load failures fall back to defaults; this never fails.
    pub async fn start(&mut self) {
        let (settings, history) =
            tokio::join!(self.store.load_settings(), self.store.load_history());
        self.dispatch(Event::Loaded { settings, history });
    }

    /// Replaces the expression text and re-evaluates it.
    pub fn set_expression(&mut self, text: impl Into<String>) {
        self.dispatch(Event::ExpressionChanged(text.into()));
    }

    /// Feeds a key through the input controller.
    pub fn handle_key(&mut self, key: KeyPress) {
        self.dispatch(Event::Key(key));
    }

    /// Merges `patch` into the settings and persists them in the background.
    pub fn update_settings(&mut self, patch: SettingsPatch) {
        self.dispatch(Event::SettingsChanged(patch));
    }

    /// Commits the current expression and result, if there is one to commit.
    pub fn add_to_history(&mut self) {
        self.dispatch(Event::CommitToHistory);
    }

    pub fn clear_history(&mut self) {
        self.dispatch(Event::ClearHistory);
    }

    /// Loads the history entry at `index` back into the input.
    pub fn select_history_item(&mut self, index: usize) {
        self.dispatch(Event::SelectHistoryItem(index));
    }

    /// Copies the current result to the clipboard, best effort.
    pub fn copy_result(&mut self) {
        self.dispatch(Event::CopyResult);
    }

    /// Receiver that always holds the latest outcome.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Outcome> {
        self.outcome_tx.subscribe()
    }

    /// Waits until every write posted so far has been applied.
    ///
    /// # Errors
    ///
    /// Returns an error if the persistence worker has stopped.
    pub async fn flush(&self) -> Result<()> {
        self.persistence.flush().await
    }

    #[must_use]
    pub const fn state(&self) -> &AppState {
        &self.state
    }

    #[must_use]
    pub fn expression(&self) -> &str {
        self.state.expression()
    }

    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.state.field.cursor()
    }

    #[must_use]
    pub const fn outcome(&self) -> &Outcome {
        &self.state.outcome
    }

    #[must_use]
    pub const fn settings(&self) -> &Settings {
        &self.state.settings
    }

    #[must_use]
    pub const fn history(&self) -> &History {
        &self.state.history
    }

    #[must_use]
    pub const fn phase(&self) -> SessionPhase {
        self.state.phase
    }

    #[must_use]
    pub const fn copied(&self) -> bool {
        self.state.copied
    }

    #[must_use]
    pub fn missing_brackets(&self) -> Option<MissingBrackets> {
        self.state.missing_brackets()
    }

    fn dispatch(&mut self, event: Event) {
        let (changed, actions) = handle_event(&mut self.state, &event);

        for action in actions {
            self.execute(action);
        }

        if changed {
            let latest = &self.state.outcome;
            self.outcome_tx.send_if_modified(|current| {
                if current == latest {
                    return false;
                }
                current.clone_from(latest);
                true
            });
        }
    }

    fn execute(&mut self, action: Action) {
        match action {
            Action::PostToWorker(message) => self.persistence.post(message),
            Action::CopyToClipboard(text) => match self.clipboard.set_text(&text) {
                Ok(()) => {
                    tracing::debug!(result = %text, "result copied");
                    self.dispatch(Event::ResultCopied);
                }
                Err(e) => tracing::warn!(error = %e, "copy failed"),
            },
        }
    }
}
