//! Background persistence task.
//!
//! The session never awaits storage writes. It posts a [`StoreMessage`] on a
//! [`PersistenceHandle`] and moves on; a single tokio task drains the channel
//! and applies the writes one at a time, in order, so an older write can never
//! land after a newer one. Failures are logged and otherwise dropped.

use crate::domain::error::{PopcalcError, Result};
use crate::storage::SettingsStore;
use crate::worker::messages::{Command, StoreMessage, WorkerResponse};
use tokio::sync::{mpsc, oneshot};
use tracing::Instrument;

/// Applies [`StoreMessage`]s to a [`SettingsStore`].
pub struct PersistenceWorker {
    store: SettingsStore,
}

impl PersistenceWorker {
    #[must_use]
    pub const fn new(store: SettingsStore) -> Self {
        Self { store }
    }

    /// Starts the worker on the current tokio runtime.
    ///
    /// The task ends once every [`PersistenceHandle`] has been dropped and the
    /// queue is drained.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    #[must_use]
    pub fn spawn(self) -> PersistenceHandle {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(self.run(rx));
        PersistenceHandle { tx }
    }

    async fn run(self, mut rx: mpsc::UnboundedReceiver<Command>) {
        tracing::debug!(backend = %self.store.backend_kind(), "persistence worker started");

        while let Some(command) = rx.recv().await {
            match command {
                Command::Store(message) => {
                    self.handle_message(message).await;
                }
                Command::Flush(done) => {
                    tracing::trace!("flush reached");
                    let _ = done.send(());
                }
            }
        }

        tracing::debug!("persistence worker stopped");
    }

    /// Standardizes logging of write results.
    fn handle_store_result<F>(operation: &str, result: Result<()>, on_success: F) -> WorkerResponse
    where
        F: FnOnce() -> WorkerResponse,
    {
        match result {
            Ok(()) => {
                tracing::debug!(operation = operation, "storage operation successful");
                on_success()
            }
            Err(e) => {
                tracing::warn!(operation = operation, error = %e, "storage operation failed");
                WorkerResponse::Error {
                    message: format!("{operation}: {e}"),
                }
            }
        }
    }

    /// Applies a single write and reports how it went.
    pub async fn handle_message(&self, message: StoreMessage) -> WorkerResponse {
        let span = tracing::debug_span!("worker_handle_message", operation = message.operation());
        let operation = message.operation();

        async move {
            match message {
                StoreMessage::SaveSettings { settings } => Self::handle_store_result(
                    operation,
                    self.store.save_settings(&settings).await,
                    || WorkerResponse::SettingsSaved,
                ),

                StoreMessage::SaveHistory { history } => {
                    let count = history.len();
                    Self::handle_store_result(
                        operation,
                        self.store.save_history(&history).await,
                        || WorkerResponse::HistorySaved { count },
                    )
                }

                StoreMessage::ClearHistory => Self::handle_store_result(
                    operation,
                    self.store.clear_history().await,
                    || WorkerResponse::HistoryCleared,
                ),
            }
        }
        .instrument(span)
        .await
    }
}

/// Sending side of the persistence worker. Cheap to clone.
#[derive(Clone)]
pub struct PersistenceHandle {
    tx: mpsc::UnboundedSender<Command>,
}

impl PersistenceHandle {
    /// Queues a write without waiting for it.
    pub fn post(&self, message: StoreMessage) {
        let operation = message.operation();
        if self.tx.send(Command::Store(message)).is_err() {
            tracing::warn!(operation = operation, "persistence worker is gone, write dropped");
        } else {
            tracing::trace!(operation = operation, "write posted");
        }
    }

    /// Waits until every write posted before this call has been applied.
    ///
    /// # Errors
    ///
    /// Returns [`PopcalcError::Worker`] if the worker task has stopped.
    pub async fn flush(&self) -> Result<()> {
        let (done, wait) = oneshot::channel();
        self.tx
            .send(Command::Flush(done))
            .map_err(|_| PopcalcError::Worker("persistence worker is gone".to_string()))?;
        wait.await
            .map_err(|_| PopcalcError::Worker("persistence worker dropped flush".to_string()))
    }
}
