//! Error types for the calculator engine.
//!
//! This module defines the centralized error type [`PopcalcError`] and a type alias
//! [`Result`] used by the storage, worker and infrastructure layers. Evaluation
//! failures are not errors: they are folded into
//! [`Outcome::Failure`](crate::calculator::Outcome::Failure) before they leave the
//! evaluator.

use thiserror::Error;

/// The main error type for popcalc operations.
///
/// None of these variants reach the user. Storage and clipboard errors are logged
/// and swallowed by the session; configuration errors surface only from the host
/// binary during start-up.
///
/// # Examples
///
/// ```
/// use popcalc::PopcalcError;
///
/// fn read_storage() -> Result<(), PopcalcError> {
///     Err(PopcalcError::Storage("storage area unavailable".to_string()))
/// }
///
/// assert!(read_storage().is_err());
/// ```
#[derive(Debug, Error)]
pub enum PopcalcError {
    /// Storage operation failed.
    ///
    /// Occurs when a key/value backend cannot read, write or remove a key.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored value could not be encoded or decoded as JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The persistence worker is gone or did not answer.
    #[error("Worker communication error: {0}")]
    Worker(String),

    /// Configuration is invalid or missing.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The system clipboard could not be reached or written.
    #[error("Clipboard error: {0}")]
    Clipboard(String),
}

/// A specialized `Result` type for popcalc operations.
pub type Result<T> = std::result::Result<T, PopcalcError>;
