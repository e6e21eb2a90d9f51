//! Actions representing side effects to be executed by the session.
//!
//! The event handler mutates [`AppState`](crate::app::AppState) directly and
//! returns a `Vec<Action>` for everything that leaves the process: storage
//! writes and clipboard copies. The session executes them in order.
//!
//! # Example
//!
//! ```rust
//! use popcalc::app::Action;
//! use popcalc::worker::StoreMessage;
//!
//! let actions = vec![
//!     Action::PostToWorker(StoreMessage::ClearHistory),
//!     Action::CopyToClipboard("42".to_string()),
//! ];
//! assert_eq!(actions.len(), 2);
//! ```

use crate::worker::StoreMessage;

/// Side effects requested by the event handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Posts a write to the persistence worker without waiting for it.
    PostToWorker(StoreMessage),

    /// Copies the given result text to the clipboard.
    ///
    /// Best effort: a failure is logged and only leaves the `copied` flag unset.
    CopyToClipboard(String),
}
