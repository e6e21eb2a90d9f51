//! Clipboard access for copying results.

use crate::domain::error::{PopcalcError, Result};
use std::sync::{Arc, Mutex};

/// Destination for copied results.
pub trait Clipboard: Send {
    /// Replaces the clipboard contents with `text`.
    ///
    /// # Errors
    ///
    /// Returns [`PopcalcError::Clipboard`] if the clipboard cannot be reached.
    fn set_text(&mut self, text: &str) -> Result<()>;
}

/// The operating system clipboard, opened per copy.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClipboard;

impl Clipboard for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        let mut clipboard = arboard::Clipboard::new()
            .map_err(|e| PopcalcError::Clipboard(format!("failed to access clipboard: {e}")))?;

        clipboard
            .set_text(text.to_string())
            .map_err(|e| PopcalcError::Clipboard(format!("failed to copy to clipboard: {e}")))
    }
}

/// In-process clipboard. Clones share the same contents.
#[derive(Debug, Default, Clone)]
pub struct MemoryClipboard {
    contents: Arc<Mutex<Option<String>>>,
}

impl MemoryClipboard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Last copied text, if any.
    #[must_use]
    pub fn contents(&self) -> Option<String> {
        self.contents.lock().ok().and_then(|guard| guard.clone())
    }
}

impl Clipboard for MemoryClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        let mut guard = self
            .contents
            .lock()
            .map_err(|_| PopcalcError::Clipboard("clipboard lock poisoned".to_string()))?;
        *guard = Some(text.to_string());
        Ok(())
    }
}
