//! Infrastructure layer for host interactions.
//!
//! This module provides the pieces that touch the environment outside the
//! process: where data lives on disk and the system clipboard.

pub mod clipboard;
pub mod paths;

pub use clipboard::{Clipboard, MemoryClipboard, SystemClipboard};
pub use paths::{expand_tilde, get_data_dir, log_file};
