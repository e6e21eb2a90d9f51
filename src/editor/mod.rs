//! Expression input editing.
//!
//! This module provides functionality to:
//! - Track parenthesis balance of the current text
//! - Auto-pair, skip and delete brackets as the user types
//! - Recognise the commit, clear and copy keys

mod brackets;
mod controller;

pub use brackets::{BracketBalance, MissingBrackets};
pub use controller::{apply_default, handle_key, InputField, KeyAction, KeyPress};
