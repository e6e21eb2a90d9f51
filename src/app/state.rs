//! Calculator session state.
//!
//! This module defines [`AppState`], the single source of truth for everything
//! a front end displays: the expression input, its evaluated outcome, the
//! loaded settings and history, the lifecycle phase and the transient
//! `copied` flag.
//!
//! # Architecture
//!
//! `AppState` separates core data (input text, settings, history) from derived
//! data (the outcome and bracket hint). The outcome is recomputed by
//! [`AppState::recompute`] whenever the text or precision changes; the bracket
//! hint is computed on demand and never stored.
//!
//! # Example
//!
//! ```rust
//! use popcalc::app::AppState;
//! use popcalc::calculator::Outcome;
//!
//! let mut state = AppState::new();
//! state.phase = popcalc::app::SessionPhase::Ready;
//! state.set_expression("6*7");
//! assert_eq!(state.outcome, Outcome::Value("42".into()));
//! ```

use super::modes::SessionPhase;
use crate::calculator::{Evaluator, FastevalBackend, MathBackend, Outcome};
use crate::domain::{History, Settings};
use crate::editor::{BracketBalance, InputField, MissingBrackets};
use std::fmt;

/// Math backend as stored in the session.
pub type DynBackend = Box<dyn MathBackend + Send>;

/// Central calculator state container.
pub struct AppState {
    /// Expression text and cursor.
    pub field: InputField,

    /// Outcome of evaluating `field` under the current precision.
    ///
    /// Always `Empty` while the session is loading.
    pub outcome: Outcome,

    /// Settings in effect. Defaults until loading finishes.
    pub settings: Settings,

    /// Committed calculations, newest first.
    pub history: History,

    pub phase: SessionPhase,

    /// Set after a successful copy; cleared by the next edit.
    pub copied: bool,

    evaluator: Evaluator<DynBackend>,
}

impl AppState {
    /// Creates an empty, loading state using the default math backend.
    #[must_use]
    pub fn new() -> Self {
        Self::with_backend(Box::new(FastevalBackend))
    }

    /// Creates an empty, loading state evaluating through `backend`.
    #[must_use]
    pub fn with_backend(backend: DynBackend) -> Self {
        Self {
            field: InputField::default(),
            outcome: Outcome::Empty,
            settings: Settings::default(),
            history: History::new(),
            phase: SessionPhase::Loading,
            copied: false,
            evaluator: Evaluator::new(backend),
        }
    }

    #[must_use]
    pub fn expression(&self) -> &str {
        self.field.text()
    }

    /// Re-evaluates the current text under the current precision.
    ///
    /// Returns `true` if the outcome changed.
    pub fn recompute(&mut self) -> bool {
        let next = if self.phase.is_ready() {
            self.evaluator
                .evaluate(self.field.text(), self.settings.precision)
        } else {
            Outcome::Empty
        };

        if next == self.outcome {
            return false;
        }

        tracing::trace!(expression = %self.field.text(), outcome = ?next, "outcome updated");
        self.outcome = next;
        true
    }

    /// Replaces the input field, clears `copied` and re-evaluates.
    pub fn set_field(&mut self, field: InputField) {
        self.field = field;
        self.copied = false;
        self.recompute();
    }

    /// Replaces the text, moving the cursor to its end.
    pub fn set_expression(&mut self, text: impl Into<String>) {
        self.set_field(InputField::new(text));
    }

    /// Bracket balance of the current text.
    #[must_use]
    pub fn brackets(&self) -> BracketBalance {
        BracketBalance::of(self.field.text())
    }

    /// Hint for missing brackets, `None` when balanced or empty.
    #[must_use]
    pub fn missing_brackets(&self) -> Option<MissingBrackets> {
        BracketBalance::missing_hint(self.field.text())
    }

    /// Whether the current outcome may be committed to the history.
    #[must_use]
    pub fn can_commit(&self) -> bool {
        self.settings.history_enabled
            && !self.field.text().trim().is_empty()
            && self.outcome.value().is_some()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("field", &self.field)
            .field("outcome", &self.outcome)
            .field("settings", &self.settings)
            .field("history", &self.history.len())
            .field("phase", &self.phase)
            .field("copied", &self.copied)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Precision;

    fn ready() -> AppState {
        let mut state = AppState::new();
        state.phase = SessionPhase::Ready;
        state
    }

    #[test]
    fn test_loading_suppresses_evaluation() {
        let mut state = AppState::new();
        state.set_expression("1+1");
        assert_eq!(state.outcome, Outcome::Empty);

        state.phase = SessionPhase::Ready;
        assert!(state.recompute());
        assert_eq!(state.outcome, Outcome::Value("2".into()));
    }

    #[test]
    fn test_recompute_follows_precision() {
        let mut state = ready();
        state.set_expression("2/3");
        assert_eq!(state.outcome, Outcome::Value("0.6666666667".into()));

        state.settings.precision = Precision::clamped(2);
        assert!(state.recompute());
        assert_eq!(state.outcome, Outcome::Value("0.67".into()));
        assert!(!state.recompute());
    }

    #[test]
    fn test_edit_clears_copied() {
        let mut state = ready();
        state.copied = true;
        state.set_expression("3");
        assert!(!state.copied);
    }

    #[test]
    fn test_can_commit() {
        let mut state = ready();
        assert!(!state.can_commit());

        state.set_expression("1+");
        assert!(!state.can_commit());

        state.set_expression("1+2");
        assert!(state.can_commit());

        state.settings.history_enabled = false;
        assert!(!state.can_commit());
    }

    #[test]
    fn test_bracket_hint() {
        let mut state = ready();
        state.set_expression("((1+2)");
        assert_eq!(state.brackets().balance, 1);
        assert_eq!(
            state.missing_brackets().map(|m| m.to_string()),
            Some(") missing x1".to_string())
        );
    }
}
