//! Evaluate-and-classify contract.
//!
//! Turns raw expression text into an [`Outcome`]: blank input is `Empty`,
//! anything the backend rejects or that is not a finite real value is
//! `Failure`, everything else becomes a display string. Failure causes are
//! logged at trace level and otherwise collapsed.

use super::backend::{FastevalBackend, MathBackend, MathValue};
use super::format::format_with_precision;
use crate::domain::Precision;

/// Classified result of evaluating an expression.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Outcome {
    /// Blank or whitespace-only input. Not an error.
    #[default]
    Empty,
    /// A formatted numeric result or a backend-stringified value.
    Value(String),
    /// Invalid input, a non-finite or non-real result, or a bare function.
    Failure,
}

impl Outcome {
    /// The displayable result, if evaluation succeeded with a non-empty value.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        match self {
            Self::Value(text) if !text.is_empty() => Some(text),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Failure)
    }
}

/// Evaluates `text` with the default backend.
///
/// # Examples
///
/// ```
/// use popcalc::calculator::{evaluate, Outcome};
/// use popcalc::domain::Precision;
///
/// assert_eq!(evaluate("   ", Precision::MAX), Outcome::Empty);
/// assert_eq!(evaluate("2^3 + sqrt(16)", Precision::MAX), Outcome::Value("12".into()));
/// assert_eq!(evaluate("1/0", Precision::MAX), Outcome::Failure);
/// ```
#[must_use]
pub fn evaluate(text: &str, precision: Precision) -> Outcome {
    evaluate_with(&FastevalBackend, text, precision)
}

/// Evaluates `text` with an explicit backend.
pub fn evaluate_with<B: MathBackend + ?Sized>(backend: &B, text: &str, precision: Precision) -> Outcome {
    if text.trim().is_empty() {
        return Outcome::Empty;
    }

    match backend.evaluate(text) {
        Ok(MathValue::Number(value)) if value.is_finite() => {
            Outcome::Value(format_with_precision(value, precision))
        }
        Ok(MathValue::Number(value)) => {
            tracing::trace!(expression = %text, value = %value, "non-finite result");
            Outcome::Failure
        }
        Ok(MathValue::Callable(name)) => {
            tracing::trace!(expression = %text, function = %name, "bare function reference");
            Outcome::Failure
        }
        Ok(MathValue::Other(rendered)) => Outcome::Value(rendered),
        Err(e) => {
            tracing::trace!(expression = %text, error = %e, "backend rejected expression");
            Outcome::Failure
        }
    }
}

/// Evaluator remembering the last `(text, precision)` it computed.
///
/// Repeating the same request returns the cached outcome without calling the
/// backend. Observable results are identical to [`evaluate_with`].
#[derive(Debug, Default)]
pub struct Evaluator<B = FastevalBackend> {
    backend: B,
    last: Option<(String, Precision, Outcome)>,
}

impl<B: MathBackend> Evaluator<B> {
    #[must_use]
    pub const fn new(backend: B) -> Self {
        Self {
            backend,
            last: None,
        }
    }

    /// Evaluates `text`, reusing the previous outcome when nothing changed.
    pub fn evaluate(&mut self, text: &str, precision: Precision) -> Outcome {
        if let Some((last_text, last_precision, outcome)) = &self.last {
            if last_text == text && *last_precision == precision {
                return outcome.clone();
            }
        }

        let outcome = evaluate_with(&self.backend, text, precision);
        self.last = Some((text.to_string(), precision, outcome.clone()));
        outcome
    }
}
