//! Expression evaluation for the calculator.
//!
//! This module provides functionality to:
//! - Delegate expression text to a math backend (fasteval by default)
//! - Classify the backend's answer into an [`Outcome`]
//! - Format finite numbers to the configured precision

mod backend;
mod evaluation;
mod format;

pub use backend::{FastevalBackend, MathBackend, MathError, MathValue, FUNCTION_NAMES};
pub use evaluation::{evaluate, evaluate_with, Evaluator, Outcome};
pub use format::format_with_precision;
