//! Math backend abstraction and the default fasteval-based implementation.
//!
//! The evaluator never parses expressions itself. It hands the text to a
//! [`MathBackend`] and only classifies what comes back. The default backend
//! wraps `fasteval` with a namespace callback that supplies the functions and
//! constants fasteval does not build in (`sqrt`, `exp`, `ln`, `pi`, ...).

use super::format::round_to;
use std::f64::consts::{E, PI};
use thiserror::Error;

/// Function names the default backend understands.
///
/// Used to recognise a bare function reference such as `sin` with no call.
pub const FUNCTION_NAMES: &[&str] = &[
    "sin", "cos", "tan", "asin", "acos", "atan", "sinh", "cosh", "tanh", "asinh", "acosh", "atanh",
    "sqrt", "cbrt", "exp", "ln", "log", "log10", "log2", "abs", "ceil", "floor", "round", "sign",
    "int", "min", "max",
];

/// Value produced by a math backend.
#[derive(Debug, Clone, PartialEq)]
pub enum MathValue {
    /// A real number, finite or not.
    Number(f64),
    /// A function referenced without being called.
    Callable(String),
    /// Any other value, already converted to the backend's own string form.
    Other(String),
}

/// Error raised by a math backend for input it cannot evaluate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MathError {
    #[error("invalid expression: {0}")]
    Invalid(String),
}

/// External evaluator turning expression text into a value.
///
/// Implementations must be deterministic and free of side effects.
pub trait MathBackend {
    /// Evaluates `expression`.
    ///
    /// # Errors
    ///
    /// Returns [`MathError`] for syntax errors, unknown names or wrong arity.
    fn evaluate(&self, expression: &str) -> Result<MathValue, MathError>;
}

impl<B: MathBackend + ?Sized> MathBackend for Box<B> {
    fn evaluate(&self, expression: &str) -> Result<MathValue, MathError> {
        (**self).evaluate(expression)
    }
}

/// Default backend built on `fasteval`.
///
/// `log(x)` is the natural logarithm and `log(x, base)` takes the base second;
/// both are routed to the `ln` callback because fasteval's built-in `log` is
/// base 10 with the base first. Likewise `round(x, n)` rounds to `n` decimal
/// places (0 to 15, ties away from zero) instead of fasteval's
/// `round(modulus, x)`.
///
/// # Example
///
/// ```
/// use popcalc::calculator::{FastevalBackend, MathBackend, MathValue};
///
/// let backend = FastevalBackend;
/// assert_eq!(backend.evaluate("2^3 + sqrt(16)"), Ok(MathValue::Number(12.0)));
/// assert_eq!(backend.evaluate("round(1.23456, 2)"), Ok(MathValue::Number(1.23)));
/// assert_eq!(backend.evaluate("sin"), Ok(MathValue::Callable("sin".to_string())));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct FastevalBackend;

impl MathBackend for FastevalBackend {
    fn evaluate(&self, expression: &str) -> Result<MathValue, MathError> {
        let trimmed = expression.trim();
        if FUNCTION_NAMES.contains(&trimmed) {
            return Ok(MathValue::Callable(trimmed.to_string()));
        }

        let normalized = normalize(trimmed);
        let mut bare_function: Option<String> = None;

        let mut namespace = |name: &str, args: Vec<f64>| -> Option<f64> {
            let value = call_extension(name, &args);
            if value.is_none() && args.is_empty() && FUNCTION_NAMES.contains(&name) {
                bare_function = Some(name.to_string());
            }
            value
        };

        match fasteval::ez_eval(&normalized, &mut namespace) {
            Ok(value) => Ok(MathValue::Number(value)),
            Err(e) => bare_function.map_or_else(
                || Err(MathError::Invalid(format!("{e:?}"))),
                |name| Ok(MathValue::Callable(name)),
            ),
        }
    }
}

/// Resolves names fasteval leaves to the namespace.
fn call_extension(name: &str, args: &[f64]) -> Option<f64> {
    match (name, args) {
        ("pi", []) => Some(PI),
        ("e", []) => Some(E),
        ("sqrt", [x]) => Some(x.sqrt()),
        ("cbrt", [x]) => Some(x.cbrt()),
        ("exp", [x]) => Some(x.exp()),
        ("ln", [x]) => Some(x.ln()),
        ("ln", [x, base]) => Some(x.ln() / base.ln()),
        ("log10", [x]) => Some(x.log10()),
        ("log2", [x]) => Some(x.log2()),
        (ROUND, [x]) => Some(round_to(*x, 0)),
        (ROUND, [x, places]) => decimal_places(*places).map(|d| round_to(*x, d)),
        _ => None,
    }
}

/// Namespace name `round` is rewritten to, bypassing fasteval's built-in.
const ROUND: &str = "roundto";

/// Accepts whole numbers of decimal places from 0 to 15.
fn decimal_places(places: f64) -> Option<usize> {
    if places.fract() != 0.0 || !(0.0..=15.0).contains(&places) {
        return None;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    Some(places as usize)
}

/// Rewrites typographic symbols and the `log` and `round` identifiers into
/// fasteval syntax.
fn normalize(expression: &str) -> String {
    let mut out = String::with_capacity(expression.len());
    let mut ident = String::new();

    let flush = |ident: &mut String, out: &mut String| {
        match ident.as_str() {
            "log" => out.push_str("ln"),
            "round" => out.push_str(ROUND),
            other => out.push_str(other),
        }
        ident.clear();
    };

    for c in expression.chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            // Digits only continue an identifier, they never start one.
            if ident.is_empty() && c.is_ascii_digit() {
                out.push(c);
            } else {
                ident.push(c);
            }
            continue;
        }

        flush(&mut ident, &mut out);
        match c {
            '×' => out.push('*'),
            '÷' => out.push('/'),
            'π' => out.push_str("pi"),
            '−' => out.push('-'),
            other => out.push(other),
        }
    }
    flush(&mut ident, &mut out);

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn number(expression: &str) -> f64 {
        match FastevalBackend.evaluate(expression) {
            Ok(MathValue::Number(v)) => v,
            other => panic!("{expression}: expected number, got {other:?}"),
        }
    }

    #[test]
    fn test_operator_precedence() {
        assert!((number("2 + 3 * 4") - 14.0).abs() < f64::EPSILON);
        assert!((number("(2 + 3) * 4") - 20.0).abs() < f64::EPSILON);
        assert!((number("2^10") - 1024.0).abs() < f64::EPSILON);
        assert!((number("10 % 3") - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_extension_functions() {
        assert!((number("sqrt(16)") - 4.0).abs() < f64::EPSILON);
        assert!((number("exp(0)") - 1.0).abs() < f64::EPSILON);
        assert!((number("log10(1000)") - 3.0).abs() < 1e-12);
        assert!((number("log(e)") - 1.0).abs() < 1e-12);
        assert!((number("log(8, 2)") - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_round_takes_decimal_places_second() {
        assert!((number("round(1.23456, 2)") - 1.23).abs() < f64::EPSILON);
        assert!((number("round(1.23456)") - 1.0).abs() < f64::EPSILON);
        assert!((number("round(2.5)") - 3.0).abs() < f64::EPSILON);
        assert!((number("round(-2.5)") + 3.0).abs() < f64::EPSILON);
        assert!((number("round(0.125, 2)") - 0.13).abs() < f64::EPSILON);
        assert!((number("2 * round(1.26, 1)") - 2.6).abs() < 1e-12);
    }

    #[test]
    fn test_round_rejects_bad_decimal_places() {
        assert!(FastevalBackend.evaluate("round(3.14159, 1.5)").is_err());
        assert!(FastevalBackend.evaluate("round(3.14159, -1)").is_err());
        assert!(FastevalBackend.evaluate("round(3.14159, 16)").is_err());
    }

    #[test]
    fn test_constants() {
        assert!((number("pi") - PI).abs() < f64::EPSILON);
        assert!((number("2 * π") - 2.0 * PI).abs() < 1e-12);
        assert!((number("e") - E).abs() < f64::EPSILON);
    }

    #[test]
    fn test_typographic_operators() {
        assert!((number("6 × 7") - 42.0).abs() < f64::EPSILON);
        assert!((number("9 ÷ 3") - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_non_finite_numbers_are_returned_as_numbers() {
        assert!(number("1/0").is_infinite());
        assert!(number("sqrt(-1)").is_nan());
    }

    #[test]
    fn test_bare_function_is_callable() {
        assert_eq!(
            FastevalBackend.evaluate("  sqrt "),
            Ok(MathValue::Callable("sqrt".to_string()))
        );
    }

    #[test]
    fn test_invalid_syntax_is_error() {
        assert!(FastevalBackend.evaluate("2 +* 2").is_err());
        assert!(FastevalBackend.evaluate("(1 + 2").is_err());
        assert!(FastevalBackend.evaluate("unknown_name + 1").is_err());
    }

    #[test]
    fn test_normalize_rewrites_log_identifier_only() {
        assert_eq!(normalize("log(2) + log10(3)"), "ln(2) + log10(3)");
        assert_eq!(normalize("blog(1)"), "blog(1)");
        assert_eq!(normalize("round(1.5, 1)"), "roundto(1.5, 1)");
        assert_eq!(normalize("2×π"), "2*pi");
    }
}
