//! Precision formatting for numeric results.
//!
//! Rounding works on the exact binary value of the `f64`. Exact ties round
//! away from zero: `0.125` (exactly representable) formats as `0.13` at two
//! digits, while `1.005` (stored slightly below) formats as `1`.
//!
//! Magnitudes of `1e21` and above, and below `1e-6`, switch to exponent
//! notation (`1e+21`, `1e-7`).

use crate::domain::Precision;

const EXPONENT_ABOVE: f64 = 1e21;
const EXPONENT_BELOW: f64 = 1e-6;

/// Rounds `value` to `precision` fractional digits and renders the shortest
/// decimal string for the rounded value.
///
/// No trailing zeros are kept and integral results have no decimal point. A
/// result that rounds to zero is always `"0"`, never `"-0"`.
///
/// Callers must filter out non-finite values first.
///
/// # Examples
///
/// ```
/// use popcalc::calculator::format_with_precision;
/// use popcalc::domain::Precision;
///
/// assert_eq!(format_with_precision(0.1 + 0.2, Precision::MAX), "0.3");
/// assert_eq!(format_with_precision(2.0 / 3.0, Precision::clamped(2)), "0.67");
/// assert_eq!(format_with_precision(2.5, Precision::clamped(0)), "3");
/// assert_eq!(format_with_precision(12.0, Precision::clamped(4)), "12");
/// assert_eq!(format_with_precision(1e300 * 10.0, Precision::MAX), "1e+301");
/// ```
#[must_use]
pub fn format_with_precision(value: f64, precision: Precision) -> String {
    debug_assert!(value.is_finite(), "format_with_precision needs a finite value");

    let rounded = round_to(value, usize::from(precision.digits()));
    if rounded == 0.0 {
        return "0".to_string();
    }

    let text = shortest(rounded.abs());
    if rounded < 0.0 {
        format!("-{text}")
    } else {
        text
    }
}

/// Rounds `value` to `digits` fractional digits, exact ties away from zero.
///
/// Non-finite values are returned unchanged.
pub(crate) fn round_to(value: f64, digits: usize) -> f64 {
    if !value.is_finite() {
        return value;
    }

    let magnitude = value.abs();

    // Formatting breaks ties to even; one ulp up lands strictly past the midpoint.
    let magnitude = if is_exact_tie(magnitude, digits) {
        f64::from_bits(magnitude.to_bits() + 1)
    } else {
        magnitude
    };

    let rounded = format!("{magnitude:.digits$}")
        .parse::<f64>()
        .unwrap_or(magnitude);

    if value.is_sign_negative() {
        -rounded
    } else {
        rounded
    }
}

/// Whether `magnitude` lies exactly halfway between two `digits`-place
/// decimals.
///
/// A dyadic value `m * 2^-k` (odd `m`) has exactly `k` fractional decimal
/// digits, the last being `5`, so it is a tie precisely when `k == digits + 1`.
fn is_exact_tie(magnitude: f64, digits: usize) -> bool {
    let bits = magnitude.to_bits();
    #[allow(clippy::cast_possible_wrap)]
    let biased = ((bits >> 52) & 0x7ff) as i64;
    let fraction = bits & ((1_u64 << 52) - 1);

    let (mantissa, exponent) = if biased == 0 {
        (fraction, -1074)
    } else {
        (fraction | (1_u64 << 52), biased - 1075)
    };
    if mantissa == 0 {
        return false;
    }

    let fractional_bits = -(exponent + i64::from(mantissa.trailing_zeros()));
    i64::try_from(digits).is_ok_and(|d| fractional_bits == d + 1)
}

/// Shortest round-trip text for a positive value.
fn shortest(magnitude: f64) -> String {
    if (EXPONENT_BELOW..EXPONENT_ABOVE).contains(&magnitude) {
        return magnitude.to_string();
    }

    let text = format!("{magnitude:e}");
    match text.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{mantissa}e+{exponent}")
        }
        _ => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fmt(value: f64, digits: i64) -> String {
        format_with_precision(value, Precision::clamped(digits))
    }

    #[test]
    fn test_integral_values_have_no_decimal_point() {
        assert_eq!(fmt(12.0, 10), "12");
        assert_eq!(fmt(-7.0, 3), "-7");
        assert_eq!(fmt(1e20, 2), "100000000000000000000");
    }

    #[test]
    fn test_large_and_tiny_values_use_exponents() {
        assert_eq!(fmt(1e21, 2), "1e+21");
        assert_eq!(fmt(1e300 * 10.0, 10), "1e+301");
        assert_eq!(fmt(-1.5e22, 0), "-1.5e+22");
        assert_eq!(fmt(0.000_000_1, 10), "1e-7");
        assert_eq!(fmt(0.000_001, 10), "0.000001");
    }

    #[test]
    fn test_trailing_zeros_are_dropped() {
        assert_eq!(fmt(0.5, 10), "0.5");
        assert_eq!(fmt(0.1 + 0.2, 10), "0.3");
        assert_eq!(fmt(1.0 / 3.0, 10), "0.3333333333");
    }

    #[test]
    fn test_precision_limits_fraction() {
        assert_eq!(fmt(std::f64::consts::PI, 0), "3");
        assert_eq!(fmt(std::f64::consts::PI, 2), "3.14");
        assert_eq!(fmt(std::f64::consts::PI, 4), "3.1416");
    }

    #[test]
    fn test_exact_ties_round_away_from_zero() {
        assert_eq!(fmt(0.125, 2), "0.13");
        assert_eq!(fmt(0.375, 2), "0.38");
        assert_eq!(fmt(0.5, 0), "1");
        assert_eq!(fmt(2.5, 0), "3");
        assert_eq!(fmt(3.5, 0), "4");
        assert_eq!(fmt(-2.5, 0), "-3");
        assert_eq!(fmt(-0.125, 2), "-0.13");
    }

    #[test]
    fn test_tie_detection_needs_exact_midpoint() {
        assert!(is_exact_tie(0.125, 2));
        assert!(is_exact_tie(2.5, 0));
        assert!(!is_exact_tie(0.125, 3));
        assert!(!is_exact_tie(0.25, 2));
        assert!(!is_exact_tie(1.005, 2));
        assert!(!is_exact_tie(0.0, 0));
    }

    #[test]
    fn test_round_to_keeps_sign_and_non_finite() {
        assert!((round_to(-1.23456, 2) + 1.23).abs() < f64::EPSILON);
        assert!((round_to(1.5, 0) - 2.0).abs() < f64::EPSILON);
        assert!(round_to(f64::INFINITY, 2).is_infinite());
        assert!(round_to(f64::NAN, 2).is_nan());
    }

    #[test]
    fn test_inexact_halves_follow_binary_value() {
        // 1.005 is stored as 1.00499999999999989...
        assert_eq!(fmt(1.005, 2), "1");
        // 2.675 is stored as 2.67499999999999982...
        assert_eq!(fmt(2.675, 2), "2.67");
    }

    #[test]
    fn test_rounding_to_zero_is_unsigned() {
        assert_eq!(fmt(-0.0001, 2), "0");
        assert_eq!(fmt(-0.0, 5), "0");
        assert_eq!(fmt(-0.4, 0), "0");
    }

    #[test]
    fn test_round_trip_is_within_precision() {
        let samples = [0.1, 2.675, -13.333_333, 1234.567_89, 9.999_999_999_9, 1e-12];
        for digits in 0..=10_i64 {
            #[allow(clippy::cast_possible_truncation)]
            let tolerance = 10f64.powi(-(digits as i32));
            for &v in &samples {
                let text = fmt(v, digits);
                assert!(!text.contains('.') || !text.ends_with('0'), "{text}");
                let back: f64 = text.parse().unwrap();
                assert!((back - v).abs() <= tolerance, "{v} at {digits} -> {text}");
            }
        }
    }
}
