//! Parenthesis balance tracking.
//!
//! Every `(` and `)` counts literally. There is no awareness of quoting or of
//! other bracket kinds, and no attempt to pair brackets up.

use std::fmt;

/// Open/close counts of an expression and their difference.
///
/// Derived from the current text on every change and never stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BracketBalance {
    pub open: usize,
    pub close: usize,
    /// `open - close`. Positive means closers are missing, negative openers.
    pub balance: isize,
}

impl BracketBalance {
    /// Counts brackets in a single forward scan.
    ///
    /// ```
    /// use popcalc::editor::BracketBalance;
    ///
    /// let b = BracketBalance::of("(1+(2)");
    /// assert_eq!((b.open, b.close, b.balance), (2, 1, 1));
    /// ```
    #[must_use]
    pub fn of(text: &str) -> Self {
        let (open, close) = text.chars().fold((0usize, 0usize), |(open, close), c| match c {
            '(' => (open + 1, close),
            ')' => (open, close + 1),
            _ => (open, close),
        });

        #[allow(clippy::cast_possible_wrap)]
        let balance = open as isize - close as isize;

        Self {
            open,
            close,
            balance,
        }
    }

    #[must_use]
    pub const fn is_balanced(&self) -> bool {
        self.balance == 0
    }

    /// The "N missing" indicator for the input field.
    ///
    /// `None` when the text is empty or balanced.
    #[must_use]
    pub fn missing_hint(text: &str) -> Option<MissingBrackets> {
        if text.is_empty() {
            return None;
        }

        let balance = Self::of(text).balance;
        match balance {
            0 => None,
            b if b > 0 => Some(MissingBrackets {
                bracket: ')',
                count: b.unsigned_abs(),
            }),
            b => Some(MissingBrackets {
                bracket: '(',
                count: b.unsigned_abs(),
            }),
        }
    }
}

/// Which bracket is missing and how many of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MissingBrackets {
    pub bracket: char,
    pub count: usize,
}

impl fmt::Display for MissingBrackets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} missing x{}", self.bracket, self.count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(text: &str) -> (usize, usize, isize) {
        let b = BracketBalance::of(text);
        (b.open, b.close, b.balance)
    }

    #[test]
    fn test_unmatched_opener() {
        assert_eq!(counts("(1+2"), (1, 0, 1));
    }

    #[test]
    fn test_unmatched_closer() {
        assert_eq!(counts("1+2)"), (0, 1, -1));
    }

    #[test]
    fn test_nested_balanced() {
        assert_eq!(counts("(1+(2))"), (2, 2, 0));
        assert!(BracketBalance::of("(1+(2))").is_balanced());
    }

    #[test]
    fn test_counts_are_literal() {
        // Order does not matter, only totals.
        assert_eq!(counts(")("), (1, 1, 0));
        assert_eq!(counts(""), (0, 0, 0));
    }

    #[test]
    fn test_missing_hint() {
        assert_eq!(BracketBalance::missing_hint(""), None);
        assert_eq!(BracketBalance::missing_hint("(1)"), None);
        assert_eq!(
            BracketBalance::missing_hint("((1"),
            Some(MissingBrackets { bracket: ')', count: 2 })
        );
        assert_eq!(
            BracketBalance::missing_hint("1)").map(|m| m.to_string()),
            Some("( missing x1".to_string())
        );
    }
}
