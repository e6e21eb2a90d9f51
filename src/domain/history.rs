//! Calculation history domain model.
//!
//! The history is a most-recent-first log of committed calculations. It is
//! capped at [`HISTORY_LIMIT`] entries: every insertion happens at the front and
//! whatever falls past the cap is dropped silently.

use serde::{Deserialize, Serialize};

/// Maximum number of entries kept in the history.
pub const HISTORY_LIMIT: usize = 50;

/// A committed calculation.
///
/// Created only from a successful, non-empty evaluation and never modified
/// afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryItem {
    /// Expression text exactly as it was typed.
    pub expression: String,
    /// Formatted result at the time of the commit.
    pub result: String,
    /// Unix timestamp in milliseconds.
    pub timestamp: i64,
}

impl HistoryItem {
    /// Creates an item stamped with the current time.
    ///
    /// # Examples
    ///
    /// ```
    /// use popcalc::domain::HistoryItem;
    ///
    /// let item = HistoryItem::new("2+2", "4");
    /// assert_eq!(item.expression, "2+2");
    /// assert!(item.timestamp > 0);
    /// ```
    pub fn new(expression: impl Into<String>, result: impl Into<String>) -> Self {
        Self {
            expression: expression.into(),
            result: result.into(),
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }
}

/// Ordered, capped list of [`HistoryItem`]s, newest first.
///
/// Serializes as a bare JSON array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct History {
    items: Vec<HistoryItem>,
}

impl History {
    /// Creates an empty history.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Builds a history from stored items, keeping at most [`HISTORY_LIMIT`].
    #[must_use]
    pub fn from_items(mut items: Vec<HistoryItem>) -> Self {
        items.truncate(HISTORY_LIMIT);
        Self { items }
    }

    /// Inserts `item` at the front, evicting the oldest entries past the cap.
    ///
    /// ```
    /// use popcalc::domain::{History, HistoryItem, HISTORY_LIMIT};
    ///
    /// let mut history = History::new();
    /// for i in 0..(HISTORY_LIMIT + 5) {
    ///     history.push_front(HistoryItem::new(format!("{i}"), format!("{i}")));
    /// }
    /// assert_eq!(history.len(), HISTORY_LIMIT);
    /// assert_eq!(history.items()[0].expression, "54");
    /// ```
    pub fn push_front(&mut self, item: HistoryItem) {
        self.items.insert(0, item);
        self.items.truncate(HISTORY_LIMIT);
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Entries, newest first.
    #[must_use]
    pub fn items(&self) -> &[HistoryItem] {
        &self.items
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&HistoryItem> {
        self.items.get(index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(n: usize) -> HistoryItem {
        HistoryItem {
            expression: format!("{n}+0"),
            result: n.to_string(),
            timestamp: i64::try_from(n).unwrap(),
        }
    }

    #[test]
    fn test_push_front_keeps_newest_first() {
        let mut history = History::new();
        history.push_front(item(1));
        history.push_front(item(2));
        assert_eq!(history.items()[0], item(2));
        assert_eq!(history.items()[1], item(1));
    }

    #[test]
    fn test_cap_evicts_oldest() {
        let mut history = History::new();
        for n in 0..120 {
            history.push_front(item(n));
        }
        assert_eq!(history.len(), HISTORY_LIMIT);
        assert_eq!(history.items().first(), Some(&item(119)));
        assert_eq!(history.items().last(), Some(&item(70)));
    }

    #[test]
    fn test_from_items_truncates_oversized_records() {
        let history = History::from_items((0..80).map(item).collect());
        assert_eq!(history.len(), HISTORY_LIMIT);
        assert_eq!(history.get(0), Some(&item(0)));
    }

    #[test]
    fn test_serializes_as_array() {
        let mut history = History::new();
        history.push_front(item(7));
        let json = serde_json::to_value(&history).unwrap();
        assert!(json.is_array());
        let back: History = serde_json::from_value(json).unwrap();
        assert_eq!(back, history);
    }
}
