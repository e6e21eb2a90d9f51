//! View model types representing renderable calculator state.
//!
//! View models are computed from [`AppState`] and consumed by the renderer.
//! They contain no business logic, only display-ready data.

use crate::app::AppState;
use crate::calculator::Outcome;
use crate::domain::Theme;

/// What the result line shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultLine {
    /// Nothing typed yet, or still loading.
    Blank,
    /// A result ready to commit or copy.
    Value(String),
    /// The expression does not evaluate.
    Error,
}

/// Everything the main calculator view displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalculatorViewModel {
    pub expression: String,
    /// Cursor position in characters.
    pub cursor: usize,
    pub result: ResultLine,
    /// Bracket indicator text, e.g. `) missing x2`.
    pub bracket_hint: Option<String>,
    pub copied: bool,
    pub loading: bool,
    pub theme: Theme,
}

impl CalculatorViewModel {
    #[must_use]
    pub fn from_state(state: &AppState) -> Self {
        let result = match &state.outcome {
            Outcome::Failure => ResultLine::Error,
            outcome => outcome
                .value()
                .map_or(ResultLine::Blank, |v| ResultLine::Value(v.to_string())),
        };

        Self {
            expression: state.expression().to_string(),
            cursor: state.field.cursor(),
            result,
            bracket_hint: state.missing_brackets().map(|m| m.to_string()),
            copied: state.copied,
            loading: !state.phase.is_ready(),
            theme: state.settings.theme,
        }
    }
}

/// One row of the history list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRow {
    pub index: usize,
    pub expression: String,
    pub result: String,
    /// Local time the entry was committed, `HH:MM:SS`.
    pub time: String,
}

/// The history list, newest first.
#[must_use]
pub fn history_rows(state: &AppState) -> Vec<HistoryRow> {
    state
        .history
        .items()
        .iter()
        .enumerate()
        .map(|(index, item)| HistoryRow {
            index,
            expression: item.expression.clone(),
            result: item.result.clone(),
            time: chrono::DateTime::from_timestamp_millis(item.timestamp).map_or_else(
                || "--:--:--".to_string(),
                |utc| {
                    utc.with_timezone(&chrono::Local)
                        .format("%H:%M:%S")
                        .to_string()
                },
            ),
        })
        .collect()
}
