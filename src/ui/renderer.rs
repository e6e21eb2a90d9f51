//! Line renderer for the terminal front end.
//!
//! Every function returns the styled text instead of printing it, so the
//! binary decides where output goes and tests can inspect it.

use crate::domain::Settings;
use crate::ui::theme::Palette;
use crate::ui::viewmodel::{CalculatorViewModel, HistoryRow, ResultLine};
use std::fmt::Write as _;

/// Renders the expression and result lines.
///
/// ```text
///   sqrt(16)+1
///   = 5
/// ```
#[must_use]
pub fn render(vm: &CalculatorViewModel) -> String {
    let palette = Palette::for_theme(vm.theme);
    let mut out = String::new();

    let _ = write!(out, "  {}{}{}", Palette::fg(palette.text), vm.expression, Palette::reset());
    if let Some(hint) = &vm.bracket_hint {
        let _ = write!(out, "  {}{}{}", Palette::dim(), hint, Palette::reset());
    }
    out.push('\n');

    if vm.loading {
        let _ = writeln!(out, "  {}loading...{}", Palette::dim(), Palette::reset());
        return out;
    }

    match &vm.result {
        ResultLine::Blank => {}
        ResultLine::Value(value) => {
            let _ = write!(
                out,
                "  {}{}= {}{}",
                Palette::bold(),
                Palette::fg(palette.accent),
                value,
                Palette::reset()
            );
            if vm.copied {
                let _ = write!(out, "  {}copied{}", Palette::dim(), Palette::reset());
            }
            out.push('\n');
        }
        ResultLine::Error => {
            let _ = writeln!(out, "  {}Error{}", Palette::fg(palette.error), Palette::reset());
        }
    }

    out
}

/// Renders the history list, newest first, with selectable indices.
#[must_use]
pub fn render_history(rows: &[HistoryRow], palette: &Palette) -> String {
    if rows.is_empty() {
        return format!("  {}No history yet{}\n", Palette::dim(), Palette::reset());
    }

    let mut out = String::new();
    for row in rows {
        let _ = writeln!(
            out,
            "  {dim}{index:>2}  {time}{reset}  {expr} {dim}={reset} {accent}{result}{reset}",
            dim = Palette::dim(),
            index = row.index,
            time = row.time,
            reset = Palette::reset(),
            expr = row.expression,
            accent = Palette::fg(palette.accent),
            result = row.result,
        );
    }
    out
}

/// Renders the current settings.
#[must_use]
pub fn render_settings(settings: &Settings) -> String {
    format!(
        "  precision: {}\n  history:   {}\n  theme:     {}\n",
        settings.precision,
        if settings.history_enabled { "on" } else { "off" },
        settings.theme
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Theme;

    fn vm(result: ResultLine) -> CalculatorViewModel {
        CalculatorViewModel {
            expression: "1+1".to_string(),
            cursor: 3,
            result,
            bracket_hint: None,
            copied: false,
            loading: false,
            theme: Theme::Dark,
        }
    }

    #[test]
    fn test_render_value_and_error() {
        assert!(render(&vm(ResultLine::Value("2".into()))).contains("= 2"));
        assert!(render(&vm(ResultLine::Error)).contains("Error"));
        assert_eq!(render(&vm(ResultLine::Blank)).lines().count(), 1);
    }

    #[test]
    fn test_render_copied_and_hint() {
        let mut model = vm(ResultLine::Value("2".into()));
        model.copied = true;
        model.bracket_hint = Some(") missing x1".into());
        let out = render(&model);
        assert!(out.contains("copied"));
        assert!(out.contains(") missing x1"));
    }

    #[test]
    fn test_render_settings() {
        let out = render_settings(&Settings::default());
        assert!(out.contains("precision: 10"));
        assert!(out.contains("history:   on"));
        assert!(out.contains("theme:     dark"));
    }

    #[test]
    fn test_render_empty_history() {
        assert!(render_history(&[], &Palette::default()).contains("No history yet"));
    }
}
