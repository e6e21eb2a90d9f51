//! Terminal front end and entry point.
//!
//! A line-oriented stand-in for the popup window: every line read from
//! stdin is either a batch of keystrokes or a `:command`, and the calculator
//! is redrawn after each one.
//!
//! # Lifecycle
//!
//! 1. **Configure**: `--config PATH`, else `<config dir>/popcalc/config.toml`
//!    if present, then `POPCALC_*` environment overrides
//! 2. **Trace**: Start the rotating log file under the data directory
//! 3. **Initialize**: Pick storage, load settings and history
//! 4. **Loop**: Map input to session operations, render
//! 5. **Exit**: Flush pending writes on `:quit` or end of input
//!
//! # Input
//!
//! - Any text: typed one character at a time, with bracket assistance
//! - Empty line: `Enter` (commit the result to history)
//! - `:expr TEXT`: replace the whole expression
//! - `:left` `:right` `:home` `:end` `:back` `:del` `:esc`: editing keys
//! - `:copy`: copy the result
//! - `:history`: list history; `:pick N` loads entry `N`; `:clear` empties it
//! - `:history on|off`: enable or disable recording
//! - `:precision N`, `:theme NAME`, `:settings`
//! - `:quit`

#![allow(clippy::multiple_crate_versions)]

use popcalc::domain::{Precision, SettingsPatch, Theme};
use popcalc::editor::KeyPress;
use popcalc::observability::init_tracing;
use popcalc::ui::{self, CalculatorViewModel, Palette};
use popcalc::{initialize, CalculatorSession, Config, PopcalcError};
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

const USAGE: &str = "usage: popcalc [--config PATH]";

/// One parsed line of input.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Input {
    Type(String),
    Key(KeyPress),
    SetExpression(String),
    Copy,
    ShowHistory,
    Pick(usize),
    ClearHistory,
    Settings(SettingsPatch),
    ShowSettings,
    Quit,
    Invalid(String),
}

impl Input {
    fn parse(line: &str) -> Self {
        let Some(command) = line.strip_prefix(':') else {
            return if line.is_empty() {
                Self::Key(KeyPress::Enter)
            } else {
                Self::Type(line.to_string())
            };
        };

        let (name, arg) = command
            .split_once(' ')
            .map_or((command, ""), |(name, arg)| (name, arg.trim()));

        match (name, arg) {
            ("expr", text) => Self::SetExpression(text.to_string()),
            ("left", "") => Self::Key(KeyPress::Left),
            ("right", "") => Self::Key(KeyPress::Right),
            ("home", "") => Self::Key(KeyPress::Home),
            ("end", "") => Self::Key(KeyPress::End),
            ("back", "") => Self::Key(KeyPress::Backspace),
            ("del", "") => Self::Key(KeyPress::Delete),
            ("esc", "") => Self::Key(KeyPress::Escape),
            ("copy", "") => Self::Copy,
            ("history", "") => Self::ShowHistory,
            ("history", "on") => Self::Settings(SettingsPatch::history_enabled(true)),
            ("history", "off") => Self::Settings(SettingsPatch::history_enabled(false)),
            ("pick", n) => n
                .parse()
                .map_or_else(|_| Self::Invalid(format!("not an index: {n}")), Self::Pick),
            ("clear", "") => Self::ClearHistory,
            ("precision", n) => n
                .parse::<u8>()
                .ok()
                .and_then(Precision::new)
                .map_or_else(
                    || Self::Invalid(format!("precision must be 0-{}", Precision::MAX)),
                    |p| Self::Settings(SettingsPatch::precision(p)),
                ),
            ("theme", name) => name
                .parse::<Theme>()
                .map_or_else(Self::Invalid, |t| Self::Settings(SettingsPatch::theme(t))),
            ("settings", "") => Self::ShowSettings,
            ("quit" | "q", "") => Self::Quit,
            _ => Self::Invalid(format!("unknown command: :{command}")),
        }
    }
}

fn load_config() -> popcalc::Result<Config> {
    let mut args = std::env::args().skip(1);
    let explicit = match (args.next().as_deref(), args.next()) {
        (None, _) => None,
        (Some("--config"), Some(path)) => Some(PathBuf::from(path)),
        _ => return Err(PopcalcError::Config(USAGE.to_string())),
    };

    let config = match explicit {
        Some(path) => Config::from_file(&path)?,
        None => match dirs::config_dir().map(|dir| dir.join("popcalc").join("config.toml")) {
            Some(path) if path.is_file() => Config::from_file(&path)?,
            _ => Config::default(),
        },
    };

    Ok(config.with_env())
}

/// Applies one line of input. Returns the text to print, or `None` to quit.
fn apply(session: &mut CalculatorSession, input: Input) -> Option<String> {
    tracing::debug!(input = ?input, "input");
    let palette = Palette::for_theme(session.settings().theme);

    match input {
        Input::Type(text) => {
            for c in text.chars() {
                session.handle_key(KeyPress::Char(c));
            }
        }
        Input::Key(key) => session.handle_key(key),
        Input::SetExpression(text) => session.set_expression(text),
        Input::Copy => session.copy_result(),
        Input::ShowHistory => {
            return Some(ui::render_history(&ui::history_rows(session.state()), &palette));
        }
        Input::Pick(index) => session.select_history_item(index),
        Input::ClearHistory => session.clear_history(),
        Input::Settings(patch) => session.update_settings(patch),
        Input::ShowSettings => return Some(ui::render_settings(session.settings())),
        Input::Quit => return None,
        Input::Invalid(message) => {
            return Some(format!("  {}{message}{}\n", Palette::fg(palette.error), Palette::reset()));
        }
    }

    Some(ui::render(&CalculatorViewModel::from_state(session.state())))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> popcalc::Result<()> {
    let config = load_config()?;
    init_tracing(&config);
    tracing::info!(data_dir = %config.data_dir.display(), "popcalc starting");

    let mut session = initialize(&config).await;
    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    stdout
        .write_all(ui::render(&CalculatorViewModel::from_state(session.state())).as_bytes())
        .await?;
    stdout.flush().await?;

    while let Some(line) = lines.next_line().await? {
        let Some(output) = apply(&mut session, Input::parse(line.trim_end_matches('\r'))) else {
            break;
        };
        stdout.write_all(output.as_bytes()).await?;
        stdout.flush().await?;
    }

    session.flush().await?;
    tracing::info!("popcalc exiting");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_text_and_enter() {
        assert_eq!(Input::parse("2+2"), Input::Type("2+2".into()));
        assert_eq!(Input::parse(""), Input::Key(KeyPress::Enter));
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(Input::parse(":expr 1 + 1"), Input::SetExpression("1 + 1".into()));
        assert_eq!(Input::parse(":back"), Input::Key(KeyPress::Backspace));
        assert_eq!(Input::parse(":pick 3"), Input::Pick(3));
        assert_eq!(
            Input::parse(":history off"),
            Input::Settings(SettingsPatch::history_enabled(false))
        );
        assert_eq!(
            Input::parse(":theme nord"),
            Input::Settings(SettingsPatch::theme(Theme::Nord))
        );
        assert_eq!(Input::parse(":q"), Input::Quit);
    }

    #[test]
    fn test_parse_rejects_bad_arguments() {
        assert!(matches!(Input::parse(":precision 11"), Input::Invalid(_)));
        assert!(matches!(Input::parse(":pick x"), Input::Invalid(_)));
        assert!(matches!(Input::parse(":theme blue"), Input::Invalid(_)));
        assert!(matches!(Input::parse(":frobnicate"), Input::Invalid(_)));
    }
}
