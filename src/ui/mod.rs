//! Terminal presentation for the calculator.
//!
//! # Architecture
//!
//! ```text
//! AppState → CalculatorViewModel / HistoryRow → render* → ANSI text
//! ```
//!
//! # Modules
//!
//! - [`viewmodel`]: Display-ready snapshots of session state
//! - [`renderer`]: Turns view models into styled lines
//! - [`theme`]: Per-theme palettes and ANSI escape helpers

pub mod renderer;
pub mod theme;
pub mod viewmodel;

pub use renderer::{render, render_history, render_settings};
pub use theme::Palette;
pub use viewmodel::{history_rows, CalculatorViewModel, HistoryRow, ResultLine};
