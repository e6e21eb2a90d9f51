//! Terminal palettes for the calculator themes and ANSI escape helpers.
//!
//! Each [`Theme`] maps to a small [`Palette`]: the theme's primary colour for
//! results, a text colour matching its light or dark base, and a shared error
//! colour.
//!
//! # Example
//!
//! ```rust
//! use popcalc::domain::Theme;
//! use popcalc::ui::theme::Palette;
//!
//! let palette = Palette::for_theme(Theme::Dracula);
//! println!("{}42{}", Palette::fg(palette.accent), Palette::reset());
//! ```

use crate::domain::Theme;

const LIGHT_TEXT: &str = "#1f2937";
const DARK_TEXT: &str = "#e5e7eb";
const ERROR: &str = "#f87272";

/// Colours used by the terminal renderer, as hex strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    /// Result and highlight colour.
    pub accent: &'static str,
    /// Normal text colour.
    pub text: &'static str,
    /// Error marker colour.
    pub error: &'static str,
}

impl Palette {
    /// Palette for `theme`.
    #[must_use]
    pub const fn for_theme(theme: Theme) -> Self {
        let (accent, light) = match theme {
            Theme::Light => ("#570df8", true),
            Theme::Dark => ("#661ae6", false),
            Theme::Cupcake => ("#65c3c8", true),
            Theme::Bumblebee => ("#e0a82e", true),
            Theme::Emerald => ("#66cc8a", true),
            Theme::Corporate => ("#4b6bfb", true),
            Theme::Synthwave => ("#e779c1", false),
            Theme::Retro => ("#ef9995", true),
            Theme::Cyberpunk => ("#ff7598", true),
            Theme::Valentine => ("#e96d7b", true),
            Theme::Halloween => ("#f28c18", false),
            Theme::Garden => ("#5c7f67", true),
            Theme::Forest => ("#1eb854", false),
            Theme::Aqua => ("#09ecf3", false),
            Theme::Lofi => ("#0d0d0d", true),
            Theme::Pastel => ("#d1c1d7", true),
            Theme::Fantasy => ("#6e0b75", true),
            Theme::Wireframe => ("#b8b8b8", true),
            Theme::Black => ("#ffffff", false),
            Theme::Luxury => ("#dca54c", false),
            Theme::Dracula => ("#ff79c6", false),
            Theme::Cmyk => ("#45aeee", true),
            Theme::Autumn => ("#8c0327", true),
            Theme::Business => ("#1c4e80", false),
            Theme::Acid => ("#ff00f4", true),
            Theme::Lemonade => ("#519903", true),
            Theme::Night => ("#38bdf8", false),
            Theme::Coffee => ("#db924b", false),
            Theme::Winter => ("#047aff", true),
            Theme::Dim => ("#9fe88d", false),
            Theme::Nord => ("#5e81ac", true),
            Theme::Sunset => ("#ff865b", false),
        };

        Self {
            accent,
            text: if light { LIGHT_TEXT } else { DARK_TEXT },
            error: ERROR,
        }
    }

    /// Parses `#rrggbb`; returns white on malformed input.
    fn hex_to_rgb(hex: &str) -> (u8, u8, u8) {
        let hex = hex.trim_start_matches('#').trim();

        if hex.len() != 6 {
            return (255, 255, 255);
        }

        let r = u8::from_str_radix(&hex[0..2], 16).unwrap_or(255);
        let g = u8::from_str_radix(&hex[2..4], 16).unwrap_or(255);
        let b = u8::from_str_radix(&hex[4..6], 16).unwrap_or(255);

        (r, g, b)
    }

    /// ANSI 24-bit foreground colour escape sequence.
    #[must_use]
    pub fn fg(hex: &str) -> String {
        let (r, g, b) = Self::hex_to_rgb(hex);
        format!("\u{001b}[38;2;{r};{g};{b}m")
    }

    #[must_use]
    pub const fn bold() -> &'static str {
        "\u{001b}[1m"
    }

    #[must_use]
    pub const fn dim() -> &'static str {
        "\u{001b}[2m"
    }

    /// Clears all styling.
    #[must_use]
    pub const fn reset() -> &'static str {
        "\u{001b}[0m"
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::for_theme(Theme::default())
    }
}
