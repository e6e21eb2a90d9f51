//! User-configurable display settings.
//!
//! Settings are a small record of three fields. They are loaded once when a
//! session starts, merged field by field over [`Settings::default`], and written
//! back whole after every change. Stored records use camelCase field names so a
//! record written by an older front end stays readable.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Number of fractional digits kept when formatting a numeric result.
///
/// Always within `0..=10`. Construction clamps out-of-range input instead of
/// failing, so a corrupted stored value can never leave the session without a
/// usable precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "u8")]
pub struct Precision(u8);

impl Precision {
    /// Largest supported precision.
    pub const MAX: Self = Self(10);

    /// Smallest supported precision (integral results only).
    pub const MIN: Self = Self(0);

    /// Clamps `digits` into `0..=10`.
    ///
    /// ```
    /// use popcalc::domain::Precision;
    ///
    /// assert_eq!(Precision::clamped(4).digits(), 4);
    /// assert_eq!(Precision::clamped(-3).digits(), 0);
    /// assert_eq!(Precision::clamped(99).digits(), 10);
    /// ```
    #[must_use]
    pub fn clamped(digits: i64) -> Self {
        let max = i64::from(Self::MAX.0);
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        Self(digits.clamp(0, max) as u8)
    }

    /// Returns the precision only if `digits` is one of the selectable values.
    #[must_use]
    pub fn new(digits: u8) -> Option<Self> {
        (digits <= Self::MAX.0).then_some(Self(digits))
    }

    /// Number of fractional digits.
    #[must_use]
    pub const fn digits(self) -> u8 {
        self.0
    }

    /// Every selectable precision, in ascending order.
    pub fn all() -> impl Iterator<Item = Self> {
        (Self::MIN.0..=Self::MAX.0).map(Self)
    }
}

impl Default for Precision {
    fn default() -> Self {
        Self::MAX
    }
}

impl From<i64> for Precision {
    fn from(value: i64) -> Self {
        Self::clamped(value)
    }
}

impl From<Precision> for u8 {
    fn from(value: Precision) -> Self {
        value.0
    }
}

impl fmt::Display for Precision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

macro_rules! themes {
    ($($variant:ident => $name:literal),* $(,)?) => {
        /// Colour theme selected in the settings panel.
        ///
        /// The engine only stores the choice; applying it is up to the front end.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum Theme {
            $(
                #[serde(rename = $name)]
                $variant,
            )*
        }

        impl Theme {
            /// Every available theme, in settings-panel order.
            pub const ALL: &'static [Theme] = &[$(Theme::$variant),*];

            /// Stored and displayed name of the theme.
            #[must_use]
            pub const fn name(self) -> &'static str {
                match self {
                    $(Theme::$variant => $name,)*
                }
            }
        }

        impl FromStr for Theme {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim() {
                    $($name => Ok(Theme::$variant),)*
                    other => Err(format!("unknown theme: {other}")),
                }
            }
        }
    };
}

themes! {
    Light => "light",
    Dark => "dark",
    Cupcake => "cupcake",
    Bumblebee => "bumblebee",
    Emerald => "emerald",
    Corporate => "corporate",
    Synthwave => "synthwave",
    Retro => "retro",
    Cyberpunk => "cyberpunk",
    Valentine => "valentine",
    Halloween => "halloween",
    Garden => "garden",
    Forest => "forest",
    Aqua => "aqua",
    Lofi => "lofi",
    Pastel => "pastel",
    Fantasy => "fantasy",
    Wireframe => "wireframe",
    Black => "black",
    Luxury => "luxury",
    Dracula => "dracula",
    Cmyk => "cmyk",
    Autumn => "autumn",
    Business => "business",
    Acid => "acid",
    Lemonade => "lemonade",
    Night => "night",
    Coffee => "coffee",
    Winter => "winter",
    Dim => "dim",
    Nord => "nord",
    Sunset => "sunset",
}

impl Default for Theme {
    fn default() -> Self {
        Self::Dark
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Display settings persisted between sessions.
///
/// # Example
///
/// ```
/// use popcalc::domain::{Precision, Settings, Theme};
///
/// let settings = Settings::default();
/// assert_eq!(settings.precision, Precision::MAX);
/// assert!(settings.history_enabled);
/// assert_eq!(settings.theme, Theme::Dark);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Fractional digits kept in numeric results.
    pub precision: Precision,
    /// Whether committed results are recorded in the history.
    pub history_enabled: bool,
    /// Selected colour theme.
    pub theme: Theme,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            precision: Precision::default(),
            history_enabled: true,
            theme: Theme::default(),
        }
    }
}

impl Settings {
    /// Returns a copy with every field present in `patch` replaced.
    #[must_use]
    pub fn merged(self, patch: &SettingsPatch) -> Self {
        Self {
            precision: patch.precision.unwrap_or(self.precision),
            history_enabled: patch.history_enabled.unwrap_or(self.history_enabled),
            theme: patch.theme.unwrap_or(self.theme),
        }
    }

    /// Builds settings from a stored record, falling back to defaults field by field.
    ///
    /// `None` (nothing stored) yields exactly the defaults. Fields that are
    /// missing, of the wrong type or unknown (such as a theme that no longer
    /// exists) keep their default value.
    #[must_use]
    pub fn from_stored(stored: Option<&Value>) -> Self {
        stored.map_or_else(Self::default, |value| {
            Self::default().merged(&SettingsPatch::from_json(value))
        })
    }
}

/// A partial settings update; `None` fields are left untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SettingsPatch {
    pub precision: Option<Precision>,
    pub history_enabled: Option<bool>,
    pub theme: Option<Theme>,
}

impl SettingsPatch {
    /// Patch changing only the precision.
    #[must_use]
    pub fn precision(precision: Precision) -> Self {
        Self {
            precision: Some(precision),
            ..Self::default()
        }
    }

    /// Patch toggling history recording.
    #[must_use]
    pub fn history_enabled(enabled: bool) -> Self {
        Self {
            history_enabled: Some(enabled),
            ..Self::default()
        }
    }

    /// Patch changing only the theme.
    #[must_use]
    pub fn theme(theme: Theme) -> Self {
        Self {
            theme: Some(theme),
            ..Self::default()
        }
    }

    /// Reads each known field independently from a JSON object.
    ///
    /// Numeric precision values are clamped; fractional ones are truncated.
    #[must_use]
    pub fn from_json(value: &Value) -> Self {
        let field = |name: &str| value.get(name);

        let precision = field("precision").and_then(|v| {
            v.as_i64()
                .or_else(|| v.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
                .map(Precision::clamped)
        });

        Self {
            precision,
            history_enabled: field("historyEnabled").and_then(Value::as_bool),
            theme: field("theme")
                .and_then(Value::as_str)
                .and_then(|name| name.parse().ok()),
        }
    }

    /// Returns `true` if no field would change.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.precision.is_none() && self.history_enabled.is_none() && self.theme.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_precision_clamps_into_range() {
        assert_eq!(Precision::clamped(-1), Precision::MIN);
        assert_eq!(Precision::clamped(11), Precision::MAX);
        assert_eq!(Precision::new(11), None);
        assert_eq!(Precision::all().count(), 11);
    }

    #[test]
    fn test_settings_serialize_camel_case() {
        let value = serde_json::to_value(Settings::default()).unwrap();
        assert_eq!(
            value,
            json!({ "precision": 10, "historyEnabled": true, "theme": "dark" })
        );
    }

    #[test]
    fn test_out_of_range_precision_deserializes_clamped() {
        let settings: Settings =
            serde_json::from_value(json!({ "precision": 42, "historyEnabled": false, "theme": "nord" }))
                .unwrap();
        assert_eq!(settings.precision, Precision::MAX);
        assert_eq!(settings.theme, Theme::Nord);
    }

    #[test]
    fn test_from_stored_without_record_is_default() {
        assert_eq!(Settings::from_stored(None), Settings::default());
    }

    #[test]
    fn test_from_stored_merges_field_by_field() {
        let stored = json!({ "precision": 3 });
        let settings = Settings::from_stored(Some(&stored));
        assert_eq!(settings.precision.digits(), 3);
        assert!(settings.history_enabled);
        assert_eq!(settings.theme, Theme::Dark);
    }

    #[test]
    fn test_from_stored_ignores_invalid_fields() {
        let stored = json!({ "precision": "high", "historyEnabled": 1, "theme": "neon" });
        assert_eq!(Settings::from_stored(Some(&stored)), Settings::default());
    }

    #[test]
    fn test_theme_names_round_trip() {
        for theme in Theme::ALL {
            assert_eq!(theme.name().parse::<Theme>(), Ok(*theme));
        }
        assert_eq!(Theme::ALL.len(), 32);
    }
}
