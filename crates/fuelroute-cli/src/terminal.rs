//! Terminal styling and number formatting.

/// ANSI escape codes for text styling and colors.
pub mod colors {
    /// Reset all styling.
    pub const RESET: &str = "\x1b[0m";
    /// Bold reverse green for the START tag.
    pub const TAG_START: &str = "\x1b[1;7;32m";
    /// Bold reverse yellow for FUEL tags.
    pub const TAG_FUEL: &str = "\x1b[1;7;33m";
    /// Bold reverse magenta for the GOAL tag.
    pub const TAG_GOAL: &str = "\x1b[1;7;35m";
    /// Bright bold white for station names.
    pub const WHITE_BOLD: &str = "\x1b[1;97m";
    /// Gray for addresses and decorations.
    pub const GRAY: &str = "\x1b[90m";
    /// Cyan for distances.
    pub const CYAN: &str = "\x1b[36m";
    /// Green for money.
    pub const GREEN: &str = "\x1b[32m";
}

/// Resolved color codes, or empty strings when color is disabled.
#[derive(Debug, Clone, Copy)]
pub struct ColorPalette {
    pub reset: &'static str,
    pub tag_start: &'static str,
    pub tag_fuel: &'static str,
    pub tag_goal: &'static str,
    pub white_bold: &'static str,
    pub gray: &'static str,
    pub cyan: &'static str,
    pub green: &'static str,
}

impl ColorPalette {
    #[must_use]
    pub const fn colored() -> Self {
        Self {
            reset: colors::RESET,
            tag_start: colors::TAG_START,
            tag_fuel: colors::TAG_FUEL,
            tag_goal: colors::TAG_GOAL,
            white_bold: colors::WHITE_BOLD,
            gray: colors::GRAY,
            cyan: colors::CYAN,
            green: colors::GREEN,
        }
    }

    #[must_use]
    pub const fn plain() -> Self {
        Self {
            reset: "",
            tag_start: "",
            tag_fuel: "",
            tag_goal: "",
            white_bold: "",
            gray: "",
            cyan: "",
            green: "",
        }
    }

    /// `colored()` when [`supports_color`] says so, otherwise `plain()`.
    #[must_use]
    pub fn detect() -> Self {
        if supports_color() {
            Self::colored()
        } else {
            Self::plain()
        }
    }
}

impl Default for ColorPalette {
    fn default() -> Self {
        Self::detect()
    }
}

/// Whether ANSI colors should be used.
///
/// Respects `NO_COLOR` (https://no-color.org/) and `TERM=dumb`.
#[must_use]
pub fn supports_color() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if let Ok(term) = std::env::var("TERM") {
        if term.eq_ignore_ascii_case("dumb") {
            return false;
        }
    }
    true
}

/// Format a number with thousand separators.
///
/// ```
/// # use fuelroute_cli::terminal::format_with_separators;
/// assert_eq!(format_with_separators(999), "999");
/// assert_eq!(format_with_separators(1234567), "1,234,567");
/// ```
#[must_use]
pub fn format_with_separators(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    for (i, c) in s.chars().enumerate() {
        if i > 0 && (s.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result
}

/// Format miles with one decimal and thousand separators, e.g. `1,234.5 mi`.
#[must_use]
pub fn format_miles(miles: f64) -> String {
    let tenths = (miles.max(0.0) * 10.0).round() as u64;
    format!("{}.{} mi", format_with_separators(tenths / 10), tenths % 10)
}

/// Format dollars with two decimals and thousand separators, e.g. `$1,234.56`.
#[must_use]
pub fn format_money(dollars: f64) -> String {
    let cents = (dollars.max(0.0) * 100.0).round() as u64;
    format!("${}.{:02}", format_with_separators(cents / 100), cents % 100)
}
