//! Terminal styling and color utilities.
//!
//! ANSI escape code definitions and capability detection for the CLI's
//! text output.

/// ANSI escape codes for text styling and colors.
pub mod colors {
    /// Reset all styling.
    pub const RESET: &str = "\x1b[0m";

    /// Bold reverse green for the boarding stop badge.
    pub const TAG_BOARD: &str = "\x1b[1;7;32m";
    /// Bold reverse magenta for the alighting stop badge.
    pub const TAG_ALIGHT: &str = "\x1b[1;7;35m";

    /// Bright bold white for emphasis (line names, stop names).
    pub const WHITE_BOLD: &str = "\x1b[1;97m";
    /// Gray for secondary elements (tree lines, coordinates).
    pub const GRAY: &str = "\x1b[90m";
    /// Cyan for distances.
    pub const CYAN: &str = "\x1b[36m";
    /// Green for counts.
    pub const GREEN: &str = "\x1b[32m";
}

/// Resolved color codes, either ANSI sequences or empty strings when color
/// is disabled.
#[derive(Debug, Clone, Copy)]
pub struct ColorPalette {
    pub reset: &'static str,
    pub tag_board: &'static str,
    pub tag_alight: &'static str,
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
            tag_board: colors::TAG_BOARD,
            tag_alight: colors::TAG_ALIGHT,
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
            tag_board: "",
            tag_alight: "",
            white_bold: "",
            gray: "",
            cyan: "",
            green: "",
        }
    }

    /// `colored()` when the terminal supports ANSI colors, `plain()` otherwise.
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

/// Check if the terminal supports ANSI color codes.
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

/// Human-friendly distance: whole meters below 1 km, kilometers above.
///
/// # Examples
///
/// ```
/// use tranzit_cli::terminal::format_distance;
///
/// assert_eq!(format_distance(13.7), "14 m");
/// assert_eq!(format_distance(1520.0), "1.52 km");
/// ```
#[must_use]
pub fn format_distance(meters: f64) -> String {
    if meters < 1000.0 {
        format!("{:.0} m", meters)
    } else {
        format!("{:.2} km", meters / 1000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_distance_meters() {
        assert_eq!(format_distance(0.0), "0 m");
        assert_eq!(format_distance(19.6), "20 m");
        assert_eq!(format_distance(999.0), "999 m");
    }

    #[test]
    fn test_format_distance_kilometers() {
        assert_eq!(format_distance(1000.0), "1.00 km");
        assert_eq!(format_distance(110_574.4), "110.57 km");
    }

    #[test]
    fn test_color_palette_colored() {
        let p = ColorPalette::colored();
        assert!(!p.reset.is_empty());
        assert!(!p.tag_board.is_empty());
        assert!(!p.cyan.is_empty());
    }

    #[test]
    fn test_color_palette_plain() {
        let p = ColorPalette::plain();
        assert!(p.reset.is_empty());
        assert!(p.tag_alight.is_empty());
        assert!(p.cyan.is_empty());
    }

    // Environment variables are process-global, so tests modifying them are
    // serialized through this mutex.
    use std::sync::Mutex;

    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn with_env_vars<F, R>(vars: &[(&str, Option<&str>)], f: F) -> R
    where
        F: FnOnce() -> R,
    {
        use std::env;

        let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        let saved: Vec<_> = vars.iter().map(|(k, _)| (*k, env::var_os(k))).collect();

        for (key, value) in vars {
            match value {
                Some(v) => env::set_var(key, v),
                None => env::remove_var(key),
            }
        }

        let result = f();

        for (key, value) in saved {
            match value {
                Some(v) => env::set_var(key, v),
                None => env::remove_var(key),
            }
        }

        result
    }

    #[test]
    fn test_supports_color_no_color_set() {
        with_env_vars(&[("NO_COLOR", Some("1")), ("TERM", None)], || {
            assert!(!supports_color(), "NO_COLOR=1 should disable colors");
        });
    }

    #[test]
    fn test_supports_color_term_dumb() {
        with_env_vars(&[("NO_COLOR", None), ("TERM", Some("dumb"))], || {
            assert!(!supports_color(), "TERM=dumb should disable colors");
        });
    }

    #[test]
    fn test_supports_color_default() {
        with_env_vars(
            &[("NO_COLOR", None), ("TERM", Some("xterm-256color"))],
            || {
                assert!(supports_color(), "Normal terminal should support colors");
            },
        );
    }
}
