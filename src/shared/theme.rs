//! Color themes for the UI.

use ratatui::style::Color;

/// Application theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    /// Gruvbox dark theme.
    #[default]
    GruvboxDark,
    /// Gruvbox light theme.
    GruvboxLight,
}

impl Theme {
    /// Get the next theme in the cycle.
    pub fn next(self) -> Self {
        match self {
            Theme::GruvboxDark => Theme::GruvboxLight,
            Theme::GruvboxLight => Theme::GruvboxDark,
        }
    }

    /// Get the theme name.
    pub fn name(self) -> &'static str {
        match self {
            Theme::GruvboxDark => "Gruvbox Dark",
            Theme::GruvboxLight => "Gruvbox Light",
        }
    }
}

/// Gruvbox palette used by every panel.
#[derive(Debug, Clone)]
pub struct ThemeColors {
    /// Main background.
    pub bg0: Color,
    /// Raised background (status line, selections).
    pub bg1: Color,
    /// Borders and separators.
    pub bg2: Color,
    /// Primary text.
    pub fg0: Color,
    /// Secondary text (labels).
    pub fg1: Color,
    /// Cursor and titles.
    pub yellow: Color,
    /// Float values.
    pub aqua: Color,
    /// Headers and indices.
    pub green: Color,
    /// Dimmed text.
    pub gray: Color,
    /// Integer values.
    pub blue: Color,
    /// String values.
    pub purple: Color,
    /// Warnings.
    pub orange: Color,
    /// Errors.
    pub red: Color,
}

impl ThemeColors {
    /// Create color palette from theme.
    pub fn from_theme(theme: Theme) -> Self {
        match theme {
            Theme::GruvboxDark => Self {
                bg0: Color::Rgb(40, 40, 40),
                bg1: Color::Rgb(60, 56, 54),
                bg2: Color::Rgb(102, 92, 84),
                fg0: Color::Rgb(235, 219, 178),
                fg1: Color::Rgb(213, 196, 161),
                yellow: Color::Rgb(250, 189, 47),
                aqua: Color::Rgb(142, 192, 124),
                green: Color::Rgb(184, 187, 38),
                gray: Color::Rgb(146, 131, 116),
                blue: Color::Rgb(131, 165, 152),
                purple: Color::Rgb(211, 134, 155),
                orange: Color::Rgb(254, 128, 25),
                red: Color::Rgb(251, 73, 52),
            },
            Theme::GruvboxLight => Self {
                bg0: Color::Rgb(251, 241, 199),
                bg1: Color::Rgb(235, 219, 178),
                bg2: Color::Rgb(189, 174, 147),
                fg0: Color::Rgb(60, 56, 54),
                fg1: Color::Rgb(80, 73, 69),
                yellow: Color::Rgb(181, 118, 20),
                aqua: Color::Rgb(66, 123, 88),
                green: Color::Rgb(121, 116, 14),
                gray: Color::Rgb(124, 111, 100),
                blue: Color::Rgb(7, 102, 120),
                purple: Color::Rgb(143, 63, 113),
                orange: Color::Rgb(175, 58, 3),
                red: Color::Rgb(157, 0, 6),
            },
        }
    }
}
