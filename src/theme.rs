//! Centralized theme configuration for all UI components.
//!
//! All colors and styles are defined here. When adding or modifying UI components:
//! - Add new colors to the appropriate module
//! - Use `theme::module::CONSTANT` in render files
//! - Do NOT hardcode `Color::*` values directly in render files
//!
//! Theme: Galaxy - Purple/pink accents with deep space blue background

use ratatui::style::{Color, Modifier, Style};

/// Core color palette - shared base colors.
pub mod palette {
    use super::*;

    pub const TEXT: Color = Color::Rgb(236, 236, 244);
    pub const TEXT_DIM: Color = Color::Rgb(90, 92, 119);
    pub const TEXT_MUTED: Color = Color::Rgb(130, 133, 158);

    pub const BG_DARK: Color = Color::Rgb(26, 26, 46);
    pub const BG_HIGHLIGHT: Color = Color::Rgb(55, 55, 85);

    pub const SUCCESS: Color = Color::Rgb(107, 203, 119);
    pub const WARNING: Color = Color::Rgb(255, 217, 61);
    pub const ERROR: Color = Color::Rgb(224, 108, 117);
    pub const INFO: Color = Color::Rgb(0, 217, 255);
}

/// Query view pane
pub mod view {
    use super::*;

    pub const BORDER: Color = Color::Rgb(0, 217, 255); // Electric cyan
    pub const BORDER_ERROR: Color = Color::Rgb(224, 108, 117);
    pub const BORDER_WARNING: Color = Color::Rgb(255, 217, 61);
    pub const BACKGROUND: Color = Color::Rgb(26, 26, 46);

    pub const TITLE: Style = Style::new()
        .fg(Color::Rgb(0, 217, 255))
        .add_modifier(Modifier::BOLD);
    pub const HEADING: Style = Style::new()
        .fg(Color::Rgb(236, 236, 244))
        .add_modifier(Modifier::BOLD);
    pub const BODY: Color = Color::Rgb(130, 133, 158);
    pub const LABEL: Color = Color::Rgb(189, 147, 249); // Purple

    pub const ACCESS_DENIED: Color = Color::Rgb(255, 184, 108); // Orange
    pub const RECALCULATING: Color = Color::Rgb(255, 217, 61);
    pub const GENERIC_ERROR: Color = Color::Rgb(224, 108, 117);
    pub const EMPTY: Color = Color::Rgb(90, 92, 119);

    // Spinner animation colors (galaxy rainbow)
    pub const SPINNER_COLORS: &[Color] = &[
        Color::Rgb(255, 107, 157), // Pink
        Color::Rgb(255, 184, 108), // Orange
        Color::Rgb(255, 217, 61),  // Yellow
        Color::Rgb(107, 203, 119), // Green
        Color::Rgb(0, 217, 255),   // Cyan
        Color::Rgb(189, 147, 249), // Purple
    ];
}

/// JSON content coloring
pub mod json {
    use super::*;

    pub const KEY: Color = Color::Rgb(0, 217, 255);
    pub const STRING: Color = Color::Rgb(107, 203, 119);
    pub const NUMBER: Color = Color::Rgb(189, 147, 249);
    pub const LITERAL: Color = Color::Rgb(255, 107, 157); // true, false, null
    pub const PUNCTUATION: Color = Color::Rgb(130, 133, 158);
}

pub mod notification {
    use super::*;

    pub struct NotificationColors {
        pub fg: Color,
        pub bg: Color,
        pub border: Color,
    }

    pub const INFO: NotificationColors = NotificationColors {
        fg: Color::Rgb(236, 236, 244),
        bg: Color::Rgb(55, 55, 85),
        border: Color::Rgb(130, 133, 158),
    };

    pub const SUCCESS: NotificationColors = NotificationColors {
        fg: Color::Rgb(26, 26, 46),
        bg: Color::Rgb(107, 203, 119),
        border: Color::Rgb(107, 203, 119),
    };

    pub const WARNING: NotificationColors = NotificationColors {
        fg: Color::Rgb(26, 26, 46),
        bg: Color::Rgb(255, 217, 61),
        border: Color::Rgb(255, 217, 61),
    };

    pub const ERROR: NotificationColors = NotificationColors {
        fg: Color::Rgb(236, 236, 244),
        bg: Color::Rgb(224, 108, 117),
        border: Color::Rgb(255, 135, 145),
    };
}

/// Border hint utilities - for building styled keyboard shortcuts on borders
pub mod border_hints {
    use super::*;
    use ratatui::text::{Line, Span};

    /// Build a single hint with key in full color and description dimmed
    pub fn hint(key: &'static str, desc: &'static str, color: Color) -> Vec<Span<'static>> {
        vec![
            Span::styled(key, Style::new().fg(color)),
            Span::styled(
                format!(" {} ", desc),
                Style::new().fg(color).add_modifier(Modifier::DIM),
            ),
        ]
    }

    /// Build a separator dot in dimmed color
    pub fn separator(color: Color) -> Span<'static> {
        Span::styled("• ", Style::new().fg(color).add_modifier(Modifier::DIM))
    }

    /// Build a line with multiple hints separated by dots
    pub fn build_hints(hints: &[(&'static str, &'static str)], color: Color) -> Line<'static> {
        let mut spans = vec![Span::raw(" ")];
        for (i, (key, desc)) in hints.iter().enumerate() {
            if i > 0 {
                spans.push(separator(color));
            }
            spans.extend(hint(key, desc, color));
        }
        Line::from(spans)
    }
}

pub mod scrollbar {
    use super::*;

    pub const DEFAULT: Color = Color::Rgb(0, 217, 255);
}
