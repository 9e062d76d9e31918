//! Console theme and color utilities.

use crate::notifications::NotificationLevel;
use adminboard_core::SortDirection;
use ratatui::style::{Color, Modifier, Style};

#[derive(Debug, Clone)]
pub struct Theme {
    pub bg: Color,
    pub bg_highlight: Color,
    pub primary: Color,
    pub primary_dim: Color,
    pub secondary: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub info: Color,
    pub text: Color,
    pub text_dim: Color,
    pub text_muted: Color,
    pub border: Color,
    pub border_focus: Color,
}

impl Theme {
    pub fn console() -> Self {
        Self {
            bg: Color::Rgb(18, 18, 24),
            bg_highlight: Color::Rgb(44, 48, 62),
            primary: Color::Rgb(97, 175, 239),
            primary_dim: Color::Rgb(52, 96, 132),
            secondary: Color::Rgb(198, 120, 221),
            success: Color::Rgb(152, 195, 121),
            warning: Color::Rgb(229, 192, 123),
            error: Color::Rgb(224, 108, 117),
            info: Color::Rgb(86, 182, 194),
            text: Color::Rgb(220, 223, 228),
            text_dim: Color::Rgb(140, 145, 155),
            text_muted: Color::Rgb(92, 99, 112),
            border: Color::Rgb(70, 74, 88),
            border_focus: Color::Rgb(97, 175, 239),
        }
    }

    pub fn border(&self, focused: bool) -> Style {
        Style::default().fg(if focused {
            self.border_focus
        } else {
            self.border
        })
    }

    pub fn highlight(&self) -> Style {
        Style::default()
            .bg(self.bg_highlight)
            .fg(self.text)
            .add_modifier(Modifier::BOLD)
    }

    pub fn header(&self) -> Style {
        Style::default()
            .fg(self.primary)
            .add_modifier(Modifier::BOLD)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::console()
    }
}

pub fn notification_color(level: NotificationLevel, theme: &Theme) -> Color {
    match level {
        NotificationLevel::Info => theme.info,
        NotificationLevel::Warning => theme.warning,
        NotificationLevel::Error => theme.error,
        NotificationLevel::Success => theme.success,
    }
}

/// Arrow shown next to a sorted column header.
pub fn sort_marker(direction: Option<SortDirection>) -> &'static str {
    match direction {
        Some(SortDirection::Asc) => " ▲",
        Some(SortDirection::Desc) => " ▼",
        None => "",
    }
}
