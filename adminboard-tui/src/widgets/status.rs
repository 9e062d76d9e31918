//! Dashboard tiles.

use crate::theme::Theme;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// What a tile reports on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileState {
    /// Plain value in a fixed color.
    Accent(Color),
    Idle,
    Loading,
    Ready,
    Failed,
}

impl TileState {
    pub fn color(self, theme: &Theme) -> Color {
        match self {
            TileState::Accent(color) => color,
            TileState::Idle => theme.text_dim,
            TileState::Loading => theme.warning,
            TileState::Ready => theme.success,
            TileState::Failed => theme.error,
        }
    }

    pub fn glyph(self) -> Option<&'static str> {
        match self {
            TileState::Accent(_) => None,
            TileState::Idle => Some("○"),
            TileState::Loading => Some("◌"),
            TileState::Ready => Some("●"),
            TileState::Failed => Some("✖"),
        }
    }
}

/// Bordered single-value box with an optional state glyph.
pub struct StatusIndicator<'a> {
    pub title: String,
    pub status: String,
    pub state: TileState,
    pub theme: &'a Theme,
}

impl StatusIndicator<'_> {
    pub fn line(&self) -> Line<'static> {
        let style = Style::default().fg(self.state.color(self.theme));
        let mut spans = Vec::new();
        if let Some(glyph) = self.state.glyph() {
            spans.push(Span::styled(
                format!("{} ", glyph),
                style.add_modifier(Modifier::BOLD),
            ));
        }
        spans.push(Span::styled(self.status.clone(), style));
        Line::from(spans)
    }

    pub fn render(&self, f: &mut Frame<'_>, area: Rect) {
        let focused = self.state == TileState::Failed;
        let paragraph = Paragraph::new(self.line()).block(
            Block::default()
                .title(self.title.as_str())
                .borders(Borders::ALL)
                .border_style(self.theme.border(focused)),
        );
        f.render_widget(paragraph, area);
    }
}
