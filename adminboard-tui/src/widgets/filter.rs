//! Filter bar widget.

use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// One-line text box showing the active filter and the sort state.
pub struct FilterBar<'a> {
    pub query: &'a str,
    /// True while the user is typing.
    pub editing: bool,
    pub sort_label: String,
    pub active_style: Style,
    pub inactive_style: Style,
    pub border_style: Style,
}

impl<'a> FilterBar<'a> {
    pub fn render(&self, f: &mut Frame<'_>, area: Rect) {
        let query = if self.editing {
            format!("{}_", self.query)
        } else if self.query.is_empty() {
            "(none, press / to filter)".to_string()
        } else {
            self.query.to_string()
        };
        let style = if self.editing || !self.query.is_empty() {
            self.active_style
        } else {
            self.inactive_style
        };

        let line = Line::from(vec![
            Span::styled(" Filter: ", self.inactive_style),
            Span::styled(query, style),
            Span::styled(format!("   Sort: {}", self.sort_label), self.inactive_style),
        ]);
        let paragraph = Paragraph::new(line).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(self.border_style),
        );
        f.render_widget(paragraph, area);
    }
}
