//! Pagination footer for the record table.

use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

pub struct PaginationBar {
    pub range_label: String,
    pub page_index: usize,
    pub page_count: u64,
    pub page_size: usize,
    pub can_previous: bool,
    pub can_next: bool,
    pub enabled_style: Style,
    pub disabled_style: Style,
}

impl PaginationBar {
    /// "Page 2 of 4", or "Page 0 of 0" when there is nothing to page.
    pub fn page_label(&self) -> String {
        let current = if self.page_count == 0 {
            0
        } else {
            self.page_index + 1
        };
        format!("Page {} of {}", current, self.page_count)
    }

    pub fn render(&self, f: &mut Frame<'_>, area: Rect) {
        let style = |enabled: bool| {
            if enabled {
                self.enabled_style
            } else {
                self.disabled_style
            }
        };
        let line = Line::from(vec![
            Span::styled("« first ", style(self.can_previous)),
            Span::styled("‹ prev ", style(self.can_previous)),
            Span::styled(format!(" {} ", self.page_label()), self.enabled_style),
            Span::styled(" next ›", style(self.can_next)),
            Span::styled(" last »", style(self.can_next)),
            Span::styled(
                format!("   {}   rows per page: {}", self.range_label, self.page_size),
                self.disabled_style,
            ),
        ]);
        f.render_widget(Paragraph::new(line), area);
    }
}
