//! Sidebar menu.

use crate::state::App;
use ratatui::{
    layout::Rect,
    style::Style,
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

pub fn render(f: &mut Frame<'_>, app: &App, area: Rect) {
    let items: Vec<ListItem> = app
        .nav
        .entries()
        .iter()
        .map(|entry| {
            let indent = "  ".repeat(entry.depth);
            let style = if entry.target.is_some() {
                Style::default().fg(app.theme.text)
            } else {
                Style::default().fg(app.theme.text_muted)
            };
            ListItem::new(format!("{}{}", indent, entry.label)).style(style)
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .title("Menu")
                .borders(Borders::ALL)
                .border_style(app.theme.border(false)),
        )
        .highlight_style(app.theme.highlight())
        .highlight_symbol("▌");

    let mut state = ListState::default();
    state.select(app.nav.active_index());
    f.render_stateful_widget(list, area, &mut state);
}
