//! Hierarchy picker popup.

use crate::state::App;
use crate::views::centered_rect;
use crate::widgets::{TreeStyle, TreeWidget};
use adminboard_core::hierarchy::EMPTY_PLACEHOLDER;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

pub const NO_MATCHES_TEXT: &str = "No matching locations";

pub fn render(f: &mut Frame<'_>, app: &App, area: Rect) {
    let popup = centered_rect(50, 70, area);
    f.render_widget(Clear, popup);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(popup);

    let search = Paragraph::new(format!("{}_", app.picker.query())).block(
        Block::default()
            .title("Search")
            .borders(Borders::ALL)
            .border_style(app.theme.border(true)),
    );
    f.render_widget(search, chunks[0]);

    let rows = app.picker.visible_rows();
    let cursor = (!rows.is_empty()).then(|| app.picker.cursor());
    let empty_text = if app.picker.is_searching() {
        NO_MATCHES_TEXT
    } else {
        EMPTY_PLACEHOLDER
    };
    TreeWidget {
        title: "Locations",
        rows: &rows,
        cursor,
        empty_text,
        style: TreeStyle {
            normal: Style::default().fg(app.theme.text),
            matched: Style::default()
                .fg(app.theme.warning)
                .add_modifier(Modifier::BOLD),
            selected: Style::default().fg(app.theme.success),
            cursor: app.theme.highlight(),
        },
    }
    .render(f, chunks[1]);
}
