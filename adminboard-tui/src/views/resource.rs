//! Record table view for one resource.

use crate::state::{App, ResourcePage};
use crate::theme::sort_marker;
use crate::views::two_column;
use crate::widgets::{DetailPanel, FilterBar, PaginationBar};
use adminboard_core::table::ACTIONS_HEADER;
use adminboard_core::{TableBody, TableMode, TableRender};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

/// Shown instead of a table when the page carries no columns.
pub const NO_DATA_TEXT: &str = "No data available";
/// Single row shown when columns exist but no row is visible.
pub const NO_RESULTS_TEXT: &str = "No results.";

pub fn render(f: &mut Frame<'_>, app: &App, resource: &ResourcePage, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    let table = &resource.table;
    let sort_label = match table.sort() {
        Some(sort) => format!("{} {}", sort.column, sort.direction.as_str()),
        None => "none".to_string(),
    };
    let editing = app.filter_input.is_some();
    FilterBar {
        query: app.filter_input.as_deref().unwrap_or(table.filter()),
        editing,
        sort_label,
        active_style: Style::default().fg(app.theme.primary),
        inactive_style: Style::default().fg(app.theme.text_dim),
        border_style: app.theme.border(editing),
    }
    .render(f, chunks[0]);

    let (table_area, detail_area) = two_column(chunks[1], 70);
    render_table(f, app, resource, table_area);

    DetailPanel::for_record(
        "Details",
        table.columns(),
        table.selected_record(),
        Style::default().fg(app.theme.secondary),
        app.theme.border(false),
    )
    .render(f, detail_area);

    PaginationBar {
        range_label: table.range_label(),
        page_index: table.page_index(),
        page_count: table.page_count(),
        page_size: table.page_size(),
        can_previous: table.can_previous(),
        can_next: table.can_next(),
        enabled_style: Style::default().fg(app.theme.text),
        disabled_style: Style::default().fg(app.theme.text_muted),
    }
    .render(f, chunks[2]);
}

fn render_table(f: &mut Frame<'_>, app: &App, resource: &ResourcePage, area: Rect) {
    let mode = match resource.table.mode() {
        TableMode::Local => "local",
        TableMode::Server => "server",
    };
    let title = format!("{} [{}]", resource.config.title, mode);
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(app.theme.border(true));

    let TableRender { headers, body } = resource.table.render();
    let rows = match body {
        TableBody::NoData => {
            let text = if resource.loading {
                "Loading…"
            } else {
                NO_DATA_TEXT
            };
            let placeholder = Paragraph::new(text)
                .alignment(Alignment::Center)
                .style(Style::default().fg(app.theme.text_dim))
                .block(block);
            f.render_widget(placeholder, area);
            return;
        }
        TableBody::NoResults { .. } => {
            vec![Row::new(vec![Cell::from(NO_RESULTS_TEXT)])
                .style(Style::default().fg(app.theme.text_dim))]
        }
        TableBody::Rows(rows) => rows
            .into_iter()
            .map(|row| {
                let mut cells: Vec<Cell> = row.cells.into_iter().map(Cell::from).collect();
                let actions = if row.id.is_some() { "e edit  d delete" } else { "e edit" };
                cells.push(Cell::from(actions).style(Style::default().fg(app.theme.text_muted)));
                Row::new(cells)
            })
            .collect(),
    };

    let header_cells: Vec<Cell> = headers
        .iter()
        .enumerate()
        .map(|(i, header)| {
            let mut style = app.theme.header();
            if i == resource.sort_column && header.label != ACTIONS_HEADER {
                style = style.add_modifier(Modifier::UNDERLINED);
            }
            Cell::from(format!("{}{}", header.label, sort_marker(header.sort))).style(style)
        })
        .collect();

    let count = headers.len().max(1) as u32;
    let widths: Vec<Constraint> = (0..count).map(|_| Constraint::Ratio(1, count)).collect();

    let widget = Table::new(rows, widths)
        .header(Row::new(header_cells).bottom_margin(1))
        .block(block)
        .highlight_style(app.theme.highlight())
        .highlight_symbol("> ");

    let mut state = TableState::default();
    state.select(resource.table.cursor());
    f.render_stateful_widget(widget, area, &mut state);
}
