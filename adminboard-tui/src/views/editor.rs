//! Record editor popup.

use crate::state::{App, ResourcePage};
use crate::views::centered_rect;
use adminboard_core::{ColumnType, RecordEditor};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Shown in place of the form when the schema has no columns.
pub const COLUMNS_MISSING_TEXT: &str = "Columns are not defined";

/// Display text for a field value.
pub fn field_text(editor: &RecordEditor, name: &str, column_type: ColumnType) -> String {
    match column_type {
        ColumnType::Dropdown => {
            let value = editor.value(name).map(|v| v.to_string()).unwrap_or_default();
            let shown = if value.is_empty() {
                adminboard_core::NONE_SENTINEL.to_string()
            } else {
                value
            };
            format!("‹ {} ›", shown)
        }
        ColumnType::String | ColumnType::Number => editor.input_text(name).unwrap_or_default(),
    }
}

pub fn render(f: &mut Frame<'_>, app: &App, resource: &ResourcePage, area: Rect) {
    let editor = resource.table.editor();
    let popup = centered_rect(60, 70, area);
    f.render_widget(Clear, popup);

    let mut lines: Vec<Line> = Vec::new();
    if editor.columns_missing() {
        lines.push(Line::from(Span::styled(
            COLUMNS_MISSING_TEXT,
            Style::default().fg(app.theme.error),
        )));
    } else {
        let focus = editor.focus();
        for (i, column) in editor.editable_columns().enumerate() {
            let focused = focus == Some(i);
            let marker = if focused { "▶ " } else { "  " };
            let required = if column.required { "*" } else { "" };
            let label_style = if focused {
                Style::default()
                    .fg(app.theme.primary)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(app.theme.text_dim)
            };
            let mut value = field_text(editor, &column.name, column.column_type);
            if focused && column.column_type != ColumnType::Dropdown {
                value.push('_');
            }
            lines.push(Line::from(vec![
                Span::styled(format!("{}{}{}: ", marker, column.name, required), label_style),
                Span::styled(value, Style::default().fg(app.theme.text)),
            ]));
            if let Some(error) = editor.error(&column.name) {
                lines.push(Line::from(Span::styled(
                    format!("    {}", error),
                    Style::default().fg(app.theme.error),
                )));
            }
            if let Some(hint) = editor.hint(&column.name) {
                lines.push(Line::from(Span::styled(
                    format!("    {}", hint),
                    Style::default().fg(app.theme.warning),
                )));
            }
        }
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("[Enter] {}   [Esc] Cancel", editor.confirm_label()),
        app.theme.header(),
    )));

    let form = Paragraph::new(lines)
        .block(
            Block::default()
                .title(editor.title())
                .borders(Borders::ALL)
                .border_style(app.theme.border(true)),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(form, popup);
}
