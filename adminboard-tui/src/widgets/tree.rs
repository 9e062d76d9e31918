//! Collapsible tree widget for the hierarchy picker.

use adminboard_core::PickerRow;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

#[derive(Debug, Clone)]
pub struct TreeStyle {
    pub normal: Style,
    pub matched: Style,
    pub selected: Style,
    pub cursor: Style,
}

pub struct TreeWidget<'a> {
    pub title: &'a str,
    pub rows: &'a [PickerRow],
    pub cursor: Option<usize>,
    pub empty_text: &'a str,
    pub style: TreeStyle,
}

/// Indentation, expand marker and label for one row.
pub fn row_text(row: &PickerRow) -> String {
    let indent = "  ".repeat(row.depth);
    let marker = match (row.has_children, row.expanded) {
        (true, true) => "▾ ",
        (true, false) => "▸ ",
        (false, _) => "  ",
    };
    format!("{}{}{}", indent, marker, row.label)
}

impl<'a> TreeWidget<'a> {
    pub fn render(&self, f: &mut Frame<'_>, area: Rect) {
        let block = Block::default().title(self.title).borders(Borders::ALL);
        if self.rows.is_empty() {
            let list = List::new(vec![ListItem::new(self.empty_text)]).block(block);
            f.render_widget(list, area);
            return;
        }

        let items: Vec<ListItem> = self
            .rows
            .iter()
            .map(|row| {
                let mut style = if row.matched {
                    self.style.matched
                } else {
                    self.style.normal
                };
                if row.selected {
                    style = self.style.selected.add_modifier(Modifier::BOLD);
                }
                let check = if row.selected { " ✓" } else { "" };
                ListItem::new(Line::from(vec![
                    Span::styled(row_text(row), style),
                    Span::styled(check, style),
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(self.style.cursor)
            .highlight_symbol("> ");

        let mut state = ListState::default();
        state.select(self.cursor);
        f.render_stateful_widget(list, area, &mut state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adminboard_core::Identifier;

    fn row(depth: usize, has_children: bool, expanded: bool) -> PickerRow {
        PickerRow {
            id: Identifier::Int(1),
            label: "Paris".to_string(),
            depth,
            has_children,
            expanded,
            selected: false,
            matched: false,
        }
    }

    #[test]
    fn test_row_text_markers() {
        assert_eq!(row_text(&row(0, true, false)), "▸ Paris");
        assert_eq!(row_text(&row(1, true, true)), "  ▾ Paris");
        assert_eq!(row_text(&row(2, false, false)), "      Paris");
    }
}
