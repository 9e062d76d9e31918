//! Detail panel widget for showing a record's fields.

use adminboard_core::{Record, SchemaRegistry};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

pub struct DetailPanel<'a> {
    pub title: &'a str,
    pub fields: Vec<(String, String)>,
    pub label_style: Style,
    pub border_style: Style,
}

impl<'a> DetailPanel<'a> {
    /// Fields of `record` in column order. Values outside the schema are
    /// appended after.
    pub fn for_record(
        title: &'a str,
        columns: &SchemaRegistry,
        record: Option<&Record>,
        label_style: Style,
        border_style: Style,
    ) -> Self {
        let mut fields = Vec::new();
        if let Some(record) = record {
            for name in columns.names() {
                fields.push((name.to_string(), record.value(name).to_string()));
            }
            for (name, value) in record.iter() {
                if columns.column(name).is_none() {
                    fields.push((name.clone(), value.to_string()));
                }
            }
        }
        Self {
            title,
            fields,
            label_style,
            border_style,
        }
    }

    pub fn render(&self, f: &mut Frame<'_>, area: Rect) {
        let lines: Vec<Line> = if self.fields.is_empty() {
            vec![Line::from("Nothing selected")]
        } else {
            self.fields
                .iter()
                .map(|(label, value)| {
                    Line::from(vec![
                        Span::styled(format!("{}: ", label), self.label_style),
                        Span::raw(value.clone()),
                    ])
                })
                .collect()
        };

        let widget = Paragraph::new(Text::from(lines))
            .block(
                Block::default()
                    .title(self.title)
                    .borders(Borders::ALL)
                    .border_style(self.border_style),
            )
            .wrap(Wrap { trim: true });

        f.render_widget(widget, area);
    }
}
