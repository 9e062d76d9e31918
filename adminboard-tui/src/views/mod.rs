//! View rendering dispatch.

pub mod dashboard;
pub mod editor;
pub mod helpers;
pub mod picker;
pub mod resource;
pub mod sidebar;

pub use helpers::{centered_rect, two_column};

use crate::keys::InputMode;
use crate::state::App;
use crate::theme::notification_color;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

pub fn render_view(f: &mut Frame<'_>, app: &App) {
    let screen = f.size();
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(screen);

    render_header(f, app, layout[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(24), Constraint::Min(0)])
        .split(layout[1]);
    sidebar::render(f, app, body[0]);

    if app.is_dashboard() {
        dashboard::render(f, app, body[1]);
    } else if let Some(resource) = app.active_resource() {
        resource::render(f, app, resource, body[1]);
        if resource.table.editor().is_open() {
            editor::render(f, app, resource, screen);
        }
    } else {
        let empty = Paragraph::new("Nothing to show for this entry.")
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(empty, body[1]);
    }

    render_footer(f, app, layout[2]);

    if app.picker.is_open() {
        picker::render(f, app, screen);
    }
    if let Some(pending) = &app.pending_delete {
        render_confirm(f, app, &format!("Delete record {}?", pending.id));
    }
    if app.show_help {
        render_help(f, app);
    }
}

fn render_header(f: &mut Frame<'_>, app: &App, area: Rect) {
    let loading = app.resources.iter().any(|r| r.loading);
    let mut spans = vec![
        Span::styled("adminboard", app.theme.header()),
        Span::raw(format!(" | Role: {}", app.config.user_role)),
        Span::raw(format!(" | Location: {}", app.picker.label())),
    ];
    if loading {
        spans.push(Span::styled(" | Loading…", Style::default().fg(app.theme.warning)));
    }
    let header = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(app.theme.border(false)),
    );
    f.render_widget(header, area);
}

fn footer_hint(mode: InputMode) -> &'static str {
    match mode {
        InputMode::Normal => {
            "j/k move • h/l page • n new • e edit • d delete • [ ] column • s sort • / filter • p location • ? help • q quit"
        }
        InputMode::Filter => "type to filter • Enter keep • Esc clear",
        InputMode::Editor => "Tab/↑↓ field • ←/→ option • Enter save • Esc cancel",
        InputMode::Picker => "type to search • ↑↓ move • Tab expand • Enter select • Esc close",
        InputMode::Confirm => "y confirm • n cancel",
    }
}

fn render_footer(f: &mut Frame<'_>, app: &App, area: Rect) {
    let (text, style) = match app.current_notification() {
        Some(note) => (
            format!("{}: {}", note.level.label(), note.message),
            Style::default().fg(notification_color(note.level, &app.theme)),
        ),
        None => (
            footer_hint(app.input_mode()).to_string(),
            Style::default().fg(app.theme.text_dim),
        ),
    };
    let footer = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL))
        .style(style);
    f.render_widget(footer, area);
}

fn render_confirm(f: &mut Frame<'_>, app: &App, message: &str) {
    let area = centered_rect(40, 20, f.size());
    f.render_widget(Clear, area);
    let dialog = Paragraph::new(vec![
        Line::from(message.to_string()),
        Line::from(""),
        Line::from(Span::styled("[y] Yes   [n] No", app.theme.header())),
    ])
    .block(
        Block::default()
            .title("Confirm")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.error)),
    )
    .wrap(Wrap { trim: true });
    f.render_widget(dialog, area);
}

const HELP_LINES: &[(&str, &str)] = &[
    ("Tab / Shift-Tab", "next / previous menu entry"),
    ("j k ↑ ↓", "move between rows"),
    ("h l ← →", "previous / next page"),
    ("g G 1-9", "first / last / numbered page"),
    ("+ -", "rows per page"),
    ("[ ]", "choose sort column"),
    ("s", "cycle sort on column"),
    ("/", "filter rows"),
    ("n e d", "new / edit / delete record"),
    ("p", "choose location"),
    ("r", "refresh"),
    ("q Ctrl-c", "quit"),
];

fn render_help(f: &mut Frame<'_>, app: &App) {
    let area = centered_rect(60, 60, f.size());
    f.render_widget(Clear, area);
    let lines: Vec<Line> = HELP_LINES
        .iter()
        .map(|(keys, what)| {
            Line::from(vec![
                Span::styled(format!("{:<18}", keys), Style::default().fg(app.theme.primary)),
                Span::raw(*what),
            ])
        })
        .collect();
    let help = Paragraph::new(lines).block(
        Block::default()
            .title("Keybindings")
            .borders(Borders::ALL)
            .border_style(app.theme.border(true)),
    );
    f.render_widget(help, area);
}
