//! Summary of every configured resource.

use crate::state::{App, ResourcePage};
use crate::widgets::{StatusIndicator, TileState};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    Frame,
};

/// Text of a resource tile.
pub fn resource_status(resource: &ResourcePage) -> String {
    if let Some(error) = &resource.last_error {
        return format!("error: {}", error);
    }
    if !resource.loaded {
        return if resource.loading {
            "loading…".to_string()
        } else {
            "not loaded".to_string()
        };
    }
    let total = resource.table.page().total_elements;
    format!("{} record{}", total, if total == 1 { "" } else { "s" })
}

pub fn resource_state(resource: &ResourcePage) -> TileState {
    if resource.last_error.is_some() {
        TileState::Failed
    } else if resource.loading {
        TileState::Loading
    } else if resource.loaded {
        TileState::Ready
    } else {
        TileState::Idle
    }
}

pub fn render(f: &mut Frame<'_>, app: &App, area: Rect) {
    let tiles = 2 + app.resources.len();
    let mut constraints = vec![Constraint::Length(3); tiles];
    constraints.push(Constraint::Min(0));
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    StatusIndicator {
        title: "Role".to_string(),
        status: app.config.user_role.clone(),
        state: TileState::Accent(app.theme.secondary),
        theme: &app.theme,
    }
    .render(f, chunks[0]);

    StatusIndicator {
        title: "Location".to_string(),
        status: app.picker.label().to_string(),
        state: TileState::Accent(app.theme.info),
        theme: &app.theme,
    }
    .render(f, chunks[1]);

    for (i, resource) in app.resources.iter().enumerate() {
        StatusIndicator {
            title: resource.config.title.clone(),
            status: resource_status(resource),
            state: resource_state(resource),
            theme: &app.theme,
        }
        .render(f, chunks[i + 2]);
    }
}
