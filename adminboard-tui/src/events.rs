//! Event types for the TUI event loop.

use adminboard_core::{HierarchyNode, Identifier, PagedResultSet};
use crossterm::event::KeyEvent;

/// Everything the main loop reacts to. Task results carry their error as
/// text so events stay cloneable.
#[derive(Debug, Clone)]
pub enum TuiEvent {
    Input(KeyEvent),
    Tick,
    Resize { width: u16, height: u16 },
    PageLoaded {
        resource: String,
        seq: u64,
        result: Result<PagedResultSet, String>,
    },
    Saved {
        resource: String,
        is_editing: bool,
        result: Result<(), String>,
    },
    Deleted {
        resource: String,
        id: Identifier,
        result: Result<(), String>,
    },
    HierarchyLoaded(Result<Vec<HierarchyNode>, String>),
}
