//! Sidebar navigation over the role-filtered menu.

use adminboard_core::menu::{self, MenuEntry, MenuItem};

#[derive(Debug, Clone)]
pub struct Navigation {
    entries: Vec<MenuEntry>,
    /// Index into `entries`; always an entry with a target.
    active: Option<usize>,
}

impl Navigation {
    /// Menu as seen by `role`. The first entry with a target is active.
    pub fn new(items: &[MenuItem], role: &str) -> Self {
        let entries = menu::flatten(&menu::visible_for(items, role));
        let active = entries.iter().position(|e| e.target.is_some());
        Self { entries, active }
    }

    pub fn entries(&self) -> &[MenuEntry] {
        &self.entries
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    pub fn active_target(&self) -> Option<&str> {
        self.active
            .and_then(|i| self.entries.get(i))
            .and_then(|e| e.target.as_deref())
    }

    pub fn active_label(&self) -> Option<&str> {
        self.active
            .and_then(|i| self.entries.get(i))
            .map(|e| e.label.as_str())
    }

    /// Make `target` active if the menu shows it.
    pub fn select_target(&mut self, target: &str) -> bool {
        match self
            .entries
            .iter()
            .position(|e| e.target.as_deref() == Some(target))
        {
            Some(index) => {
                self.active = Some(index);
                true
            }
            None => false,
        }
    }

    pub fn next(&mut self) {
        self.step(true);
    }

    pub fn previous(&mut self) {
        self.step(false);
    }

    fn step(&mut self, forward: bool) {
        let Some(start) = self.active else {
            return;
        };
        let len = self.entries.len();
        let mut index = start;
        for _ in 0..len {
            index = if forward {
                (index + 1) % len
            } else {
                (index + len - 1) % len
            };
            if self.entries[index].target.is_some() {
                self.active = Some(index);
                return;
            }
        }
    }
}
