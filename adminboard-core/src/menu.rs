//! Role-aware navigation menu.

use serde::{Deserialize, Serialize};

/// Role value that makes an item visible to everyone.
pub const ROLE_ALL: &str = "ALL";

fn default_role() -> String {
    ROLE_ALL.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MenuItem {
    pub label: String,
    /// Resource key or view name this item opens. Groups have none.
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default = "default_role")]
    pub role: String,
    #[serde(default)]
    pub children: Vec<MenuItem>,
}

impl MenuItem {
    pub fn link(label: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            target: Some(target.into()),
            role: default_role(),
            children: Vec::new(),
        }
    }

    pub fn group(label: impl Into<String>, children: Vec<MenuItem>) -> Self {
        Self {
            label: label.into(),
            target: None,
            role: default_role(),
            children,
        }
    }

    pub fn for_role(mut self, role: impl Into<String>) -> Self {
        self.role = role.into();
        self
    }

    pub fn allows(&self, role: &str) -> bool {
        self.role == ROLE_ALL || self.role == role
    }
}

/// One selectable line of the flattened menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuEntry {
    pub label: String,
    pub target: Option<String>,
    pub depth: usize,
}

/// Items visible to `role`. Groups left with no visible children and no
/// target of their own are dropped.
pub fn visible_for(items: &[MenuItem], role: &str) -> Vec<MenuItem> {
    items
        .iter()
        .filter(|item| item.allows(role))
        .filter_map(|item| {
            let children = visible_for(&item.children, role);
            if children.is_empty() && item.target.is_none() {
                return None;
            }
            Some(MenuItem {
                children,
                ..item.clone()
            })
        })
        .collect()
}

/// Depth-first listing of a menu tree.
pub fn flatten(items: &[MenuItem]) -> Vec<MenuEntry> {
    fn walk(items: &[MenuItem], depth: usize, out: &mut Vec<MenuEntry>) {
        for item in items {
            out.push(MenuEntry {
                label: item.label.clone(),
                target: item.target.clone(),
                depth,
            });
            walk(&item.children, depth + 1, out);
        }
    }

    let mut out = Vec::new();
    walk(items, 0, &mut out);
    out
}

/// Every target named anywhere in the tree.
pub fn targets(items: &[MenuItem]) -> Vec<&str> {
    let mut out = Vec::new();
    let mut stack: Vec<&MenuItem> = items.iter().rev().collect();
    while let Some(item) = stack.pop() {
        if let Some(target) = item.target.as_deref() {
            out.push(target);
        }
        stack.extend(item.children.iter().rev());
    }
    out
}
