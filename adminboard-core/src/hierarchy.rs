//! Hierarchical picker: tree search, expansion and a persisted selection.

use crate::record::Identifier;
use crate::store::KeyValueStore;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Placeholder shown when the tree is empty.
pub const EMPTY_PLACEHOLDER: &str = "No locations available";

/// Placeholder shown when nothing is selected.
pub const UNSELECTED_PLACEHOLDER: &str = "Select a location...";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchyNode {
    pub id: Identifier,
    #[serde(alias = "name")]
    pub label: String,
    #[serde(default)]
    pub children: Vec<HierarchyNode>,
}

impl HierarchyNode {
    pub fn leaf(id: impl Into<Identifier>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            children: Vec::new(),
        }
    }

    pub fn branch(
        id: impl Into<Identifier>,
        label: impl Into<String>,
        children: Vec<HierarchyNode>,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            children,
        }
    }
}

/// Result of a search: the matching nodes and every ancestor of a match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Visibility {
    pub matches: HashSet<Identifier>,
    pub ancestors: HashSet<Identifier>,
}

impl Visibility {
    pub fn contains(&self, id: &Identifier) -> bool {
        self.matches.contains(id) || self.ancestors.contains(id)
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty() && self.ancestors.is_empty()
    }
}

/// Case-insensitive substring search over every label in the tree.
///
/// A blank query matches nothing; callers treat that as "no active search".
pub fn compute_visible(tree: &[HierarchyNode], query: &str) -> Visibility {
    let needle = query.trim().to_lowercase();
    let mut visibility = Visibility::default();
    if needle.is_empty() {
        return visibility;
    }

    fn walk(
        nodes: &[HierarchyNode],
        needle: &str,
        path: &mut Vec<Identifier>,
        out: &mut Visibility,
    ) {
        for node in nodes {
            if node.label.to_lowercase().contains(needle) {
                out.matches.insert(node.id.clone());
                out.ancestors.extend(path.iter().cloned());
            }
            path.push(node.id.clone());
            walk(&node.children, needle, path, out);
            path.pop();
        }
    }

    walk(tree, &needle, &mut Vec::new(), &mut visibility);
    visibility
}

/// Recursive membership check.
pub fn contains(tree: &[HierarchyNode], id: &Identifier) -> bool {
    find(tree, id).is_some()
}

pub fn find<'a>(tree: &'a [HierarchyNode], id: &Identifier) -> Option<&'a HierarchyNode> {
    for node in tree {
        if &node.id == id {
            return Some(node);
        }
        if let Some(found) = find(&node.children, id) {
            return Some(found);
        }
    }
    None
}

/// One rendered line of the picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerRow {
    pub id: Identifier,
    pub label: String,
    pub depth: usize,
    pub has_children: bool,
    pub expanded: bool,
    pub selected: bool,
    pub matched: bool,
}

/// Picker state over a read-only tree and an injected store.
pub struct HierarchyPicker<S: KeyValueStore> {
    tree: Vec<HierarchyNode>,
    store: S,
    key: String,
    selected: Option<Identifier>,
    open: bool,
    query: String,
    expanded: HashSet<Identifier>,
    cursor: usize,
}

impl<S: KeyValueStore> HierarchyPicker<S> {
    /// Build the picker and restore the persisted selection.
    ///
    /// An empty tree leaves the store untouched. A persisted id that is no
    /// longer in the tree is removed from the store.
    pub fn mount(tree: Vec<HierarchyNode>, store: S, key: impl Into<String>) -> Self {
        let mut picker = Self {
            tree,
            store,
            key: key.into(),
            selected: None,
            open: false,
            query: String::new(),
            expanded: HashSet::new(),
            cursor: 0,
        };
        picker.restore_selection();
        picker
    }

    fn restore_selection(&mut self) {
        self.selected = None;
        if self.tree.is_empty() {
            return;
        }
        let Some(raw) = self.store.get(&self.key) else {
            return;
        };
        match Identifier::decode(&raw) {
            Some(id) if contains(&self.tree, &id) => self.selected = Some(id),
            _ => self.store.remove(&self.key),
        }
    }

    /// Swap in a freshly loaded tree and re-check the selection against it.
    pub fn replace_tree(&mut self, tree: Vec<HierarchyNode>) {
        self.tree = tree;
        self.expanded.retain(|id| contains(&self.tree, id));
        self.cursor = 0;
        if self.tree.is_empty() {
            self.selected = None;
            self.open = false;
            self.query.clear();
            return;
        }
        self.restore_selection();
    }

    pub fn tree(&self) -> &[HierarchyNode] {
        &self.tree
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Store access for unrelated keys sharing the same backend.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn is_disabled(&self) -> bool {
        self.tree.is_empty()
    }

    pub fn selected(&self) -> Option<&Identifier> {
        self.selected.as_ref()
    }

    pub fn selected_node(&self) -> Option<&HierarchyNode> {
        self.selected.as_ref().and_then(|id| find(&self.tree, id))
    }

    /// Text for the closed control.
    pub fn label(&self) -> &str {
        if self.is_disabled() {
            return EMPTY_PLACEHOLDER;
        }
        self.selected_node()
            .map(|node| node.label.as_str())
            .unwrap_or(UNSELECTED_PLACEHOLDER)
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Open the dropdown. Refused while disabled.
    pub fn open(&mut self) -> bool {
        if self.is_disabled() {
            return false;
        }
        self.open = true;
        self.cursor = 0;
        true
    }

    /// Close and drop the query. Manual expansion is kept.
    pub fn close(&mut self) {
        self.open = false;
        self.query.clear();
        self.cursor = 0;
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.cursor = 0;
    }

    pub fn is_searching(&self) -> bool {
        !self.query.trim().is_empty()
    }

    /// Flip manual expansion of a node that has children.
    pub fn toggle_expand(&mut self, id: &Identifier) -> bool {
        match find(&self.tree, id) {
            Some(node) if !node.children.is_empty() => {
                if !self.expanded.remove(id) {
                    self.expanded.insert(id.clone());
                }
                true
            }
            _ => false,
        }
    }

    pub fn is_expanded(&self, id: &Identifier) -> bool {
        self.expanded.contains(id)
    }

    /// Rows to draw, depth first.
    ///
    /// While a query is active only matches and their ancestors are listed,
    /// with ancestors shown expanded. The manual expansion set is not touched,
    /// so clearing the query restores it.
    pub fn visible_rows(&self) -> Vec<PickerRow> {
        let search = self
            .is_searching()
            .then(|| compute_visible(&self.tree, &self.query));
        let mut rows = Vec::new();
        self.collect_rows(&self.tree, 0, search.as_ref(), &mut rows);
        rows
    }

    fn collect_rows(
        &self,
        nodes: &[HierarchyNode],
        depth: usize,
        search: Option<&Visibility>,
        rows: &mut Vec<PickerRow>,
    ) {
        for node in nodes {
            if let Some(visibility) = search {
                if !visibility.contains(&node.id) {
                    continue;
                }
            }
            let expanded = match search {
                Some(visibility) => visibility.ancestors.contains(&node.id),
                None => self.expanded.contains(&node.id),
            };
            rows.push(PickerRow {
                id: node.id.clone(),
                label: node.label.clone(),
                depth,
                has_children: !node.children.is_empty(),
                expanded,
                selected: self.selected.as_ref() == Some(&node.id),
                matched: search.is_some_and(|v| v.matches.contains(&node.id)),
            });
            if expanded {
                self.collect_rows(&node.children, depth + 1, search, rows);
            }
        }
    }

    /// Select a node, persist it and close. Unknown ids are ignored.
    pub fn select(&mut self, id: &Identifier) -> Option<Identifier> {
        if !contains(&self.tree, id) {
            return None;
        }
        self.store.set(&self.key, &id.encode());
        self.selected = Some(id.clone());
        self.close();
        Some(id.clone())
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn cursor_next(&mut self) {
        let count = self.visible_rows().len();
        if count > 0 {
            self.cursor = (self.cursor + 1) % count;
        }
    }

    pub fn cursor_previous(&mut self) {
        let count = self.visible_rows().len();
        if count > 0 {
            self.cursor = if self.cursor == 0 {
                count - 1
            } else {
                (self.cursor - 1).min(count - 1)
            };
        }
    }

    pub fn cursor_row(&self) -> Option<PickerRow> {
        self.visible_rows().into_iter().nth(self.cursor)
    }

    /// Expand or collapse the row under the cursor.
    pub fn toggle_cursor(&mut self) -> bool {
        match self.cursor_row() {
            Some(row) => self.toggle_expand(&row.id),
            None => false,
        }
    }

    /// Select the row under the cursor.
    pub fn select_cursor(&mut self) -> Option<Identifier> {
        let row = self.cursor_row()?;
        self.select(&row.id)
    }
}
