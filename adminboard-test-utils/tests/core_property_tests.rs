use adminboard_core::{
    compute_visible, CrudTable, HierarchyNode, HierarchyPicker, Identifier, KeyValueStore,
    TableMode,
};
use adminboard_test_utils::assertions::{
    assert_consistent, assert_delete, assert_page_change, assert_rejected_fields,
};
use adminboard_test_utils::fixtures;
use adminboard_test_utils::generators::{arb_paged_result_set, arb_tree};
use proptest::prelude::*;
use std::collections::HashSet;

const KEY: &str = "selectedLocation";

fn ids(table: &CrudTable) -> Vec<Option<Identifier>> {
    table.visible_records().map(|r| r.id("ID")).collect()
}

/// Every node with the ids of its ancestors, root first.
fn walk(tree: &[HierarchyNode]) -> Vec<(&HierarchyNode, Vec<Identifier>)> {
    fn go<'a>(
        nodes: &'a [HierarchyNode],
        path: &mut Vec<Identifier>,
        out: &mut Vec<(&'a HierarchyNode, Vec<Identifier>)>,
    ) {
        for node in nodes {
            out.push((node, path.clone()));
            path.push(node.id.clone());
            go(&node.children, path, out);
            path.pop();
        }
    }
    let mut out = Vec::new();
    go(tree, &mut Vec::new(), &mut out);
    out
}

// ============================================================================
// SCENARIOS
// ============================================================================

#[test]
fn test_delete_on_last_page_targets_row_id() {
    let table = fixtures::users_table(2, 3);
    assert_eq!(table.range_label(), "7-9 of 10");
    assert_delete(table.delete_row(0), 7);
    assert!(!table.editor().is_open());
}

#[test]
fn test_create_with_blank_required_fields_is_rejected() {
    let mut table = fixtures::users_table(0, 3);
    table.open_create();
    let result = table.submit_editor();
    assert_rejected_fields(&result, &["Nom", "Âge", "Email"]);
    assert!(table.editor().is_open());
}

#[test]
fn test_page_size_change_restarts_at_zero() {
    let mut table = fixtures::users_table(2, 3);
    assert_page_change(table.set_page_size(5), 0, 5);
}

#[test]
fn test_stored_selection_restored_on_mount() {
    let store = fixtures::store_with(KEY, "7");
    let picker = HierarchyPicker::mount(fixtures::location_tree(), store, KEY);
    assert_eq!(picker.selected(), Some(&Identifier::Int(7)));
    assert_eq!(picker.label(), "Niveau 2.2");
}

// ============================================================================
// PROPERTIES
// ============================================================================

proptest! {
    #[test]
    fn prop_generated_pages_are_consistent(page in arb_paged_result_set()) {
        assert_consistent(&page);
    }

    #[test]
    fn prop_prev_next_follow_page_bounds(page in arb_paged_result_set()) {
        let index = page.pageable.page_number;
        let size = page.pageable.page_size;
        let pages = page.page_count();
        let mut table = CrudTable::new(page, "ID", TableMode::Local);

        prop_assert_eq!(table.can_previous(), index > 0);
        prop_assert_eq!(table.can_next(), (index as u64) + 1 < pages);

        if index > 0 {
            assert_page_change(table.previous_page(), index - 1, size);
        } else {
            prop_assert!(table.previous_page().is_none());
        }
    }

    #[test]
    fn prop_descending_is_reverse_of_ascending(page in arb_paged_result_set()) {
        let names: Vec<String> = page.columns.names().map(str::to_string).collect();
        for name in names {
            let mut table = CrudTable::new(page.clone(), "ID", TableMode::Local);
            prop_assert!(table.toggle_sort(&name).is_none());
            let ascending = ids(&table);
            table.toggle_sort(&name);
            let mut descending = ids(&table);
            descending.reverse();
            prop_assert_eq!(ascending, descending);
        }
    }

    #[test]
    fn prop_filter_is_exact_and_idempotent(
        page in arb_paged_result_set(),
        needle in "[a-zA-Z0-9]{0,2}",
    ) {
        let lowered = needle.to_lowercase();
        let expected = page
            .content
            .iter()
            .filter(|record| {
                page.columns.iter().any(|column| {
                    record.value(&column.name).to_string().to_lowercase().contains(&lowered)
                })
            })
            .count();

        let mut table = CrudTable::new(page, "ID", TableMode::Local);
        table.set_filter(needle.clone());
        prop_assert_eq!(table.visible_len(), expected);

        let before = ids(&table);
        prop_assert!(table.set_filter(needle).is_none());
        prop_assert_eq!(ids(&table), before);
    }

    #[test]
    fn prop_search_shows_matches_and_their_ancestors(
        tree in arb_tree(3),
        query in "[a-z]{1,2}",
    ) {
        let visibility = compute_visible(&tree, &query);
        let nodes = walk(&tree);

        let mut expected_ancestors = HashSet::new();
        for (node, path) in &nodes {
            let hit = node.label.to_lowercase().contains(&query);
            prop_assert_eq!(visibility.matches.contains(&node.id), hit);
            if hit {
                expected_ancestors.extend(path.iter().cloned());
            }
        }
        for id in &visibility.ancestors {
            prop_assert!(expected_ancestors.contains(id));
        }
        for id in &expected_ancestors {
            prop_assert!(visibility.contains(id));
        }
    }

    #[test]
    fn prop_mount_keeps_only_known_selection(
        tree in arb_tree(2),
        pick in any::<prop::sample::Index>(),
    ) {
        let nodes: Vec<Identifier> = walk(&tree).into_iter().map(|(n, _)| n.id.clone()).collect();

        if nodes.is_empty() {
            let picker = HierarchyPicker::mount(tree, fixtures::store_with(KEY, "1"), KEY);
            prop_assert!(picker.is_disabled());
            prop_assert_eq!(picker.store().get(KEY), Some("1".to_string()));
            return Ok(());
        }

        let id = nodes[pick.index(nodes.len())].clone();
        let picker = HierarchyPicker::mount(
            tree.clone(),
            fixtures::store_with(KEY, &id.encode()),
            KEY,
        );
        prop_assert_eq!(picker.selected(), Some(&id));

        let stale = HierarchyPicker::mount(tree, fixtures::store_with(KEY, "\"gone\""), KEY);
        prop_assert_eq!(stale.selected(), None);
        prop_assert_eq!(stale.store().get(KEY), None);
    }
}
