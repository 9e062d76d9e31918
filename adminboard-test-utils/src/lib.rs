//! adminboard Test Utilities
//!
//! Shared test infrastructure for the adminboard workspace:
//! - Proptest generators for schemas, records, pages and trees
//! - Fixtures for the user-management demo data and a location tree
//! - Assertions over table intents and editor results

pub use adminboard_core::{
    ColumnDescriptor, ColumnType, CrudTable, HierarchyNode, Identifier, MemoryStore, Pageable,
    PagedResultSet, Record, Scalar, SchemaRegistry, SubmitRejected, TableIntent, TableMode,
};

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for adminboard core types.

    use super::*;
    use proptest::prelude::*;

    pub fn arb_column_type() -> impl Strategy<Value = ColumnType> {
        prop_oneof![
            Just(ColumnType::String),
            Just(ColumnType::Number),
            Just(ColumnType::Dropdown),
        ]
    }

    /// A column called `name` with random type and constraints.
    pub fn arb_column(name: String) -> impl Strategy<Value = ColumnDescriptor> {
        (
            arb_column_type(),
            any::<bool>(),
            proptest::option::of(1u32..100),
            prop::collection::vec("[A-Z][a-z]{1,6}", 1..4),
        )
            .prop_map(move |(column_type, required, max_length, options)| {
                let mut column = ColumnDescriptor::new(name.clone(), column_type);
                column.required = required;
                column.max_length = max_length;
                if column_type == ColumnType::Dropdown {
                    column.dropdown_options = Some(options);
                }
                column
            })
    }

    /// Schema with an `ID` number column followed by `count` generated columns.
    pub fn arb_schema(max_columns: usize) -> impl Strategy<Value = SchemaRegistry> {
        (1..=max_columns.max(1)).prop_flat_map(|count| {
            let columns: Vec<_> = (0..count)
                .map(|i| arb_column(format!("col{}", i)))
                .collect();
            columns.prop_map(|generated| {
                let mut all = vec![ColumnDescriptor::number("ID").required()];
                all.extend(generated);
                SchemaRegistry::new(all)
            })
        })
    }

    /// A value that fits `column`.
    pub fn arb_value(column: &ColumnDescriptor) -> BoxedStrategy<Scalar> {
        match column.column_type {
            ColumnType::String => "[a-zA-Z ]{0,12}".prop_map(Scalar::Text).boxed(),
            ColumnType::Number => prop_oneof![
                (-1000i64..1000).prop_map(Scalar::Int),
                Just(Scalar::Null),
            ]
            .boxed(),
            ColumnType::Dropdown => {
                let options = column.options();
                prop::sample::select(options)
                    .prop_map(|option| ColumnType::Dropdown.coerce_input(&option))
                    .boxed()
            }
        }
    }

    /// `count` records for `schema` with sequential ids starting at 1.
    pub fn arb_records(
        schema: SchemaRegistry,
        count: std::ops::Range<usize>,
    ) -> impl Strategy<Value = Vec<Record>> {
        let row: Vec<_> = schema
            .iter()
            .filter(|c| c.name != "ID")
            .map(|c| (Just(c.name.clone()), arb_value(c)))
            .collect();
        prop::collection::vec(row, count).prop_map(|rows| {
            rows.into_iter()
                .enumerate()
                .map(|(i, fields)| {
                    let mut record: Record = fields.into_iter().collect();
                    record.set("ID", i as i64 + 1);
                    record
                })
                .collect()
        })
    }

    /// A consistent page cut out of a generated record list.
    pub fn arb_paged_result_set() -> impl Strategy<Value = PagedResultSet> {
        arb_schema(4).prop_flat_map(|schema| {
            (arb_records(schema.clone(), 0..30), 1usize..8, any::<prop::sample::Index>())
                .prop_map(move |(records, page_size, pick)| {
                    let pages = adminboard_core::page_count(records.len() as u64, page_size);
                    let page_index = if pages == 0 {
                        0
                    } else {
                        pick.index(pages as usize)
                    };
                    PagedResultSet::from_slice(schema.clone(), &records, page_index, page_size)
                })
        })
    }

    /// Tree of depth at most `depth` with unique integer ids.
    pub fn arb_tree(depth: u32) -> impl Strategy<Value = Vec<HierarchyNode>> {
        let leaf = "[a-zA-Z]{1,8}".prop_map(|label| HierarchyNode::leaf(0, label));
        let node = leaf.prop_recursive(depth, 32, 4, |inner| {
            ("[a-zA-Z]{1,8}", prop::collection::vec(inner, 0..4))
                .prop_map(|(label, children)| HierarchyNode::branch(0, label, children))
        });
        prop::collection::vec(node, 0..4).prop_map(|mut tree| {
            let mut next = 1;
            number_nodes(&mut tree, &mut next);
            tree
        })
    }

    fn number_nodes(nodes: &mut [HierarchyNode], next: &mut i64) {
        for node in nodes {
            node.id = Identifier::Int(*next);
            *next += 1;
            number_nodes(&mut node.children, next);
        }
    }
}

// ============================================================================
// TEST FIXTURES
// ============================================================================

pub mod fixtures {
    //! Pre-built data for common scenarios.

    use super::*;

    /// Schema of the user-management demo page.
    pub fn user_columns() -> SchemaRegistry {
        SchemaRegistry::new(vec![
            ColumnDescriptor::number("ID").required().with_max_length(10),
            ColumnDescriptor::string("Nom").required().with_max_length(50),
            ColumnDescriptor::string("Prénom").with_max_length(50),
            ColumnDescriptor::number("Âge").required().with_max_length(3),
            ColumnDescriptor::string("Email").required().with_max_length(100),
            ColumnDescriptor::dropdown("Ville", ["Paris", "Marseille", "Lyon"]),
        ])
    }

    /// The ten demo users.
    pub fn users() -> Vec<Record> {
        [
            ("Dupont", "Jean", 35, "Paris"),
            ("Martin", "Sophie", 28, "Marseille"),
            ("Lemoine", "Paul", 42, "Lyon"),
            ("Bernard", "Marie", 31, "Paris"),
            ("Thomas", "Lucas", 45, "Lyon"),
            ("Robert", "Emma", 29, "Marseille"),
            ("Dubois", "Louis", 38, "Paris"),
            ("Petit", "Alice", 33, "Marseille"),
            ("Richard", "Hugo", 27, "Lyon"),
            ("Moreau", "Léa", 36, "Paris"),
        ]
        .iter()
        .enumerate()
        .map(|(i, (nom, prenom, age, ville))| {
            Record::new()
                .with("ID", i as i64 + 1)
                .with("Nom", *nom)
                .with("Prénom", *prenom)
                .with("Âge", *age as i64)
                .with(
                    "Email",
                    format!("{}.{}@example.com", prenom.to_lowercase(), nom.to_lowercase()),
                )
                .with("Ville", *ville)
        })
        .collect()
    }

    /// Page `page_index` of the demo users.
    pub fn users_page(page_index: usize, page_size: usize) -> PagedResultSet {
        PagedResultSet::from_slice(user_columns(), &users(), page_index, page_size)
    }

    /// Local-mode table over a page of the demo users, keyed by `ID`.
    pub fn users_table(page_index: usize, page_size: usize) -> CrudTable {
        CrudTable::new(users_page(page_index, page_size), "ID", TableMode::Local)
    }

    /// Two-root location tree, four levels deep on the first branch.
    pub fn location_tree() -> Vec<HierarchyNode> {
        vec![
            HierarchyNode::branch(
                1,
                "Parent 1",
                vec![
                    HierarchyNode::branch(
                        2,
                        "Niveau 1.1",
                        vec![
                            HierarchyNode::branch(
                                3,
                                "Niveau 2.1",
                                vec![HierarchyNode::branch(
                                    4,
                                    "Niveau 3.1",
                                    vec![
                                        HierarchyNode::leaf(5, "Niveau 4.1"),
                                        HierarchyNode::leaf(6, "Niveau 4.2"),
                                    ],
                                )],
                            ),
                            HierarchyNode::leaf(7, "Niveau 2.2"),
                        ],
                    ),
                    HierarchyNode::branch(8, "Niveau 1.2", vec![HierarchyNode::leaf(9, "Niveau 2.3")]),
                ],
            ),
            HierarchyNode::branch(
                10,
                "Parent 2",
                vec![HierarchyNode::branch(
                    11,
                    "Niveau 1.3",
                    vec![HierarchyNode::leaf(12, "Niveau 2.4")],
                )],
            ),
        ]
    }

    /// Store holding `value` under `key`.
    pub fn store_with(key: &str, value: &str) -> MemoryStore {
        MemoryStore::new().with_entry(key, value)
    }
}

// ============================================================================
// CUSTOM ASSERTIONS
// ============================================================================

pub mod assertions {
    //! Assertions over adminboard results.

    use super::*;

    /// Assert that an intent is a delete for `id`.
    #[track_caller]
    pub fn assert_delete(intent: Option<TableIntent>, id: impl Into<Identifier>) {
        let id = id.into();
        match intent {
            Some(TableIntent::Delete(got)) => assert_eq!(got, id, "Wrong id in delete intent"),
            other => panic!("Expected Delete({}), got: {:?}", id, other),
        }
    }

    /// Assert that an intent is a page change to `(page_index, page_size)`.
    #[track_caller]
    pub fn assert_page_change(intent: Option<TableIntent>, page_index: usize, page_size: usize) {
        match intent {
            Some(TableIntent::PageChange {
                page_index: i,
                page_size: s,
            }) => {
                assert_eq!(i, page_index, "Wrong page index");
                assert_eq!(s, page_size, "Wrong page size");
            }
            other => panic!(
                "Expected PageChange({}, {}), got: {:?}",
                page_index, page_size, other
            ),
        }
    }

    /// Assert that a submit was rejected with errors on exactly `fields`.
    #[track_caller]
    pub fn assert_rejected_fields<T: std::fmt::Debug>(
        result: &Result<T, SubmitRejected>,
        fields: &[&str],
    ) {
        match result {
            Err(SubmitRejected::Invalid(errors)) => {
                let mut got: Vec<&str> = errors.iter().map(|(name, _)| name).collect();
                let mut want = fields.to_vec();
                got.sort_unstable();
                want.sort_unstable();
                assert_eq!(got, want, "Wrong set of invalid fields");
            }
            other => panic!("Expected validation failure on {:?}, got: {:?}", fields, other),
        }
    }

    /// Assert that the envelope invariants hold.
    #[track_caller]
    pub fn assert_consistent(page: &PagedResultSet) {
        if let Err(e) = page.check() {
            panic!("Inconsistent page: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_users_fixture_matches_schema() {
        let page = fixtures::users_page(0, 3);
        assertions::assert_consistent(&page);
        assert_eq!(page.total_pages, 4);
        assert_eq!(page.content[0].value("Email"), &Scalar::from("jean.dupont@example.com"));
        assert!(page.check_ids("ID").is_ok());
    }

    #[test]
    fn test_location_tree_ids_unique() {
        let tree = fixtures::location_tree();
        for id in 1..=12i64 {
            assert!(adminboard_core::hierarchy::contains(&tree, &Identifier::Int(id)));
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(50))]

        /// Generated pages satisfy the envelope invariants.
        #[test]
        fn prop_generated_pages_are_consistent(page in generators::arb_paged_result_set()) {
            prop_assert!(page.check().is_ok());
            prop_assert!(page.check_ids("ID").is_ok());
        }

        /// Generated trees carry unique ids.
        #[test]
        fn prop_generated_tree_ids_unique(tree in generators::arb_tree(3)) {
            fn collect(nodes: &[HierarchyNode], out: &mut Vec<Identifier>) {
                for node in nodes {
                    out.push(node.id.clone());
                    collect(&node.children, out);
                }
            }
            let mut ids = Vec::new();
            collect(&tree, &mut ids);
            let unique: std::collections::HashSet<_> = ids.iter().cloned().collect();
            prop_assert_eq!(unique.len(), ids.len());
        }
    }
}
