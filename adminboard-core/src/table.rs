//! CRUD table view state.
//!
//! Holds one [`PagedResultSet`] plus sort, filter, pagination and the row
//! editor. Anything that needs the network comes back to the caller as a
//! [`TableIntent`].

use crate::editor::{RecordEditor, SaveIntent, SubmitRejected};
use crate::page::{self, PagedResultSet};
use crate::record::{Identifier, Record};
use crate::schema::SchemaRegistry;
use serde::{Deserialize, Serialize};

// ============================================================================
// MODES AND QUERIES
// ============================================================================

/// Where sorting and filtering happen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableMode {
    /// Over the loaded page only.
    #[default]
    Local,
    /// Forwarded to the caller; the table waits for a new page.
    Server,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub column: String,
    pub direction: SortDirection,
}

/// Sort and filter as sent to a server-side source.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TableQuery {
    pub sort: Option<SortState>,
    pub filter: String,
}

/// Work the caller has to carry out.
#[derive(Debug, Clone, PartialEq)]
pub enum TableIntent {
    /// Fetch `page_index` at `page_size`.
    PageChange { page_index: usize, page_size: usize },
    /// Delete the record with this id.
    Delete(Identifier),
    /// Create or update a record.
    Save(SaveIntent),
    /// Server mode only: sort or filter changed, refetch from page zero.
    QueryChange(TableQuery),
}

// ============================================================================
// RENDER MODEL
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderCell {
    pub label: String,
    pub sort: Option<SortDirection>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    /// Index into the loaded page's content.
    pub position: usize,
    pub id: Option<Identifier>,
    pub cells: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableBody {
    /// No columns: show the fixed placeholder instead of a table.
    NoData,
    /// Columns but nothing to show; one row spanning `colspan` cells.
    NoResults { colspan: usize },
    Rows(Vec<RowView>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRender {
    /// Column headers followed by "Actions". Empty for [`TableBody::NoData`].
    pub headers: Vec<HeaderCell>,
    pub body: TableBody,
}

pub const ACTIONS_HEADER: &str = "Actions";

// ============================================================================
// TABLE
// ============================================================================

#[derive(Debug, Clone)]
pub struct CrudTable {
    page: PagedResultSet,
    id_field: String,
    mode: TableMode,
    sort: Option<SortState>,
    filter: String,
    page_index: usize,
    page_size: usize,
    /// Display order as positions into `page.content`.
    visible: Vec<usize>,
    cursor: Option<usize>,
    editor: RecordEditor,
}

impl CrudTable {
    pub fn new(page: PagedResultSet, id_field: impl Into<String>, mode: TableMode) -> Self {
        let id_field = id_field.into();
        let editor = RecordEditor::new(page.columns.clone(), id_field.clone());
        let mut table = Self {
            page_index: page.pageable.page_number,
            page_size: page.pageable.page_size,
            page,
            id_field,
            mode,
            sort: None,
            filter: String::new(),
            visible: Vec::new(),
            cursor: None,
            editor,
        };
        table.recompute();
        table
    }

    /// Adopt a freshly fetched page. Sort, filter and an open editor survive.
    pub fn replace_page(&mut self, page: PagedResultSet) {
        self.page_index = page.pageable.page_number;
        self.page_size = page.pageable.page_size;
        self.editor.set_columns(page.columns.clone());
        self.page = page;
        self.recompute();
    }

    pub fn page(&self) -> &PagedResultSet {
        &self.page
    }

    pub fn columns(&self) -> &SchemaRegistry {
        &self.page.columns
    }

    pub fn id_field(&self) -> &str {
        &self.id_field
    }

    pub fn mode(&self) -> TableMode {
        self.mode
    }

    pub fn sort(&self) -> Option<&SortState> {
        self.sort.as_ref()
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn query(&self) -> TableQuery {
        TableQuery {
            sort: self.sort.clone(),
            filter: self.filter.clone(),
        }
    }

    pub fn editor(&self) -> &RecordEditor {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut RecordEditor {
        &mut self.editor
    }

    // ------------------------------------------------------------------------
    // Visible rows
    // ------------------------------------------------------------------------

    fn recompute(&mut self) {
        let content = &self.page.content;
        let mut visible: Vec<usize> = (0..content.len()).collect();

        if self.mode == TableMode::Local {
            let columns = &self.page.columns;
            if !self.filter.is_empty() {
                let needle = self.filter.to_lowercase();
                visible.retain(|&i| row_matches(columns, &content[i], &needle));
            }
            if let Some(sort) = &self.sort {
                if let Some(column) = columns.column(&sort.column) {
                    let kind = column.column_type;
                    visible.sort_by(|&a, &b| {
                        kind.compare(content[a].value(&column.name), content[b].value(&column.name))
                    });
                    if sort.direction == SortDirection::Desc {
                        visible.reverse();
                    }
                }
            }
        }

        self.visible = visible;
        self.cursor = match (self.cursor, self.visible.len()) {
            (_, 0) => None,
            (Some(cursor), len) => Some(cursor.min(len - 1)),
            (None, _) => None,
        };
    }

    /// Loaded records in display order.
    pub fn visible_records(&self) -> impl Iterator<Item = &Record> {
        self.visible.iter().map(|&i| &self.page.content[i])
    }

    pub fn visible_len(&self) -> usize {
        self.visible.len()
    }

    fn record_at(&self, row: usize) -> Option<&Record> {
        self.visible.get(row).map(|&i| &self.page.content[i])
    }

    pub fn render(&self) -> TableRender {
        let columns = &self.page.columns;
        if columns.is_empty() {
            return TableRender {
                headers: Vec::new(),
                body: TableBody::NoData,
            };
        }

        let mut headers: Vec<HeaderCell> = columns
            .iter()
            .map(|column| HeaderCell {
                label: column.name.clone(),
                sort: self
                    .sort
                    .as_ref()
                    .filter(|s| s.column == column.name)
                    .map(|s| s.direction),
            })
            .collect();
        headers.push(HeaderCell {
            label: ACTIONS_HEADER.to_string(),
            sort: None,
        });

        let body = if self.visible.is_empty() {
            TableBody::NoResults {
                colspan: columns.len() + 1,
            }
        } else {
            TableBody::Rows(
                self.visible
                    .iter()
                    .map(|&position| {
                        let record = &self.page.content[position];
                        RowView {
                            position,
                            id: record.id(&self.id_field),
                            cells: rendered_cells(columns, record),
                        }
                    })
                    .collect(),
            )
        };

        TableRender { headers, body }
    }

    // ------------------------------------------------------------------------
    // Sort and filter
    // ------------------------------------------------------------------------

    /// Cycle a column through unsorted, ascending, descending.
    pub fn toggle_sort(&mut self, column: &str) -> Option<TableIntent> {
        self.page.columns.column(column)?;
        self.sort = match self.sort.take() {
            Some(SortState {
                column: current,
                direction: SortDirection::Asc,
            }) if current == column => Some(SortState {
                column: current,
                direction: SortDirection::Desc,
            }),
            Some(SortState {
                column: current,
                direction: SortDirection::Desc,
            }) if current == column => None,
            _ => Some(SortState {
                column: column.to_string(),
                direction: SortDirection::Asc,
            }),
        };
        self.query_changed()
    }

    /// Set the sort outright. Unknown columns are ignored.
    pub fn set_sort(&mut self, sort: Option<SortState>) -> Option<TableIntent> {
        if let Some(state) = &sort {
            self.page.columns.column(&state.column)?;
        }
        if sort == self.sort {
            return None;
        }
        self.sort = sort;
        self.query_changed()
    }

    pub fn set_filter(&mut self, filter: impl Into<String>) -> Option<TableIntent> {
        let filter = filter.into();
        if filter == self.filter {
            return None;
        }
        self.filter = filter;
        self.query_changed()
    }

    fn query_changed(&mut self) -> Option<TableIntent> {
        match self.mode {
            TableMode::Local => {
                self.recompute();
                None
            }
            TableMode::Server => {
                self.page_index = 0;
                Some(TableIntent::QueryChange(self.query()))
            }
        }
    }

    // ------------------------------------------------------------------------
    // Pagination
    // ------------------------------------------------------------------------

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn page_count(&self) -> u64 {
        page::page_count(self.page.total_elements, self.page_size)
    }

    pub fn range_label(&self) -> String {
        page::range_label(self.page_index, self.page_size, self.page.total_elements)
    }

    pub fn can_previous(&self) -> bool {
        self.page_index > 0
    }

    pub fn can_next(&self) -> bool {
        (self.page_index as u64).saturating_add(1) < self.page_count()
    }

    fn page_change(&self) -> TableIntent {
        TableIntent::PageChange {
            page_index: self.page_index,
            page_size: self.page_size,
        }
    }

    /// Return to the index and size of the loaded page, undoing a page
    /// change whose fetch failed.
    pub fn restore_page_index(&mut self) {
        self.page_index = self.page.pageable.page_number;
        self.page_size = self.page.pageable.page_size;
    }

    pub fn previous_page(&mut self) -> Option<TableIntent> {
        if !self.can_previous() {
            return None;
        }
        self.page_index -= 1;
        Some(self.page_change())
    }

    pub fn next_page(&mut self) -> Option<TableIntent> {
        if !self.can_next() {
            return None;
        }
        self.page_index += 1;
        Some(self.page_change())
    }

    /// Jump to a page. Out of range and the current page are no-ops.
    pub fn go_to_page(&mut self, page_index: usize) -> Option<TableIntent> {
        if page_index as u64 >= self.page_count() || page_index == self.page_index {
            return None;
        }
        self.page_index = page_index;
        Some(self.page_change())
    }

    /// Change the page size and restart from the first page.
    pub fn set_page_size(&mut self, page_size: usize) -> Option<TableIntent> {
        if page_size == 0 || page_size == self.page_size {
            return None;
        }
        self.page_size = page_size;
        self.page_index = 0;
        Some(self.page_change())
    }

    // ------------------------------------------------------------------------
    // Row actions
    // ------------------------------------------------------------------------

    /// Open the editor on the row at display index `row`.
    pub fn open_row(&mut self, row: usize) -> bool {
        let Some(record) = self.record_at(row).cloned() else {
            return false;
        };
        self.editor.open_edit(record);
        true
    }

    pub fn open_create(&mut self) {
        self.editor.open_create();
    }

    /// Delete intent for the row at display index `row`.
    ///
    /// Never opens the editor. Rows without an id yield nothing.
    pub fn delete_row(&self, row: usize) -> Option<TableIntent> {
        self.record_at(row)
            .and_then(|record| record.id(&self.id_field))
            .map(TableIntent::Delete)
    }

    pub fn submit_editor(&mut self) -> Result<TableIntent, SubmitRejected> {
        self.editor.submit().map(TableIntent::Save)
    }

    // ------------------------------------------------------------------------
    // Cursor
    // ------------------------------------------------------------------------

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn selected_record(&self) -> Option<&Record> {
        self.cursor.and_then(|row| self.record_at(row))
    }

    pub fn select_next(&mut self) {
        let len = self.visible.len();
        if len == 0 {
            self.cursor = None;
            return;
        }
        self.cursor = Some(match self.cursor {
            Some(row) => (row + 1) % len,
            None => 0,
        });
    }

    pub fn select_previous(&mut self) {
        let len = self.visible.len();
        if len == 0 {
            self.cursor = None;
            return;
        }
        self.cursor = Some(match self.cursor {
            Some(0) | None => len - 1,
            Some(row) => row - 1,
        });
    }

    pub fn open_selected(&mut self) -> bool {
        match self.cursor {
            Some(row) => self.open_row(row),
            None => false,
        }
    }

    pub fn delete_selected(&self) -> Option<TableIntent> {
        self.cursor.and_then(|row| self.delete_row(row))
    }
}

fn rendered_cells(columns: &SchemaRegistry, record: &Record) -> Vec<String> {
    columns
        .iter()
        .map(|column| record.value(&column.name).to_string())
        .collect()
}

/// `needle` must already be lowercase.
fn row_matches(columns: &SchemaRegistry, record: &Record, needle: &str) -> bool {
    columns
        .iter()
        .any(|column| record.value(&column.name).to_string().to_lowercase().contains(needle))
}


// ============================================================================
// PROPERTY-BASED TESTS
// ============================================================================

#[cfg(test)]
mod prop_tests {
    use super::*;
    use crate::schema::ColumnDescriptor;
    use proptest::prelude::*;

    fn columns() -> SchemaRegistry {
        SchemaRegistry::new(vec![
            ColumnDescriptor::number("ID"),
            ColumnDescriptor::string("Nom"),
            ColumnDescriptor::number("Score"),
        ])
    }

    fn arb_rows() -> impl Strategy<Value = Vec<Record>> {
        prop::collection::vec(("[a-zA-Z ]{0,8}", -50i64..50), 0..25).prop_map(|rows| {
            rows.into_iter()
                .enumerate()
                .map(|(i, (nom, score))| {
                    Record::new()
                        .with("ID", i as i64)
                        .with("Nom", nom)
                        .with("Score", score)
                })
                .collect()
        })
    }

    fn local(rows: &[Record]) -> CrudTable {
        let size = rows.len().max(1);
        let page = PagedResultSet::from_slice(columns(), rows, 0, size);
        CrudTable::new(page, "ID", TableMode::Local)
    }

    fn ids(table: &CrudTable) -> Vec<Option<Identifier>> {
        table.visible_records().map(|r| r.id("ID")).collect()
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Page count is ceil(N/p); previous is disabled only on the first
        /// page and next only on the last.
        #[test]
        fn prop_pagination_controls(total in 1u64..200, size in 1usize..20, pick in any::<prop::sample::Index>()) {
            let expected = total.div_ceil(size as u64);
            let page_index = pick.index(expected as usize);
            let page = PagedResultSet {
                columns: columns(),
                content: Vec::new(),
                pageable: crate::Pageable { page_number: page_index, page_size: size },
                total_elements: total,
                total_pages: expected,
            };
            prop_assert!(page.check().is_ok());
            let table = CrudTable::new(page, "ID", TableMode::Server);
            prop_assert_eq!(table.page_count(), expected);
            prop_assert_eq!(!table.can_previous(), page_index == 0);
            prop_assert_eq!(!table.can_next(), page_index as u64 == expected - 1);
        }

        /// The visible set is exactly the rows with a matching rendered cell.
        #[test]
        fn prop_filter_matches_definition(rows in arb_rows(), filter in "[a-zA-Z0-9]{0,3}") {
            let mut table = local(&rows);
            table.set_filter(filter.clone());
            let needle = filter.to_lowercase();
            let expected: Vec<_> = rows
                .iter()
                .filter(|r| {
                    ["ID", "Nom", "Score"]
                        .iter()
                        .any(|c| r.value(c).to_string().to_lowercase().contains(&needle))
                })
                .map(|r| r.id("ID"))
                .collect();
            prop_assert_eq!(ids(&table), expected);
        }

        /// Applying the same filter twice leaves the visible rows unchanged.
        #[test]
        fn prop_filter_idempotent(rows in arb_rows(), filter in "[a-z]{0,2}") {
            let mut table = local(&rows);
            table.set_filter(filter.clone());
            let once = ids(&table);
            table.set_filter(filter);
            prop_assert_eq!(ids(&table), once);
        }

        /// Descending order is the ascending order reversed.
        #[test]
        fn prop_desc_reverses_asc(rows in arb_rows(), numeric in any::<bool>()) {
            let column = if numeric { "Score" } else { "Nom" };
            let mut table = local(&rows);
            table.toggle_sort(column);
            let mut asc = ids(&table);
            table.toggle_sort(column);
            let desc = ids(&table);
            asc.reverse();
            prop_assert_eq!(desc, asc);
        }

        /// Delete never opens the editor and names the row's id.
        #[test]
        fn prop_delete_never_opens_editor(rows in arb_rows(), pick in any::<prop::sample::Index>()) {
            prop_assume!(!rows.is_empty());
            let table = local(&rows);
            let row = pick.index(rows.len());
            let intent = table.delete_row(row);
            prop_assert_eq!(intent, Some(TableIntent::Delete(Identifier::Int(row as i64))));
            prop_assert!(!table.editor().is_open());
        }
    }
}
