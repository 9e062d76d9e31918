//! adminboard Core - View State
//!
//! Headless state for the admin console: record schemas, paged result sets,
//! the CRUD table, the record editor and the hierarchy picker.
//! This crate performs no I/O. Network calls and persistence belong to the
//! caller, which receives [`TableIntent`] values and injects a
//! [`KeyValueStore`].

pub mod editor;
pub mod error;
pub mod hierarchy;
pub mod menu;
pub mod page;
pub mod record;
pub mod schema;
pub mod store;
pub mod table;

pub use editor::{EditorMode, FieldErrors, RecordEditor, SaveIntent, SubmitRejected};
pub use error::PageError;
pub use hierarchy::{
    compute_visible, HierarchyNode, HierarchyPicker, PickerRow, Visibility,
};
pub use menu::{MenuEntry, MenuItem, ROLE_ALL};
pub use page::{page_count, range_label, Pageable, PagedResultSet};
pub use record::{Identifier, Record, Scalar};
pub use schema::{ColumnDescriptor, ColumnType, SchemaRegistry, NONE_SENTINEL, REQUIRED_MESSAGE};
pub use store::{KeyValueStore, MemoryStore};
pub use table::{
    CrudTable, HeaderCell, RowView, SortDirection, SortState, TableBody, TableIntent, TableMode,
    TableQuery, TableRender,
};
