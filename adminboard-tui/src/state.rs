//! Application state.
//!
//! [`App`] owns one [`CrudTable`] per configured resource, the hierarchy
//! picker and the sidebar. Input and task results go in; [`Effect`]s come
//! out for the event loop to run. Nothing here touches the network.

use crate::config::{AdminConfig, ResourceConfig, DASHBOARD_TARGET};
use crate::events::TuiEvent;
use crate::keys::{map_key, Action, InputMode};
use crate::nav::Navigation;
use crate::notifications::{Notification, NotificationLevel, Notifications};
use crate::persistence::ACTIVE_TARGET_KEY;
use crate::source::RecordSource;
use crate::theme::Theme;
use adminboard_core::{
    ColumnType, CrudTable, HierarchyNode, HierarchyPicker, Identifier, KeyValueStore,
    PagedResultSet, SaveIntent, SchemaRegistry, SubmitRejected, TableIntent, TableMode,
    TableQuery,
};
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Page sizes offered by `+` and `-`.
pub const PAGE_SIZES: [usize; 5] = [3, 5, 10, 20, 50];

pub type SharedStore = Box<dyn KeyValueStore + Send>;

/// Work the event loop carries out on behalf of the state.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Fetch {
        resource: String,
        seq: u64,
        page_index: usize,
        page_size: usize,
        query: TableQuery,
    },
    Save {
        resource: String,
        intent: SaveIntent,
    },
    Delete {
        resource: String,
        id: Identifier,
    },
    LoadHierarchy,
}

/// Delete waiting for a yes/no answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDelete {
    pub resource: String,
    pub id: Identifier,
}

pub struct ResourcePage {
    pub config: ResourceConfig,
    pub source: Arc<dyn RecordSource>,
    pub table: CrudTable,
    /// Sequence number of the latest fetch issued.
    pub seq: u64,
    pub loading: bool,
    pub loaded: bool,
    /// Column the sort key acts on.
    pub sort_column: usize,
    pub last_error: Option<String>,
}

impl ResourcePage {
    pub fn new(config: ResourceConfig, source: Arc<dyn RecordSource>) -> Self {
        let empty = PagedResultSet::empty(SchemaRegistry::default(), config.page_size);
        let table = CrudTable::new(empty, config.id_field.clone(), config.mode);
        Self {
            config,
            source,
            table,
            seq: 0,
            loading: false,
            loaded: false,
            sort_column: 0,
            last_error: None,
        }
    }

    pub fn key(&self) -> &str {
        &self.config.key
    }

    /// Issue a fetch, superseding any in flight.
    fn fetch(&mut self, page_index: usize, page_size: usize) -> Effect {
        self.seq += 1;
        self.loading = true;
        let query = match self.table.mode() {
            TableMode::Local => TableQuery::default(),
            TableMode::Server => self.table.query(),
        };
        tracing::debug!(
            resource = %self.config.key,
            seq = self.seq,
            page_index,
            page_size,
            "Fetch issued"
        );
        Effect::Fetch {
            resource: self.config.key.clone(),
            seq: self.seq,
            page_index,
            page_size,
            query,
        }
    }

    fn refetch(&mut self) -> Effect {
        let (page_index, page_size) = (self.table.page_index(), self.table.page_size());
        self.fetch(page_index, page_size)
    }

    pub fn sort_column_name(&self) -> Option<&str> {
        self.table
            .columns()
            .iter()
            .nth(self.sort_column)
            .map(|c| c.name.as_str())
    }
}

pub struct App {
    pub config: AdminConfig,
    pub theme: Theme,
    pub nav: Navigation,
    pub resources: Vec<ResourcePage>,
    pub picker: HierarchyPicker<SharedStore>,
    pub hierarchy_loaded: bool,
    /// Text being typed into the filter bar, if open.
    pub filter_input: Option<String>,
    pub pending_delete: Option<PendingDelete>,
    pub notifications: Notifications,
    /// Clock as of the last tick; notification expiry is judged against it.
    pub now: DateTime<Utc>,
    pub show_help: bool,
    pub should_quit: bool,
}

impl App {
    /// Build the state. Resources without a matching source are skipped.
    pub fn new(
        config: AdminConfig,
        sources: Vec<(String, Arc<dyn RecordSource>)>,
        store: SharedStore,
    ) -> Self {
        let mut nav = Navigation::new(&config.menu, &config.user_role);
        if let Some(target) = store.get(ACTIVE_TARGET_KEY) {
            if !nav.select_target(&target) {
                tracing::debug!(target = %target, "Persisted target no longer in menu");
            }
        }

        let mut resources = Vec::new();
        for resource in &config.resources {
            match sources.iter().find(|(key, _)| *key == resource.key) {
                Some((_, source)) => {
                    resources.push(ResourcePage::new(resource.clone(), Arc::clone(source)))
                }
                None => tracing::warn!(resource = %resource.key, "No source for resource"),
            }
        }

        // The tree arrives later; mounting empty leaves the store alone.
        let picker =
            HierarchyPicker::mount(Vec::new(), store, config.hierarchy.selection_key.clone());

        Self {
            config,
            theme: Theme::console(),
            nav,
            resources,
            picker,
            hierarchy_loaded: false,
            filter_input: None,
            pending_delete: None,
            notifications: Notifications::default(),
            now: Utc::now(),
            show_help: false,
            should_quit: false,
        }
    }

    /// Hierarchy load plus a first page for every resource.
    pub fn initial_effects(&mut self) -> Vec<Effect> {
        let mut effects = vec![Effect::LoadHierarchy];
        effects.extend(self.resources.iter_mut().map(ResourcePage::refetch));
        effects
    }

    pub fn notify(&mut self, level: NotificationLevel, message: impl Into<String>) {
        self.notifications.push(Notification::new(level, message));
    }

    /// Newest notification that has not expired as of the last tick.
    pub fn current_notification(&self) -> Option<&Notification> {
        self.notifications.current(self.now)
    }

    pub fn is_dashboard(&self) -> bool {
        self.nav.active_target() == Some(DASHBOARD_TARGET)
    }

    pub fn resource_index(&self, key: &str) -> Option<usize> {
        self.resources.iter().position(|r| r.key() == key)
    }

    pub fn resource(&self, key: &str) -> Option<&ResourcePage> {
        self.resource_index(key).map(|i| &self.resources[i])
    }

    pub fn active_resource_index(&self) -> Option<usize> {
        self.nav
            .active_target()
            .and_then(|target| self.resource_index(target))
    }

    pub fn active_resource(&self) -> Option<&ResourcePage> {
        self.active_resource_index().map(|i| &self.resources[i])
    }

    pub fn source_for(&self, key: &str) -> Option<Arc<dyn RecordSource>> {
        self.resource(key).map(|r| Arc::clone(&r.source))
    }

    pub fn input_mode(&self) -> InputMode {
        if self.pending_delete.is_some() {
            return InputMode::Confirm;
        }
        if self.picker.is_open() {
            return InputMode::Picker;
        }
        if self.filter_input.is_some() {
            return InputMode::Filter;
        }
        if self
            .active_resource()
            .is_some_and(|r| r.table.editor().is_open())
        {
            return InputMode::Editor;
        }
        InputMode::Normal
    }

    pub fn persist_active_target(&mut self) {
        if let Some(target) = self.nav.active_target().map(str::to_string) {
            self.picker.store_mut().set(ACTIVE_TARGET_KEY, &target);
        }
    }

    // ========================================================================
    // EVENTS
    // ========================================================================

    pub fn apply_event(&mut self, event: TuiEvent) -> Vec<Effect> {
        match event {
            TuiEvent::Input(key) => match map_key(key, self.input_mode()) {
                Some(action) => self.handle_action(action),
                None => Vec::new(),
            },
            TuiEvent::Tick => {
                self.now = Utc::now();
                Vec::new()
            }
            TuiEvent::Resize { .. } => Vec::new(),
            TuiEvent::PageLoaded {
                resource,
                seq,
                result,
            } => self.apply_page(&resource, seq, result),
            TuiEvent::Saved {
                resource,
                is_editing,
                result,
            } => self.apply_saved(&resource, is_editing, result),
            TuiEvent::Deleted {
                resource,
                id,
                result,
            } => self.apply_deleted(&resource, &id, result),
            TuiEvent::HierarchyLoaded(result) => {
                self.apply_hierarchy(result);
                Vec::new()
            }
        }
    }

    /// Adopt a fetched page unless a newer fetch has been issued since.
    pub fn apply_page(
        &mut self,
        key: &str,
        seq: u64,
        result: Result<PagedResultSet, String>,
    ) -> Vec<Effect> {
        let Some(index) = self.resource_index(key) else {
            tracing::warn!(resource = %key, "Page for unknown resource");
            return Vec::new();
        };
        let resource = &mut self.resources[index];
        if seq != resource.seq {
            tracing::debug!(resource = %key, seq, latest = resource.seq, "Dropping stale page");
            return Vec::new();
        }
        resource.loading = false;

        let checked = result.and_then(|page| {
            page.check_usable(&resource.config.id_field)
                .map(|()| page)
                .map_err(|err| format!("invalid page: {}", err))
        });
        let page = match checked {
            Ok(page) => page,
            Err(message) => {
                tracing::error!(resource = %key, error = %message, "Page fetch failed");
                resource.table.restore_page_index();
                resource.last_error = Some(message.clone());
                self.notify(
                    NotificationLevel::Error,
                    format!("Failed to load {}: {}", key, message),
                );
                return Vec::new();
            }
        };

        // Asked for a page past the end, e.g. after deleting the last row.
        let requested = page.pageable.page_number;
        if page.content.is_empty() && requested > 0 {
            let last = page.page_count().saturating_sub(1) as usize;
            if last < requested {
                let page_size = page.pageable.page_size;
                return vec![resource.fetch(last, page_size)];
            }
        }

        tracing::info!(
            resource = %key,
            page_index = requested,
            rows = page.content.len(),
            total = page.total_elements,
            "Page loaded"
        );
        resource.table.replace_page(page);
        resource.loaded = true;
        resource.last_error = None;
        let columns = resource.table.columns().len();
        if resource.sort_column >= columns {
            resource.sort_column = 0;
        }
        if resource.table.cursor().is_none() {
            resource.table.select_next();
        }
        Vec::new()
    }

    pub fn apply_saved(
        &mut self,
        key: &str,
        is_editing: bool,
        result: Result<(), String>,
    ) -> Vec<Effect> {
        match result {
            Ok(()) => {
                let verb = if is_editing { "updated" } else { "created" };
                tracing::info!(resource = %key, is_editing, "Record saved");
                self.notify(NotificationLevel::Success, format!("Record {}", verb));
                self.refetch(key)
            }
            Err(message) => {
                tracing::error!(resource = %key, error = %message, "Save failed");
                self.notify(NotificationLevel::Error, format!("Save failed: {}", message));
                Vec::new()
            }
        }
    }

    pub fn apply_deleted(
        &mut self,
        key: &str,
        id: &Identifier,
        result: Result<(), String>,
    ) -> Vec<Effect> {
        match result {
            Ok(()) => {
                tracing::info!(resource = %key, id = %id, "Record deleted");
                self.notify(NotificationLevel::Success, format!("Record {} deleted", id));
                self.refetch(key)
            }
            Err(message) => {
                tracing::error!(resource = %key, id = %id, error = %message, "Delete failed");
                self.notify(NotificationLevel::Error, format!("Delete failed: {}", message));
                Vec::new()
            }
        }
    }

    pub fn apply_hierarchy(&mut self, result: Result<Vec<HierarchyNode>, String>) {
        match result {
            Ok(tree) => {
                tracing::info!(roots = tree.len(), "Hierarchy loaded");
                self.picker.replace_tree(tree);
                self.hierarchy_loaded = true;
            }
            Err(message) => {
                tracing::warn!(error = %message, "Hierarchy load failed");
                self.notify(
                    NotificationLevel::Warning,
                    format!("Locations unavailable: {}", message),
                );
            }
        }
    }

    fn refetch(&mut self, key: &str) -> Vec<Effect> {
        match self.resource_index(key) {
            Some(index) => vec![self.resources[index].refetch()],
            None => Vec::new(),
        }
    }

    // ========================================================================
    // ACTIONS
    // ========================================================================

    pub fn handle_action(&mut self, action: Action) -> Vec<Effect> {
        if action == Action::Quit {
            self.should_quit = true;
            return Vec::new();
        }
        match self.input_mode() {
            InputMode::Confirm => self.handle_confirm(action),
            InputMode::Picker => {
                self.handle_picker(action);
                Vec::new()
            }
            InputMode::Filter => self.handle_filter(action),
            InputMode::Editor => self.handle_editor(action),
            InputMode::Normal => self.handle_normal(action),
        }
    }

    fn handle_confirm(&mut self, action: Action) -> Vec<Effect> {
        match action {
            Action::Confirm => match self.pending_delete.take() {
                Some(PendingDelete { resource, id }) => {
                    tracing::debug!(resource = %resource, id = %id, "Delete confirmed");
                    vec![Effect::Delete { resource, id }]
                }
                None => Vec::new(),
            },
            Action::Cancel => {
                self.pending_delete = None;
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    fn handle_picker(&mut self, action: Action) {
        match action {
            Action::Input(c) => {
                let mut query = self.picker.query().to_string();
                query.push(c);
                self.picker.set_query(query);
            }
            Action::Backspace => {
                let mut query = self.picker.query().to_string();
                query.pop();
                self.picker.set_query(query);
            }
            Action::MoveUp => self.picker.cursor_previous(),
            Action::MoveDown => self.picker.cursor_next(),
            Action::ToggleExpand => {
                self.picker.toggle_cursor();
            }
            Action::Confirm => {
                if self.picker.select_cursor().is_some() {
                    let label = self.picker.label().to_string();
                    tracing::info!(location = %label, "Location selected");
                    self.notify(NotificationLevel::Info, format!("Location: {}", label));
                }
            }
            Action::Cancel => self.picker.close(),
            _ => {}
        }
    }

    fn handle_filter(&mut self, action: Action) -> Vec<Effect> {
        let Some(mut input) = self.filter_input.take() else {
            return Vec::new();
        };
        match action {
            Action::Input(c) => input.push(c),
            Action::Backspace => {
                input.pop();
            }
            Action::Confirm => return Vec::new(),
            Action::Cancel => input.clear(),
            _ => {
                self.filter_input = Some(input);
                return Vec::new();
            }
        }
        let effects = self.with_active_table(|table| table.set_filter(input.clone()));
        if action != Action::Cancel {
            self.filter_input = Some(input);
        }
        effects
    }

    fn handle_editor(&mut self, action: Action) -> Vec<Effect> {
        let Some(index) = self.active_resource_index() else {
            return Vec::new();
        };
        let key = self.resources[index].config.key.clone();
        let editor = self.resources[index].table.editor_mut();
        let focused = editor
            .focused_column()
            .map(|c| (c.name.clone(), c.column_type));

        match action {
            Action::NextField => editor.focus_next(),
            Action::PrevField => editor.focus_previous(),
            Action::MoveLeft | Action::MoveRight => {
                if let Some((name, ColumnType::Dropdown)) = &focused {
                    editor.cycle_option(name, action == Action::MoveRight);
                }
            }
            Action::Input(c) => {
                if let Some((name, kind)) = &focused {
                    if *kind != ColumnType::Dropdown {
                        let mut text = editor.input_text(name).unwrap_or_default();
                        text.push(c);
                        editor.set_field(name, &text);
                    }
                }
            }
            Action::Backspace => {
                if let Some((name, kind)) = &focused {
                    if *kind != ColumnType::Dropdown {
                        let mut text = editor.input_text(name).unwrap_or_default();
                        text.pop();
                        editor.set_field(name, &text);
                    }
                }
            }
            Action::Cancel => editor.cancel(),
            Action::Confirm => return self.submit_editor(index, key),
            _ => {}
        }
        Vec::new()
    }

    fn submit_editor(&mut self, index: usize, key: String) -> Vec<Effect> {
        match self.resources[index].table.submit_editor() {
            Ok(TableIntent::Save(intent)) => {
                tracing::debug!(resource = %key, is_editing = intent.is_editing, "Save intent");
                vec![Effect::Save {
                    resource: key,
                    intent,
                }]
            }
            Ok(_) => Vec::new(),
            Err(SubmitRejected::Invalid(errors)) => {
                self.notify(
                    NotificationLevel::Warning,
                    format!("{} field(s) need attention", errors.len()),
                );
                Vec::new()
            }
            Err(rejected) => {
                self.notify(NotificationLevel::Error, rejected.to_string());
                Vec::new()
            }
        }
    }

    fn handle_normal(&mut self, action: Action) -> Vec<Effect> {
        if self.show_help {
            if matches!(action, Action::Cancel | Action::OpenHelp | Action::Confirm) {
                self.show_help = false;
            }
            return Vec::new();
        }

        match action {
            Action::NextView | Action::PrevView => {
                if action == Action::NextView {
                    self.nav.next();
                } else {
                    self.nav.previous();
                }
                self.persist_active_target();
                return self.ensure_active_loaded();
            }
            Action::OpenHelp => {
                self.show_help = true;
                return Vec::new();
            }
            Action::OpenPicker => {
                if !self.picker.open() {
                    self.notify(NotificationLevel::Info, self.picker.label().to_string());
                }
                return Vec::new();
            }
            Action::Refresh => {
                if self.is_dashboard() {
                    return self.initial_effects();
                }
                return self.with_active_resource(|r| Some(r.refetch()));
            }
            _ => {}
        }

        let Some(index) = self.active_resource_index() else {
            return Vec::new();
        };

        match action {
            Action::MoveDown => self.resources[index].table.select_next(),
            Action::MoveUp => self.resources[index].table.select_previous(),
            Action::NextColumn | Action::PrevColumn => {
                let resource = &mut self.resources[index];
                let count = resource.table.columns().len();
                if count > 0 {
                    resource.sort_column = if action == Action::NextColumn {
                        (resource.sort_column + 1) % count
                    } else {
                        (resource.sort_column + count - 1) % count
                    };
                }
            }
            Action::Sort => {
                let resource = &mut self.resources[index];
                if let Some(column) = resource.sort_column_name().map(str::to_string) {
                    let intent = resource.table.toggle_sort(&column);
                    return self.run_intent(index, intent);
                }
            }
            Action::OpenFilter => {
                self.filter_input = Some(self.resources[index].table.filter().to_string());
            }
            Action::NewItem => {
                let table = &mut self.resources[index].table;
                table.open_create();
                if table.editor().columns_missing() {
                    self.notify(NotificationLevel::Warning, "Columns are not defined");
                }
            }
            Action::EditItem => {
                if !self.resources[index].table.open_selected() {
                    self.notify(NotificationLevel::Info, "No row selected");
                }
            }
            Action::DeleteItem => {
                let intent = self.resources[index].table.delete_selected();
                return self.run_intent(index, intent);
            }
            Action::NextPage => {
                let intent = self.resources[index].table.next_page();
                return self.run_intent(index, intent);
            }
            Action::PrevPage => {
                let intent = self.resources[index].table.previous_page();
                return self.run_intent(index, intent);
            }
            Action::FirstPage => {
                let intent = self.resources[index].table.go_to_page(0);
                return self.run_intent(index, intent);
            }
            Action::LastPage => {
                let table = &mut self.resources[index].table;
                let last = table.page_count().saturating_sub(1) as usize;
                let intent = table.go_to_page(last);
                return self.run_intent(index, intent);
            }
            Action::GoToPage(page_index) => {
                let intent = self.resources[index].table.go_to_page(page_index);
                return self.run_intent(index, intent);
            }
            Action::PageSizeUp | Action::PageSizeDown => {
                let table = &mut self.resources[index].table;
                let size = next_page_size(table.page_size(), action == Action::PageSizeUp);
                let intent = size.and_then(|size| table.set_page_size(size));
                return self.run_intent(index, intent);
            }
            _ => {}
        }
        Vec::new()
    }

    /// Turn a table intent into effects for the resource at `index`.
    fn run_intent(&mut self, index: usize, intent: Option<TableIntent>) -> Vec<Effect> {
        let Some(intent) = intent else {
            return Vec::new();
        };
        let resource = &mut self.resources[index];
        match intent {
            TableIntent::PageChange {
                page_index,
                page_size,
            } => vec![resource.fetch(page_index, page_size)],
            TableIntent::QueryChange(_) => {
                let page_size = resource.table.page_size();
                vec![resource.fetch(0, page_size)]
            }
            TableIntent::Delete(id) => {
                self.pending_delete = Some(PendingDelete {
                    resource: resource.config.key.clone(),
                    id,
                });
                Vec::new()
            }
            TableIntent::Save(intent) => vec![Effect::Save {
                resource: resource.config.key.clone(),
                intent,
            }],
        }
    }

    fn with_active_table(
        &mut self,
        f: impl FnOnce(&mut CrudTable) -> Option<TableIntent>,
    ) -> Vec<Effect> {
        let Some(index) = self.active_resource_index() else {
            return Vec::new();
        };
        let intent = f(&mut self.resources[index].table);
        self.run_intent(index, intent)
    }

    fn with_active_resource(
        &mut self,
        f: impl FnOnce(&mut ResourcePage) -> Option<Effect>,
    ) -> Vec<Effect> {
        match self.active_resource_index() {
            Some(index) => f(&mut self.resources[index]).into_iter().collect(),
            None => Vec::new(),
        }
    }

    fn ensure_active_loaded(&mut self) -> Vec<Effect> {
        self.with_active_resource(|r| (!r.loaded && !r.loading).then(|| r.refetch()))
    }
}

/// Neighbouring entry of [`PAGE_SIZES`] in the given direction.
pub fn next_page_size(current: usize, up: bool) -> Option<usize> {
    if up {
        PAGE_SIZES.iter().copied().find(|&size| size > current)
    } else {
        PAGE_SIZES.iter().rev().copied().find(|&size| size < current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::FixtureSource;
    use crate::notifications::NOTIFICATION_TTL_SECS;
    use adminboard_core::{MemoryStore, Scalar};
    use adminboard_test_utils::fixtures;

    fn config() -> AdminConfig {
        AdminConfig::from_toml(
            r#"
            api_base_url = "http://localhost:8080"
            request_timeout_ms = 1000
            tick_rate_ms = 250
            state_path = "state.json"
            log_path = "adminboard.log"
            user_role = "ROLE_ADMIN"

            [hierarchy]
            selection_key = "selectedLocation"

            [[resources]]
            key = "users"
            title = "Users"
            fixture = "users.json"
            id_field = "ID"
            page_size = 3
            mode = "local"

            [[menu]]
            label = "Dashboard"
            target = "dashboard"

            [[menu]]
            label = "Manage User"
            target = "users"
            "#,
        )
        .unwrap()
    }

    fn app() -> App {
        let source: Arc<dyn RecordSource> = Arc::new(FixtureSource::new(
            fixtures::user_columns(),
            fixtures::users(),
            "ID",
        ));
        let mut app = App::new(
            config(),
            vec![("users".to_string(), source)],
            Box::new(MemoryStore::new()),
        );
        app.nav.select_target("users");
        app
    }

    fn seq_of(effect: &Effect) -> u64 {
        match effect {
            Effect::Fetch { seq, .. } => *seq,
            other => panic!("expected fetch, got {:?}", other),
        }
    }

    #[test]
    fn test_stale_page_is_dropped() {
        let mut app = app();
        let first = app.handle_action(Action::Refresh);
        let second = app.handle_action(Action::Refresh);
        assert_eq!(seq_of(&first[0]) + 1, seq_of(&second[0]));

        let newer = fixtures::users_page(0, 3);
        let older = fixtures::users_page(1, 3);
        app.apply_page("users", seq_of(&second[0]), Ok(newer));
        app.apply_page("users", seq_of(&first[0]), Ok(older));

        let table = &app.resource("users").unwrap().table;
        assert_eq!(table.page_index(), 0);
    }

    #[test]
    fn test_delete_waits_for_confirmation() {
        let mut app = app();
        let seq = seq_of(&app.handle_action(Action::Refresh)[0]);
        app.apply_page("users", seq, Ok(fixtures::users_page(0, 3)));

        assert!(app.handle_action(Action::DeleteItem).is_empty());
        assert_eq!(app.input_mode(), InputMode::Confirm);
        assert!(!app.resource("users").unwrap().table.editor().is_open());

        let effects = app.handle_action(Action::Confirm);
        assert!(matches!(
            &effects[..],
            [Effect::Delete { resource, id }] if resource == "users" && *id == Identifier::Int(1)
        ));
        assert_eq!(app.input_mode(), InputMode::Normal);
    }

    #[test]
    fn test_cancelled_delete_emits_nothing() {
        let mut app = app();
        let seq = seq_of(&app.handle_action(Action::Refresh)[0]);
        app.apply_page("users", seq, Ok(fixtures::users_page(0, 3)));
        app.handle_action(Action::DeleteItem);
        assert!(app.handle_action(Action::Cancel).is_empty());
        assert!(app.pending_delete.is_none());
    }

    #[test]
    fn test_page_past_end_refetches_last_page() {
        let mut app = app();
        let seq = seq_of(&app.handle_action(Action::Refresh)[0]);
        let past_end = PagedResultSet::from_slice(fixtures::user_columns(), &fixtures::users(), 5, 3);
        let effects = app.apply_page("users", seq, Ok(past_end));
        assert!(matches!(
            &effects[..],
            [Effect::Fetch { page_index: 3, page_size: 3, .. }]
        ));
    }

    #[test]
    fn test_failed_page_keeps_previous_rows() {
        let mut app = app();
        let seq = seq_of(&app.handle_action(Action::Refresh)[0]);
        app.apply_page("users", seq, Ok(fixtures::users_page(0, 3)));
        let seq = seq_of(&app.handle_action(Action::NextPage)[0]);
        app.apply_page("users", seq, Err("timeout".to_string()));

        let resource = app.resource("users").unwrap();
        assert_eq!(resource.table.page().content.len(), 3);
        assert_eq!(resource.last_error.as_deref(), Some("timeout"));
        assert!(app.notifications.last().is_some());
    }

    #[test]
    fn test_failed_page_restores_page_index() {
        let mut app = app();
        let seq = seq_of(&app.handle_action(Action::Refresh)[0]);
        app.apply_page("users", seq, Ok(fixtures::users_page(0, 3)));
        let seq = seq_of(&app.handle_action(Action::NextPage)[0]);
        app.apply_page("users", seq, Err("timeout".to_string()));

        let table = &app.resource("users").unwrap().table;
        assert_eq!(table.page_index(), table.page().pageable.page_number);
        assert_eq!(table.range_label(), "1-3 of 10");
        assert!(table.can_next());
        assert!(matches!(
            &app.handle_action(Action::NextPage)[..],
            [Effect::Fetch { page_index: 1, .. }]
        ));
    }

    #[test]
    fn test_unusable_page_is_not_adopted() {
        let mut app = app();
        let seq = seq_of(&app.handle_action(Action::Refresh)[0]);
        app.apply_page("users", seq, Ok(fixtures::users_page(0, 3)));

        let seq = seq_of(&app.handle_action(Action::NextPage)[0]);
        let mut broken = fixtures::users_page(1, 3);
        broken.pageable.page_number = usize::MAX;
        assert!(app.apply_page("users", seq, Ok(broken)).is_empty());

        let seq = seq_of(&app.handle_action(Action::NextPage)[0]);
        let mut duplicated = fixtures::users_page(1, 3);
        duplicated.content[1].set("ID", 4i64);
        app.apply_page("users", seq, Ok(duplicated));

        let resource = app.resource("users").unwrap();
        assert_eq!(resource.table.page_index(), 0);
        assert_eq!(resource.table.page().content[0].id("ID"), Some(Identifier::Int(1)));
        assert!(resource
            .last_error
            .as_deref()
            .is_some_and(|e| e.starts_with("invalid page")));
    }

    #[test]
    fn test_negative_number_can_be_typed() {
        let mut app = app();
        let seq = seq_of(&app.handle_action(Action::Refresh)[0]);
        app.apply_page("users", seq, Ok(fixtures::users_page(0, 3)));

        app.handle_action(Action::NewItem);
        assert_eq!(app.input_mode(), InputMode::Editor);
        app.handle_action(Action::NextField);
        app.handle_action(Action::NextField);
        for c in "-5".chars() {
            app.handle_action(Action::Input(c));
        }
        let editor = app.resource("users").unwrap().table.editor();
        assert_eq!(editor.focused_column().map(|c| c.name.as_str()), Some("Âge"));
        assert_eq!(editor.value("Âge"), Some(&Scalar::Int(-5)));

        app.handle_action(Action::Backspace);
        app.handle_action(Action::Backspace);
        let editor = app.resource("users").unwrap().table.editor();
        assert_eq!(editor.value("Âge"), Some(&Scalar::Null));
        assert_eq!(editor.input_text("Âge").as_deref(), Some(""));
    }

    #[test]
    fn test_editor_submit_yields_save_effect() {
        let mut app = app();
        let seq = seq_of(&app.handle_action(Action::Refresh)[0]);
        app.apply_page("users", seq, Ok(fixtures::users_page(0, 3)));

        app.handle_action(Action::EditItem);
        assert_eq!(app.input_mode(), InputMode::Editor);
        app.handle_action(Action::Input('x'));
        let effects = app.handle_action(Action::Confirm);
        match &effects[..] {
            [Effect::Save { resource, intent }] => {
                assert_eq!(resource, "users");
                assert!(intent.is_editing);
            }
            other => panic!("unexpected effects {:?}", other),
        }
        assert_eq!(app.input_mode(), InputMode::Normal);
    }

    #[test]
    fn test_filter_typing_narrows_local_rows() {
        let mut app = app();
        let seq = seq_of(&app.handle_action(Action::Refresh)[0]);
        app.apply_page("users", seq, Ok(fixtures::users_page(0, 10)));

        app.handle_action(Action::OpenFilter);
        for c in "AR".chars() {
            assert!(app.handle_action(Action::Input(c)).is_empty());
        }
        app.handle_action(Action::Confirm);
        assert_eq!(app.input_mode(), InputMode::Normal);
        let table = &app.resource("users").unwrap().table;
        assert_eq!(table.filter(), "AR");
        assert!(table.visible_len() < 10);

        app.handle_action(Action::OpenFilter);
        app.handle_action(Action::Cancel);
        assert_eq!(app.resource("users").unwrap().table.filter(), "");
    }

    #[test]
    fn test_view_change_persists_target() {
        let mut app = app();
        app.handle_action(Action::NextView);
        assert_eq!(
            app.picker.store().get(ACTIVE_TARGET_KEY).as_deref(),
            app.nav.active_target()
        );
    }

    #[test]
    fn test_tick_expires_notifications() {
        let mut app = app();
        app.notify(NotificationLevel::Info, "saved");
        assert!(app.current_notification().is_some());

        let created = app.notifications.last().map(|n| n.created_at).unwrap();
        app.now = created + chrono::Duration::seconds(NOTIFICATION_TTL_SECS + 1);
        assert!(app.current_notification().is_none());

        app.apply_event(TuiEvent::Tick);
        assert!(app.now >= created);
        assert!(app.current_notification().is_some());
    }

    #[test]
    fn test_page_size_steps() {
        assert_eq!(next_page_size(3, true), Some(5));
        assert_eq!(next_page_size(7, true), Some(10));
        assert_eq!(next_page_size(50, true), None);
        assert_eq!(next_page_size(3, false), None);
        assert_eq!(next_page_size(10, false), Some(5));
    }
}
