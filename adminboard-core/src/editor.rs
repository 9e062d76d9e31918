//! Record editor: the add/edit form over a schema.
//!
//! Lifecycle: closed, then open in create or edit mode; submit either
//! stays open with errors or closes with a [`SaveIntent`].

use crate::record::{Record, Scalar};
use crate::schema::{ColumnDescriptor, ColumnType, SchemaRegistry};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorMode {
    Create,
    Edit,
}

/// Per-field validation messages, keyed by column name.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldErrors {
    errors: BTreeMap<String, String>,
}

impl FieldErrors {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.errors.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.errors.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.errors.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    fn set(&mut self, name: &str, error: Option<&str>) {
        match error {
            Some(message) => {
                self.errors.insert(name.to_string(), message.to_string());
            }
            None => {
                self.errors.remove(name);
            }
        }
    }
}

/// Payload handed to the caller after a successful submit.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveIntent {
    pub draft: Record,
    pub is_editing: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitRejected {
    #[error("Editor is not open")]
    NotOpen,
    #[error("Columns are not defined")]
    ColumnsNotDefined,
    #[error("{} field(s) failed validation", .0.len())]
    Invalid(FieldErrors),
}

#[derive(Debug, Clone)]
struct EditorSession {
    mode: EditorMode,
    draft: Record,
    errors: FieldErrors,
    focus: usize,
    /// Raw text typed into each field, before coercion.
    inputs: BTreeMap<String, String>,
}

#[derive(Debug, Clone)]
pub struct RecordEditor {
    columns: SchemaRegistry,
    id_field: String,
    session: Option<EditorSession>,
}

impl RecordEditor {
    pub fn new(columns: SchemaRegistry, id_field: impl Into<String>) -> Self {
        Self {
            columns,
            id_field: id_field.into(),
            session: None,
        }
    }

    /// Swap the schema. An open draft is kept as is.
    pub fn set_columns(&mut self, columns: SchemaRegistry) {
        self.columns = columns;
        let editable = self.editable_columns().count();
        if let Some(session) = self.session.as_mut() {
            session.focus = session.focus.min(editable.saturating_sub(1));
        }
    }

    pub fn columns(&self) -> &SchemaRegistry {
        &self.columns
    }

    pub fn id_field(&self) -> &str {
        &self.id_field
    }

    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    pub fn mode(&self) -> Option<EditorMode> {
        self.session.as_ref().map(|s| s.mode)
    }

    pub fn is_editing(&self) -> bool {
        self.mode() == Some(EditorMode::Edit)
    }

    /// True when the form has nothing to render.
    pub fn columns_missing(&self) -> bool {
        self.columns.is_empty()
    }

    /// Open with every column seeded to its type's empty value.
    pub fn open_create(&mut self) {
        let draft = self
            .columns
            .iter()
            .map(|column| (column.name.clone(), column.column_type.empty_value()))
            .collect();
        self.session = Some(EditorSession {
            mode: EditorMode::Create,
            draft,
            errors: FieldErrors::default(),
            focus: 0,
            inputs: BTreeMap::new(),
        });
    }

    /// Open on a copy of an existing record.
    pub fn open_edit(&mut self, record: Record) {
        self.session = Some(EditorSession {
            mode: EditorMode::Edit,
            draft: record,
            errors: FieldErrors::default(),
            focus: 0,
            inputs: BTreeMap::new(),
        });
    }

    /// Close and discard the draft.
    pub fn cancel(&mut self) {
        self.session = None;
    }

    /// Columns rendered in the form. The id field is never editable.
    pub fn editable_columns(&self) -> impl Iterator<Item = &ColumnDescriptor> {
        let id_field = self.id_field.as_str();
        self.columns.iter().filter(move |c| c.name != id_field)
    }

    pub fn draft(&self) -> Option<&Record> {
        self.session.as_ref().map(|s| &s.draft)
    }

    pub fn value(&self, name: &str) -> Option<&Scalar> {
        self.draft().map(|draft| draft.value(name))
    }

    /// Text shown while editing `name`: what was typed, or the rendered value.
    pub fn input_text(&self, name: &str) -> Option<String> {
        let session = self.session.as_ref()?;
        Some(
            session
                .inputs
                .get(name)
                .cloned()
                .unwrap_or_else(|| session.draft.value(name).to_string()),
        )
    }

    pub fn errors(&self) -> Option<&FieldErrors> {
        self.session.as_ref().map(|s| &s.errors)
    }

    pub fn error(&self, name: &str) -> Option<&str> {
        self.errors().and_then(|errors| errors.get(name))
    }

    /// `maxLength` hint for the current value of `name`.
    pub fn hint(&self, name: &str) -> Option<String> {
        let column = self.columns.column(name)?;
        column.length_hint(self.value(name)?)
    }

    fn editable_column(&self, name: &str) -> Option<&ColumnDescriptor> {
        if name == self.id_field {
            return None;
        }
        self.columns.column(name)
    }

    /// Apply raw text input to a field and re-validate it.
    ///
    /// Returns false when the editor is closed or the field is not editable.
    pub fn set_field(&mut self, name: &str, input: &str) -> bool {
        let Some(column) = self.editable_column(name).cloned() else {
            return false;
        };
        let value = column.column_type.coerce_input(input);
        if !self.apply(&column, value) {
            return false;
        }
        if let Some(session) = self.session.as_mut() {
            session.inputs.insert(column.name, input.to_string());
        }
        true
    }

    /// Pick a dropdown option. Unknown options are rejected.
    pub fn select_option(&mut self, name: &str, option: &str) -> bool {
        let Some(column) = self.editable_column(name).cloned() else {
            return false;
        };
        if column.column_type != ColumnType::Dropdown
            || !column.options().iter().any(|o| o == option)
        {
            return false;
        }
        let value = column.column_type.coerce_input(option);
        if let Some(session) = self.session.as_mut() {
            session.inputs.remove(&column.name);
        }
        self.apply(&column, value)
    }

    /// Step a dropdown to the next or previous option, wrapping around.
    pub fn cycle_option(&mut self, name: &str, forward: bool) -> bool {
        let Some(column) = self.editable_column(name).cloned() else {
            return false;
        };
        if column.column_type != ColumnType::Dropdown {
            return false;
        }
        let options = column.options();
        let current = self
            .value(name)
            .and_then(Scalar::as_str)
            .and_then(|value| options.iter().position(|o| o == value))
            .unwrap_or(0);
        let next = if forward {
            (current + 1) % options.len()
        } else if current == 0 {
            options.len() - 1
        } else {
            current - 1
        };
        let option = options[next].clone();
        self.select_option(name, &option)
    }

    fn apply(&mut self, column: &ColumnDescriptor, value: Scalar) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        session
            .errors
            .set(&column.name, column.validate_change(&value));
        session.draft.set(column.name.clone(), value);
        true
    }

    pub fn focus(&self) -> Option<usize> {
        self.session.as_ref().map(|s| s.focus)
    }

    pub fn focused_column(&self) -> Option<&ColumnDescriptor> {
        let focus = self.focus()?;
        self.editable_columns().nth(focus)
    }

    pub fn focus_next(&mut self) {
        let count = self.editable_columns().count();
        if let Some(session) = self.session.as_mut() {
            if count > 0 {
                session.focus = (session.focus + 1) % count;
            }
        }
    }

    pub fn focus_previous(&mut self) {
        let count = self.editable_columns().count();
        if let Some(session) = self.session.as_mut() {
            if count > 0 {
                session.focus = if session.focus == 0 {
                    count - 1
                } else {
                    session.focus - 1
                };
            }
        }
    }

    /// Validate every required column and hand back the draft.
    ///
    /// All failing fields are reported together. The id field is skipped:
    /// it is not editable, so an error on it could never be resolved.
    pub fn submit(&mut self) -> Result<SaveIntent, SubmitRejected> {
        if self.session.is_none() {
            return Err(SubmitRejected::NotOpen);
        }
        if self.columns.is_empty() {
            return Err(SubmitRejected::ColumnsNotDefined);
        }

        let mut errors = FieldErrors::default();
        if let Some(session) = self.session.as_ref() {
            for column in self.editable_columns() {
                let value = session.draft.value(&column.name);
                errors.set(&column.name, column.validate_submit(value));
            }
        }

        if !errors.is_empty() {
            if let Some(session) = self.session.as_mut() {
                session.errors = errors.clone();
            }
            return Err(SubmitRejected::Invalid(errors));
        }

        let session = self.session.take().ok_or(SubmitRejected::NotOpen)?;
        Ok(SaveIntent {
            draft: session.draft,
            is_editing: session.mode == EditorMode::Edit,
        })
    }

    pub fn title(&self) -> &'static str {
        if self.is_editing() {
            "Edit record"
        } else {
            "Add record"
        }
    }

    pub fn confirm_label(&self) -> &'static str {
        if self.is_editing() {
            "Save"
        } else {
            "Add"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::REQUIRED_MESSAGE;

    fn user_columns() -> SchemaRegistry {
        SchemaRegistry::new(vec![
            ColumnDescriptor::number("ID").required().with_max_length(10),
            ColumnDescriptor::string("Nom").required().with_max_length(5),
            ColumnDescriptor::string("Prénom"),
            ColumnDescriptor::number("Âge").required(),
            ColumnDescriptor::dropdown("Ville", ["Paris", "Marseille", "Lyon"]),
        ])
    }

    fn dupont() -> Record {
        Record::new()
            .with("ID", 1i64)
            .with("Nom", "Dupont")
            .with("Prénom", "Jean")
            .with("Âge", 35i64)
            .with("Ville", "Paris")
    }

    #[test]
    fn test_create_seeds_every_column_empty() {
        let mut editor = RecordEditor::new(user_columns(), "ID");
        editor.open_create();
        let draft = editor.draft().unwrap();
        assert_eq!(draft.len(), 5);
        assert_eq!(draft.value("Nom"), &Scalar::Text(String::new()));
        assert_eq!(draft.value("Âge"), &Scalar::Null);
        assert_eq!(editor.mode(), Some(EditorMode::Create));
        assert_eq!(editor.title(), "Add record");
    }

    #[test]
    fn test_id_field_not_editable() {
        let mut editor = RecordEditor::new(user_columns(), "ID");
        editor.open_edit(dupont());
        assert!(editor.editable_columns().all(|c| c.name != "ID"));
        assert!(!editor.set_field("ID", "99"));
        assert_eq!(editor.value("ID"), Some(&Scalar::Int(1)));
    }

    #[test]
    fn test_set_field_when_closed_is_rejected() {
        let mut editor = RecordEditor::new(user_columns(), "ID");
        assert!(!editor.set_field("Nom", "x"));
        assert_eq!(editor.submit(), Err(SubmitRejected::NotOpen));
    }

    #[test]
    fn test_change_validation_flags_and_clears() {
        let mut editor = RecordEditor::new(user_columns(), "ID");
        editor.open_edit(dupont());

        assert!(editor.set_field("Nom", ""));
        assert_eq!(editor.error("Nom"), Some(REQUIRED_MESSAGE));

        assert!(editor.set_field("Nom", "D"));
        assert_eq!(editor.error("Nom"), None);
    }

    #[test]
    fn test_number_field_coerces_input() {
        let mut editor = RecordEditor::new(user_columns(), "ID");
        editor.open_edit(dupont());
        editor.set_field("Âge", "41 years");
        assert_eq!(editor.value("Âge"), Some(&Scalar::Int(41)));
        editor.set_field("Âge", "abc");
        assert_eq!(editor.value("Âge"), Some(&Scalar::Null));
        assert_eq!(editor.error("Âge"), Some(REQUIRED_MESSAGE));
    }

    #[test]
    fn test_typed_sign_survives_until_digits_arrive() {
        let mut editor = RecordEditor::new(user_columns(), "ID");
        editor.open_create();
        editor.set_field("Âge", "-");
        assert_eq!(editor.value("Âge"), Some(&Scalar::Null));
        assert_eq!(editor.input_text("Âge").as_deref(), Some("-"));

        let mut text = editor.input_text("Âge").unwrap();
        text.push('5');
        editor.set_field("Âge", &text);
        assert_eq!(editor.value("Âge"), Some(&Scalar::Int(-5)));
        assert_eq!(editor.error("Âge"), None);
    }

    #[test]
    fn test_input_text_falls_back_to_value() {
        let mut editor = RecordEditor::new(user_columns(), "ID");
        assert_eq!(editor.input_text("Nom"), None);
        editor.open_edit(dupont());
        assert_eq!(editor.input_text("Âge").as_deref(), Some("35"));
        editor.open_edit(dupont());
        editor.set_field("Âge", "4x");
        assert_eq!(editor.input_text("Âge").as_deref(), Some("4x"));
        editor.open_edit(dupont());
        assert_eq!(editor.input_text("Âge").as_deref(), Some("35"));
    }

    #[test]
    fn test_submit_reports_all_errors_at_once() {
        let mut editor = RecordEditor::new(user_columns(), "ID");
        editor.open_create();
        let rejected = editor.submit().unwrap_err();
        let SubmitRejected::Invalid(errors) = rejected else {
            panic!("expected validation failure");
        };
        assert_eq!(errors.len(), 2);
        assert!(errors.contains("Nom"));
        assert!(errors.contains("Âge"));
        assert!(!errors.contains("ID"));
        assert!(editor.is_open());
        assert_eq!(editor.error("Nom"), Some(REQUIRED_MESSAGE));
    }

    #[test]
    fn test_submit_success_closes_and_reports_mode() {
        let mut editor = RecordEditor::new(user_columns(), "ID");
        editor.open_create();
        editor.set_field("Nom", "Petit");
        editor.set_field("Âge", "33");
        let intent = editor.submit().unwrap();
        assert!(!intent.is_editing);
        assert_eq!(intent.draft.value("Nom"), &Scalar::from("Petit"));
        assert_eq!(intent.draft.value("Âge"), &Scalar::Int(33));
        assert!(!editor.is_open());
    }

    #[test]
    fn test_unchanged_edit_round_trips() {
        let mut editor = RecordEditor::new(user_columns(), "ID");
        editor.open_edit(dupont());
        let intent = editor.submit().unwrap();
        assert!(intent.is_editing);
        assert_eq!(intent.draft, dupont());
    }

    #[test]
    fn test_max_length_is_only_a_hint() {
        let mut editor = RecordEditor::new(user_columns(), "ID");
        editor.open_edit(dupont());
        editor.set_field("Nom", "Bernardini");
        assert_eq!(editor.hint("Nom"), Some("limit: 5 characters".to_string()));
        assert!(editor.submit().is_ok());
    }

    #[test]
    fn test_dropdown_none_and_unknown_options() {
        let columns = SchemaRegistry::new(vec![
            ColumnDescriptor::dropdown("Ville", ["Paris", "Lyon"]).required()
        ]);
        let mut editor = RecordEditor::new(columns, "ID");
        editor.open_create();

        assert!(!editor.select_option("Ville", "Berlin"));
        assert!(editor.select_option("Ville", "Lyon"));
        assert_eq!(editor.error("Ville"), None);

        assert!(editor.select_option("Ville", "none"));
        assert_eq!(editor.value("Ville"), Some(&Scalar::Null));
        assert_eq!(editor.error("Ville"), Some(REQUIRED_MESSAGE));
        assert!(editor.submit().is_err());
    }

    #[test]
    fn test_dropdown_with_sentinel_text_is_unset() {
        let columns = SchemaRegistry::new(vec![
            ColumnDescriptor::dropdown("Ville", ["Paris"]).required()
        ]);
        let mut editor = RecordEditor::new(columns, "ID");
        editor.open_edit(Record::new().with("Ville", "none"));
        assert!(editor.submit().is_err());
    }

    #[test]
    fn test_cycle_option_wraps() {
        let mut editor = RecordEditor::new(user_columns(), "ID");
        editor.open_create();
        assert!(editor.cycle_option("Ville", true));
        assert_eq!(editor.value("Ville"), Some(&Scalar::from("Paris")));
        assert!(editor.cycle_option("Ville", false));
        assert_eq!(editor.value("Ville"), Some(&Scalar::Null));
        assert!(editor.cycle_option("Ville", false));
        assert_eq!(editor.value("Ville"), Some(&Scalar::from("Lyon")));
        assert!(!editor.cycle_option("Nom", true));
    }

    #[test]
    fn test_focus_wraps_over_editable_columns() {
        let mut editor = RecordEditor::new(user_columns(), "ID");
        editor.open_create();
        assert_eq!(editor.focused_column().map(|c| c.name.as_str()), Some("Nom"));
        editor.focus_previous();
        assert_eq!(editor.focused_column().map(|c| c.name.as_str()), Some("Ville"));
        editor.focus_next();
        assert_eq!(editor.focused_column().map(|c| c.name.as_str()), Some("Nom"));
    }

    #[test]
    fn test_missing_columns_refuse_submit() {
        let mut editor = RecordEditor::new(SchemaRegistry::default(), "ID");
        editor.open_create();
        assert!(editor.columns_missing());
        assert_eq!(editor.submit(), Err(SubmitRejected::ColumnsNotDefined));
    }

    #[test]
    fn test_reopen_reseeds_draft_and_errors() {
        let mut editor = RecordEditor::new(user_columns(), "ID");
        editor.open_edit(dupont());
        editor.set_field("Nom", "");
        assert!(editor.error("Nom").is_some());
        editor.open_edit(dupont());
        assert!(editor.errors().unwrap().is_empty());
        assert_eq!(editor.value("Nom"), Some(&Scalar::from("Dupont")));
    }

    #[test]
    fn test_cancel_discards_draft() {
        let mut editor = RecordEditor::new(user_columns(), "ID");
        editor.open_create();
        editor.cancel();
        assert!(!editor.is_open());
        assert!(editor.draft().is_none());
    }
}
