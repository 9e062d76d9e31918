//! Column schema: the record shape that drives rendering, coercion and
//! validation.

use crate::record::Scalar;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashSet;

/// Reserved dropdown value meaning "no selection".
pub const NONE_SENTINEL: &str = "none";

/// Message attached to a required field left empty.
pub const REQUIRED_MESSAGE: &str = "this field is required";

/// Closed set of column types. Each variant carries its own empty value,
/// input coercion, required check and sort order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ColumnType {
    #[default]
    String,
    Number,
    Dropdown,
}

impl ColumnType {
    /// Value a create-mode draft starts with.
    pub fn empty_value(&self) -> Scalar {
        match self {
            ColumnType::String => Scalar::Text(String::new()),
            ColumnType::Number | ColumnType::Dropdown => Scalar::Null,
        }
    }

    /// Turn raw user input into a draft value.
    ///
    /// Numbers keep the leading integer and become empty when there is none,
    /// so a draft never holds a non-number for a `Number` column.
    pub fn coerce_input(&self, input: &str) -> Scalar {
        match self {
            ColumnType::String => Scalar::Text(input.to_string()),
            ColumnType::Number => parse_leading_int(input)
                .map(Scalar::Int)
                .unwrap_or(Scalar::Null),
            ColumnType::Dropdown => {
                if input.is_empty() || input == NONE_SENTINEL {
                    Scalar::Null
                } else {
                    Scalar::Text(input.to_string())
                }
            }
        }
    }

    /// Empty, or the "none" sentinel.
    pub fn is_unset(&self, value: &Scalar) -> bool {
        value.is_blank() || value.as_str() == Some(NONE_SENTINEL)
    }

    /// Whether a value satisfies a `required` constraint at submit time.
    pub fn satisfies_required(&self, value: &Scalar) -> bool {
        if self.is_unset(value) {
            return false;
        }
        match self {
            ColumnType::Number => value.as_f64().is_some(),
            ColumnType::String | ColumnType::Dropdown => true,
        }
    }

    /// Total order used by table sorting.
    ///
    /// Numbers compare numerically with non-numbers first; everything else
    /// compares case-insensitively, then by exact text.
    pub fn compare(&self, a: &Scalar, b: &Scalar) -> Ordering {
        match self {
            ColumnType::Number => match (a.as_f64(), b.as_f64()) {
                (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
                (None, Some(_)) => Ordering::Less,
                (Some(_), None) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
            ColumnType::String | ColumnType::Dropdown => {
                let x = a.to_string();
                let y = b.to_string();
                x.to_lowercase()
                    .cmp(&y.to_lowercase())
                    .then_with(|| x.cmp(&y))
            }
        }
    }
}

/// Integer prefix of `input`: leading whitespace, an optional sign, then digits.
pub fn parse_leading_int(input: &str) -> Option<i64> {
    let trimmed = input.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let digits_len = rest.bytes().take_while(|b| b.is_ascii_digit()).count();
    if digits_len == 0 {
        return None;
    }
    let magnitude: i64 = rest[..digits_len].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

/// Describes one field of a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ColumnShape")]
pub struct ColumnDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    #[serde(rename = "maxLength", skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u32>,
    pub required: bool,
    #[serde(rename = "dropdownOptions", skip_serializing_if = "Option::is_none")]
    pub dropdown_options: Option<Vec<String>>,
}

/// Columns arrive either as full descriptors or as bare names.
#[derive(Deserialize)]
#[serde(untagged)]
enum ColumnShape {
    Name(String),
    Full(FullColumn),
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FullColumn {
    name: String,
    #[serde(rename = "type", default)]
    column_type: ColumnType,
    #[serde(default)]
    max_length: Option<u32>,
    #[serde(default)]
    required: bool,
    #[serde(default)]
    dropdown_options: Option<Vec<String>>,
}

impl From<ColumnShape> for ColumnDescriptor {
    fn from(shape: ColumnShape) -> Self {
        match shape {
            ColumnShape::Name(name) => ColumnDescriptor::string(name),
            ColumnShape::Full(full) => ColumnDescriptor {
                name: full.name,
                column_type: full.column_type,
                max_length: full.max_length,
                required: full.required,
                dropdown_options: full.dropdown_options,
            },
        }
    }
}

impl ColumnDescriptor {
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            max_length: None,
            required: false,
            dropdown_options: None,
        }
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, ColumnType::String)
    }

    pub fn number(name: impl Into<String>) -> Self {
        Self::new(name, ColumnType::Number)
    }

    pub fn dropdown<I, S>(name: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut column = Self::new(name, ColumnType::Dropdown);
        column.dropdown_options = Some(options.into_iter().map(Into::into).collect());
        column
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_max_length(mut self, max_length: u32) -> Self {
        self.max_length = Some(max_length);
        self
    }

    /// Selectable values: the sentinel first, then the declared options.
    pub fn options(&self) -> Vec<String> {
        let declared = self.dropdown_options.as_deref().unwrap_or(&[]);
        if declared.iter().any(|option| option == NONE_SENTINEL) {
            declared.to_vec()
        } else {
            std::iter::once(NONE_SENTINEL.to_string())
                .chain(declared.iter().cloned())
                .collect()
        }
    }

    /// Display-only hint shown when a value is longer than `maxLength`.
    pub fn length_hint(&self, value: &Scalar) -> Option<String> {
        let max = self.max_length?;
        if value.to_string().chars().count() > max as usize {
            Some(format!("limit: {} characters", max))
        } else {
            None
        }
    }

    /// Error for a single field after an edit, if any.
    pub fn validate_change(&self, value: &Scalar) -> Option<&'static str> {
        if self.required && self.column_type.is_unset(value) {
            Some(REQUIRED_MESSAGE)
        } else {
            None
        }
    }

    /// Error for a single field at submit time, if any.
    pub fn validate_submit(&self, value: &Scalar) -> Option<&'static str> {
        if self.required && !self.column_type.satisfies_required(value) {
            Some(REQUIRED_MESSAGE)
        } else {
            None
        }
    }
}

/// Ordered column descriptors for one record shape.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemaRegistry {
    columns: Vec<ColumnDescriptor>,
}

impl SchemaRegistry {
    pub fn new(columns: Vec<ColumnDescriptor>) -> Self {
        Self { columns }
    }

    pub fn column(&self, name: &str) -> Option<&ColumnDescriptor> {
        self.columns.iter().find(|column| column.name == name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ColumnDescriptor> {
        self.columns.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|column| column.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// First repeated column name, if any.
    pub fn duplicate_name(&self) -> Option<&str> {
        let mut seen = HashSet::new();
        self.columns
            .iter()
            .map(|column| column.name.as_str())
            .find(|name| !seen.insert(*name))
    }
}

impl From<Vec<ColumnDescriptor>> for SchemaRegistry {
    fn from(columns: Vec<ColumnDescriptor>) -> Self {
        Self::new(columns)
    }
}

impl<'a> IntoIterator for &'a SchemaRegistry {
    type Item = &'a ColumnDescriptor;
    type IntoIter = std::slice::Iter<'a, ColumnDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.columns.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_leading_int_matches_integer_prefix() {
        assert_eq!(parse_leading_int("42"), Some(42));
        assert_eq!(parse_leading_int("  -7"), Some(-7));
        assert_eq!(parse_leading_int("+3"), Some(3));
        assert_eq!(parse_leading_int("12abc"), Some(12));
        assert_eq!(parse_leading_int("3.9"), Some(3));
        assert_eq!(parse_leading_int("abc"), None);
        assert_eq!(parse_leading_int(""), None);
        assert_eq!(parse_leading_int("-"), None);
    }

    #[test]
    fn test_number_coercion_never_leaves_text() {
        assert_eq!(ColumnType::Number.coerce_input("35"), Scalar::Int(35));
        assert_eq!(ColumnType::Number.coerce_input("x35"), Scalar::Null);
        assert_eq!(ColumnType::Number.coerce_input(""), Scalar::Null);
    }

    #[test]
    fn test_dropdown_none_clears_value() {
        assert_eq!(ColumnType::Dropdown.coerce_input("none"), Scalar::Null);
        assert_eq!(
            ColumnType::Dropdown.coerce_input("Lyon"),
            Scalar::Text("Lyon".to_string())
        );
    }

    #[test]
    fn test_required_checks_per_type() {
        assert!(!ColumnType::String.satisfies_required(&Scalar::from("")));
        assert!(!ColumnType::Dropdown.satisfies_required(&Scalar::from("none")));
        assert!(!ColumnType::Number.satisfies_required(&Scalar::from("abc")));
        assert!(ColumnType::Number.satisfies_required(&Scalar::from("30")));
        assert!(ColumnType::Number.satisfies_required(&Scalar::Int(0)));
        assert!(ColumnType::String.satisfies_required(&Scalar::from("x")));
    }

    #[test]
    fn test_options_prefix_sentinel_once() {
        let column = ColumnDescriptor::dropdown("Ville", ["Paris", "Marseille", "Lyon"]);
        assert_eq!(column.options(), vec!["none", "Paris", "Marseille", "Lyon"]);

        let column = ColumnDescriptor::dropdown("Ville", ["Paris", "none"]);
        assert_eq!(column.options(), vec!["Paris", "none"]);
    }

    #[test]
    fn test_length_hint_only_when_exceeded() {
        let column = ColumnDescriptor::string("Nom").with_max_length(3);
        assert_eq!(column.length_hint(&Scalar::from("abc")), None);
        assert_eq!(
            column.length_hint(&Scalar::from("abcd")),
            Some("limit: 3 characters".to_string())
        );
        assert_eq!(ColumnDescriptor::string("x").length_hint(&Scalar::from("long")), None);
    }

    #[test]
    fn test_number_compare_orders_numerically() {
        let t = ColumnType::Number;
        assert_eq!(t.compare(&Scalar::Int(9), &Scalar::Int(10)), Ordering::Less);
        assert_eq!(t.compare(&Scalar::from("9"), &Scalar::Int(10)), Ordering::Less);
        assert_eq!(t.compare(&Scalar::Null, &Scalar::Int(-1)), Ordering::Less);
    }

    #[test]
    fn test_string_compare_ignores_case_first() {
        let t = ColumnType::String;
        assert_eq!(t.compare(&Scalar::from("alice"), &Scalar::from("Bob")), Ordering::Less);
        assert_eq!(t.compare(&Scalar::from("B"), &Scalar::from("b")), Ordering::Less);
    }

    #[test]
    fn test_column_deserializes_full_and_bare_shapes() {
        let columns: SchemaRegistry = serde_json::from_str(
            r#"[
                {"name": "ID", "type": "Number", "maxLength": 10, "required": true},
                {"name": "Ville", "type": "Dropdown", "dropdownOptions": ["Paris"]},
                "Email"
            ]"#,
        )
        .unwrap();

        assert_eq!(columns.len(), 3);
        let id = columns.column("ID").unwrap();
        assert_eq!(id.column_type, ColumnType::Number);
        assert_eq!(id.max_length, Some(10));
        assert!(id.required);
        assert!(!columns.column("Ville").unwrap().required);
        assert_eq!(columns.column("Email").unwrap(), &ColumnDescriptor::string("Email"));
    }

    #[test]
    fn test_column_serializes_camel_case() {
        let column = ColumnDescriptor::number("Age").required().with_max_length(3);
        let json = serde_json::to_value(&column).unwrap();
        assert_eq!(json["type"], "Number");
        assert_eq!(json["maxLength"], 3);
        assert_eq!(json["required"], true);
        assert!(json.get("dropdownOptions").is_none());
    }

    #[test]
    fn test_duplicate_name_detected() {
        let schema = SchemaRegistry::new(vec![
            ColumnDescriptor::string("A"),
            ColumnDescriptor::string("B"),
            ColumnDescriptor::number("A"),
        ]);
        assert_eq!(schema.duplicate_name(), Some("A"));
    }
}
