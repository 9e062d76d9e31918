//! Record values and identifiers.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A single field value as it arrives from the API.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Scalar {
    /// True for null and the empty string.
    pub fn is_blank(&self) -> bool {
        match self {
            Scalar::Null => true,
            Scalar::Text(text) => text.is_empty(),
            _ => false,
        }
    }

    /// Numeric view of the value, if it has one.
    ///
    /// Text is accepted when it parses as a finite number, so `"30"` and `30`
    /// compare the same way.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Int(n) => Some(*n as f64),
            Scalar::Float(f) if f.is_finite() => Some(*f),
            Scalar::Text(text) => text
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|f| f.is_finite()),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => Ok(()),
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Int(n) => write!(f, "{}", n),
            Scalar::Float(x) => write!(f, "{}", x),
            Scalar::Text(text) => f.write_str(text),
        }
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Int(value)
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Float(value)
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Scalar::Bool(value)
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::Text(value)
    }
}

impl From<Identifier> for Scalar {
    fn from(value: Identifier) -> Self {
        match value {
            Identifier::Int(n) => Scalar::Int(n),
            Identifier::Text(text) => Scalar::Text(text),
        }
    }
}

/// Record or tree node identifier: an integer or a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Identifier {
    Int(i64),
    Text(String),
}

impl Identifier {
    /// Read an identifier out of a field value.
    ///
    /// Whole floats are narrowed to integers; null, blank text and booleans
    /// are not identifiers.
    pub fn from_scalar(value: &Scalar) -> Option<Self> {
        match value {
            Scalar::Int(n) => Some(Identifier::Int(*n)),
            Scalar::Float(f) if f.fract() == 0.0 && f.is_finite() => {
                Some(Identifier::Int(*f as i64))
            }
            Scalar::Text(text) if !text.is_empty() => Some(Identifier::Text(text.clone())),
            _ => None,
        }
    }

    /// Encoding used for persisted selections. Keeps `2` and `"2"` apart.
    pub fn encode(&self) -> String {
        match self {
            Identifier::Int(n) => n.to_string(),
            Identifier::Text(text) => {
                serde_json::to_string(text).unwrap_or_else(|_| format!("\"{}\"", text))
            }
        }
    }

    /// Inverse of [`Identifier::encode`]. Raw non-JSON text is taken as a
    /// string id so values written by older builds still resolve.
    pub fn decode(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        serde_json::from_str::<Identifier>(raw)
            .ok()
            .or_else(|| Some(Identifier::Text(raw.to_string())))
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identifier::Int(n) => write!(f, "{}", n),
            Identifier::Text(text) => f.write_str(text),
        }
    }
}

impl From<i64> for Identifier {
    fn from(value: i64) -> Self {
        Identifier::Int(value)
    }
}

impl From<&str> for Identifier {
    fn from(value: &str) -> Self {
        Identifier::Text(value.to_string())
    }
}

impl From<String> for Identifier {
    fn from(value: String) -> Self {
        Identifier::Text(value)
    }
}

const NULL: &Scalar = &Scalar::Null;

/// One row: column name to value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: BTreeMap<String, Scalar>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Scalar> {
        self.fields.get(name)
    }

    /// Field value, with absent fields reading as null.
    pub fn value(&self, name: &str) -> &Scalar {
        self.fields.get(name).unwrap_or(NULL)
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Scalar>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<Scalar>) -> Self {
        self.set(name, value);
        self
    }

    pub fn remove(&mut self, name: &str) -> Option<Scalar> {
        self.fields.remove(name)
    }

    pub fn id(&self, id_field: &str) -> Option<Identifier> {
        self.get(id_field).and_then(Identifier::from_scalar)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Scalar)> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<Scalar>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_deserializes_each_json_shape() {
        let record: Record =
            serde_json::from_str(r#"{"a": null, "b": true, "c": 3, "d": 2.5, "e": "x"}"#)
                .unwrap();
        assert_eq!(record.value("a"), &Scalar::Null);
        assert_eq!(record.value("b"), &Scalar::Bool(true));
        assert_eq!(record.value("c"), &Scalar::Int(3));
        assert_eq!(record.value("d"), &Scalar::Float(2.5));
        assert_eq!(record.value("e"), &Scalar::Text("x".to_string()));
    }

    #[test]
    fn test_missing_field_reads_as_null() {
        let record = Record::new().with("Name", "Ada");
        assert_eq!(record.value("Age"), &Scalar::Null);
        assert!(record.value("Age").is_blank());
    }

    #[test]
    fn test_scalar_display_renders_plain_values() {
        assert_eq!(Scalar::Null.to_string(), "");
        assert_eq!(Scalar::Int(-4).to_string(), "-4");
        assert_eq!(Scalar::from("Paris").to_string(), "Paris");
        assert_eq!(Scalar::Bool(false).to_string(), "false");
    }

    #[test]
    fn test_as_f64_accepts_numeric_text_only() {
        assert_eq!(Scalar::from("30").as_f64(), Some(30.0));
        assert_eq!(Scalar::from(" 2.5 ").as_f64(), Some(2.5));
        assert_eq!(Scalar::from("abc").as_f64(), None);
        assert_eq!(Scalar::from("NaN").as_f64(), None);
        assert_eq!(Scalar::Null.as_f64(), None);
    }

    #[test]
    fn test_identifier_from_scalar() {
        assert_eq!(Identifier::from_scalar(&Scalar::Int(7)), Some(Identifier::Int(7)));
        assert_eq!(Identifier::from_scalar(&Scalar::Float(7.0)), Some(Identifier::Int(7)));
        assert_eq!(Identifier::from_scalar(&Scalar::Float(7.5)), None);
        assert_eq!(
            Identifier::from_scalar(&Scalar::from("u-1")),
            Some(Identifier::Text("u-1".to_string()))
        );
        assert_eq!(Identifier::from_scalar(&Scalar::from("")), None);
        assert_eq!(Identifier::from_scalar(&Scalar::Null), None);
    }

    #[test]
    fn test_identifier_encoding_keeps_int_and_text_apart() {
        let int = Identifier::Int(2);
        let text = Identifier::Text("2".to_string());
        assert_ne!(int.encode(), text.encode());
        assert_eq!(Identifier::decode(&int.encode()), Some(int));
        assert_eq!(Identifier::decode(&text.encode()), Some(text));
    }

    #[test]
    fn test_identifier_decode_raw_text_and_blank() {
        assert_eq!(Identifier::decode("paris"), Some(Identifier::Text("paris".to_string())));
        assert_eq!(Identifier::decode("   "), None);
    }

    #[test]
    fn test_record_id_lookup() {
        let record = Record::new().with("ID", 10i64).with("Nom", "Moreau");
        assert_eq!(record.id("ID"), Some(Identifier::Int(10)));
        assert_eq!(record.id("missing"), None);
    }
}
