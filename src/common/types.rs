use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Column types a schema can declare.
///
/// The set is closed. Types parse case-insensitively (`"Number"`, `"number"`)
/// and serialize lowercase, matching the stored document format.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ColumnType {
    /// UTF-8 text. New columns start out with this type.
    #[default]
    String,

    /// Integer or floating point number.
    Number,

    /// Boolean true/false value.
    Boolean,

    /// Column that only ever holds NULL.
    Null,
}

/// A single cell value.
///
/// Serialized as the bare JSON scalar. Integers and floats are distinct
/// variants so `1` and `1.0` survive a save/load cycle unchanged.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Absence of data. Also the sentinel returned for missing cells.
    #[default]
    Null,

    /// A boolean value (true/false).
    Boolean(bool),

    /// A 64-bit signed integer value.
    Integer(i64),

    /// A 64-bit floating point number.
    Float(f64),

    /// A UTF-8 text string.
    Text(String),
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Integer(i) => write!(f, "{}", i),
            Value::Text(s) => write!(f, "{}", s),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Float(fl) => write!(f, "{}", fl),
            Value::Null => write!(f, "NULL"),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl Value {
    /// Returns the column type this value naturally belongs to.
    pub fn column_type(&self) -> ColumnType {
        match self {
            Value::Null => ColumnType::Null,
            Value::Boolean(_) => ColumnType::Boolean,
            Value::Integer(_) | Value::Float(_) => ColumnType::Number,
            Value::Text(_) => ColumnType::String,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Checks if this value can be stored in a column of the given type.
    ///
    /// NULL fits every column. NaN and infinite floats fit none, since JSON
    /// would store them as `null`.
    pub fn is_compatible_with(&self, column_type: ColumnType) -> Result<(), String> {
        match (self, column_type) {
            (Value::Float(f), _) if !f.is_finite() => Err(format!("{f} is not a finite number")),

            (Value::Null, _)
            | (Value::Text(_), ColumnType::String)
            | (Value::Integer(_) | Value::Float(_), ColumnType::Number)
            | (Value::Boolean(_), ColumnType::Boolean) => Ok(()),

            _ => Err(format!(
                "{self:?} cannot be stored in a {column_type} column"
            )),
        }
    }
}
