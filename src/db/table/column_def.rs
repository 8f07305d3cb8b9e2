use serde::{Deserialize, Serialize};

use crate::{
    DatabaseError,
    common::types::{ColumnType, Value},
};

/// Definition of a single column in a table schema.
///
/// The column name is the key it is stored under in [`super::schema::Schema`],
/// so it is not repeated here.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ColumnData {
    /// The declared type for values in this column.
    #[serde(rename = "type")]
    pub column_type: ColumnType,

    /// Values a text cell is restricted to. Empty or absent means unrestricted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub possible_values: Option<Vec<String>>,

    /// Suggested values for new cells.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_values: Option<Vec<String>>,
}

impl ColumnData {
    /// Creates a column of the given type with no value lists.
    pub fn new(column_type: ColumnType) -> Self {
        Self {
            column_type,
            possible_values: None,
            default_values: None,
        }
    }

    /// Checks that `value` may be written into this column.
    pub fn validate(&self, column_name: &str, value: &Value) -> Result<(), DatabaseError> {
        value.is_compatible_with(self.column_type).map_err(|msg| {
            DatabaseError::TypeMismatch(format!("column {column_name}: {msg}"))
        })?;

        if let (Value::Text(text), Some(allowed)) = (value, &self.possible_values) {
            if !allowed.is_empty() && !allowed.iter().any(|v| v == text) {
                return Err(DatabaseError::DisallowedValue {
                    column: column_name.to_owned(),
                    value: text.clone(),
                    allowed: allowed.clone(),
                });
            }
        }

        Ok(())
    }
}
