use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{column_def::ColumnData, row::Row};
use crate::{
    DatabaseError,
    common::types::{ColumnType, Value},
    config::UnknownColumnPolicy,
};

/// A table schema: column definitions keyed by column name.
///
/// Column order carries no meaning; columns serialize in name order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schema {
    pub columns: BTreeMap<String, ColumnData>,
}

impl Schema {
    /// Creates a schema with no columns.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a column named `name` is defined.
    pub fn contains(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&ColumnData> {
        self.columns.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut ColumnData> {
        self.columns.get_mut(name)
    }

    /// Number of defined columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Adds a `string` column. Returns `false` if the name is already taken.
    pub fn add_column(&mut self, name: &str) -> bool {
        if self.contains(name) {
            return false;
        }
        self.columns
            .insert(name.to_owned(), ColumnData::new(ColumnType::String));
        true
    }

    /// Removes a column, returning its definition if it existed.
    pub fn remove_column(&mut self, name: &str) -> Option<ColumnData> {
        self.columns.remove(name)
    }

    /// Checks one value against the column it would be stored under.
    ///
    /// Values under undefined columns are still checked against their own
    /// type, so a non-finite float is refused wherever it goes.
    pub fn validate_value(
        &self,
        column: &str,
        value: &Value,
        unknown: UnknownColumnPolicy,
    ) -> Result<(), DatabaseError> {
        match self.columns.get(column) {
            Some(definition) => definition.validate(column, value),
            None if unknown == UnknownColumnPolicy::Reject => {
                Err(DatabaseError::ColumnNotFound(column.to_owned()))
            }
            None => value
                .is_compatible_with(value.column_type())
                .map_err(|msg| DatabaseError::TypeMismatch(format!("column {column}: {msg}"))),
        }
    }

    /// Checks every value of `row` against the column it is stored under.
    pub fn validate_row(
        &self,
        row: &Row,
        unknown: UnknownColumnPolicy,
    ) -> Result<(), DatabaseError> {
        row.iter()
            .try_for_each(|(name, value)| self.validate_value(name, value, unknown))
    }
}
