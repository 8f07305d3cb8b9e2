use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::common::types::Value;

/// A row of data: cell values keyed by column name.
///
/// Keys are expected to name columns of the owning table's schema, but a row
/// may keep values for columns that were deleted after it was written.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row {
    pub values: BTreeMap<String, Value>,
}

impl Row {
    /// Creates a row with no cells.
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets a reference to the value stored under `column`.
    pub fn get_value(&self, column: &str) -> Option<&Value> {
        self.values.get(column)
    }

    /// Sets one cell, leaving every other cell alone.
    pub fn set_value(&mut self, column: &str, value: Value) {
        self.values.insert(column.to_owned(), value);
    }

    pub fn remove_value(&mut self, column: &str) -> Option<Value> {
        self.values.remove(column)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}
