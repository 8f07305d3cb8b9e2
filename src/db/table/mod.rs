use std::sync::Arc;

use serde::{Deserialize, Serialize};

pub mod column_def;
pub mod row;
pub mod schema;

pub use column_def::ColumnData;
pub use row::Row;
pub use schema::Schema;

/// A table: its schema plus an ordered sequence of rows.
///
/// Rows are held behind [`Arc`] so snapshots of a table share every row that
/// a later edit does not touch.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Table {
    #[serde(default)]
    pub schema: Schema,

    #[serde(default)]
    pub data: Vec<Arc<Row>>,
}

impl Table {
    /// Creates a table with an empty schema and no rows.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows in the table.
    pub fn row_count(&self) -> usize {
        self.data.len()
    }

    /// The row at `index`, if there is one.
    pub fn row(&self, index: usize) -> Option<&Row> {
        self.data.get(index).map(Arc::as_ref)
    }

    /// Appends a row after the last one.
    pub fn push_row(&mut self, row: Row) {
        self.data.push(Arc::new(row));
    }

    /// Removes the row at `index`. Indexes past the end remove nothing.
    pub fn remove_row(&mut self, index: usize) -> Option<Row> {
        if index >= self.data.len() {
            return None;
        }
        let row = self.data.remove(index);
        Some(Arc::unwrap_or_clone(row))
    }

    /// Mutable access to one row, copying it first if a snapshot shares it.
    pub fn row_mut(&mut self, index: usize) -> Option<&mut Row> {
        self.data.get_mut(index).map(Arc::make_mut)
    }

    /// Drops `column` from every row that still carries it.
    ///
    /// Returns the number of rows that changed. Rows without the key are not
    /// copied.
    pub fn prune_column(&mut self, column: &str) -> usize {
        let mut pruned = 0;
        for row in self.data.iter_mut() {
            if row.get_value(column).is_some() {
                Arc::make_mut(row).remove_value(column);
                pruned += 1;
            }
        }
        pruned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Value;

    #[test]
    fn test_remove_row_out_of_range() {
        let mut table = Table::new();
        table.push_row(Row::from_iter([("a", Value::from(1))]));

        assert!(table.remove_row(1).is_none());
        assert_eq!(table.row_count(), 1);
        assert_eq!(
            table.remove_row(0),
            Some(Row::from_iter([("a", Value::from(1))]))
        );
        assert_eq!(table.row_count(), 0);
    }

    #[test]
    fn test_row_mut_copies_shared_row() {
        let mut table = Table::new();
        table.push_row(Row::from_iter([("a", Value::from(1))]));
        let snapshot = table.clone();

        table.row_mut(0).unwrap().set_value("a", Value::from(2));

        assert_eq!(snapshot.row(0).unwrap().get_value("a"), Some(&Value::Integer(1)));
        assert_eq!(table.row(0).unwrap().get_value("a"), Some(&Value::Integer(2)));
    }

    #[test]
    fn test_prune_column_skips_rows_without_key() {
        let mut table = Table::new();
        table.push_row(Row::from_iter([("a", Value::from(1)), ("b", Value::from(2))]));
        table.push_row(Row::from_iter([("b", Value::from(3))]));
        let untouched = Arc::clone(&table.data[1]);

        assert_eq!(table.prune_column("a"), 1);
        assert!(table.row(0).unwrap().get_value("a").is_none());
        assert!(Arc::ptr_eq(&untouched, &table.data[1]));
    }

    #[test]
    fn test_json_shape() {
        let table: Table = serde_json::from_str(r#"{"schema":{},"data":[{"a":1}]}"#).unwrap();
        assert_eq!(table.row_count(), 1);
        assert_eq!(
            serde_json::to_string(&table).unwrap(),
            r#"{"schema":{},"data":[{"a":1}]}"#
        );
    }
}
