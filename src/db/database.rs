use std::{collections::BTreeMap, sync::Arc};

use serde::{Deserialize, Serialize};

use crate::{
    DatabaseError,
    db::table::{Row, Table},
};

/// The root document.
///
/// A `Database` is a plain value: a display name and every table keyed by
/// name. Tables are held behind [`Arc`], so cloning a `Database` is cheap and
/// the clone shares all tables until one side edits them.
///
/// # Example
///
/// ```
/// use sheet_store::Database;
///
/// let mut db = Database::new();
/// db.add_table("users").unwrap();
/// assert!(db.add_table("users").is_err());
/// assert_eq!(db.to_json().unwrap(), r#"{"name":"","tables":{"users":{"schema":{},"data":[]}}}"#);
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Database {
    /// Display name of the document.
    #[serde(default)]
    pub name: String,

    /// All tables, keyed by name.
    #[serde(default)]
    pub tables: BTreeMap<String, Arc<Table>>,
}

impl Database {
    /// Creates the default document: no name, no tables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a full document.
    pub fn from_json(json: &str) -> Result<Self, DatabaseError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serializes the full document.
    pub fn to_json(&self) -> Result<String, DatabaseError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn table_exists(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    /// Creates an empty table.
    ///
    /// Fails with [`DatabaseError::TableExists`] and leaves the document as it
    /// was if the name is taken.
    pub fn add_table(&mut self, name: &str) -> Result<(), DatabaseError> {
        if self.table_exists(name) {
            return Err(DatabaseError::TableExists(name.to_owned()));
        }

        self.tables.insert(name.to_owned(), Arc::new(Table::new()));
        Ok(())
    }

    /// Gets an immutable reference to a table.
    pub fn get_table(&self, name: &str) -> Result<&Table, DatabaseError> {
        self.tables
            .get(name)
            .map(Arc::as_ref)
            .ok_or_else(|| DatabaseError::TableNotFound(name.to_owned()))
    }

    /// Gets a mutable reference to a table.
    ///
    /// If a snapshot still shares the table it is copied first; the other
    /// tables are left shared.
    pub fn get_table_mut(&mut self, name: &str) -> Result<&mut Table, DatabaseError> {
        self.tables
            .get_mut(name)
            .map(Arc::make_mut)
            .ok_or_else(|| DatabaseError::TableNotFound(name.to_owned()))
    }

    /// Rows of `name`, or an empty slice when the table does not exist.
    pub fn rows(&self, name: &str) -> &[Arc<Row>] {
        self.tables
            .get(name)
            .map(|table| table.data.as_slice())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Value;

    #[test]
    fn test_add_table_is_empty() {
        let mut db = Database::new();
        db.add_table("users").unwrap();

        let table = db.get_table("users").unwrap();
        assert!(table.schema.is_empty());
        assert_eq!(table.row_count(), 0);
    }

    #[test]
    fn test_add_duplicate_table_leaves_document() {
        let mut db = Database::new();
        db.add_table("users").unwrap();
        db.get_table_mut("users")
            .unwrap()
            .push_row(Row::from_iter([("id", Value::from(1))]));
        let before = db.clone();

        let err = db.add_table("users").unwrap_err();
        assert!(matches!(err, DatabaseError::TableExists(name) if name == "users"));
        assert_eq!(db, before);
    }

    #[test]
    fn test_get_missing_table() {
        let mut db = Database::new();
        assert!(matches!(
            db.get_table("nope"),
            Err(DatabaseError::TableNotFound(_))
        ));
        assert!(db.get_table_mut("nope").is_err());
        assert!(db.rows("nope").is_empty());
    }

    #[test]
    fn test_clone_shares_untouched_tables() {
        let mut db = Database::new();
        db.add_table("a").unwrap();
        db.add_table("b").unwrap();
        let snapshot = db.clone();

        db.get_table_mut("a").unwrap().push_row(Row::new());

        assert!(Arc::ptr_eq(&db.tables["b"], &snapshot.tables["b"]));
        assert!(!Arc::ptr_eq(&db.tables["a"], &snapshot.tables["a"]));
        assert_eq!(snapshot.get_table("a").unwrap().row_count(), 0);
    }

    #[test]
    fn test_json_round_trip_is_identity() {
        let json = r#"{"name":"inventory","tables":{"items":{"schema":{"count":{"type":"number"},"kind":{"type":"string","possible_values":["a","b"],"default_values":["a"]}},"data":[{"count":3,"kind":"a"},{"count":1.5,"orphan":null}]}}}"#;
        let db = Database::from_json(json).unwrap();
        assert_eq!(db.to_json().unwrap(), json);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(matches!(
            Database::from_json("not json"),
            Err(DatabaseError::Json(_))
        ));
    }
}
