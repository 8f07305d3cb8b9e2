use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, error, info, warn};

use crate::{
    DatabaseError,
    common::{
        error::Result,
        types::{ColumnType, Value},
    },
    config::{OrphanPolicy, StoreConfig},
    db::{
        database::Database,
        export::Export,
        selection::{Selection, View},
        table::{ColumnData, Row, Schema, Table},
    },
    storage::{DATABASE_KEY, MemoryStorage, SELECTED_TABLE_KEY, SELECTED_VIEW_KEY, StoragePort},
};

static EMPTY_SCHEMA: Schema = Schema {
    columns: BTreeMap::new(),
};

/// The document store.
///
/// `Store` owns the current [`Database`] document and the editing
/// [`Selection`], and writes both through a [`StoragePort`]. Every mutation
/// derives a new document from the current one, persists it, and only then
/// makes it current. A failed write leaves the in-memory document and
/// selection as they were; a selection change whose second write fails puts
/// the previously stored table name back.
///
/// Schema and row operations act on the selected table (see
/// [`Store::view_schema`] and [`Store::view_data`]). With nothing selected they
/// do nothing.
///
/// # Example
///
/// ```
/// use sheet_store::{Row, Store, Value};
///
/// let mut store = Store::in_memory();
/// store.add_table("users").unwrap();
/// store.view_schema("users").unwrap();
/// store.add_column("email").unwrap();
/// store
///     .add_row(Row::from_iter([("email", Value::from("a@x.com"))]))
///     .unwrap();
///
/// assert_eq!(store.current_value(0, "email"), Value::from("a@x.com"));
/// ```
#[derive(Debug)]
pub struct Store<S: StoragePort> {
    storage: S,
    config: StoreConfig,
    database: Database,
    selection: Selection,
}

impl Store<MemoryStorage> {
    /// A store over fresh in-memory storage with the default config.
    pub fn in_memory() -> Self {
        Self {
            storage: MemoryStorage::new(),
            config: StoreConfig::default(),
            database: Database::default(),
            selection: Selection::default(),
        }
    }
}

impl<S: StoragePort> Store<S> {
    /// Opens a store over `storage`, loading whatever a previous store left
    /// there.
    ///
    /// Missing keys start from defaults. A stored value that no longer parses
    /// is logged and replaced by its default rather than failing the open.
    /// The persisted selection is restored, so the previously viewed table's
    /// schema is active again.
    pub fn open(storage: S, config: StoreConfig) -> Result<Self> {
        let database: Database = load_or_default(&storage, DATABASE_KEY)?;
        let table: String = load_or_default(&storage, SELECTED_TABLE_KEY)?;
        let view: View = load_or_default(&storage, SELECTED_VIEW_KEY)?;

        info!(
            name = %database.name,
            tables = database.tables.len(),
            selected = %table,
            %view,
            "opened store"
        );

        Ok(Self {
            storage,
            config,
            database,
            selection: Selection { table, view },
        })
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    /// The current document.
    pub fn database(&self) -> &Database {
        &self.database
    }

    /// A snapshot of the current document.
    ///
    /// The snapshot shares unchanged tables and rows with the store and is
    /// never affected by later mutations.
    pub fn snapshot(&self) -> Database {
        self.database.clone()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// The schema of the selected table, or an empty schema if nothing (or a
    /// table that does not exist) is selected.
    pub fn schema(&self) -> &Schema {
        self.selected_table()
            .map(|table| &table.schema)
            .unwrap_or(&EMPTY_SCHEMA)
    }

    /// Serializes the current document.
    pub fn to_json(&self) -> Result<String> {
        self.database.to_json()
    }

    pub fn set_database_name(&mut self, name: &str) -> Result<()> {
        let mut next = self.database.clone();
        next.name = name.to_owned();
        self.commit(next)
    }

    /// Creates an empty table.
    ///
    /// A taken name is reported as [`DatabaseError::TableExists`] and nothing
    /// changes.
    pub fn add_table(&mut self, name: &str) -> Result<()> {
        let mut next = self.database.clone();
        if let Err(err) = next.add_table(name) {
            warn!(table = name, "table already exists");
            return Err(err);
        }

        info!(table = name, "added table");
        self.commit(next)
    }

    /// Selects `table` and switches to the schema view.
    pub fn view_schema(&mut self, table: &str) -> Result<()> {
        self.select(table, View::Schema)
    }

    /// Selects `table` and switches to the data view.
    pub fn view_data(&mut self, table: &str) -> Result<()> {
        self.select(table, View::Data)
    }

    /// Adds a `string` column to the selected table. Existing names are left
    /// alone.
    pub fn add_column(&mut self, column: &str) -> Result<()> {
        self.edit_selected("add_column", |table| Ok(table.schema.add_column(column)))
    }

    /// Removes a column from the selected table's schema.
    ///
    /// Under [`OrphanPolicy::Retain`] rows keep their values for the column;
    /// under [`OrphanPolicy::Prune`] those values are dropped too.
    pub fn delete_column(&mut self, column: &str) -> Result<()> {
        let orphans = self.config.orphans;
        self.edit_selected("delete_column", |table| {
            if table.schema.remove_column(column).is_none() {
                return Ok(false);
            }
            if orphans == OrphanPolicy::Prune {
                let pruned = table.prune_column(column);
                debug!(column, pruned, "pruned orphaned values");
            }
            Ok(true)
        })
    }

    pub fn change_type(&mut self, column: &str, column_type: ColumnType) -> Result<()> {
        self.edit_column("change_type", column, |data| data.column_type = column_type)
    }

    /// Replaces a column's allowed values. The column keeps its type; any
    /// default values are dropped.
    pub fn change_possible_values(&mut self, column: &str, values: Vec<String>) -> Result<()> {
        self.edit_column("change_possible_values", column, |data| {
            *data = ColumnData {
                possible_values: Some(values),
                ..ColumnData::new(data.column_type)
            };
        })
    }

    pub fn change_default_values(&mut self, column: &str, values: Vec<String>) -> Result<()> {
        self.edit_column("change_default_values", column, |data| {
            data.default_values = Some(values);
        })
    }

    /// Appends a row to the selected table after checking it against the
    /// schema.
    pub fn add_row(&mut self, row: Row) -> Result<()> {
        let unknown = self.config.unknown_columns;
        self.edit_selected("add_row", |table| {
            table.schema.validate_row(&row, unknown)?;
            table.push_row(row);
            Ok(true)
        })
    }

    /// Removes the row at `index` from the selected table. Indexes past the
    /// end remove nothing.
    pub fn delete_row(&mut self, index: usize) -> Result<()> {
        self.edit_selected("delete_row", |table| Ok(table.remove_row(index).is_some()))
    }

    /// Sets one cell of the selected table. Other cells of the row, and all
    /// other rows, are untouched.
    pub fn set_cell(&mut self, row_index: usize, column: &str, value: Value) -> Result<()> {
        let unknown = self.config.unknown_columns;
        self.edit_selected("set_cell", |table| {
            table.schema.validate_value(column, &value, unknown)?;

            let len = table.row_count();
            let row = table
                .row_mut(row_index)
                .ok_or(DatabaseError::RowOutOfBounds {
                    index: row_index,
                    len,
                })?;
            row.set_value(column, value);
            Ok(true)
        })
    }

    /// Reads one cell of the selected table.
    ///
    /// Returns [`Value::Null`] when nothing is selected or the cell is absent.
    pub fn current_value(&self, row_index: usize, column: &str) -> Value {
        self.selected_table()
            .and_then(|table| table.row(row_index))
            .and_then(|row| row.get_value(column))
            .cloned()
            .unwrap_or_default()
    }

    /// Renders a table's rows as `{table}.json`. Unknown tables export `[]`.
    pub fn export_data(&self, table: &str) -> Result<Export> {
        Export::from_table(&self.database, table)
    }

    /// Exports a table's rows into `dir`, returning the written file.
    pub fn export_to_dir<P: AsRef<Path>>(&self, table: &str, dir: P) -> Result<PathBuf> {
        let path = self.export_data(table)?.write_to(dir)?;
        info!(table, path = %path.display(), "exported table");
        Ok(path)
    }

    /// Replaces the whole document with a serialized one.
    ///
    /// A payload that fails to parse is logged and returned as
    /// [`DatabaseError::Json`]; the current document is kept as is.
    pub fn set_database_from_string(&mut self, json: &str) -> Result<()> {
        let next = match Database::from_json(json) {
            Ok(database) => database,
            Err(err) => {
                error!(error = %err, "rejected database payload");
                return Err(err);
            }
        };

        info!(tables = next.tables.len(), "replaced database");
        self.commit(next)
    }

    fn selected_table(&self) -> Option<&Table> {
        self.selection
            .table()
            .and_then(|name| self.database.get_table(name).ok())
    }

    fn select(&mut self, table: &str, view: View) -> Result<()> {
        write_json(&mut self.storage, SELECTED_TABLE_KEY, table)?;
        if let Err(err) = write_json(&mut self.storage, SELECTED_VIEW_KEY, &view) {
            let previous = self.selection.table.as_str();
            if let Err(restore) = write_json(&mut self.storage, SELECTED_TABLE_KEY, previous) {
                warn!(error = %restore, "could not restore stored table selection");
            }
            return Err(err);
        }

        debug!(table, %view, "selected");
        self.selection = Selection {
            table: table.to_owned(),
            view,
        };
        Ok(())
    }

    /// Applies `edit` to a copy of the selected table and commits the result.
    ///
    /// `edit` returns whether it changed anything; an unchanged table is not
    /// written back.
    fn edit_selected<F>(&mut self, op: &'static str, edit: F) -> Result<()>
    where
        F: FnOnce(&mut Table) -> Result<bool>,
    {
        let Some(name) = self.selection.table() else {
            debug!(op, "no table selected");
            return Ok(());
        };

        let mut next = self.database.clone();
        if !edit(next.get_table_mut(name)?)? {
            debug!(op, table = name, "nothing to change");
            return Ok(());
        }

        self.commit(next)
    }

    fn edit_column<F>(&mut self, op: &'static str, column: &str, edit: F) -> Result<()>
    where
        F: FnOnce(&mut ColumnData),
    {
        self.edit_selected(op, |table| match table.schema.get_mut(column) {
            Some(data) => {
                edit(data);
                Ok(true)
            }
            None => Ok(false),
        })
    }

    fn commit(&mut self, next: Database) -> Result<()> {
        let json = next.to_json()?;
        self.storage.write(DATABASE_KEY, &json)?;
        self.database = next;
        Ok(())
    }
}

fn load_or_default<S, T>(storage: &S, key: &str) -> Result<T>
where
    S: StoragePort,
    T: DeserializeOwned + Default,
{
    let Some(raw) = storage.read(key)? else {
        return Ok(T::default());
    };

    Ok(serde_json::from_str(&raw).unwrap_or_else(|err| {
        warn!(key, error = %err, "stored value is corrupt, using default");
        T::default()
    }))
}

fn write_json<S, T>(storage: &mut S, key: &str, value: &T) -> Result<()>
where
    S: StoragePort,
    T: Serialize + ?Sized,
{
    storage.write(key, &serde_json::to_string(value)?)
}
