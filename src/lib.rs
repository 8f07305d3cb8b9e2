//! A spreadsheet-like table document store.
//!
//! A [`Database`] document holds named tables, each with a column [`Schema`]
//! and ordered [`Row`]s. A [`Store`] owns the current document plus an
//! editing [`Selection`] and persists both through a [`StoragePort`] after
//! every change.

pub mod common;
pub mod config;
pub mod db;
pub mod logging;
pub mod storage;
pub mod store;

pub use common::{
    error::{DatabaseError, Result},
    types::{ColumnType, Value},
};
pub use config::{OrphanPolicy, StoreConfig, UnknownColumnPolicy};
pub use db::{
    database::Database,
    export::Export,
    selection::{Selection, View},
    table::*,
};
pub use storage::{FileStorage, MemoryStorage, StoragePort};
pub use store::Store;
