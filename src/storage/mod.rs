//! Persistence ports.
//!
//! The store keeps its document and selection in a string key-value slot.
//! [`StoragePort`] abstracts that slot so the store can run against memory in
//! tests or against a directory on disk.

use crate::DatabaseError;

pub mod file;
pub mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

/// Key holding the serialized [`crate::Database`].
pub const DATABASE_KEY: &str = "database";

/// Key holding the selected table name as a JSON string.
pub const SELECTED_TABLE_KEY: &str = "selectedTable";

/// Key holding the selected view as a JSON string.
pub const SELECTED_VIEW_KEY: &str = "selectedView";

/// A string key-value slot the store persists through.
///
/// Writes replace the previous value. There is no locking: two stores sharing
/// one backend overwrite each other, last writer wins.
pub trait StoragePort {
    /// Returns the value stored under `key`, or `None` if nothing was written.
    fn read(&self, key: &str) -> Result<Option<String>, DatabaseError>;

    /// Stores `value` under `key`.
    fn write(&mut self, key: &str, value: &str) -> Result<(), DatabaseError>;
}
