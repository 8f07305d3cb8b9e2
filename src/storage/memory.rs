use std::collections::HashMap;

use super::StoragePort;
use crate::DatabaseError;

/// In-process storage. Nothing survives the value being dropped.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw access for inspecting what a store wrote.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

impl StoragePort for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>, DatabaseError> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), DatabaseError> {
        self.entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_missing_key() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.read("database").unwrap(), None);
    }

    #[test]
    fn test_write_replaces() {
        let mut storage = MemoryStorage::new();
        storage.write("k", "1").unwrap();
        storage.write("k", "2").unwrap();
        assert_eq!(storage.read("k").unwrap().as_deref(), Some("2"));
        assert_eq!(storage.get("k"), Some("2"));
    }
}
