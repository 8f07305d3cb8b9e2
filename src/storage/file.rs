use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use tracing::trace;

use super::StoragePort;
use crate::DatabaseError;

/// Directory-backed storage: each key lives in `<data_directory>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    data_directory: PathBuf,
}

impl FileStorage {
    /// Opens storage rooted at `data_directory`, creating it if needed.
    pub fn new<P: AsRef<Path>>(data_directory: P) -> Result<Self, DatabaseError> {
        let data_directory = data_directory.as_ref().to_path_buf();
        std::fs::create_dir_all(&data_directory)?;
        Ok(Self { data_directory })
    }

    pub fn data_directory(&self) -> &Path {
        &self.data_directory
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.data_directory.join(format!("{key}.json"))
    }
}

impl StoragePort for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>, DatabaseError> {
        match std::fs::read_to_string(self.key_path(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), DatabaseError> {
        let path = self.key_path(key);
        trace!(path = %path.display(), bytes = value.len(), "writing key");
        std::fs::write(path, value)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_through_directory() {
        let tempdir = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::new(tempdir.path().join("nested")).unwrap();

        assert_eq!(storage.read("database").unwrap(), None);
        storage.write("database", r#"{"name":"x","tables":{}}"#).unwrap();

        let reopened = FileStorage::new(tempdir.path().join("nested")).unwrap();
        assert_eq!(
            reopened.read("database").unwrap().as_deref(),
            Some(r#"{"name":"x","tables":{}}"#)
        );
        assert!(tempdir.path().join("nested").join("database.json").exists());
    }
}
