use std::{
    ffi::OsStr,
    path::{Path, PathBuf},
};

use crate::{DatabaseError, db::database::Database};

/// A table's rows rendered as a downloadable JSON artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Export {
    /// `{table}.json`
    pub file_name: String,

    /// JSON array of row objects.
    pub contents: String,
}

impl Export {
    /// Renders the rows of `table_name`.
    ///
    /// A table that does not exist exports as an empty array.
    pub fn from_table(db: &Database, table_name: &str) -> Result<Self, DatabaseError> {
        Ok(Self {
            file_name: format!("{table_name}.json"),
            contents: serde_json::to_string(db.rows(table_name))?,
        })
    }

    /// Writes the artifact into `dir`, returning the full path.
    ///
    /// The file always lands directly inside `dir`: a name that carries a
    /// directory component is refused with [`DatabaseError::InvalidFileName`].
    pub fn write_to<P: AsRef<Path>>(&self, dir: P) -> Result<PathBuf, DatabaseError> {
        if Path::new(&self.file_name).file_name() != Some(OsStr::new(&self.file_name)) {
            return Err(DatabaseError::InvalidFileName(self.file_name.clone()));
        }

        std::fs::create_dir_all(dir.as_ref())?;
        let path = dir.as_ref().join(&self.file_name);
        std::fs::write(&path, &self.contents)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Row, Value};

    #[test]
    fn test_export_rows() {
        let mut db = Database::new();
        db.add_table("users").unwrap();
        db.get_table_mut("users")
            .unwrap()
            .push_row(Row::from_iter([("email", Value::from("a@x.com"))]));

        let export = Export::from_table(&db, "users").unwrap();
        assert_eq!(export.file_name, "users.json");
        assert_eq!(export.contents, r#"[{"email":"a@x.com"}]"#);
    }

    #[test]
    fn test_export_missing_table() {
        let export = Export::from_table(&Database::new(), "ghost").unwrap();
        assert_eq!(export.file_name, "ghost.json");
        assert_eq!(export.contents, "[]");
    }

    #[test]
    fn test_write_to_dir() {
        let dir = tempfile::tempdir().unwrap();
        let export = Export {
            file_name: "t.json".to_string(),
            contents: "[]".to_string(),
        };

        let path = export.write_to(dir.path()).unwrap();
        assert_eq!(path, dir.path().join("t.json"));
        assert_eq!(std::fs::read_to_string(path).unwrap(), "[]");
    }

    #[test]
    fn test_write_to_stays_inside_dir() {
        let base = tempfile::tempdir().unwrap();
        let out = base.path().join("out");

        for table in ["../escaped", "nested/t", "/abs"] {
            let export = Export::from_table(&Database::new(), table).unwrap();
            assert!(matches!(
                export.write_to(&out),
                Err(DatabaseError::InvalidFileName(name)) if name == export.file_name
            ));
        }

        assert!(!base.path().join("escaped.json").exists());
        assert!(!out.exists());
    }
}
