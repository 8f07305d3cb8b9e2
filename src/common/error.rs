use miette::Diagnostic;
use thiserror::Error;

/// Errors produced by the document store and its persistence ports.
///
/// Silent no-op cases (no selected table, missing column on a schema edit)
/// are not errors and never reach this type.
#[derive(Debug, Error, Diagnostic)]
pub enum DatabaseError {
    #[error("IO Error: {0}")]
    #[diagnostic(code(sheet_store::io))]
    Io(#[from] std::io::Error),

    #[error("JSON Error: {0}")]
    #[diagnostic(
        code(sheet_store::json),
        help("the payload must be a full document with `name` and `tables` fields")
    )]
    Json(#[from] serde_json::Error),

    #[error("Table already exists: {0}")]
    #[diagnostic(code(sheet_store::table_exists))]
    TableExists(String),

    #[error("Table not found: {0}")]
    #[diagnostic(code(sheet_store::table_not_found))]
    TableNotFound(String),

    #[error("Column not found: {0}")]
    #[diagnostic(code(sheet_store::column_not_found))]
    ColumnNotFound(String),

    #[error("Type mismatch: {0}")]
    #[diagnostic(code(sheet_store::type_mismatch))]
    TypeMismatch(String),

    #[error("Value {value:?} is not allowed in column {column}")]
    #[diagnostic(
        code(sheet_store::disallowed_value),
        help("allowed values: {allowed:?}")
    )]
    DisallowedValue {
        column: String,
        value: String,
        allowed: Vec<String>,
    },

    #[error("Row index {index} out of bounds for table with {len} rows")]
    #[diagnostic(code(sheet_store::row_out_of_bounds))]
    RowOutOfBounds { index: usize, len: usize },

    #[error("Invalid column type: {0}")]
    #[diagnostic(
        code(sheet_store::invalid_column_type),
        help("expected one of: string, number, boolean, null")
    )]
    InvalidColumnType(String),

    #[error("Invalid export file name: {0}")]
    #[diagnostic(
        code(sheet_store::invalid_file_name),
        help("table names used for export must not contain path separators or `..`")
    )]
    InvalidFileName(String),
}

/// Result type alias using [`DatabaseError`].
pub type Result<T, E = DatabaseError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_exists_message() {
        let err = DatabaseError::TableExists("users".to_string());
        assert_eq!(err.to_string(), "Table already exists: users");
    }

    #[test]
    fn test_row_out_of_bounds_message() {
        let err = DatabaseError::RowOutOfBounds { index: 4, len: 2 };
        assert_eq!(
            err.to_string(),
            "Row index 4 out of bounds for table with 2 rows"
        );
    }

    #[test]
    fn test_json_error_conversion() {
        let parse_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err: DatabaseError = parse_err.into();
        assert!(matches!(err, DatabaseError::Json(_)));
        assert!(err.to_string().starts_with("JSON Error:"));
    }

    #[test]
    fn test_invalid_file_name_message() {
        let err = DatabaseError::InvalidFileName("../x.json".to_string());
        assert_eq!(err.to_string(), "Invalid export file name: ../x.json");
    }

    #[test]
    fn test_diagnostic_code() {
        let err = DatabaseError::TableNotFound("ghost".to_string());
        let code = err.code().map(|c| c.to_string());
        assert_eq!(code.as_deref(), Some("sheet_store::table_not_found"));
    }
}
