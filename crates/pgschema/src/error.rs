//! Error types for pgschema

use thiserror::Error;

/// Result type alias for statement execution
pub type DbResult<T> = Result<T, DbError>;

/// Errors returned by statement builders and the execution collaborator.
#[derive(Debug, Error)]
pub enum DbError {
    /// Database connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// Query execution error
    #[error("Query error: {0}")]
    Query(#[from] tokio_postgres::Error),

    /// Row not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Unique constraint violation
    #[error("Unique constraint violation: {0}")]
    UniqueViolation(String),

    /// Foreign key constraint violation
    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(String),

    /// Check constraint violation
    #[error("Check constraint violation: {0}")]
    CheckViolation(String),

    /// NOT NULL constraint violation reported by the store
    #[error("Not null violation: {0}")]
    NotNullViolation(String),

    /// Row decode/mapping error
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },

    /// A required (NOT NULL) column was never set on an insert
    #[error("Validation error: required column '{column}' of table '{table}' was not set")]
    MissingColumn { table: String, column: String },

    /// An UPDATE without any SET column
    #[error("Validation error: no column to update on table '{table}'")]
    NoColumnToUpdate { table: String },

    /// CREATE TABLE failed; `source` is the classified driver error
    #[error("failed to create table '{table}': {source}")]
    CreateTable {
        table: String,
        #[source]
        source: Box<DbError>,
    },

    /// Pool error
    #[cfg(feature = "pool")]
    #[error("Pool error: {0}")]
    Pool(String),
}

impl DbError {
    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Wrap a failed CREATE TABLE with the table name
    pub fn create_table(table: impl Into<String>, source: DbError) -> Self {
        Self::CreateTable {
            table: table.into(),
            source: Box::new(source),
        }
    }

    /// Create a missing required column error
    pub fn missing_column(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self::MissingColumn {
            table: table.into(),
            column: column.into(),
        }
    }

    /// Whether this error was raised before reaching the database
    /// (missing required column or empty update).
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::MissingColumn { .. } | Self::NoColumnToUpdate { .. })
    }

    /// Name of the missing column, if this is a [`DbError::MissingColumn`].
    pub fn missing_column_name(&self) -> Option<&str> {
        match self {
            Self::MissingColumn { column, .. } => Some(column),
            _ => None,
        }
    }

    /// Check if this is a unique violation error
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, Self::UniqueViolation(_))
    }

    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Parse a tokio_postgres error into a more specific DbError
    pub fn from_db_error(err: tokio_postgres::Error) -> Self {
        if let Some(db_err) = err.as_db_error() {
            let constraint = db_err
                .constraint()
                .or_else(|| db_err.column())
                .unwrap_or("unknown");
            let message = db_err.message();

            match db_err.code().code() {
                "23505" => return Self::UniqueViolation(format!("{}: {}", constraint, message)),
                "23503" => {
                    return Self::ForeignKeyViolation(format!("{}: {}", constraint, message));
                }
                "23514" => return Self::CheckViolation(format!("{}: {}", constraint, message)),
                "23502" => return Self::NotNullViolation(format!("{}: {}", constraint, message)),
                _ => {}
            }
        }
        Self::Query(err)
    }
}

#[cfg(feature = "pool")]
impl From<deadpool_postgres::PoolError> for DbError {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        Self::Pool(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_column_names_the_column() {
        let err = DbError::missing_column("users", "email");
        assert!(err.is_validation());
        assert_eq!(err.missing_column_name(), Some("email"));
        assert_eq!(
            err.to_string(),
            "Validation error: required column 'email' of table 'users' was not set"
        );
    }

    #[test]
    fn no_column_to_update_message() {
        let err = DbError::NoColumnToUpdate {
            table: "users".to_string(),
        };
        assert!(err.is_validation());
        assert_eq!(
            err.to_string(),
            "Validation error: no column to update on table 'users'"
        );
    }

    #[test]
    fn not_found_is_not_validation() {
        let err = DbError::not_found("users: expected one row, got none");
        assert!(err.is_not_found());
        assert!(!err.is_validation());
    }
}
