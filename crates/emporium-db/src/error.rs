//! Database-specific error types and conversions.

use emporium_core::error::EmporiumError;

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Statement rejected: {0}")]
    Query(String),

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Version conflict on {entity} with id {id}")]
    Conflict { entity: String, id: String },

    #[error("Malformed document: {0}")]
    Decode(String),
}

impl From<serde_json::Error> for DbError {
    fn from(err: serde_json::Error) -> Self {
        DbError::Decode(err.to_string())
    }
}

impl From<DbError> for EmporiumError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => EmporiumError::NotFound { entity, id },
            DbError::Conflict { entity, id } => EmporiumError::Conflict { entity, id },
            other => EmporiumError::Database(other.to_string()),
        }
    }
}
