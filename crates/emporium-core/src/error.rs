//! Error types for Emporium.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EmporiumError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Access Denied: {reason}")]
    AccessDenied { reason: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    /// A conditional write lost against a concurrent writer.
    #[error("Concurrent modification of {entity} with id {id}")]
    Conflict { entity: String, id: String },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl EmporiumError {
    pub fn not_found(entity: &str, id: impl ToString) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }
}

pub type EmporiumResult<T> = Result<T, EmporiumError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_denied_message_is_recognizable() {
        let err = EmporiumError::AccessDenied {
            reason: "no admin role".into(),
        };
        assert!(err.to_string().starts_with("Access Denied"));
    }

    #[test]
    fn not_found_helper_formats_id() {
        let err = EmporiumError::not_found("shop", 42);
        assert_eq!(err.to_string(), "Entity not found: shop with id 42");
    }
}
