//! Error types for object access.

use super::ObjectType;
use thiserror::Error;

/// ObjectError is returned when an object is used in a way its current
/// type does not allow.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ObjectError {
    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        expected: ObjectType,
        actual: ObjectType,
    },

    /// Only produced by the `get_key` family of lookups.
    #[error("key not found: {key}")]
    KeyNotFound { key: String },
}

impl ObjectError {
    /// Creates a type mismatch error.
    pub fn type_mismatch(expected: ObjectType, actual: ObjectType) -> Self {
        ObjectError::TypeMismatch { expected, actual }
    }

    /// Creates a key not found error. Non UTF-8 bytes are replaced.
    pub fn key_not_found(key: &[u8]) -> Self {
        ObjectError::KeyNotFound {
            key: String::from_utf8_lossy(key).into_owned(),
        }
    }

    pub fn is_type_mismatch(&self) -> bool {
        matches!(self, ObjectError::TypeMismatch { .. })
    }
}

/// Result type for object operations.
pub type Result<T> = std::result::Result<T, ObjectError>;
