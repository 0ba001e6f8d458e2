use std::fmt::Display;

use thiserror::Error;

/// Failure reported by a [`ConfigStore`](super::ConfigStore) operation.
///
/// Absence of a row is never an error; lookups return `None` instead.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("({operation}) {message}")]
    Storage {
        operation: &'static str,
        message: String,
    },
}

impl StoreError {
    pub fn storage(operation: &'static str, cause: impl Display) -> Self {
        StoreError::Storage {
            operation,
            message: cause.to_string(),
        }
    }

    /// Re-tags an error raised by a nested lookup with the calling operation.
    pub fn within(self, operation: &'static str) -> Self {
        StoreError::storage(operation, self)
    }

    pub fn operation(&self) -> &'static str {
        match self {
            StoreError::Storage { operation, .. } => operation,
        }
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
