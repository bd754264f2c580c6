use thiserror::Error;

use crate::database::StoreError;

/// Hook pipeline errors with structured error types
#[derive(Debug, Error)]
pub enum HookError {
    #[error("{message}")]
    Validation { field: &'static str, message: String },

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Forbidden(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Hook {0} timed out")]
    Timeout(&'static str),
}

impl HookError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        HookError::Validation {
            field,
            message: message.into(),
        }
    }
}
