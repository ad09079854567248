//! Error types for layout persistence

use thiserror::Error;

use crate::store::StoreError;

/// Errors that reach a caller of the persistence adapter.
///
/// Normalization never produces errors; only authorization, payload shape
/// and storage failures do.
#[derive(Debug, Error)]
pub enum LayoutError {
    /// Bad shape, range, or a missing required field; nothing was written
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    /// No authenticated actor
    #[error("authentication required")]
    Unauthorized,

    /// Actor is not an administrator
    #[error("administrator role required")]
    Forbidden,

    /// A page with this key already exists
    #[error("page '{key}' already exists")]
    Conflict { key: String },

    /// Backend failure, surfaced verbatim
    #[error("storage error: {0}")]
    Storage(#[from] StoreError),
}

impl LayoutError {
    /// Create a validation error
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// HTTP status code this error maps to
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation { .. } => 400,
            Self::Unauthorized => 401,
            Self::Forbidden => 403,
            Self::Conflict { .. } => 409,
            Self::Storage(_) => 500,
        }
    }
}
