use thiserror::Error;

use crate::types::PageId;

/// Failures raised at the schema boundary: config-panel edits, slug checks,
/// block validation.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CoreError {
    #[error("{0}")]
    Validation(String),

    #[error("{entity} '{id}' not found")]
    NotFound { entity: &'static str, id: String },

    #[error("{0}")]
    Conflict(String),
}

/// What a storage collaborator may report back.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("page {0} not found")]
    NotFound(PageId),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("not authenticated")]
    Unauthorized,

    #[error("backend failure: {0}")]
    Backend(String),
}

/// Coarse classification the editing UI branches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistErrorKind {
    Unauthenticated,
    Validation,
    NotFound,
    Backend,
}

/// Failure of a persistence coordinator operation.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("you must be logged in to perform this action")]
    Unauthenticated,

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("slug '{0}' is already in use")]
    SlugConflict(String),

    #[error("page {0} not found")]
    NotFound(PageId),

    #[error("backend error: {0}")]
    Backend(String),
}

impl PersistError {
    pub fn kind(&self) -> PersistErrorKind {
        match self {
            PersistError::Unauthenticated => PersistErrorKind::Unauthenticated,
            PersistError::Validation(_) | PersistError::SlugConflict(_) => {
                PersistErrorKind::Validation
            }
            PersistError::NotFound(_) => PersistErrorKind::NotFound,
            PersistError::Backend(_) => PersistErrorKind::Backend,
        }
    }

    /// Message suitable for showing to the editor as-is.
    pub fn user_message(&self) -> String {
        match self {
            PersistError::Unauthenticated => "You must be logged in to continue.".to_string(),
            PersistError::Validation(msg) => msg.clone(),
            PersistError::SlugConflict(slug) => {
                format!("The slug '{slug}' is already used by another page.")
            }
            PersistError::NotFound(_) => "This page no longer exists.".to_string(),
            PersistError::Backend(_) => {
                "The page could not be saved. Your changes are kept; please retry.".to_string()
            }
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, PersistError::Backend(_))
    }
}

impl From<StoreError> for PersistError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => PersistError::NotFound(id),
            StoreError::Conflict(msg) => PersistError::Validation(msg),
            StoreError::Unauthorized => PersistError::Unauthenticated,
            StoreError::Backend(msg) => PersistError::Backend(msg),
        }
    }
}

impl From<CoreError> for PersistError {
    fn from(err: CoreError) -> Self {
        PersistError::Validation(err.to_string())
    }
}
