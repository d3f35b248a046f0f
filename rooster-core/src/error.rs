//! Error types for the rooster ecosystem.

use thiserror::Error;

use crate::store::Collection;

/// Errors that can occur in rooster operations.
#[derive(Error, Debug)]
pub enum RoosterError {
    #[error("Configuration error: {0}")]
    Config(String),

    /// The store does not match the configured field mapping.
    #[error("Schema error: {0}")]
    Schema(String),

    /// Rejected input. Raised before any store call is made.
    #[error("{0}")]
    Validation(String),

    #[error("Record store error: {0}")]
    Store(String),

    #[error("{collection} record not found: {id}")]
    NotFound { collection: Collection, id: String },

    #[error("Not logged in. Log in first with:\n  rooster login <email>")]
    NotLoggedIn,

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl RoosterError {
    pub fn validation(msg: impl Into<String>) -> Self {
        RoosterError::Validation(msg.into())
    }

    pub fn store(msg: impl Into<String>) -> Self {
        RoosterError::Store(msg.into())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, RoosterError::Validation(_))
    }
}

impl From<serde_json::Error> for RoosterError {
    fn from(e: serde_json::Error) -> Self {
        RoosterError::Serialization(e.to_string())
    }
}

/// Result type alias for rooster operations.
pub type RoosterResult<T> = Result<T, RoosterError>;
