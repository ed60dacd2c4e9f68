//! Error type returned by every domain service.
//!
//! Storage code keeps returning `anyhow::Result`; those failures surface here
//! as [`DomainError::Internal`] through `?`. The REST layer maps each variant to
//! an HTTP status.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    /// Record absent, or owned by another user
    #[error("{0}")]
    NotFound(String),
    /// Structurally valid request that breaks a business rule
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl DomainError {
    pub fn not_found(message: impl Into<String>) -> Self {
        DomainError::NotFound(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        DomainError::Validation(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        DomainError::Unauthorized(message.into())
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
