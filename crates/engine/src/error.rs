//! The module contains the errors the engine can return.
//!
//! - [`KeyNotFound`] when a category or link id is unknown.
//! - [`Validation`] when a mutation carries invalid input (empty name,
//!   malformed URL, dangling category reference).
//! - [`InvalidImport`] when an imported or edited document has nothing usable.
//!
//!  [`KeyNotFound`]: EngineError::KeyNotFound
//!  [`Validation`]: EngineError::Validation
//!  [`InvalidImport`]: EngineError::InvalidImport
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("Invalid import: {0}")]
    InvalidImport(String),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::Validation(a), Self::Validation(b)) => a == b,
            (Self::InvalidImport(a), Self::InvalidImport(b)) => a == b,
            (Self::Json(a), Self::Json(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
