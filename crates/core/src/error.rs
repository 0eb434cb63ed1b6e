//! Error types shared across the workspace

use thiserror::Error;

/// Core errors
///
/// Data errors (`MissingCategory`, `EmptyTemplates`, `EmptyCategory`) mean the
/// static catalog or template configuration is malformed. They are kept apart
/// from "nothing matched", which is never an error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Category not found in catalog: {0}")]
    MissingCategory(String),

    #[error("Template list is empty: {0}")]
    EmptyTemplates(String),

    #[error("Category has no career paths: {0}")]
    EmptyCategory(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl Error {
    /// Whether this error indicates broken static data rather than a runtime fault
    pub fn is_data_error(&self) -> bool {
        matches!(
            self,
            Error::MissingCategory(_) | Error::EmptyTemplates(_) | Error::EmptyCategory(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
