//! Tool error types

use thiserror::Error;

use crate::db::DbError;
use crate::pricing::PricingError;

#[derive(Debug, Error)]
pub enum ToolError {
    #[error(transparent)]
    Pricing(#[from] PricingError),

    #[error("Database error: {0}")]
    Db(#[from] DbError),

    #[error("Unknown category: '{0}'")]
    InvalidCategory(String),

    #[error("Product id cannot be empty")]
    EmptyId,

    #[error("Product id '{0}' appears more than once")]
    DuplicateProduct(String),

    #[error("{what} not found with id: {id}")]
    NotFound { what: &'static str, id: String },
}

impl From<rusqlite::Error> for ToolError {
    fn from(err: rusqlite::Error) -> Self {
        ToolError::Db(DbError::Sqlite(err))
    }
}

impl ToolError {
    /// True when the caller sent bad input, as opposed to a storage failure
    pub fn is_invalid_input(&self) -> bool {
        !matches!(self, ToolError::Db(_))
    }
}
