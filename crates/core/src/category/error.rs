//! Category error types.

use fambud_shared::{
    AppError,
    types::{BudgetId, CategoryId},
};
use thiserror::Error;

use crate::store::StoreError;

/// Category operation errors.
#[derive(Debug, Error)]
pub enum CategoryError {
    /// Category not found.
    #[error("Category not found: {0}")]
    NotFound(CategoryId),

    /// Owning budget not found.
    #[error("Budget not found: {0}")]
    BudgetNotFound(BudgetId),

    /// Underlying store failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<CategoryError> for AppError {
    fn from(err: CategoryError) -> Self {
        match err {
            CategoryError::NotFound(_) | CategoryError::BudgetNotFound(_) => {
                Self::NotFound(err.to_string())
            }
            CategoryError::Store(source) => source.into(),
        }
    }
}
