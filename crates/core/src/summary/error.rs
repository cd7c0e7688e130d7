//! Summary error types.

use fambud_shared::{AppError, types::BudgetId};
use thiserror::Error;

use crate::store::StoreError;

/// Summary errors.
#[derive(Debug, Error)]
pub enum SummaryError {
    /// Budget not found.
    #[error("Budget not found: {0}")]
    BudgetNotFound(BudgetId),

    /// Underlying store failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<SummaryError> for AppError {
    fn from(err: SummaryError) -> Self {
        match err {
            SummaryError::BudgetNotFound(_) => Self::NotFound(err.to_string()),
            SummaryError::Store(source) => source.into(),
        }
    }
}
