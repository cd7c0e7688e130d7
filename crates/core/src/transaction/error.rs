//! Transaction error types.

use fambud_shared::{
    AppError,
    types::{BudgetId, TransactionId},
};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::store::StoreError;

/// Transaction operation errors.
#[derive(Debug, Error)]
pub enum TransactionError {
    /// Transaction not found.
    #[error("Transaction not found: {0}")]
    NotFound(TransactionId),

    /// Owning budget not found.
    #[error("Budget not found: {0}")]
    BudgetNotFound(BudgetId),

    /// Amount does not fit the stored precision.
    #[error("Amount {0} does not fit {scale} decimal places", scale = crate::budget::AMOUNT_SCALE)]
    InvalidAmount(Decimal),

    /// Underlying store failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<TransactionError> for AppError {
    fn from(err: TransactionError) -> Self {
        match err {
            TransactionError::NotFound(_) | TransactionError::BudgetNotFound(_) => {
                Self::NotFound(err.to_string())
            }
            TransactionError::InvalidAmount(_) => Self::Validation(err.to_string()),
            TransactionError::Store(source) => source.into(),
        }
    }
}
