//! Budget aggregate error types.

use fambud_shared::{AppError, types::BudgetId};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::store::StoreError;

/// Step of a cascade at which a write failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CascadeStage {
    /// Budget header row.
    Budget,
    /// Category rows.
    Categories,
    /// Transactor rows.
    Transactors,
    /// Transaction rows.
    Transactions,
}

impl std::fmt::Display for CascadeStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Budget => "budget",
            Self::Categories => "categories",
            Self::Transactors => "transactors",
            Self::Transactions => "transactions",
        };
        f.write_str(name)
    }
}

/// Budget aggregate errors.
#[derive(Debug, Error)]
pub enum BudgetError {
    /// Budget not found.
    #[error("Budget not found: {0}")]
    NotFound(BudgetId),

    /// A transaction amount does not fit the stored precision. Raised before
    /// anything is written.
    #[error("Amount {amount} of {description:?} does not fit {scale} decimal places")]
    InvalidAmount {
        /// Description of the offending transaction.
        description: String,
        /// Amount as supplied.
        amount: Decimal,
        /// Decimal places kept by the store.
        scale: u32,
    },

    /// A write failed part way through a cascade. Rows written before the
    /// failure are not rolled back.
    #[error("Cascade on budget {budget_id} failed at {stage}: {source}")]
    Cascade {
        /// Budget being written or deleted.
        budget_id: BudgetId,
        /// Step that failed.
        stage: CascadeStage,
        /// Underlying store error.
        #[source]
        source: StoreError,
    },

    /// A store call failed before anything was written.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl BudgetError {
    pub(crate) const fn cascade(
        budget_id: BudgetId,
        stage: CascadeStage,
        source: StoreError,
    ) -> Self {
        Self::Cascade {
            budget_id,
            stage,
            source,
        }
    }
}

impl From<BudgetError> for AppError {
    fn from(err: BudgetError) -> Self {
        match err {
            BudgetError::NotFound(_) => Self::NotFound(err.to_string()),
            BudgetError::InvalidAmount { .. } => Self::Validation(err.to_string()),
            BudgetError::Cascade { .. } => Self::PartialWrite(err.to_string()),
            BudgetError::Store(source) => source.into(),
        }
    }
}
