//! Import error types.

use fambud_shared::{AppError, types::BudgetId};
use thiserror::Error;

use crate::store::StoreError;

/// Errors that stop an import before any row is written.
#[derive(Debug, Error)]
pub enum ImportError {
    /// A required header is absent.
    #[error("missing column: {0}")]
    MissingColumn(&'static str),

    /// The header row could not be read.
    #[error("unreadable statement: {0}")]
    Unreadable(String),

    /// Budget not found.
    #[error("Budget not found: {0}")]
    BudgetNotFound(BudgetId),

    /// Loading the existing transactions failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The parsing task panicked or was cancelled.
    #[error("import aborted: {0}")]
    Aborted(String),
}

impl From<ImportError> for AppError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::MissingColumn(_) | ImportError::Unreadable(_) => {
                Self::Validation(err.to_string())
            }
            ImportError::BudgetNotFound(_) => Self::NotFound(err.to_string()),
            ImportError::Store(source) => source.into(),
            ImportError::Aborted(_) => Self::Internal(err.to_string()),
        }
    }
}

/// A statement row that was skipped. `line` is 1-based and counts the header.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowError {
    /// Date not in `dd/mm/yyyy` form.
    #[error("line {line}: invalid date {value:?}")]
    InvalidDate {
        /// Line number.
        line: u64,
        /// Raw value.
        value: String,
    },

    /// Amount is not a decimal number, or has more precision than is stored.
    #[error("line {line}: invalid amount {value:?}")]
    InvalidAmount {
        /// Line number.
        line: u64,
        /// Raw value.
        value: String,
    },

    /// Neither a debit nor a credit amount.
    #[error("line {line}: no debit or credit amount")]
    MissingAmount {
        /// Line number.
        line: u64,
    },

    /// The record could not be read as CSV or is missing fields.
    #[error("line {line}: {reason}")]
    Malformed {
        /// Line number.
        line: u64,
        /// What was wrong.
        reason: String,
    },
}

impl RowError {
    /// Line the error refers to.
    #[must_use]
    pub const fn line(&self) -> u64 {
        match self {
            Self::InvalidDate { line, .. }
            | Self::InvalidAmount { line, .. }
            | Self::MissingAmount { line }
            | Self::Malformed { line, .. } => *line,
        }
    }
}
