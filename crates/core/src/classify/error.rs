//! Classification error types.

use fambud_shared::{AppError, types::BudgetId};
use thiserror::Error;

use crate::store::StoreError;

/// Errors that abort a classification run. Failures saving individual
/// transactions are counted in the report instead.
#[derive(Debug, Error)]
pub enum ClassifyError {
    /// The mapping table could not be read.
    #[error("mapping table unavailable: {0}")]
    MappingUnavailable(String),

    /// A mapping row does not have exactly two columns.
    #[error("malformed mapping row at line {line}: {reason}")]
    MalformedMapping {
        /// 1-based line number.
        line: u64,
        /// What was wrong with it.
        reason: String,
    },

    /// Budget not found.
    #[error("Budget not found: {0}")]
    BudgetNotFound(BudgetId),

    /// Loading categories or transactions failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<ClassifyError> for AppError {
    fn from(err: ClassifyError) -> Self {
        match err {
            ClassifyError::MappingUnavailable(_) | ClassifyError::MalformedMapping { .. } => {
                Self::ResourceUnavailable(err.to_string())
            }
            ClassifyError::BudgetNotFound(_) => Self::NotFound(err.to_string()),
            ClassifyError::Store(source) => source.into(),
        }
    }
}
