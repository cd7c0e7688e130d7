//! Store implementations over `SeaORM`.
//!
//! Each repository implements one of the store traits from `fambud_core`.
//! None of them opens a database transaction; the aggregate service owns
//! the write ordering.

pub mod budget;
pub mod category;
pub mod transaction;
pub mod transactor;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use fambud_core::store::{StoreError, Stores};
use sea_orm::{DatabaseConnection, DbErr};

pub use budget::BudgetRepository;
pub use category::CategoryRepository;
pub use transaction::TransactionRepository;
pub use transactor::TransactorRepository;

/// All four stores over one connection pool.
#[must_use]
pub fn stores(db: &DatabaseConnection) -> Stores {
    Stores {
        budgets: Arc::new(BudgetRepository::new(db.clone())),
        categories: Arc::new(CategoryRepository::new(db.clone())),
        transactors: Arc::new(TransactorRepository::new(db.clone())),
        transactions: Arc::new(TransactionRepository::new(db.clone())),
    }
}

/// Maps a failed update to `NotFound`, anything else to `Backend`.
pub(crate) fn update_error(err: DbErr, entity: &'static str, id: i64) -> StoreError {
    match err {
        DbErr::RecordNotUpdated | DbErr::RecordNotFound(_) => StoreError::not_found(entity, id),
        other => db_error(other),
    }
}

pub(crate) fn db_error(err: DbErr) -> StoreError {
    StoreError::backend(err.to_string())
}
