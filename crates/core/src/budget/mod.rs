//! Budget aggregate: a budget plus the categories, transactors and
//! transactions that carry its id.

pub mod convert;
pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod tests;

pub use error::{BudgetError, CascadeStage};
pub use service::AggregateService;
pub use types::{
    Budget, BudgetAggregate, BudgetInput, Category, CategoryInput, NewBudget, NewCategory,
    NewTransaction, NewTransactor, Transaction, TransactionInput, TransactionType, Transactor,
    TransactorInput,
};
pub use types::{AMOUNT_SCALE, amount_fits};
