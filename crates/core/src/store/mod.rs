//! Entity stores.
//!
//! Four independent stores, one per entity. None of them offers cascades or
//! multi-row transactions; keeping the budget aggregate consistent across
//! them is the job of [`crate::budget::AggregateService`].
//!
//! Contract shared by every store:
//! - `create` assigns a fresh, strictly increasing id.
//! - `update` fails with [`StoreError::NotFound`] when the id is unknown.
//! - collections come back in ascending id order.

mod error;
mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use fambud_shared::types::{BudgetId, CategoryId, TransactionId, TransactorId};

use crate::budget::types::{
    Budget, Category, NewBudget, NewCategory, NewTransaction, NewTransactor, Transaction,
    Transactor,
};

pub use error::{StoreError, StoreResult};
pub use memory::InMemoryStore;

/// Budget header storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BudgetStore: Send + Sync {
    /// Inserts a budget.
    async fn create(&self, budget: NewBudget) -> StoreResult<Budget>;

    /// Finds a budget by id.
    async fn find_by_id(&self, id: BudgetId) -> StoreResult<Option<Budget>>;

    /// Overwrites an existing budget.
    async fn update(&self, budget: Budget) -> StoreResult<Budget>;

    /// Deletes a budget; returns whether a row was removed.
    async fn delete_by_id(&self, id: BudgetId) -> StoreResult<bool>;
}

/// Category storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CategoryStore: Send + Sync {
    /// Inserts a category.
    async fn create(&self, category: NewCategory) -> StoreResult<Category>;

    /// Finds a category by id.
    async fn find_by_id(&self, id: CategoryId) -> StoreResult<Option<Category>>;

    /// Lists the categories of a budget.
    async fn find_by_budget(&self, budget_id: BudgetId) -> StoreResult<Vec<Category>>;

    /// Overwrites an existing category.
    async fn update(&self, category: Category) -> StoreResult<Category>;

    /// Deletes a category; returns whether a row was removed.
    async fn delete_by_id(&self, id: CategoryId) -> StoreResult<bool>;

    /// Deletes every category of a budget; returns the number removed.
    async fn delete_by_budget(&self, budget_id: BudgetId) -> StoreResult<u64>;
}

/// Transactor storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TransactorStore: Send + Sync {
    /// Inserts a transactor.
    async fn create(&self, transactor: NewTransactor) -> StoreResult<Transactor>;

    /// Finds a transactor by id.
    async fn find_by_id(&self, id: TransactorId) -> StoreResult<Option<Transactor>>;

    /// Lists the transactors of a budget.
    async fn find_by_budget(&self, budget_id: BudgetId) -> StoreResult<Vec<Transactor>>;

    /// Overwrites an existing transactor.
    async fn update(&self, transactor: Transactor) -> StoreResult<Transactor>;

    /// Deletes a transactor; returns whether a row was removed.
    async fn delete_by_id(&self, id: TransactorId) -> StoreResult<bool>;

    /// Deletes every transactor of a budget; returns the number removed.
    async fn delete_by_budget(&self, budget_id: BudgetId) -> StoreResult<u64>;
}

/// Transaction storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// Inserts a transaction.
    async fn create(&self, transaction: NewTransaction) -> StoreResult<Transaction>;

    /// Finds a transaction by id.
    async fn find_by_id(&self, id: TransactionId) -> StoreResult<Option<Transaction>>;

    /// Lists the transactions of a budget.
    async fn find_by_budget(&self, budget_id: BudgetId) -> StoreResult<Vec<Transaction>>;

    /// Lists the transactions of a budget dated within `[start, end]`.
    async fn find_by_budget_between(
        &self,
        budget_id: BudgetId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> StoreResult<Vec<Transaction>>;

    /// Overwrites an existing transaction.
    async fn update(&self, transaction: Transaction) -> StoreResult<Transaction>;

    /// Deletes a transaction; returns whether a row was removed.
    async fn delete_by_id(&self, id: TransactionId) -> StoreResult<bool>;

    /// Deletes every transaction of a budget; returns the number removed.
    async fn delete_by_budget(&self, budget_id: BudgetId) -> StoreResult<u64>;
}

/// The four entity stores, shareable across spawned tasks.
#[derive(Clone)]
pub struct Stores {
    /// Budget headers.
    pub budgets: Arc<dyn BudgetStore>,
    /// Categories.
    pub categories: Arc<dyn CategoryStore>,
    /// Transactors.
    pub transactors: Arc<dyn TransactorStore>,
    /// Transactions.
    pub transactions: Arc<dyn TransactionStore>,
}

impl Stores {
    /// Uses one backend for all four stores.
    pub fn from_backend<S>(backend: Arc<S>) -> Self
    where
        S: BudgetStore + CategoryStore + TransactorStore + TransactionStore + 'static,
    {
        Self {
            budgets: backend.clone(),
            categories: backend.clone(),
            transactors: backend.clone(),
            transactions: backend,
        }
    }

    /// Fresh in-memory stores.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::from_backend(Arc::new(InMemoryStore::new()))
    }
}

impl std::fmt::Debug for Stores {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stores").finish_non_exhaustive()
    }
}
