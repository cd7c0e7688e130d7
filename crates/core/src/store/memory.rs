//! In-process implementation of all four entity stores.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::NaiveDate;
use fambud_shared::types::{BudgetId, CategoryId, TransactionId, TransactorId};
use tokio::sync::RwLock;

use super::{
    BudgetStore, CategoryStore, StoreError, StoreResult, TransactionStore, TransactorStore,
};
use crate::budget::types::{
    Budget, Category, NewBudget, NewCategory, NewTransaction, NewTransactor, Transaction,
    Transactor,
};

/// One table: rows keyed by id plus its id sequence.
#[derive(Debug)]
struct Table<T> {
    rows: RwLock<BTreeMap<i64, T>>,
    sequence: AtomicI64,
}

impl<T: Clone> Table<T> {
    fn new() -> Self {
        Self {
            rows: RwLock::new(BTreeMap::new()),
            sequence: AtomicI64::new(0),
        }
    }

    fn next_id(&self) -> i64 {
        self.sequence.fetch_add(1, Ordering::SeqCst) + 1
    }

    async fn insert_with(&self, build: impl FnOnce(i64) -> T) -> T {
        let id = self.next_id();
        let row = build(id);
        self.rows.write().await.insert(id, row.clone());
        row
    }

    async fn get(&self, id: i64) -> Option<T> {
        self.rows.read().await.get(&id).cloned()
    }

    async fn replace(&self, entity: &'static str, id: i64, row: T) -> StoreResult<T> {
        let mut rows = self.rows.write().await;
        match rows.get_mut(&id) {
            Some(slot) => {
                *slot = row.clone();
                Ok(row)
            }
            None => Err(StoreError::not_found(entity, id)),
        }
    }

    async fn remove(&self, id: i64) -> bool {
        self.rows.write().await.remove(&id).is_some()
    }

    async fn select(&self, keep: impl Fn(&T) -> bool) -> Vec<T> {
        self.rows
            .read()
            .await
            .values()
            .filter(|row| keep(row))
            .cloned()
            .collect()
    }

    async fn remove_where(&self, matches: impl Fn(&T) -> bool) -> u64 {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|_, row| !matches(row));
        (before - rows.len()) as u64
    }
}

/// Entity stores held in memory.
///
/// Ids are assigned per entity starting at 1. Suitable for tests and for
/// running the services without a database.
#[derive(Debug)]
pub struct InMemoryStore {
    budgets: Table<Budget>,
    categories: Table<Category>,
    transactors: Table<Transactor>,
    transactions: Table<Transaction>,
}

impl InMemoryStore {
    /// Creates empty stores.
    #[must_use]
    pub fn new() -> Self {
        Self {
            budgets: Table::new(),
            categories: Table::new(),
            transactors: Table::new(),
            transactions: Table::new(),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BudgetStore for InMemoryStore {
    async fn create(&self, budget: NewBudget) -> StoreResult<Budget> {
        Ok(self
            .budgets
            .insert_with(|id| Budget {
                id: BudgetId::new(id),
                name: budget.name,
            })
            .await)
    }

    async fn find_by_id(&self, id: BudgetId) -> StoreResult<Option<Budget>> {
        Ok(self.budgets.get(id.into_inner()).await)
    }

    async fn update(&self, budget: Budget) -> StoreResult<Budget> {
        let id = budget.id.into_inner();
        self.budgets.replace("budget", id, budget).await
    }

    async fn delete_by_id(&self, id: BudgetId) -> StoreResult<bool> {
        Ok(self.budgets.remove(id.into_inner()).await)
    }
}

#[async_trait]
impl CategoryStore for InMemoryStore {
    async fn create(&self, category: NewCategory) -> StoreResult<Category> {
        Ok(self
            .categories
            .insert_with(|id| Category {
                id: CategoryId::new(id),
                budget_id: category.budget_id,
                name: category.name,
            })
            .await)
    }

    async fn find_by_id(&self, id: CategoryId) -> StoreResult<Option<Category>> {
        Ok(self.categories.get(id.into_inner()).await)
    }

    async fn find_by_budget(&self, budget_id: BudgetId) -> StoreResult<Vec<Category>> {
        Ok(self.categories.select(|c| c.budget_id == budget_id).await)
    }

    async fn update(&self, category: Category) -> StoreResult<Category> {
        let id = category.id.into_inner();
        self.categories.replace("category", id, category).await
    }

    async fn delete_by_id(&self, id: CategoryId) -> StoreResult<bool> {
        Ok(self.categories.remove(id.into_inner()).await)
    }

    async fn delete_by_budget(&self, budget_id: BudgetId) -> StoreResult<u64> {
        Ok(self
            .categories
            .remove_where(|c| c.budget_id == budget_id)
            .await)
    }
}

#[async_trait]
impl TransactorStore for InMemoryStore {
    async fn create(&self, transactor: NewTransactor) -> StoreResult<Transactor> {
        Ok(self
            .transactors
            .insert_with(|id| Transactor {
                id: TransactorId::new(id),
                budget_id: transactor.budget_id,
                first_name: transactor.first_name,
                last_name: transactor.last_name,
                email: transactor.email,
            })
            .await)
    }

    async fn find_by_id(&self, id: TransactorId) -> StoreResult<Option<Transactor>> {
        Ok(self.transactors.get(id.into_inner()).await)
    }

    async fn find_by_budget(&self, budget_id: BudgetId) -> StoreResult<Vec<Transactor>> {
        Ok(self.transactors.select(|t| t.budget_id == budget_id).await)
    }

    async fn update(&self, transactor: Transactor) -> StoreResult<Transactor> {
        let id = transactor.id.into_inner();
        self.transactors.replace("transactor", id, transactor).await
    }

    async fn delete_by_id(&self, id: TransactorId) -> StoreResult<bool> {
        Ok(self.transactors.remove(id.into_inner()).await)
    }

    async fn delete_by_budget(&self, budget_id: BudgetId) -> StoreResult<u64> {
        Ok(self
            .transactors
            .remove_where(|t| t.budget_id == budget_id)
            .await)
    }
}

#[async_trait]
impl TransactionStore for InMemoryStore {
    async fn create(&self, transaction: NewTransaction) -> StoreResult<Transaction> {
        Ok(self
            .transactions
            .insert_with(|id| Transaction {
                id: TransactionId::new(id),
                budget_id: transaction.budget_id,
                category_id: transaction.category_id,
                transactor_id: transaction.transactor_id,
                description: transaction.description,
                amount: transaction.amount,
                date: transaction.date,
                transaction_type: transaction.transaction_type,
            })
            .await)
    }

    async fn find_by_id(&self, id: TransactionId) -> StoreResult<Option<Transaction>> {
        Ok(self.transactions.get(id.into_inner()).await)
    }

    async fn find_by_budget(&self, budget_id: BudgetId) -> StoreResult<Vec<Transaction>> {
        Ok(self.transactions.select(|t| t.budget_id == budget_id).await)
    }

    async fn find_by_budget_between(
        &self,
        budget_id: BudgetId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> StoreResult<Vec<Transaction>> {
        Ok(self
            .transactions
            .select(|t| t.budget_id == budget_id && t.date >= start && t.date <= end)
            .await)
    }

    async fn update(&self, transaction: Transaction) -> StoreResult<Transaction> {
        let id = transaction.id.into_inner();
        self.transactions
            .replace("transaction", id, transaction)
            .await
    }

    async fn delete_by_id(&self, id: TransactionId) -> StoreResult<bool> {
        Ok(self.transactions.remove(id.into_inner()).await)
    }

    async fn delete_by_budget(&self, budget_id: BudgetId) -> StoreResult<u64> {
        Ok(self
            .transactions
            .remove_where(|t| t.budget_id == budget_id)
            .await)
    }
}
