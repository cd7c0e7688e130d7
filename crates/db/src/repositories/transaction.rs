//! Transaction repository.

use async_trait::async_trait;
use chrono::NaiveDate;
use fambud_core::budget::{NewTransaction, Transaction};
use fambud_core::store::{StoreResult, TransactionStore};
use fambud_shared::types::{BudgetId, CategoryId, TransactionId, TransactorId};
use sea_orm::ActiveValue::{NotSet, Set, Unchanged};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};

use super::{db_error, update_error};
use crate::entities::transactions;

/// Transaction repository backed by the `transactions` table.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    db: DatabaseConnection,
}

impl TransactionRepository {
    /// Creates a new transaction repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn to_domain(model: transactions::Model) -> Transaction {
    Transaction {
        id: TransactionId::new(model.id),
        budget_id: BudgetId::new(model.budget_id),
        category_id: model.category_id.map(CategoryId::new),
        transactor_id: model.transactor_id.map(TransactorId::new),
        description: model.description,
        amount: model.amount,
        date: model.date,
        transaction_type: model.transaction_type.into(),
    }
}

#[async_trait]
impl TransactionStore for TransactionRepository {
    async fn create(&self, transaction: NewTransaction) -> StoreResult<Transaction> {
        transactions::ActiveModel {
            id: NotSet,
            budget_id: Set(transaction.budget_id.into_inner()),
            category_id: Set(transaction.category_id.map(CategoryId::into_inner)),
            transactor_id: Set(transaction.transactor_id.map(TransactorId::into_inner)),
            description: Set(transaction.description),
            amount: Set(transaction.amount),
            date: Set(transaction.date),
            transaction_type: Set(transaction.transaction_type.into()),
        }
        .insert(&self.db)
        .await
        .map(to_domain)
        .map_err(db_error)
    }

    async fn find_by_id(&self, id: TransactionId) -> StoreResult<Option<Transaction>> {
        transactions::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map(|found| found.map(to_domain))
            .map_err(db_error)
    }

    async fn find_by_budget(&self, budget_id: BudgetId) -> StoreResult<Vec<Transaction>> {
        transactions::Entity::find()
            .filter(transactions::Column::BudgetId.eq(budget_id.into_inner()))
            .order_by_asc(transactions::Column::Id)
            .all(&self.db)
            .await
            .map(|rows| rows.into_iter().map(to_domain).collect())
            .map_err(db_error)
    }

    async fn find_by_budget_between(
        &self,
        budget_id: BudgetId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> StoreResult<Vec<Transaction>> {
        transactions::Entity::find()
            .filter(transactions::Column::BudgetId.eq(budget_id.into_inner()))
            .filter(transactions::Column::Date.between(start, end))
            .order_by_asc(transactions::Column::Id)
            .all(&self.db)
            .await
            .map(|rows| rows.into_iter().map(to_domain).collect())
            .map_err(db_error)
    }

    async fn update(&self, transaction: Transaction) -> StoreResult<Transaction> {
        let id = transaction.id.into_inner();
        transactions::ActiveModel {
            id: Unchanged(id),
            budget_id: Set(transaction.budget_id.into_inner()),
            category_id: Set(transaction.category_id.map(CategoryId::into_inner)),
            transactor_id: Set(transaction.transactor_id.map(TransactorId::into_inner)),
            description: Set(transaction.description),
            amount: Set(transaction.amount),
            date: Set(transaction.date),
            transaction_type: Set(transaction.transaction_type.into()),
        }
        .update(&self.db)
        .await
        .map(to_domain)
        .map_err(|e| update_error(e, "transaction", id))
    }

    async fn delete_by_id(&self, id: TransactionId) -> StoreResult<bool> {
        let result = transactions::Entity::delete_by_id(id.into_inner())
            .exec(&self.db)
            .await
            .map_err(db_error)?;
        Ok(result.rows_affected > 0)
    }

    async fn delete_by_budget(&self, budget_id: BudgetId) -> StoreResult<u64> {
        let result = transactions::Entity::delete_many()
            .filter(transactions::Column::BudgetId.eq(budget_id.into_inner()))
            .exec(&self.db)
            .await
            .map_err(db_error)?;
        Ok(result.rows_affected)
    }
}
