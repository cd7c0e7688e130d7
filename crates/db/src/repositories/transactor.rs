//! Transactor repository.

use async_trait::async_trait;
use fambud_core::budget::{NewTransactor, Transactor};
use fambud_core::store::{StoreResult, TransactorStore};
use fambud_shared::types::{BudgetId, TransactorId};
use sea_orm::ActiveValue::{NotSet, Set, Unchanged};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};

use super::{db_error, update_error};
use crate::entities::transactors;

/// Transactor repository backed by the `transactors` table.
#[derive(Debug, Clone)]
pub struct TransactorRepository {
    db: DatabaseConnection,
}

impl TransactorRepository {
    /// Creates a new transactor repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn to_domain(model: transactors::Model) -> Transactor {
    Transactor {
        id: TransactorId::new(model.id),
        budget_id: BudgetId::new(model.budget_id),
        first_name: model.first_name,
        last_name: model.last_name,
        email: model.email,
    }
}

#[async_trait]
impl TransactorStore for TransactorRepository {
    async fn create(&self, transactor: NewTransactor) -> StoreResult<Transactor> {
        transactors::ActiveModel {
            id: NotSet,
            budget_id: Set(transactor.budget_id.into_inner()),
            first_name: Set(transactor.first_name),
            last_name: Set(transactor.last_name),
            email: Set(transactor.email),
        }
        .insert(&self.db)
        .await
        .map(to_domain)
        .map_err(db_error)
    }

    async fn find_by_id(&self, id: TransactorId) -> StoreResult<Option<Transactor>> {
        transactors::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map(|found| found.map(to_domain))
            .map_err(db_error)
    }

    async fn find_by_budget(&self, budget_id: BudgetId) -> StoreResult<Vec<Transactor>> {
        transactors::Entity::find()
            .filter(transactors::Column::BudgetId.eq(budget_id.into_inner()))
            .order_by_asc(transactors::Column::Id)
            .all(&self.db)
            .await
            .map(|rows| rows.into_iter().map(to_domain).collect())
            .map_err(db_error)
    }

    async fn update(&self, transactor: Transactor) -> StoreResult<Transactor> {
        let id = transactor.id.into_inner();
        transactors::ActiveModel {
            id: Unchanged(id),
            budget_id: Set(transactor.budget_id.into_inner()),
            first_name: Set(transactor.first_name),
            last_name: Set(transactor.last_name),
            email: Set(transactor.email),
        }
        .update(&self.db)
        .await
        .map(to_domain)
        .map_err(|e| update_error(e, "transactor", id))
    }

    async fn delete_by_id(&self, id: TransactorId) -> StoreResult<bool> {
        let result = transactors::Entity::delete_by_id(id.into_inner())
            .exec(&self.db)
            .await
            .map_err(db_error)?;
        Ok(result.rows_affected > 0)
    }

    async fn delete_by_budget(&self, budget_id: BudgetId) -> StoreResult<u64> {
        let result = transactors::Entity::delete_many()
            .filter(transactors::Column::BudgetId.eq(budget_id.into_inner()))
            .exec(&self.db)
            .await
            .map_err(db_error)?;
        Ok(result.rows_affected)
    }
}
