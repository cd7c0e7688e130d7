//! Budget repository.

use async_trait::async_trait;
use fambud_core::budget::{Budget, NewBudget};
use fambud_core::store::{BudgetStore, StoreResult};
use fambud_shared::types::BudgetId;
use sea_orm::ActiveValue::{NotSet, Set, Unchanged};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait};

use super::{db_error, update_error};
use crate::entities::budgets;

/// Budget repository backed by the `budgets` table.
#[derive(Debug, Clone)]
pub struct BudgetRepository {
    db: DatabaseConnection,
}

impl BudgetRepository {
    /// Creates a new budget repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn to_domain(model: budgets::Model) -> Budget {
    Budget {
        id: BudgetId::new(model.id),
        name: model.name,
    }
}

#[async_trait]
impl BudgetStore for BudgetRepository {
    async fn create(&self, budget: NewBudget) -> StoreResult<Budget> {
        budgets::ActiveModel {
            id: NotSet,
            name: Set(budget.name),
        }
        .insert(&self.db)
        .await
        .map(to_domain)
        .map_err(db_error)
    }

    async fn find_by_id(&self, id: BudgetId) -> StoreResult<Option<Budget>> {
        budgets::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map(|found| found.map(to_domain))
            .map_err(db_error)
    }

    async fn update(&self, budget: Budget) -> StoreResult<Budget> {
        let id = budget.id.into_inner();
        budgets::ActiveModel {
            id: Unchanged(id),
            name: Set(budget.name),
        }
        .update(&self.db)
        .await
        .map(to_domain)
        .map_err(|e| update_error(e, "budget", id))
    }

    async fn delete_by_id(&self, id: BudgetId) -> StoreResult<bool> {
        let result = budgets::Entity::delete_by_id(id.into_inner())
            .exec(&self.db)
            .await
            .map_err(db_error)?;
        Ok(result.rows_affected > 0)
    }
}
