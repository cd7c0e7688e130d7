//! Category repository.

use async_trait::async_trait;
use fambud_core::budget::{Category, NewCategory};
use fambud_core::store::{CategoryStore, StoreResult};
use fambud_shared::types::{BudgetId, CategoryId};
use sea_orm::ActiveValue::{NotSet, Set, Unchanged};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};

use super::{db_error, update_error};
use crate::entities::categories;

/// Category repository backed by the `categories` table.
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    db: DatabaseConnection,
}

impl CategoryRepository {
    /// Creates a new category repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn to_domain(model: categories::Model) -> Category {
    Category {
        id: CategoryId::new(model.id),
        budget_id: BudgetId::new(model.budget_id),
        name: model.name,
    }
}

#[async_trait]
impl CategoryStore for CategoryRepository {
    async fn create(&self, category: NewCategory) -> StoreResult<Category> {
        categories::ActiveModel {
            id: NotSet,
            budget_id: Set(category.budget_id.into_inner()),
            name: Set(category.name),
        }
        .insert(&self.db)
        .await
        .map(to_domain)
        .map_err(db_error)
    }

    async fn find_by_id(&self, id: CategoryId) -> StoreResult<Option<Category>> {
        categories::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map(|found| found.map(to_domain))
            .map_err(db_error)
    }

    async fn find_by_budget(&self, budget_id: BudgetId) -> StoreResult<Vec<Category>> {
        categories::Entity::find()
            .filter(categories::Column::BudgetId.eq(budget_id.into_inner()))
            .order_by_asc(categories::Column::Id)
            .all(&self.db)
            .await
            .map(|rows| rows.into_iter().map(to_domain).collect())
            .map_err(db_error)
    }

    async fn update(&self, category: Category) -> StoreResult<Category> {
        let id = category.id.into_inner();
        categories::ActiveModel {
            id: Unchanged(id),
            budget_id: Set(category.budget_id.into_inner()),
            name: Set(category.name),
        }
        .update(&self.db)
        .await
        .map(to_domain)
        .map_err(|e| update_error(e, "category", id))
    }

    async fn delete_by_id(&self, id: CategoryId) -> StoreResult<bool> {
        let result = categories::Entity::delete_by_id(id.into_inner())
            .exec(&self.db)
            .await
            .map_err(db_error)?;
        Ok(result.rows_affected > 0)
    }

    async fn delete_by_budget(&self, budget_id: BudgetId) -> StoreResult<u64> {
        let result = categories::Entity::delete_many()
            .filter(categories::Column::BudgetId.eq(budget_id.into_inner()))
            .exec(&self.db)
            .await
            .map_err(db_error)?;
        Ok(result.rows_affected)
    }
}
