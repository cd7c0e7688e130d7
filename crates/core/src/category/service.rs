//! Category CRUD.
//!
//! Deleting a category leaves transactions that reference it untouched; the
//! summary drops such orphaned ids.

use fambud_shared::types::{BudgetId, CategoryId};
use tracing::info;

use super::error::CategoryError;
use crate::budget::convert;
use crate::budget::types::{Category, CategoryInput};
use crate::store::Stores;

/// Creates, reads, updates and deletes individual categories.
#[derive(Debug, Clone)]
pub struct CategoryService {
    stores: Stores,
}

impl CategoryService {
    /// Creates a service over the given stores.
    #[must_use]
    pub const fn new(stores: Stores) -> Self {
        Self { stores }
    }

    /// Adds a category to an existing budget. Any `id` on the input is ignored.
    ///
    /// # Errors
    ///
    /// Returns `CategoryError::BudgetNotFound` if the budget does not exist.
    pub async fn create(
        &self,
        budget_id: BudgetId,
        input: CategoryInput,
    ) -> Result<Category, CategoryError> {
        if self.stores.budgets.find_by_id(budget_id).await?.is_none() {
            return Err(CategoryError::BudgetNotFound(budget_id));
        }
        let category = self
            .stores
            .categories
            .create(convert::new_category(budget_id, &input))
            .await?;
        info!(category_id = %category.id, %budget_id, name = %category.name, "category created");
        Ok(category)
    }

    /// Loads one category.
    ///
    /// # Errors
    ///
    /// Returns `CategoryError::NotFound` if the id is unknown.
    pub async fn get(&self, id: CategoryId) -> Result<Category, CategoryError> {
        self.stores
            .categories
            .find_by_id(id)
            .await?
            .ok_or(CategoryError::NotFound(id))
    }

    /// Lists the categories of a budget, ascending id.
    ///
    /// # Errors
    ///
    /// Returns `CategoryError::Store` on store failure.
    pub async fn list_for_budget(
        &self,
        budget_id: BudgetId,
    ) -> Result<Vec<Category>, CategoryError> {
        Ok(self.stores.categories.find_by_budget(budget_id).await?)
    }

    /// Renames a category. The owning budget never changes.
    ///
    /// # Errors
    ///
    /// Returns `CategoryError::NotFound` if the id is unknown.
    pub async fn update(
        &self,
        id: CategoryId,
        input: CategoryInput,
    ) -> Result<Category, CategoryError> {
        let existing = self.get(id).await?;
        let category = self
            .stores
            .categories
            .update(convert::category_row(id, existing.budget_id, &input))
            .await?;
        info!(category_id = %id, name = %category.name, "category updated");
        Ok(category)
    }

    /// Deletes a category.
    ///
    /// # Errors
    ///
    /// Returns `CategoryError::NotFound` if the id is unknown.
    pub async fn delete(&self, id: CategoryId) -> Result<(), CategoryError> {
        if !self.stores.categories.delete_by_id(id).await? {
            return Err(CategoryError::NotFound(id));
        }
        info!(category_id = %id, "category deleted");
        Ok(())
    }
}
