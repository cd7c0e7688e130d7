//! Aggregate orchestration over the independent entity stores.
//!
//! Write order:
//! 1. budget header (to obtain or confirm its id)
//! 2. categories, transactors and transactions, concurrently, each stamped
//!    with the budget id
//! 3. re-read of the whole aggregate from the stores
//!
//! Delete order is the reverse dependency order, strictly sequential:
//! transactions, transactors, categories, budget.

use fambud_shared::types::BudgetId;
use futures::future::try_join_all;
use tracing::{debug, info};

use super::convert;
use super::error::{BudgetError, CascadeStage};
use super::types::{
    AMOUNT_SCALE, BudgetAggregate, BudgetInput, Category, CategoryInput, NewBudget, Transaction,
    TransactionInput, Transactor, TransactorInput, amount_fits,
};
use crate::store::{StoreError, StoreResult, Stores};

/// Builds, loads, updates and deletes whole budget aggregates.
#[derive(Debug, Clone)]
pub struct AggregateService {
    stores: Stores,
}

impl AggregateService {
    /// Creates a service over the given stores.
    #[must_use]
    pub const fn new(stores: Stores) -> Self {
        Self { stores }
    }

    /// Persists a budget and all of its children, then returns the aggregate
    /// as read back from the stores.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::InvalidAmount` if a transaction amount cannot be
    /// stored exactly, `BudgetError::Store` if the budget row itself cannot be
    /// saved (nothing has been written yet in either case), or
    /// `BudgetError::Cascade` if a child write fails. Rows written before the
    /// failure stay written.
    pub async fn create_aggregate(
        &self,
        input: BudgetInput,
    ) -> Result<BudgetAggregate, BudgetError> {
        check_amounts(&input)?;
        let budget = self
            .stores
            .budgets
            .create(NewBudget {
                name: input.name.clone(),
            })
            .await?;
        info!(budget_id = %budget.id, name = %budget.name, "budget saved");

        self.save_children(budget.id, &input).await?;
        self.get_aggregate(budget.id).await
    }

    /// Loads a budget with its categories, transactors and transactions.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::NotFound` if the budget row does not exist.
    pub async fn get_aggregate(
        &self,
        budget_id: BudgetId,
    ) -> Result<BudgetAggregate, BudgetError> {
        let budget = self
            .stores
            .budgets
            .find_by_id(budget_id)
            .await?
            .ok_or(BudgetError::NotFound(budget_id))?;

        let (categories, transactors, transactions) = tokio::try_join!(
            self.stores.categories.find_by_budget(budget_id),
            self.stores.transactors.find_by_budget(budget_id),
            self.stores.transactions.find_by_budget(budget_id),
        )?;
        debug!(
            %budget_id,
            categories = categories.len(),
            transactors = transactors.len(),
            transactions = transactions.len(),
            "aggregate loaded"
        );

        Ok(BudgetAggregate {
            budget,
            categories,
            transactors,
            transactions,
        })
    }

    /// Applies a patch to an existing budget and re-runs the child cascade.
    ///
    /// Children with an id update that row, children without one are
    /// inserted. Existing children missing from the patch are left in place.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::NotFound` if the budget does not exist,
    /// `BudgetError::InvalidAmount` before any write if a transaction amount
    /// cannot be stored exactly, or `BudgetError::Cascade` if a write fails
    /// part way.
    pub async fn update_aggregate(
        &self,
        budget_id: BudgetId,
        patch: BudgetInput,
    ) -> Result<BudgetAggregate, BudgetError> {
        check_amounts(&patch)?;
        let mut budget = self
            .stores
            .budgets
            .find_by_id(budget_id)
            .await?
            .ok_or(BudgetError::NotFound(budget_id))?;

        budget.name.clone_from(&patch.name);
        let budget = self
            .stores
            .budgets
            .update(budget)
            .await
            .map_err(|source| BudgetError::cascade(budget_id, CascadeStage::Budget, source))?;
        info!(budget_id = %budget.id, name = %budget.name, "budget updated");

        self.save_children(budget.id, &patch).await?;
        self.get_aggregate(budget.id).await
    }

    /// Deletes a budget and everything it owns.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::NotFound` if the budget does not exist, or
    /// `BudgetError::Cascade` naming the step that failed. Earlier steps are
    /// not undone.
    pub async fn delete_aggregate(&self, budget_id: BudgetId) -> Result<(), BudgetError> {
        if self.stores.budgets.find_by_id(budget_id).await?.is_none() {
            return Err(BudgetError::NotFound(budget_id));
        }

        let transactions = self
            .stores
            .transactions
            .delete_by_budget(budget_id)
            .await
            .map_err(|source| {
                BudgetError::cascade(budget_id, CascadeStage::Transactions, source)
            })?;
        let transactors = self
            .stores
            .transactors
            .delete_by_budget(budget_id)
            .await
            .map_err(|source| {
                BudgetError::cascade(budget_id, CascadeStage::Transactors, source)
            })?;
        let categories = self
            .stores
            .categories
            .delete_by_budget(budget_id)
            .await
            .map_err(|source| {
                BudgetError::cascade(budget_id, CascadeStage::Categories, source)
            })?;
        self.stores
            .budgets
            .delete_by_id(budget_id)
            .await
            .map_err(|source| BudgetError::cascade(budget_id, CascadeStage::Budget, source))?;

        info!(
            %budget_id,
            transactions, transactors, categories, "budget deleted"
        );
        Ok(())
    }

    /// Saves the three child groups concurrently; fails on the first error.
    async fn save_children(
        &self,
        budget_id: BudgetId,
        input: &BudgetInput,
    ) -> Result<(), BudgetError> {
        let categories = async {
            try_join_all(
                input
                    .categories
                    .iter()
                    .map(|c| self.save_category(budget_id, c)),
            )
            .await
            .map_err(|source| BudgetError::cascade(budget_id, CascadeStage::Categories, source))
        };
        let transactors = async {
            try_join_all(
                input
                    .transactors
                    .iter()
                    .map(|t| self.save_transactor(budget_id, t)),
            )
            .await
            .map_err(|source| BudgetError::cascade(budget_id, CascadeStage::Transactors, source))
        };
        let transactions = async {
            try_join_all(
                input
                    .transactions
                    .iter()
                    .map(|t| self.save_transaction(budget_id, t)),
            )
            .await
            .map_err(|source| BudgetError::cascade(budget_id, CascadeStage::Transactions, source))
        };

        let (categories, transactors, transactions) =
            tokio::try_join!(categories, transactors, transactions)?;
        debug!(
            %budget_id,
            categories = categories.len(),
            transactors = transactors.len(),
            transactions = transactions.len(),
            "children saved"
        );
        Ok(())
    }

    async fn save_category(
        &self,
        budget_id: BudgetId,
        input: &CategoryInput,
    ) -> StoreResult<Category> {
        let Some(id) = input.id else {
            return self
                .stores
                .categories
                .create(convert::new_category(budget_id, input))
                .await;
        };
        match self.stores.categories.find_by_id(id).await? {
            Some(existing) if existing.budget_id == budget_id => {
                self.stores
                    .categories
                    .update(convert::category_row(id, budget_id, input))
                    .await
            }
            _ => Err(StoreError::not_found("category", id.into_inner())),
        }
    }

    async fn save_transactor(
        &self,
        budget_id: BudgetId,
        input: &TransactorInput,
    ) -> StoreResult<Transactor> {
        let Some(id) = input.id else {
            return self
                .stores
                .transactors
                .create(convert::new_transactor(budget_id, input))
                .await;
        };
        match self.stores.transactors.find_by_id(id).await? {
            Some(existing) if existing.budget_id == budget_id => {
                self.stores
                    .transactors
                    .update(convert::transactor_row(id, budget_id, input))
                    .await
            }
            _ => Err(StoreError::not_found("transactor", id.into_inner())),
        }
    }

    async fn save_transaction(
        &self,
        budget_id: BudgetId,
        input: &TransactionInput,
    ) -> StoreResult<Transaction> {
        let Some(id) = input.id else {
            return self
                .stores
                .transactions
                .create(convert::new_transaction(budget_id, input))
                .await;
        };
        match self.stores.transactions.find_by_id(id).await? {
            Some(existing) if existing.budget_id == budget_id => {
                self.stores
                    .transactions
                    .update(convert::transaction_row(id, budget_id, input))
                    .await
            }
            _ => Err(StoreError::not_found("transaction", id.into_inner())),
        }
    }
}

/// Rejects the whole payload if any amount would be rounded by the store.
fn check_amounts(input: &BudgetInput) -> Result<(), BudgetError> {
    match input.transactions.iter().find(|t| !amount_fits(t.amount)) {
        Some(t) => Err(BudgetError::InvalidAmount {
            description: t.description.clone(),
            amount: t.amount,
            scale: AMOUNT_SCALE,
        }),
        None => Ok(()),
    }
}
