//! Transaction CRUD.

use fambud_shared::types::{BudgetId, TransactionId};
use tracing::info;

use super::error::TransactionError;
use crate::budget::convert;
use crate::budget::types::{Transaction, TransactionInput, amount_fits};
use crate::store::Stores;

/// Creates, reads, updates and deletes individual transactions.
#[derive(Debug, Clone)]
pub struct TransactionService {
    stores: Stores,
}

impl TransactionService {
    /// Creates a service over the given stores.
    #[must_use]
    pub const fn new(stores: Stores) -> Self {
        Self { stores }
    }

    /// Adds a transaction to an existing budget. Any `id` on the input is
    /// ignored.
    ///
    /// # Errors
    ///
    /// Returns `TransactionError::InvalidAmount` if the amount cannot be
    /// stored exactly, or `TransactionError::BudgetNotFound` if the budget
    /// does not exist.
    pub async fn create(
        &self,
        budget_id: BudgetId,
        input: TransactionInput,
    ) -> Result<Transaction, TransactionError> {
        check_amount(&input)?;
        if self.stores.budgets.find_by_id(budget_id).await?.is_none() {
            return Err(TransactionError::BudgetNotFound(budget_id));
        }
        let transaction = self
            .stores
            .transactions
            .create(convert::new_transaction(budget_id, &input))
            .await?;
        info!(
            transaction_id = %transaction.id,
            %budget_id,
            amount = %transaction.amount,
            "transaction created"
        );
        Ok(transaction)
    }

    /// Loads one transaction.
    ///
    /// # Errors
    ///
    /// Returns `TransactionError::NotFound` if the id is unknown.
    pub async fn get(&self, id: TransactionId) -> Result<Transaction, TransactionError> {
        self.stores
            .transactions
            .find_by_id(id)
            .await?
            .ok_or(TransactionError::NotFound(id))
    }

    /// Lists the transactions of a budget, ascending id.
    ///
    /// # Errors
    ///
    /// Returns `TransactionError::Store` on store failure.
    pub async fn list_for_budget(
        &self,
        budget_id: BudgetId,
    ) -> Result<Vec<Transaction>, TransactionError> {
        Ok(self.stores.transactions.find_by_budget(budget_id).await?)
    }

    /// Overwrites the scalar fields of a transaction. Id and owner are kept.
    ///
    /// # Errors
    ///
    /// Returns `TransactionError::InvalidAmount` if the amount cannot be
    /// stored exactly, or `TransactionError::NotFound` if the id is unknown.
    pub async fn update(
        &self,
        id: TransactionId,
        input: TransactionInput,
    ) -> Result<Transaction, TransactionError> {
        check_amount(&input)?;
        let mut transaction = self.get(id).await?;
        convert::apply_transaction_input(&mut transaction, &input);
        let transaction = self.stores.transactions.update(transaction).await?;
        info!(transaction_id = %id, "transaction updated");
        Ok(transaction)
    }

    /// Deletes a transaction.
    ///
    /// # Errors
    ///
    /// Returns `TransactionError::NotFound` if the id is unknown.
    pub async fn delete(&self, id: TransactionId) -> Result<(), TransactionError> {
        if !self.stores.transactions.delete_by_id(id).await? {
            return Err(TransactionError::NotFound(id));
        }
        info!(transaction_id = %id, "transaction deleted");
        Ok(())
    }
}

fn check_amount(input: &TransactionInput) -> Result<(), TransactionError> {
    if amount_fits(input.amount) {
        Ok(())
    } else {
        Err(TransactionError::InvalidAmount(input.amount))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::budget::types::{NewBudget, TransactionType};
    use chrono::NaiveDate;
    use fambud_shared::types::CategoryId;
    use rust_decimal_macros::dec;

    async fn setup() -> (TransactionService, BudgetId) {
        let stores = Stores::in_memory();
        let budget = stores
            .budgets
            .create(NewBudget {
                name: "Household".into(),
            })
            .await
            .unwrap();
        (TransactionService::new(stores), budget.id)
    }

    fn input(description: &str) -> TransactionInput {
        TransactionInput {
            id: None,
            description: description.to_string(),
            amount: dec!(12.34),
            date: NaiveDate::from_ymd_opt(2024, 2, 29).unwrap(),
            transaction_type: TransactionType::Expense,
            category_id: None,
            transactor_id: None,
        }
    }

    #[tokio::test]
    async fn test_create_keeps_exact_amount() {
        let (service, budget_id) = setup().await;
        let created = service.create(budget_id, input("CAFE")).await.unwrap();

        let loaded = service.get(created.id).await.unwrap();
        assert_eq!(loaded.amount, dec!(12.34));
        assert_eq!(loaded.budget_id, budget_id);
    }

    #[tokio::test]
    async fn test_create_ignores_input_id() {
        let (service, budget_id) = setup().await;
        let mut with_id = input("CAFE");
        with_id.id = Some(TransactionId::new(500));

        let created = service.create(budget_id, with_id).await.unwrap();
        assert_ne!(created.id, TransactionId::new(500));
    }

    #[tokio::test]
    async fn test_create_for_missing_budget() {
        let (service, _) = setup().await;
        let err = service
            .create(BudgetId::new(2), input("CAFE"))
            .await
            .unwrap_err();
        assert!(matches!(err, TransactionError::BudgetNotFound(_)));
    }

    #[tokio::test]
    async fn test_update_copies_fields() {
        let (service, budget_id) = setup().await;
        let created = service.create(budget_id, input("CAFE")).await.unwrap();

        let mut patch = input("CAFE NERO");
        patch.amount = dec!(3.10);
        patch.transaction_type = TransactionType::Income;
        patch.category_id = Some(CategoryId::new(7));
        let updated = service.update(created.id, patch).await.unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.budget_id, budget_id);
        assert_eq!(updated.description, "CAFE NERO");
        assert_eq!(updated.amount, dec!(3.10));
        assert_eq!(updated.transaction_type, TransactionType::Income);
        assert_eq!(updated.category_id, Some(CategoryId::new(7)));
    }

    #[tokio::test]
    async fn test_missing_transaction_is_not_found() {
        let (service, _) = setup().await;
        let missing = TransactionId::new(8);

        assert!(matches!(service.get(missing).await, Err(TransactionError::NotFound(_))));
        assert!(matches!(
            service.update(missing, input("x")).await,
            Err(TransactionError::NotFound(_))
        ));
        assert!(matches!(service.delete(missing).await, Err(TransactionError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_then_list() {
        let (service, budget_id) = setup().await;
        let keep = service.create(budget_id, input("KEEP")).await.unwrap();
        let drop = service.create(budget_id, input("DROP")).await.unwrap();

        service.delete(drop.id).await.unwrap();
        assert_eq!(service.list_for_budget(budget_id).await.unwrap(), vec![keep]);
    }

    #[tokio::test]
    async fn test_amount_beyond_stored_scale_is_rejected() {
        let (service, budget_id) = setup().await;
        let mut fee = input("FX FEE");
        fee.amount = dec!(0.123456);

        let err = service.create(budget_id, fee.clone()).await.unwrap_err();
        assert!(matches!(err, TransactionError::InvalidAmount(a) if a == dec!(0.123456)));
        assert!(service.list_for_budget(budget_id).await.unwrap().is_empty());

        let created = service.create(budget_id, input("FX FEE")).await.unwrap();
        let err = service.update(created.id, fee).await.unwrap_err();
        assert!(matches!(err, TransactionError::InvalidAmount(_)));
        assert_eq!(service.get(created.id).await.unwrap().amount, dec!(12.34));
    }
}
