//! Field-by-field conversions between caller inputs and store records.
//!
//! Every conversion that lands a row in a budget takes the budget id as an
//! argument, so a child can only ever be stamped with its owner's id.

use fambud_shared::types::{BudgetId, CategoryId, TransactionId, TransactorId};

use super::types::{
    Category, CategoryInput, NewCategory, NewTransaction, NewTransactor, Transaction,
    TransactionInput, Transactor, TransactorInput,
};

/// Insert record for a category payload.
#[must_use]
pub fn new_category(budget_id: BudgetId, input: &CategoryInput) -> NewCategory {
    NewCategory {
        budget_id,
        name: input.name.clone(),
    }
}

/// Full row for a category payload targeting an existing id.
#[must_use]
pub fn category_row(id: CategoryId, budget_id: BudgetId, input: &CategoryInput) -> Category {
    Category {
        id,
        budget_id,
        name: input.name.clone(),
    }
}

/// Insert record for a transactor payload.
#[must_use]
pub fn new_transactor(budget_id: BudgetId, input: &TransactorInput) -> NewTransactor {
    NewTransactor {
        budget_id,
        first_name: input.first_name.clone(),
        last_name: input.last_name.clone(),
        email: input.email.clone(),
    }
}

/// Full row for a transactor payload targeting an existing id.
#[must_use]
pub fn transactor_row(
    id: TransactorId,
    budget_id: BudgetId,
    input: &TransactorInput,
) -> Transactor {
    Transactor {
        id,
        budget_id,
        first_name: input.first_name.clone(),
        last_name: input.last_name.clone(),
        email: input.email.clone(),
    }
}

/// Insert record for a transaction payload.
#[must_use]
pub fn new_transaction(budget_id: BudgetId, input: &TransactionInput) -> NewTransaction {
    NewTransaction {
        budget_id,
        category_id: input.category_id,
        transactor_id: input.transactor_id,
        description: input.description.clone(),
        amount: input.amount,
        date: input.date,
        transaction_type: input.transaction_type,
    }
}

/// Full row for a transaction payload targeting an existing id.
#[must_use]
pub fn transaction_row(
    id: TransactionId,
    budget_id: BudgetId,
    input: &TransactionInput,
) -> Transaction {
    Transaction {
        id,
        budget_id,
        category_id: input.category_id,
        transactor_id: input.transactor_id,
        description: input.description.clone(),
        amount: input.amount,
        date: input.date,
        transaction_type: input.transaction_type,
    }
}

/// Copies the scalar fields of a payload onto an existing transaction,
/// keeping its id and owner.
pub fn apply_transaction_input(target: &mut Transaction, input: &TransactionInput) {
    target.description.clone_from(&input.description);
    target.amount = input.amount;
    target.date = input.date;
    target.transaction_type = input.transaction_type;
    target.category_id = input.category_id;
    target.transactor_id = input.transactor_id;
}
