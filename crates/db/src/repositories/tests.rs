//! Repository tests against a mock connection.

use chrono::NaiveDate;
use fambud_core::budget::{NewBudget, NewTransaction, Transaction, TransactionType};
use fambud_core::store::{BudgetStore, CategoryStore, StoreError, TransactionStore};
use fambud_shared::types::{BudgetId, CategoryId, TransactionId};
use rust_decimal_macros::dec;
use sea_orm::{DatabaseBackend, DbErr, MockDatabase, MockExecResult};

use super::{BudgetRepository, CategoryRepository, TransactionRepository};
use crate::entities::{budgets, categories, sea_orm_active_enums, transactions};

fn groceries_row() -> transactions::Model {
    transactions::Model {
        id: 7,
        budget_id: 1,
        category_id: Some(3),
        transactor_id: None,
        description: "TESCO STORES 2041".into(),
        amount: dec!(42.1700),
        date: NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(),
        transaction_type: sea_orm_active_enums::TransactionType::Expense,
    }
}

#[tokio::test]
async fn test_budget_create_returns_assigned_id() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![budgets::Model {
            id: 1,
            name: "Household".into(),
        }]])
        .into_connection();

    let budget = BudgetRepository::new(db)
        .create(NewBudget {
            name: "Household".into(),
        })
        .await
        .unwrap();

    assert_eq!(budget.id, BudgetId::new(1));
    assert_eq!(budget.name, "Household");
}

#[tokio::test]
async fn test_budget_find_missing_is_none() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<budgets::Model>::new()])
        .into_connection();

    let found = BudgetRepository::new(db).find_by_id(BudgetId::new(9)).await.unwrap();
    assert!(found.is_none());
}

#[tokio::test]
async fn test_update_of_missing_row_is_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<categories::Model>::new()])
        .into_connection();

    let err = CategoryRepository::new(db)
        .update(fambud_core::budget::Category {
            id: CategoryId::new(5),
            budget_id: BudgetId::new(1),
            name: "Fuel".into(),
        })
        .await
        .unwrap_err();

    assert_eq!(err, StoreError::not_found("category", 5));
}

#[tokio::test]
async fn test_delete_reports_whether_a_row_went() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([
            MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            },
            MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            },
        ])
        .into_connection();
    let repo = CategoryRepository::new(db);

    assert!(repo.delete_by_id(CategoryId::new(5)).await.unwrap());
    assert!(!repo.delete_by_id(CategoryId::new(5)).await.unwrap());
}

#[tokio::test]
async fn test_delete_by_budget_counts_rows() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 4,
        }])
        .into_connection();

    let removed = TransactionRepository::new(db)
        .delete_by_budget(BudgetId::new(1))
        .await
        .unwrap();
    assert_eq!(removed, 4);
}

#[tokio::test]
async fn test_transaction_row_maps_to_domain() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![groceries_row()]])
        .into_connection();

    let found = TransactionRepository::new(db)
        .find_by_budget(BudgetId::new(1))
        .await
        .unwrap();

    assert_eq!(
        found,
        vec![Transaction {
            id: TransactionId::new(7),
            budget_id: BudgetId::new(1),
            category_id: Some(CategoryId::new(3)),
            transactor_id: None,
            description: "TESCO STORES 2041".into(),
            amount: dec!(42.17),
            date: NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(),
            transaction_type: TransactionType::Expense,
        }]
    );
}

#[tokio::test]
async fn test_transaction_create_keeps_exact_amount() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![groceries_row()]])
        .into_connection();

    let saved = TransactionRepository::new(db)
        .create(NewTransaction {
            budget_id: BudgetId::new(1),
            category_id: Some(CategoryId::new(3)),
            transactor_id: None,
            description: "TESCO STORES 2041".into(),
            amount: dec!(42.17),
            date: NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(),
            transaction_type: TransactionType::Expense,
        })
        .await
        .unwrap();

    assert_eq!(saved.id, TransactionId::new(7));
    assert_eq!(saved.amount, dec!(42.17));
}

#[tokio::test]
async fn test_backend_failure_is_reported() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_errors([DbErr::Custom("connection reset".into())])
        .into_connection();

    let err = TransactionRepository::new(db)
        .find_by_budget_between(
            BudgetId::new(1),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, StoreError::Backend(msg) if msg.contains("connection reset")));
}
