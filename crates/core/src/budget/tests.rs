//! Aggregate orchestration tests.

use std::sync::Arc;

use chrono::NaiveDate;
use fambud_shared::{
    AppError,
    types::{BudgetId, CategoryId, TransactionId},
};
use mockall::Sequence;
use rust_decimal_macros::dec;

use super::error::{BudgetError, CascadeStage};
use super::service::AggregateService;
use super::types::{
    Budget, BudgetInput, CategoryInput, TransactionInput, TransactionType, TransactorInput,
};
use crate::store::{
    MockBudgetStore, MockCategoryStore, MockTransactionStore, MockTransactorStore, StoreError,
    Stores,
};

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
}

fn txn(description: &str, amount: rust_decimal::Decimal, day: u32) -> TransactionInput {
    TransactionInput {
        id: None,
        description: description.to_string(),
        amount,
        date: date(day),
        transaction_type: TransactionType::Expense,
        category_id: None,
        transactor_id: None,
    }
}

fn household() -> BudgetInput {
    BudgetInput {
        name: "Household".to_string(),
        categories: vec![
            CategoryInput {
                id: None,
                name: "Groceries".to_string(),
            },
            CategoryInput {
                id: None,
                name: "Fuel".to_string(),
            },
        ],
        transactors: vec![TransactorInput {
            id: None,
            first_name: "Sam".to_string(),
            last_name: "Taylor".to_string(),
            email: Some("sam@example.com".to_string()),
        }],
        transactions: vec![
            txn("TESCO STORES 2041", dec!(42.17), 2),
            txn("SHELL 0193", dec!(60.00), 5),
        ],
    }
}

fn service() -> AggregateService {
    AggregateService::new(Stores::in_memory())
}

// ============================================================================
// Create / get
// ============================================================================

#[tokio::test]
async fn test_create_then_get_round_trips() {
    let service = service();
    let created = service.create_aggregate(household()).await.unwrap();
    let loaded = service.get_aggregate(created.id()).await.unwrap();

    assert_eq!(created, loaded);
    assert_eq!(loaded.budget.name, "Household");
    assert_eq!(loaded.categories.len(), 2);
    assert_eq!(loaded.transactors.len(), 1);
    assert_eq!(loaded.transactions.len(), 2);
    assert_eq!(loaded.transactions[0].amount, dec!(42.17));
}

#[tokio::test]
async fn test_children_are_stamped_with_budget_id() {
    let service = service();
    let aggregate = service.create_aggregate(household()).await.unwrap();
    let id = aggregate.id();

    assert!(aggregate.categories.iter().all(|c| c.budget_id == id));
    assert!(aggregate.transactors.iter().all(|t| t.budget_id == id));
    assert!(aggregate.transactions.iter().all(|t| t.budget_id == id));
}

#[tokio::test]
async fn test_create_with_no_children() {
    let service = service();
    let aggregate = service
        .create_aggregate(BudgetInput {
            name: "Empty".to_string(),
            ..BudgetInput::default()
        })
        .await
        .unwrap();

    assert!(aggregate.categories.is_empty());
    assert!(aggregate.transactors.is_empty());
    assert!(aggregate.transactions.is_empty());
}

#[tokio::test]
async fn test_get_missing_budget_is_not_found() {
    let err = service().get_aggregate(BudgetId::new(404)).await.unwrap_err();
    assert!(matches!(err, BudgetError::NotFound(id) if id == BudgetId::new(404)));
}

#[tokio::test]
async fn test_aggregates_do_not_share_children() {
    let service = service();
    let first = service.create_aggregate(household()).await.unwrap();
    let second = service
        .create_aggregate(BudgetInput {
            name: "Holiday".to_string(),
            transactions: vec![txn("FERRY", dec!(120.00), 9)],
            ..BudgetInput::default()
        })
        .await
        .unwrap();

    assert_ne!(first.id(), second.id());
    assert_eq!(service.get_aggregate(first.id()).await.unwrap().transactions.len(), 2);
    assert_eq!(service.get_aggregate(second.id()).await.unwrap().transactions.len(), 1);
}

// ============================================================================
// Update
// ============================================================================

#[tokio::test]
async fn test_update_renames_updates_and_inserts() {
    let service = service();
    let created = service.create_aggregate(household()).await.unwrap();
    let groceries = created.categories[0].id;
    let first_txn = created.transactions[0].id;

    let patch = BudgetInput {
        name: "Household 2024".to_string(),
        categories: vec![
            CategoryInput {
                id: Some(groceries),
                name: "Food".to_string(),
            },
            CategoryInput {
                id: None,
                name: "Utilities".to_string(),
            },
        ],
        transactors: vec![],
        transactions: vec![TransactionInput {
            id: Some(first_txn),
            category_id: Some(groceries),
            ..txn("TESCO STORES 2041", dec!(42.17), 2)
        }],
    };
    let updated = service.update_aggregate(created.id(), patch).await.unwrap();

    assert_eq!(updated.budget.name, "Household 2024");
    let names: Vec<_> = updated.categories.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Food", "Fuel", "Utilities"]);
    assert_eq!(updated.transactions[0].category_id, Some(groceries));
}

#[tokio::test]
async fn test_update_leaves_omitted_children_in_place() {
    let service = service();
    let created = service.create_aggregate(household()).await.unwrap();

    let updated = service
        .update_aggregate(
            created.id(),
            BudgetInput {
                name: "Renamed".to_string(),
                ..BudgetInput::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.categories, created.categories);
    assert_eq!(updated.transactors, created.transactors);
    assert_eq!(updated.transactions, created.transactions);
}

#[tokio::test]
async fn test_update_cannot_move_another_budgets_child() {
    let service = service();
    let mine = service.create_aggregate(household()).await.unwrap();
    let theirs = service.create_aggregate(household()).await.unwrap();
    let foreign = theirs.categories[0].id;

    let err = service
        .update_aggregate(
            mine.id(),
            BudgetInput {
                name: "Household".to_string(),
                categories: vec![CategoryInput {
                    id: Some(foreign),
                    name: "Stolen".to_string(),
                }],
                ..BudgetInput::default()
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        BudgetError::Cascade {
            stage: CascadeStage::Categories,
            ..
        }
    ));
    let theirs_now = service.get_aggregate(theirs.id()).await.unwrap();
    assert_eq!(theirs_now.categories, theirs.categories);
}

#[tokio::test]
async fn test_update_with_unknown_child_id_fails() {
    let service = service();
    let created = service.create_aggregate(household()).await.unwrap();

    let err = service
        .update_aggregate(
            created.id(),
            BudgetInput {
                name: "Household".to_string(),
                transactions: vec![TransactionInput {
                    id: Some(TransactionId::new(9_999)),
                    ..txn("GHOST", dec!(1.00), 1)
                }],
                ..BudgetInput::default()
            },
        )
        .await
        .unwrap_err();

    match err {
        BudgetError::Cascade { stage, source, .. } => {
            assert_eq!(stage, CascadeStage::Transactions);
            assert!(source.is_not_found());
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_update_missing_budget_is_not_found() {
    let err = service()
        .update_aggregate(BudgetId::new(77), household())
        .await
        .unwrap_err();
    assert!(matches!(err, BudgetError::NotFound(_)));
}

#[tokio::test]
async fn test_update_with_unstorable_amount_changes_nothing() {
    let service = service();
    let created = service.create_aggregate(household()).await.unwrap();

    let patch = BudgetInput {
        name: "Renamed".to_string(),
        categories: vec![],
        transactors: vec![],
        transactions: vec![txn("FX FEE", dec!(0.123456), 6)],
    };
    let err = service.update_aggregate(created.id(), patch).await.unwrap_err();

    assert!(matches!(err, BudgetError::InvalidAmount { .. }));
    assert_eq!(service.get_aggregate(created.id()).await.unwrap(), created);
}

// ============================================================================
// Delete
// ============================================================================

#[tokio::test]
async fn test_delete_removes_every_child() {
    let stores = Stores::in_memory();
    let service = AggregateService::new(stores.clone());
    let doomed = service.create_aggregate(household()).await.unwrap();
    let kept = service.create_aggregate(household()).await.unwrap();

    service.delete_aggregate(doomed.id()).await.unwrap();

    assert!(matches!(
        service.get_aggregate(doomed.id()).await,
        Err(BudgetError::NotFound(id)) if id == doomed.id()
    ));
    assert!(stores.budgets.find_by_id(doomed.id()).await.unwrap().is_none());
    assert!(stores.categories.find_by_budget(doomed.id()).await.unwrap().is_empty());
    assert!(stores.transactors.find_by_budget(doomed.id()).await.unwrap().is_empty());
    assert!(stores.transactions.find_by_budget(doomed.id()).await.unwrap().is_empty());
    assert_eq!(service.get_aggregate(kept.id()).await.unwrap(), kept);
}

#[tokio::test]
async fn test_delete_missing_budget_is_not_found() {
    let err = service().delete_aggregate(BudgetId::new(3)).await.unwrap_err();
    assert!(matches!(err, BudgetError::NotFound(_)));
}

#[tokio::test]
async fn test_delete_runs_children_before_budget() {
    let budget_id = BudgetId::new(1);
    let mut seq = Sequence::new();

    let mut budgets = MockBudgetStore::new();
    let mut categories = MockCategoryStore::new();
    let mut transactors = MockTransactorStore::new();
    let mut transactions = MockTransactionStore::new();

    budgets.expect_find_by_id().times(1).returning(|id| {
        Ok(Some(Budget {
            id,
            name: "Household".to_string(),
        }))
    });
    transactions
        .expect_delete_by_budget()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(4));
    transactors
        .expect_delete_by_budget()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(1));
    categories
        .expect_delete_by_budget()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(2));
    budgets
        .expect_delete_by_id()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(true));

    let service = AggregateService::new(Stores {
        budgets: Arc::new(budgets),
        categories: Arc::new(categories),
        transactors: Arc::new(transactors),
        transactions: Arc::new(transactions),
    });

    service.delete_aggregate(budget_id).await.unwrap();
}

#[tokio::test]
async fn test_delete_stops_at_first_failure() {
    let mut budgets = MockBudgetStore::new();
    let mut transactions = MockTransactionStore::new();
    let mut transactors = MockTransactorStore::new();

    budgets.expect_find_by_id().returning(|id| {
        Ok(Some(Budget {
            id,
            name: "Household".to_string(),
        }))
    });
    budgets.expect_delete_by_id().never();
    transactions
        .expect_delete_by_budget()
        .times(1)
        .returning(|_| Ok(3));
    transactors
        .expect_delete_by_budget()
        .times(1)
        .returning(|_| Err(StoreError::backend("connection reset")));

    let service = AggregateService::new(Stores {
        budgets: Arc::new(budgets),
        categories: Arc::new(MockCategoryStore::new()),
        transactors: Arc::new(transactors),
        transactions: Arc::new(transactions),
    });

    let err = service.delete_aggregate(BudgetId::new(8)).await.unwrap_err();
    assert!(matches!(
        err,
        BudgetError::Cascade {
            stage: CascadeStage::Transactors,
            ..
        }
    ));
    assert!(matches!(AppError::from(err), AppError::PartialWrite(_)));
}

#[tokio::test]
async fn test_child_failure_surfaces_as_partial_write() {
    let mut budgets = MockBudgetStore::new();
    let mut categories = MockCategoryStore::new();
    let mut transactors = MockTransactorStore::new();
    let mut transactions = MockTransactionStore::new();

    budgets.expect_create().times(1).returning(|new| {
        Ok(Budget {
            id: BudgetId::new(10),
            name: new.name,
        })
    });
    categories.expect_create().returning(|new| {
        Ok(super::types::Category {
            id: CategoryId::new(1),
            budget_id: new.budget_id,
            name: new.name,
        })
    });
    transactors.expect_create().returning(|new| {
        Ok(super::types::Transactor {
            id: fambud_shared::types::TransactorId::new(1),
            budget_id: new.budget_id,
            first_name: new.first_name,
            last_name: new.last_name,
            email: new.email,
        })
    });
    transactions
        .expect_create()
        .returning(|_| Err(StoreError::backend("disk full")));

    let service = AggregateService::new(Stores {
        budgets: Arc::new(budgets),
        categories: Arc::new(categories),
        transactors: Arc::new(transactors),
        transactions: Arc::new(transactions),
    });

    let err = service.create_aggregate(household()).await.unwrap_err();
    match &err {
        BudgetError::Cascade {
            budget_id, stage, ..
        } => {
            assert_eq!(*budget_id, BudgetId::new(10));
            assert_eq!(*stage, CascadeStage::Transactions);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(AppError::from(err).may_have_partial_state());
}

#[tokio::test]
async fn test_budget_insert_failure_writes_nothing() {
    let mut budgets = MockBudgetStore::new();
    budgets
        .expect_create()
        .returning(|_| Err(StoreError::backend("pool exhausted")));

    let service = AggregateService::new(Stores {
        budgets: Arc::new(budgets),
        categories: Arc::new(MockCategoryStore::new()),
        transactors: Arc::new(MockTransactorStore::new()),
        transactions: Arc::new(MockTransactionStore::new()),
    });

    let err = service.create_aggregate(household()).await.unwrap_err();
    assert!(matches!(err, BudgetError::Store(_)));
}

#[tokio::test]
async fn test_unstorable_amount_is_rejected_before_any_write() {
    let service = AggregateService::new(Stores {
        budgets: Arc::new(MockBudgetStore::new()),
        categories: Arc::new(MockCategoryStore::new()),
        transactors: Arc::new(MockTransactorStore::new()),
        transactions: Arc::new(MockTransactionStore::new()),
    });
    let mut input = household();
    input.transactions.push(txn("FX FEE", dec!(0.123456), 6));

    let err = service.create_aggregate(input).await.unwrap_err();
    match &err {
        BudgetError::InvalidAmount {
            description,
            amount,
            scale,
        } => {
            assert_eq!(description, "FX FEE");
            assert_eq!(*amount, dec!(0.123456));
            assert_eq!(*scale, 4);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(matches!(AppError::from(err), AppError::Validation(_)));
}
