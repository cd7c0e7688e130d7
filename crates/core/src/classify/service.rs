//! Classification run over one budget.

use std::collections::HashMap;

use fambud_shared::types::{BudgetId, CategoryId};
use futures::{StreamExt, stream};
use serde::Serialize;
use tracing::{debug, error, info, trace, warn};

use super::error::ClassifyError;
use super::mapping::{MappingSource, MappingTable};
use crate::budget::types::{Category, Transaction};
use crate::store::Stores;

const DEFAULT_CONCURRENCY: usize = 8;

/// Counts from one classification run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ClassificationReport {
    /// Transactions looked at.
    pub examined: usize,
    /// Transactions saved with a new category.
    pub classified: usize,
    /// Transactions whose computed category was already set.
    pub unchanged: usize,
    /// Transactions matching no keyword.
    pub unmatched: usize,
    /// Transactions whose matched category name has no category in the budget.
    pub unresolved: usize,
    /// Saves that failed.
    pub failed: usize,
}

enum Decision {
    Unmatched,
    Unresolved,
    Unchanged,
    Assign(Transaction),
}

/// Assigns categories to the transactions of a budget.
#[derive(Debug, Clone)]
pub struct ClassifierService {
    stores: Stores,
    source: MappingSource,
    concurrency: usize,
}

impl ClassifierService {
    /// Creates a classifier reading its table from `source`.
    #[must_use]
    pub const fn new(stores: Stores, source: MappingSource) -> Self {
        Self {
            stores,
            source,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    /// Sets how many saves may be in flight at once.
    #[must_use]
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Classifies every transaction of a budget.
    ///
    /// The mapping table is loaded before any store is touched. Transactions
    /// that already carry a category are re-evaluated; the save is skipped
    /// when the computed category is the current one. A failed save is logged
    /// and counted, and the run carries on.
    ///
    /// # Errors
    ///
    /// Returns `ClassifyError::MappingUnavailable` or
    /// `ClassifyError::MalformedMapping` if the table cannot be loaded,
    /// `ClassifyError::BudgetNotFound` for an unknown budget, or
    /// `ClassifyError::Store` if categories or transactions cannot be read.
    pub async fn classify(
        &self,
        budget_id: BudgetId,
    ) -> Result<ClassificationReport, ClassifyError> {
        let table = self.source.load().await?;

        if self.stores.budgets.find_by_id(budget_id).await?.is_none() {
            return Err(ClassifyError::BudgetNotFound(budget_id));
        }
        let (categories, transactions) = tokio::try_join!(
            self.stores.categories.find_by_budget(budget_id),
            self.stores.transactions.find_by_budget(budget_id),
        )?;
        let by_name = category_lookup(&categories);

        let mut report = ClassificationReport {
            examined: transactions.len(),
            ..ClassificationReport::default()
        };
        let mut to_save = Vec::new();
        for transaction in transactions {
            match decide(&table, &by_name, transaction) {
                Decision::Unmatched => report.unmatched += 1,
                Decision::Unresolved => report.unresolved += 1,
                Decision::Unchanged => report.unchanged += 1,
                Decision::Assign(t) => to_save.push(t),
            }
        }

        let results: Vec<_> = stream::iter(to_save)
            .map(|transaction| async move {
                let id = transaction.id;
                self.stores
                    .transactions
                    .update(transaction)
                    .await
                    .map_err(|e| (id, e))
            })
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        for result in results {
            match result {
                Ok(saved) => {
                    trace!(
                        transaction_id = %saved.id,
                        category_id = ?saved.category_id,
                        "classified"
                    );
                    report.classified += 1;
                }
                Err((transaction_id, e)) => {
                    error!(%transaction_id, error = %e, "failed to save classification");
                    report.failed += 1;
                }
            }
        }

        info!(
            %budget_id,
            examined = report.examined,
            classified = report.classified,
            unchanged = report.unchanged,
            unmatched = report.unmatched,
            unresolved = report.unresolved,
            failed = report.failed,
            "classification finished"
        );
        Ok(report)
    }
}

/// Category name to id. With duplicate names the lowest id wins.
fn category_lookup(categories: &[Category]) -> HashMap<&str, CategoryId> {
    let mut by_name = HashMap::with_capacity(categories.len());
    for category in categories {
        by_name.entry(category.name.as_str()).or_insert(category.id);
    }
    by_name
}

fn decide(
    table: &MappingTable,
    by_name: &HashMap<&str, CategoryId>,
    mut transaction: Transaction,
) -> Decision {
    let Some(rule) = table.first_match(&transaction.description) else {
        return Decision::Unmatched;
    };
    let Some(&category_id) = by_name.get(rule.category_name.as_str()) else {
        debug!(
            transaction_id = %transaction.id,
            category = %rule.category_name,
            "matched category not in budget"
        );
        return Decision::Unresolved;
    };
    if transaction.category_id == Some(category_id) {
        return Decision::Unchanged;
    }
    transaction.category_id = Some(category_id);
    Decision::Assign(transaction)
}
