//! Period aggregation.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::{Datelike, Months, NaiveDate};
use fambud_shared::types::{BudgetId, CategoryId};
use futures::future::try_join_all;
use rust_decimal::Decimal;
use tracing::{debug, warn};

use super::error::SummaryError;
use super::types::{CategorySummary, MonthlyPeriod, PeriodSummary, TransactionSummary};
use crate::budget::types::{Transaction, TransactionType};
use crate::store::Stores;

/// Sums the categorised transactions of one type by category id.
///
/// Transactions without a category are ignored. Addition is exact.
#[must_use]
pub fn summarise(
    transactions: &[Transaction],
    transaction_type: TransactionType,
) -> BTreeMap<CategoryId, Decimal> {
    let mut sums = BTreeMap::new();
    for transaction in transactions {
        if transaction.transaction_type != transaction_type {
            continue;
        }
        let Some(category_id) = transaction.category_id else {
            continue;
        };
        *sums.entry(category_id).or_insert(Decimal::ZERO) += transaction.amount;
    }
    sums
}

/// Splits `[start, end]` into calendar-month windows clipped to the range.
///
/// Returns nothing when `start > end`.
#[must_use]
pub fn month_windows(start: NaiveDate, end: NaiveDate) -> Vec<(NaiveDate, NaiveDate)> {
    let mut windows = Vec::new();
    let mut cursor = start;
    while cursor <= end {
        let window_end = last_day_of_month(cursor).min(end);
        windows.push((cursor, window_end));
        match window_end.succ_opt() {
            Some(next) => cursor = next,
            None => break,
        }
    }
    windows
}

fn last_day_of_month(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1)
        .and_then(|first| first.checked_add_months(Months::new(1)))
        .and_then(|next| next.pred_opt())
        .unwrap_or(NaiveDate::MAX)
}

/// Builds period summaries from the transaction and category stores.
#[derive(Debug, Clone)]
pub struct SummaryService {
    stores: Stores,
}

impl SummaryService {
    /// Creates a service over the given stores.
    #[must_use]
    pub const fn new(stores: Stores) -> Self {
        Self { stores }
    }

    /// Expense and income totals by category over `[start, end]`.
    ///
    /// An inverted range yields an empty summary. Category ids that no
    /// longer resolve to a category of this budget are dropped, amount
    /// included, and logged.
    ///
    /// # Errors
    ///
    /// Returns `SummaryError::BudgetNotFound` for an unknown budget.
    pub async fn period_summary(
        &self,
        budget_id: BudgetId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PeriodSummary, SummaryError> {
        self.ensure_budget(budget_id).await?;
        if start > end {
            return Ok(PeriodSummary::empty(start, end));
        }

        let transactions = self
            .stores
            .transactions
            .find_by_budget_between(budget_id, start, end)
            .await?;
        let names = self.category_names(budget_id, &transactions).await?;
        Ok(build_summary(start, end, &transactions, &names))
    }

    /// Month-by-month summaries over `[start, end]`.
    ///
    /// The first and last months are clipped to the range.
    ///
    /// # Errors
    ///
    /// Returns `SummaryError::BudgetNotFound` for an unknown budget.
    pub async fn monthly_breakdown(
        &self,
        budget_id: BudgetId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<TransactionSummary, SummaryError> {
        self.ensure_budget(budget_id).await?;
        let windows = month_windows(start, end);
        if windows.is_empty() {
            return Ok(TransactionSummary::default());
        }

        let transactions = self
            .stores
            .transactions
            .find_by_budget_between(budget_id, start, end)
            .await?;
        let names = self.category_names(budget_id, &transactions).await?;

        let periods = windows
            .into_iter()
            .map(|(window_start, window_end)| {
                let in_window: Vec<Transaction> = transactions
                    .iter()
                    .filter(|t| t.date >= window_start && t.date <= window_end)
                    .cloned()
                    .collect();
                MonthlyPeriod {
                    period: window_start.format("%Y-%m").to_string(),
                    start: window_start,
                    end: window_end,
                    summary: build_summary(window_start, window_end, &in_window, &names),
                }
            })
            .collect();

        Ok(TransactionSummary { periods })
    }

    async fn ensure_budget(&self, budget_id: BudgetId) -> Result<(), SummaryError> {
        match self.stores.budgets.find_by_id(budget_id).await? {
            Some(_) => Ok(()),
            None => Err(SummaryError::BudgetNotFound(budget_id)),
        }
    }

    /// Resolves each distinct category id once, concurrently.
    async fn category_names(
        &self,
        budget_id: BudgetId,
        transactions: &[Transaction],
    ) -> Result<HashMap<CategoryId, String>, SummaryError> {
        let ids: BTreeSet<CategoryId> = transactions.iter().filter_map(|t| t.category_id).collect();
        let found = try_join_all(
            ids.into_iter()
                .map(|id| self.stores.categories.find_by_id(id)),
        )
        .await?;

        Ok(found
            .into_iter()
            .flatten()
            .filter(|c| c.budget_id == budget_id)
            .map(|c| (c.id, c.name))
            .collect())
    }
}

fn build_summary(
    start: NaiveDate,
    end: NaiveDate,
    transactions: &[Transaction],
    names: &HashMap<CategoryId, String>,
) -> PeriodSummary {
    let section = |transaction_type: TransactionType| {
        summarise(transactions, transaction_type)
            .into_iter()
            .filter_map(|(category_id, amount)| match names.get(&category_id) {
                Some(name) => Some(CategorySummary {
                    category_id,
                    category_name: name.clone(),
                    amount,
                }),
                None => {
                    warn!(
                        %category_id,
                        %amount,
                        kind = %transaction_type,
                        "dropping total for unknown category"
                    );
                    None
                }
            })
            .collect::<Vec<_>>()
    };

    let summary = PeriodSummary::from_sections(
        start,
        end,
        section(TransactionType::Expense),
        section(TransactionType::Income),
    );
    debug!(
        %start,
        %end,
        total_expenses = %summary.total_expenses,
        total_income = %summary.total_income,
        "period summarised"
    );
    summary
}
