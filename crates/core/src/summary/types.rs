//! Summary output types.

use chrono::NaiveDate;
use fambud_shared::types::CategoryId;
use rust_decimal::Decimal;
use serde::Serialize;

/// Total for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySummary {
    /// Category ID.
    pub category_id: CategoryId,
    /// Category name at the time of the summary.
    pub category_name: String,
    /// Exact sum of the matching transaction amounts.
    pub amount: Decimal,
}

/// Expense and income totals over `[start_date, end_date]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodSummary {
    /// First day, inclusive.
    pub start_date: NaiveDate,
    /// Last day, inclusive.
    pub end_date: NaiveDate,
    /// Sum of all expense categories.
    pub total_expenses: Decimal,
    /// Sum of all income categories.
    pub total_income: Decimal,
    /// `total_income - total_expenses`.
    pub surplus: Decimal,
    /// Expense totals by category, ascending category id.
    pub expense_categories: Vec<CategorySummary>,
    /// Income totals by category, ascending category id.
    pub income_categories: Vec<CategorySummary>,
}

impl PeriodSummary {
    /// Builds a summary and derives its totals from the sections.
    #[must_use]
    pub fn from_sections(
        start_date: NaiveDate,
        end_date: NaiveDate,
        expense_categories: Vec<CategorySummary>,
        income_categories: Vec<CategorySummary>,
    ) -> Self {
        let total_expenses: Decimal = expense_categories.iter().map(|c| c.amount).sum();
        let total_income: Decimal = income_categories.iter().map(|c| c.amount).sum();
        Self {
            start_date,
            end_date,
            total_expenses,
            total_income,
            surplus: total_income - total_expenses,
            expense_categories,
            income_categories,
        }
    }

    /// Summary with no categories and zero totals.
    #[must_use]
    pub fn empty(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self::from_sections(start_date, end_date, Vec::new(), Vec::new())
    }
}

/// Summary of one calendar month, clipped to the requested range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyPeriod {
    /// Month label, `YYYY-MM`.
    pub period: String,
    /// First day covered.
    pub start: NaiveDate,
    /// Last day covered.
    pub end: NaiveDate,
    /// Totals for the window.
    pub summary: PeriodSummary,
}

/// Month-by-month breakdown of a date range.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TransactionSummary {
    /// One entry per calendar month touched by the range, in date order.
    pub periods: Vec<MonthlyPeriod>,
}
