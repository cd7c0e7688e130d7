//! Budget aggregate data types.
//!
//! Persisted rows (`Budget`, `Category`, `Transactor`, `Transaction`) always
//! carry a server-assigned id. `New*` records are what a store receives on
//! insert; `*Input` records are what callers hand to the services.

use chrono::NaiveDate;
use fambud_shared::types::{BudgetId, CategoryId, TransactionId, TransactorId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Direction of a transaction. Orthogonal to the sign of the amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionType {
    /// Money leaving the household.
    Expense,
    /// Money entering the household.
    Income,
}

impl TransactionType {
    /// Stable upper-case name, as stored and serialized.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Expense => "EXPENSE",
            Self::Income => "INCOME",
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decimal places kept by the persistent amount column.
pub const AMOUNT_SCALE: u32 = 4;

/// Digits before the decimal point that the amount column can hold.
const AMOUNT_INTEGER_DIGITS: u32 = 15;

/// Whether `amount` can be persisted without rounding or overflow.
///
/// Trailing zeros do not count towards the scale, so `1.500000` fits.
#[must_use]
pub fn amount_fits(amount: Decimal) -> bool {
    let limit = Decimal::from(10_i64.pow(AMOUNT_INTEGER_DIGITS));
    amount.normalize().scale() <= AMOUNT_SCALE && amount.abs() < limit
}

/// A budget header row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budget {
    /// Budget ID.
    pub id: BudgetId,
    /// Budget name.
    pub name: String,
}

/// A spending or income category owned by a budget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Category ID.
    pub id: CategoryId,
    /// Owning budget.
    pub budget_id: BudgetId,
    /// Display name, also the target of mapping table entries.
    pub name: String,
}

/// A person or party moving money within a budget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transactor {
    /// Transactor ID.
    pub id: TransactorId,
    /// Owning budget.
    pub budget_id: BudgetId,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Optional email address.
    pub email: Option<String>,
}

/// A single money movement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Transaction ID.
    pub id: TransactionId,
    /// Owning budget.
    pub budget_id: BudgetId,
    /// Assigned category, `None` until classified.
    pub category_id: Option<CategoryId>,
    /// Legacy link to a transactor.
    pub transactor_id: Option<TransactorId>,
    /// Free-text description, usually the bank statement narrative.
    pub description: String,
    /// Exact amount.
    pub amount: Decimal,
    /// Booking date.
    pub date: NaiveDate,
    /// Direction.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
}

/// A budget together with every row carrying its id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetAggregate {
    /// Budget header.
    #[serde(flatten)]
    pub budget: Budget,
    /// Categories of the budget, ascending id.
    pub categories: Vec<Category>,
    /// Transactors of the budget, ascending id.
    pub transactors: Vec<Transactor>,
    /// Transactions of the budget, ascending id.
    pub transactions: Vec<Transaction>,
}

impl BudgetAggregate {
    /// Budget ID shortcut.
    #[must_use]
    pub const fn id(&self) -> BudgetId {
        self.budget.id
    }
}

// ============================================================================
// Insert records
// ============================================================================

/// Budget row to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBudget {
    /// Budget name.
    pub name: String,
}

/// Category row to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCategory {
    /// Owning budget.
    pub budget_id: BudgetId,
    /// Category name.
    pub name: String,
}

/// Transactor row to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTransactor {
    /// Owning budget.
    pub budget_id: BudgetId,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Optional email address.
    pub email: Option<String>,
}

/// Transaction row to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTransaction {
    /// Owning budget.
    pub budget_id: BudgetId,
    /// Assigned category.
    pub category_id: Option<CategoryId>,
    /// Legacy transactor link.
    pub transactor_id: Option<TransactorId>,
    /// Description.
    pub description: String,
    /// Exact amount.
    pub amount: Decimal,
    /// Booking date.
    pub date: NaiveDate,
    /// Direction.
    pub transaction_type: TransactionType,
}

// ============================================================================
// Caller inputs
// ============================================================================

/// Create/update payload for a whole budget aggregate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetInput {
    /// Budget name.
    pub name: String,
    /// Categories to save.
    #[serde(default)]
    pub categories: Vec<CategoryInput>,
    /// Transactors to save.
    #[serde(default)]
    pub transactors: Vec<TransactorInput>,
    /// Transactions to save.
    #[serde(default)]
    pub transactions: Vec<TransactionInput>,
}

/// Category payload. An `id` makes the save an update of that row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryInput {
    /// Existing row to update.
    #[serde(default)]
    pub id: Option<CategoryId>,
    /// Category name.
    pub name: String,
}

/// Transactor payload. An `id` makes the save an update of that row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactorInput {
    /// Existing row to update.
    #[serde(default)]
    pub id: Option<TransactorId>,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Optional email address.
    #[serde(default)]
    pub email: Option<String>,
}

/// Transaction payload. An `id` makes the save an update of that row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionInput {
    /// Existing row to update.
    #[serde(default)]
    pub id: Option<TransactionId>,
    /// Description.
    pub description: String,
    /// Exact amount.
    pub amount: Decimal,
    /// Booking date.
    pub date: NaiveDate,
    /// Direction.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// Pre-assigned category.
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    /// Legacy transactor link.
    #[serde(default)]
    pub transactor_id: Option<TransactorId>,
}
