//! Period summaries: transaction amounts grouped by category and type over
//! an inclusive date range, with exact decimal totals.

mod error;
mod service;
mod types;


pub use error::SummaryError;
pub use service::{SummaryService, month_windows, summarise};
pub use types::{CategorySummary, MonthlyPeriod, PeriodSummary, TransactionSummary};
