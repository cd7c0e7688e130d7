//! Bank statement CSV import.
//!
//! Expected layout: a header row naming `Description`, `Date` (`dd/mm/yyyy`),
//! `Debit Amount` and `Credit Amount`. A debit becomes an expense, a credit
//! becomes income. Rows already present in the budget, or repeated within the
//! file, are skipped.

mod error;
mod identifier;
mod parser;
mod service;


pub use error::{ImportError, RowError};
pub use identifier::{DedupSet, TransactionIdentifier};
pub use parser::{ParsedRow, parse_statement};
pub use service::{CsvImporter, ImportJob, ImportReport};
