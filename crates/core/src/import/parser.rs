//! Statement parsing.

use std::str::FromStr;

use chrono::NaiveDate;
use csv::StringRecord;
use fambud_shared::types::BudgetId;
use rayon::prelude::*;
use rust_decimal::Decimal;
use tracing::warn;

use super::error::{ImportError, RowError};
use crate::budget::types::{NewTransaction, TransactionType, amount_fits};

const DESCRIPTION: &str = "Description";
const DATE: &str = "Date";
const DEBIT: &str = "Debit Amount";
const CREDIT: &str = "Credit Amount";
const DATE_FORMAT: &str = "%d/%m/%Y";

/// A statement row that parsed cleanly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRow {
    /// 1-based line number, counting the header.
    pub line: u64,
    /// Narrative, trimmed.
    pub description: String,
    /// Booking date.
    pub date: NaiveDate,
    /// Exact amount as written.
    pub amount: Decimal,
    /// Expense for a debit, income for a credit.
    pub transaction_type: TransactionType,
}

impl ParsedRow {
    /// Insert record for this row. The row stays uncategorised.
    #[must_use]
    pub fn to_new_transaction(&self, budget_id: BudgetId) -> NewTransaction {
        NewTransaction {
            budget_id,
            category_id: None,
            transactor_id: None,
            description: self.description.clone(),
            amount: self.amount,
            date: self.date,
            transaction_type: self.transaction_type,
        }
    }
}

/// Column positions resolved from the header row.
#[derive(Debug, Clone, Copy)]
struct Columns {
    description: usize,
    date: usize,
    debit: usize,
    credit: usize,
}

impl Columns {
    fn locate(headers: &StringRecord) -> Result<Self, ImportError> {
        let find = |name: &'static str| {
            headers
                .iter()
                .position(|h| h.eq_ignore_ascii_case(name))
                .ok_or(ImportError::MissingColumn(name))
        };
        Ok(Self {
            description: find(DESCRIPTION)?,
            date: find(DATE)?,
            debit: find(DEBIT)?,
            credit: find(CREDIT)?,
        })
    }
}

/// Parses a statement into one result per data row, in file order.
///
/// Records are read sequentially and converted in parallel. A bad row yields
/// a `RowError` in its slot; the rest of the file is still parsed.
///
/// # Errors
///
/// Returns `ImportError::MissingColumn` if a required header is absent, or
/// `ImportError::Unreadable` if the header row cannot be read.
pub fn parse_statement(bytes: &[u8]) -> Result<Vec<Result<ParsedRow, RowError>>, ImportError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let headers = reader
        .headers()
        .map_err(|e| ImportError::Unreadable(e.to_string()))?
        .clone();
    let columns = Columns::locate(&headers)?;

    let records: Vec<_> = reader.records().collect();
    Ok(records
        .into_par_iter()
        .map(|record| match record {
            Ok(record) => convert(columns, &record),
            Err(e) => Err(RowError::Malformed {
                line: e.position().map_or(0, csv::Position::line),
                reason: e.to_string(),
            }),
        })
        .collect())
}

fn convert(columns: Columns, record: &StringRecord) -> Result<ParsedRow, RowError> {
    let line = record.position().map_or(0, csv::Position::line);
    let field = |index: usize, name: &'static str| {
        record.get(index).ok_or_else(|| RowError::Malformed {
            line,
            reason: format!("missing {name} field"),
        })
    };

    let description = field(columns.description, DESCRIPTION)?.to_string();
    let raw_date = field(columns.date, DATE)?;
    let date = NaiveDate::parse_from_str(raw_date, DATE_FORMAT).map_err(|_| RowError::InvalidDate {
        line,
        value: raw_date.to_string(),
    })?;

    let debit = record.get(columns.debit).filter(|s| !s.is_empty());
    let credit = record.get(columns.credit).filter(|s| !s.is_empty());
    let (raw_amount, transaction_type) = match (debit, credit) {
        (Some(debit), Some(_)) => {
            warn!(line, "row has both debit and credit amounts, using debit");
            (debit, TransactionType::Expense)
        }
        (Some(debit), None) => (debit, TransactionType::Expense),
        (None, Some(credit)) => (credit, TransactionType::Income),
        (None, None) => return Err(RowError::MissingAmount { line }),
    };

    Ok(ParsedRow {
        line,
        description,
        date,
        amount: parse_amount(raw_amount).ok_or_else(|| RowError::InvalidAmount {
            line,
            value: raw_amount.to_string(),
        })?,
        transaction_type,
    })
}

/// Exact decimal parse; thousands separators are ignored. Amounts the store
/// would round are refused.
fn parse_amount(raw: &str) -> Option<Decimal> {
    Decimal::from_str(&raw.replace(',', ""))
        .ok()
        .filter(|amount| amount_fits(*amount))
}
