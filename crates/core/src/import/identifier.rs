//! Duplicate detection keys.

use chrono::NaiveDate;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use rust_decimal::Decimal;
use tokio::sync::watch;

use super::parser::ParsedRow;
use crate::budget::types::{Transaction, TransactionType};

const SEPARATOR: char = '\u{1f}';

/// Key identifying a money movement independent of its id.
///
/// Built from the trimmed description, ISO date, normalized amount and
/// type. Normalizing the amount makes `10.0` and `10.00` the same key, since
/// a store may return a wider scale than was written.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TransactionIdentifier(String);

impl TransactionIdentifier {
    /// Builds the key from its parts.
    #[must_use]
    pub fn new(
        description: &str,
        date: NaiveDate,
        amount: Decimal,
        transaction_type: TransactionType,
    ) -> Self {
        Self(format!(
            "{}{SEPARATOR}{}{SEPARATOR}{}{SEPARATOR}{}",
            description.trim(),
            date.format("%Y-%m-%d"),
            amount.normalize(),
            transaction_type.as_str(),
        ))
    }

    /// Key of a stored transaction.
    #[must_use]
    pub fn of_transaction(transaction: &Transaction) -> Self {
        Self::new(
            &transaction.description,
            transaction.date,
            transaction.amount,
            transaction.transaction_type,
        )
    }

    /// Key of a parsed statement row.
    #[must_use]
    pub fn of_row(row: &ParsedRow) -> Self {
        Self::new(&row.description, row.date, row.amount, row.transaction_type)
    }
}

/// State of one identifier in a [`DedupSet`].
#[derive(Debug)]
enum Slot {
    /// A transaction with this identifier is stored.
    Stored,
    /// A save is in flight; the receiver closes when it settles.
    Pending(watch::Receiver<()>),
}

/// Exclusive right to save one identifier.
///
/// Settle it with [`DedupSet::commit`] or [`DedupSet::release`]. Dropping it
/// unsettled lets the next claimant take over.
#[derive(Debug)]
pub struct PendingClaim {
    identifier: TransactionIdentifier,
    done: watch::Sender<()>,
}

enum Attempt {
    Acquired(PendingClaim),
    Duplicate,
    Wait(watch::Receiver<()>),
}

/// Identifiers already present in a budget, shared by concurrent saves.
///
/// A claimant that finds a save in flight for the same identifier waits for
/// it: a committed save makes it a duplicate, a released one hands it the
/// claim. The outcome of a run therefore does not depend on how many rows
/// are saved at once.
#[derive(Debug, Default)]
pub struct DedupSet {
    slots: DashMap<TransactionIdentifier, Slot>,
}

impl DedupSet {
    /// Seeds the set from stored transactions.
    #[must_use]
    pub fn from_transactions(transactions: &[Transaction]) -> Self {
        let slots = DashMap::with_capacity(transactions.len());
        for transaction in transactions {
            slots.insert(TransactionIdentifier::of_transaction(transaction), Slot::Stored);
        }
        Self { slots }
    }

    /// Claims `identifier` for saving. Returns `None` if it is already stored,
    /// in which case the caller must not save.
    ///
    /// Waits while another claim on the same identifier is unsettled.
    pub async fn claim(&self, identifier: TransactionIdentifier) -> Option<PendingClaim> {
        loop {
            match self.try_claim(&identifier) {
                Attempt::Acquired(claim) => return Some(claim),
                Attempt::Duplicate => return None,
                Attempt::Wait(mut settled) => {
                    // Never sent on; resolves once the holder settles or drops.
                    let _ = settled.changed().await;
                }
            }
        }
    }

    fn try_claim(&self, identifier: &TransactionIdentifier) -> Attempt {
        match self.slots.entry(identifier.clone()) {
            Entry::Occupied(mut entry) => {
                let in_flight = match entry.get() {
                    Slot::Stored => return Attempt::Duplicate,
                    Slot::Pending(settled) if settled.has_changed().is_ok() => {
                        Some(settled.clone())
                    }
                    Slot::Pending(_) => None,
                };
                if let Some(settled) = in_flight {
                    return Attempt::Wait(settled);
                }
                let (claim, settled) = PendingClaim::new(identifier.clone());
                entry.insert(Slot::Pending(settled));
                Attempt::Acquired(claim)
            }
            Entry::Vacant(entry) => {
                let (claim, settled) = PendingClaim::new(identifier.clone());
                entry.insert(Slot::Pending(settled));
                Attempt::Acquired(claim)
            }
        }
    }

    /// Marks a claim as saved. Waiters on it become duplicates.
    pub fn commit(&self, claim: PendingClaim) {
        let PendingClaim { identifier, done } = claim;
        self.slots.insert(identifier, Slot::Stored);
        drop(done);
    }

    /// Gives back a claim whose save failed. The next waiter takes it over.
    pub fn release(&self, claim: PendingClaim) {
        let PendingClaim { identifier, done } = claim;
        self.slots.remove(&identifier);
        drop(done);
    }

    /// Number of identifiers held, stored or in flight.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl PendingClaim {
    fn new(identifier: TransactionIdentifier) -> (Self, watch::Receiver<()>) {
        let (done, settled) = watch::channel(());
        (Self { identifier, done }, settled)
    }
}
