//! Import runs.

use bytes::Bytes;
use fambud_shared::types::{BudgetId, ImportJobId};
use futures::{StreamExt, stream};
use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::error::ImportError;
use super::identifier::{DedupSet, TransactionIdentifier};
use super::parser::{ParsedRow, parse_statement};
use crate::store::Stores;

const DEFAULT_CONCURRENCY: usize = 8;

/// Counts from one import run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    /// Job the counts belong to.
    pub job_id: ImportJobId,
    /// Data rows in the file.
    pub rows: usize,
    /// Rows saved as new transactions.
    pub imported: usize,
    /// Rows skipped as already present.
    pub duplicates: usize,
    /// Rows that did not parse.
    pub invalid: usize,
    /// Rows whose save failed.
    pub failed: usize,
}

impl ImportReport {
    const fn empty(job_id: ImportJobId) -> Self {
        Self {
            job_id,
            rows: 0,
            imported: 0,
            duplicates: 0,
            invalid: 0,
            failed: 0,
        }
    }
}

/// A started import.
#[derive(Debug)]
pub struct ImportJob {
    /// Id returned to the caller.
    pub id: ImportJobId,
    /// Completion handle. Dropping it does not cancel the run.
    pub handle: JoinHandle<Result<ImportReport, ImportError>>,
}

enum RowOutcome {
    Imported,
    Duplicate,
    Failed,
}

/// Imports bank statements into a budget.
#[derive(Debug, Clone)]
pub struct CsvImporter {
    stores: Stores,
    concurrency: usize,
}

impl CsvImporter {
    /// Creates an importer over the given stores.
    #[must_use]
    pub const fn new(stores: Stores) -> Self {
        Self {
            stores,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    /// Sets how many rows may be saved at once.
    #[must_use]
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Starts an import on the current tokio runtime and returns at once.
    ///
    /// The outcome is logged under the job id and available from the handle.
    pub fn start_import(&self, budget_id: BudgetId, statement: Bytes) -> ImportJob {
        let id = ImportJobId::new();
        let importer = self.clone();
        info!(job_id = %id, %budget_id, bytes = statement.len(), "import started");

        let handle = tokio::spawn(async move {
            let result = importer.run_import(id, budget_id, statement).await;
            if let Err(e) = &result {
                error!(job_id = %id, %budget_id, error = %e, "import failed");
            }
            result
        });

        ImportJob { id, handle }
    }

    /// Runs an import to completion.
    ///
    /// Bad rows are logged and counted; so are rows whose save fails. Rows
    /// saved before a cancellation stay saved.
    ///
    /// # Errors
    ///
    /// Returns `ImportError::BudgetNotFound` for an unknown budget,
    /// `ImportError::MissingColumn` or `ImportError::Unreadable` for a bad
    /// header, or `ImportError::Store` if existing transactions cannot be
    /// loaded. Nothing is written in those cases.
    pub async fn run_import(
        &self,
        job_id: ImportJobId,
        budget_id: BudgetId,
        statement: Bytes,
    ) -> Result<ImportReport, ImportError> {
        if self.stores.budgets.find_by_id(budget_id).await?.is_none() {
            return Err(ImportError::BudgetNotFound(budget_id));
        }

        let parsed = tokio::task::spawn_blocking(move || parse_statement(&statement))
            .await
            .map_err(|e| ImportError::Aborted(e.to_string()))??;

        let mut report = ImportReport {
            rows: parsed.len(),
            ..ImportReport::empty(job_id)
        };
        let mut rows = Vec::with_capacity(parsed.len());
        for result in parsed {
            match result {
                Ok(row) => rows.push(row),
                Err(e) => {
                    warn!(%job_id, line = e.line(), error = %e, "skipping statement row");
                    report.invalid += 1;
                }
            }
        }

        let existing = self.stores.transactions.find_by_budget(budget_id).await?;
        let seen = DedupSet::from_transactions(&existing);
        debug!(%job_id, existing = seen.len(), candidates = rows.len(), "dedup set loaded");

        let outcomes: Vec<RowOutcome> = stream::iter(rows)
            .map(|row| self.import_row(job_id, budget_id, &seen, row))
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        for outcome in outcomes {
            match outcome {
                RowOutcome::Imported => report.imported += 1,
                RowOutcome::Duplicate => report.duplicates += 1,
                RowOutcome::Failed => report.failed += 1,
            }
        }

        info!(
            %job_id,
            %budget_id,
            rows = report.rows,
            imported = report.imported,
            duplicates = report.duplicates,
            invalid = report.invalid,
            failed = report.failed,
            "import completed"
        );
        Ok(report)
    }

    async fn import_row(
        &self,
        job_id: ImportJobId,
        budget_id: BudgetId,
        seen: &DedupSet,
        row: ParsedRow,
    ) -> RowOutcome {
        let Some(claim) = seen.claim(TransactionIdentifier::of_row(&row)).await else {
            debug!(%job_id, line = row.line, "duplicate row skipped");
            return RowOutcome::Duplicate;
        };

        match self
            .stores
            .transactions
            .create(row.to_new_transaction(budget_id))
            .await
        {
            Ok(_) => {
                seen.commit(claim);
                RowOutcome::Imported
            }
            Err(e) => {
                seen.release(claim);
                error!(%job_id, line = row.line, error = %e, "failed to save statement row");
                RowOutcome::Failed
            }
        }
    }
}
