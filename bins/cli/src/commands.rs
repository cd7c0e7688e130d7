//! Subcommands and their handlers.

use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow};
use bytes::Bytes;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use fambud_core::budget::{AggregateService, BudgetInput};
use fambud_core::classify::{ClassifierService, MappingSource};
use fambud_core::import::CsvImporter;
use fambud_core::store::Stores;
use fambud_core::summary::SummaryService;
use fambud_shared::types::BudgetId;
use fambud_shared::{AppConfig, AppError};

/// Command line arguments.
#[derive(Parser)]
#[command(
    name = "fambud",
    version,
    about = "Household budget operations",
    long_about = "Manages budgets, imports bank statements, classifies \
                  transactions by keyword and summarises spending by category."
)]
pub struct Cli {
    /// Operation to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Operator subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Create a budget aggregate from a JSON file
    Create {
        /// Path to a JSON budget payload
        file: PathBuf,
    },
    /// Print a budget with its categories, transactors and transactions
    Show {
        /// Budget ID
        budget: BudgetId,
    },
    /// Save a JSON payload onto an existing budget
    Update {
        /// Budget ID
        budget: BudgetId,
        /// Path to a JSON budget payload
        file: PathBuf,
    },
    /// Delete a budget and everything that belongs to it
    Delete {
        /// Budget ID
        budget: BudgetId,
    },
    /// Import a bank statement CSV into a budget
    Import {
        /// Budget ID
        budget: BudgetId,
        /// Statement file
        file: PathBuf,
    },
    /// Assign categories to transactions by description keyword
    Classify {
        /// Budget ID
        budget: BudgetId,
    },
    /// Expense and income totals by category
    Summary {
        /// Budget ID
        budget: BudgetId,
        /// First day, inclusive (YYYY-MM-DD)
        #[arg(long)]
        from: NaiveDate,
        /// Last day, inclusive (YYYY-MM-DD)
        #[arg(long)]
        to: NaiveDate,
        /// Break the range down by calendar month
        #[arg(long)]
        monthly: bool,
    },
}

/// Runs one subcommand against the given stores.
pub async fn run(command: Command, config: &AppConfig, stores: Stores) -> anyhow::Result<()> {
    match command {
        Command::Create { file } => {
            let input = read_payload(&file).await?;
            let aggregate = AggregateService::new(stores)
                .create_aggregate(input)
                .await
                .map_err(fail)?;
            print_json(&aggregate)
        }
        Command::Show { budget } => {
            let aggregate = AggregateService::new(stores)
                .get_aggregate(budget)
                .await
                .map_err(fail)?;
            print_json(&aggregate)
        }
        Command::Update { budget, file } => {
            let input = read_payload(&file).await?;
            let aggregate = AggregateService::new(stores)
                .update_aggregate(budget, input)
                .await
                .map_err(fail)?;
            print_json(&aggregate)
        }
        Command::Delete { budget } => {
            AggregateService::new(stores)
                .delete_aggregate(budget)
                .await
                .map_err(fail)?;
            print_json(&serde_json::json!({ "deleted": budget }))
        }
        Command::Import { budget, file } => {
            let statement = tokio::fs::read(&file)
                .await
                .with_context(|| format!("reading {}", file.display()))?;
            let job = CsvImporter::new(stores)
                .with_concurrency(config.import.concurrency)
                .start_import(budget, Bytes::from(statement));
            info!(job_id = %job.id, "waiting for import");
            let report = job.handle.await?.map_err(fail)?;
            print_json(&report)
        }
        Command::Classify { budget } => {
            let source = MappingSource::from_config(&config.classifier);
            let report = ClassifierService::new(stores, source)
                .with_concurrency(config.classifier.concurrency)
                .classify(budget)
                .await
                .map_err(fail)?;
            print_json(&report)
        }
        Command::Summary {
            budget,
            from,
            to,
            monthly,
        } => {
            let service = SummaryService::new(stores);
            if monthly {
                let summary = service
                    .monthly_breakdown(budget, from, to)
                    .await
                    .map_err(fail)?;
                print_json(&summary)
            } else {
                let summary = service.period_summary(budget, from, to).await.map_err(fail)?;
                print_json(&summary)
            }
        }
    }
}

async fn read_payload(file: &Path) -> anyhow::Result<BudgetInput> {
    let text = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("reading {}", file.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", file.display()))
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn fail(err: impl Into<AppError>) -> anyhow::Error {
    let err: AppError = err.into();
    if err.may_have_partial_state() {
        anyhow!("[{}] {err} (the budget may be partially written)", err.error_code())
    } else {
        anyhow!("[{}] {err}", err.error_code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_summary_arguments() {
        let cli = Cli::parse_from([
            "fambud", "summary", "3", "--from", "2024-01-01", "--to", "2024-01-31", "--monthly",
        ]);
        match cli.command {
            Command::Summary {
                budget,
                from,
                to,
                monthly,
            } => {
                assert_eq!(budget, BudgetId::new(3));
                assert_eq!(from, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
                assert_eq!(to, NaiveDate::from_ymd_opt(2024, 1, 31).unwrap());
                assert!(monthly);
            }
            _ => panic!("expected summary"),
        }
    }

    #[test]
    fn test_bad_budget_id_is_rejected() {
        assert!(Cli::try_parse_from(["fambud", "show", "abc"]).is_err());
    }
}
