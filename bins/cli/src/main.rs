//! Fambud operator command line.
//!
//! Wires configuration, logging and the Postgres stores into the core
//! services. Results are printed to stdout as JSON; logs go to stderr.

mod commands;

use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use fambud_shared::AppConfig;

use crate::commands::{Cli, run};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = AppConfig::load()?;

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let db = fambud_db::connect(&config.database).await?;
    run(cli.command, &config, fambud_db::stores(&db)).await
}
