//! Writes every mailing list subscriber to a CSV file for the monthly report
//! distribution.
//!
//! Usage: `export_subscribers [OUTPUT_PATH]`
use chrono::Utc;
use std::path::PathBuf;

use csrr_mailing_list::config::get_configuration;
use csrr_mailing_list::errors::error_chain_fmt;
use csrr_mailing_list::export::{distribution_filename, render_csv, CsvLayout};
use csrr_mailing_list::startup::get_connection_db_pool;
use csrr_mailing_list::store::{StoreError, SubscriberOrder, SubscriberStore};
use csrr_mailing_list::telemetry::{get_subscriber, init_subscriber};

#[derive(thiserror::Error)]
enum ExportToolError {
    #[error("Failed to read the configuration.")]
    Config(#[from] config::ConfigError),
    #[error("Failed to fetch subscribers from the database.")]
    Fetch(#[from] StoreError),
    #[error("Failed to write the export file.")]
    Write(#[from] std::io::Error),
}

impl std::fmt::Debug for ExportToolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

#[tokio::main]
async fn main() -> Result<(), ExportToolError> {
    // stdout is reserved for the summary
    let subscriber = get_subscriber(
        String::from("export_subscribers"),
        String::from("info"),
        std::io::stderr,
    );

    init_subscriber(subscriber);

    let config = get_configuration()?;
    let db_pool = get_connection_db_pool(&config.database);

    tracing::info!("Fetching subscribers from database...");

    let subscribers = db_pool.select_all(SubscriberOrder::NewestFirst).await?;

    if subscribers.is_empty() {
        tracing::info!("No subscribers found to export.");
        return Ok(());
    }

    let output_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(distribution_filename(Utc::now())));

    std::fs::write(
        &output_path,
        render_csv(CsvLayout::Distribution, &subscribers),
    )?;

    tracing::info!(
        "Successfully exported {} subscribers to {}",
        subscribers.len(),
        output_path.display()
    );

    println!("Export Summary:");
    println!("- Total subscribers: {}", subscribers.len());
    println!("- Export file: {}", output_path.display());

    Ok(())
}
