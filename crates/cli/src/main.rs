//! Voucher import CLI - creates Saleor vouchers from a CSV code list.
//!
//! # Usage
//!
//! ```bash
//! # Import codes with the default channel/discount/expiration
//! voucher-import --file codes.csv
//!
//! # Restrict the vouchers to two collections
//! voucher-import --file codes.csv \
//!     --collection Q29sbGVjdGlvbjo3 --collection Q29sbGVjdGlvbjoy
//!
//! # Override the channel listing
//! voucher-import --file codes.csv --channel Q2hhbm5lbDoy --discount 20
//! ```
//!
//! # Environment Variables
//!
//! - `SALEOR_URL` - GraphQL endpoint of the Saleor instance
//! - `SALEOR_TOKEN` - app token for the `Authorization` header
//!
//! Codes that already exist remotely are skipped, so re-running a partially
//! completed import is safe.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use clap::Parser;

use voucher_importer::config::{DEFAULT_CHANNEL_ID, DEFAULT_DISCOUNT_PERCENTAGE};
use voucher_importer::saleor::format_discount_errors;
use voucher_importer::{
    ImportConfig, RecordStatus, SaleorClient, SaleorConfig, load_voucher_records, run_import,
};

#[derive(Parser)]
#[command(name = "voucher-import")]
#[command(version, about = "Import discount codes from a CSV file into Saleor")]
struct Cli {
    /// CSV file with a `code` column
    #[arg(short, long, default_value = "ticket-sprinter-codes.csv")]
    file: PathBuf,

    /// Channel the vouchers are listed on
    #[arg(long, default_value = DEFAULT_CHANNEL_ID)]
    channel: String,

    /// Percentage discount attached to the channel listing
    #[arg(long, default_value_t = DEFAULT_DISCOUNT_PERCENTAGE)]
    discount: f64,

    /// Expiration date for created vouchers (YYYY-MM-DD, midnight UTC)
    #[arg(long, value_parser = parse_end_date)]
    ends_at: Option<DateTime<Utc>>,

    /// Collection ID the vouchers are restricted to (repeatable)
    #[arg(long = "collection")]
    collections: Vec<String>,
}

fn parse_end_date(raw: &str) -> Result<DateTime<Utc>, String> {
    let date = raw
        .parse::<NaiveDate>()
        .map_err(|e| format!("not a YYYY-MM-DD date: {e}"))?;
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| "not a valid date".to_string())?;
    Ok(Utc.from_utc_datetime(&midnight))
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Import failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let saleor = SaleorConfig::from_env()?;

    let mut config = ImportConfig {
        collection_ids: cli.collections,
        channel_id: cli.channel,
        discount_percentage: cli.discount,
        ..ImportConfig::default()
    };
    if let Some(ends_at) = cli.ends_at {
        config.end_date = ends_at;
    }

    let records = load_voucher_records(&cli.file)?;
    tracing::info!(
        file = %cli.file.display(),
        count = records.len(),
        "Loaded voucher records"
    );

    let client = SaleorClient::new(&saleor);
    let report = run_import(&client, &config, &records).await?;

    tracing::info!(
        created = report.created(),
        existing = report.existing(),
        skipped = report.skipped(),
        failed = report.failed(),
        "Import finished"
    );

    if report.has_failures() {
        for outcome in &report.outcomes {
            if let RecordStatus::Failed { stage, errors } = &outcome.status {
                tracing::error!(
                    code = %outcome.code,
                    stage = %stage,
                    errors = %format_discount_errors(errors),
                    "Voucher was not fully imported"
                );
            }
        }
        return Err("one or more vouchers failed to import".into());
    }

    Ok(())
}
