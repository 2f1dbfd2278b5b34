use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Parser;
use dotenvy::dotenv;

use hotel_rate_tracker::config::Config;
use hotel_rate_tracker::csv_io::{self, IngestOptions};
use hotel_rate_tracker::date_utils::parse_time_bound;
use hotel_rate_tracker::db::db_manager::DbManager;
use hotel_rate_tracker::logging;

/// Ingest a prices CSV as a new run
#[derive(Parser)]
struct Args {
    /// Path to the CSV file (Date,<hotel names...>)
    #[arg(long)]
    csv: PathBuf,
    /// Path to config JSON
    #[arg(long, default_value = "config.json")]
    config: String,
    /// Path to the SQLite database (defaults to config db_path)
    #[arg(long)]
    db: Option<String>,
    /// Run start date YYYY-MM-DD (defaults to earliest ingested date)
    #[arg(long)]
    start: Option<NaiveDate>,
    /// Run end date YYYY-MM-DD (defaults to latest ingested date)
    #[arg(long)]
    end: Option<NaiveDate>,
    /// Optional note for the run
    #[arg(long)]
    note: Option<String>,
    /// ISO timestamp for the run (defaults to now)
    #[arg(long)]
    timestamp: Option<String>,
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    dotenv().ok();

    if let Err(e) = logging::init_logging(env!("CARGO_BIN_NAME")) {
        eprintln!("Failed to initialize logging: {e}");
        return Err(e);
    }

    let args = Args::parse();
    let mut cfg = Config::load(&args.config)?;
    if let Some(db_path) = args.db {
        cfg.db_path = db_path;
    }

    let timestamp = match &args.timestamp {
        Some(raw) => Some(
            parse_time_bound(raw, false)
                .ok_or_else(|| eyre::eyre!("invalid --timestamp {raw:?}"))?,
        ),
        None => None,
    };

    let mut db = DbManager::init(&cfg.db_path).await?;
    let run_id = csv_io::ingest_csv(
        &mut db,
        &cfg,
        &args.csv,
        IngestOptions {
            start_date: args.start,
            end_date: args.end,
            note: args.note,
            timestamp,
        },
    )
    .await?;

    println!("Ingested run_id={run_id} into {}", cfg.db_path);
    Ok(())
}
